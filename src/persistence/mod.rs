//! SQLite record store
//!
//! One table per feature, each touched by single unconditional statements.
//! The connection is shared behind a mutex; callers on an async runtime are
//! expected to run store calls on a blocking thread.
//!
//! Features:
//! - Schema created on open, heart counter and default timeline seeded once
//! - Singleton heart counter with overwrite semantics
//! - Append-only timeline, cart, high score and visitor tables

pub mod error;
pub mod records;
pub mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};

pub use error::{Result, StoreError};
pub use records::{
    CartItem, HighScoreEntry, NewCartItem, NewTimelineEvent, TimelineEvent, VisitStats,
};

/// Maximum number of high scores returned by the leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// Handle to the record database
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if needed) the database file and initialize it
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        log::info!("Connected to SQLite database at {}", path.display());
        Self::initialize(conn)
    }

    /// Private in-memory database, used by tests and throwaway runs
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(mut conn: Connection) -> Result<Self> {
        let tx = conn.transaction()?;
        tx.execute_batch(schema::SCHEMA)?;
        tx.execute(schema::SEED_HEART_ROW, params![])?;

        let events: i64 = tx.query_row("SELECT COUNT(*) FROM timeline_events", params![], |row| {
            row.get(0)
        })?;
        if events == 0 {
            let mut stmt = tx.prepare(
                "INSERT INTO timeline_events (title, date, description, order_index)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (title, date, description, order_index) in schema::DEFAULT_TIMELINE {
                stmt.execute(params![title, date, description, order_index])?;
            }
            drop(stmt);
            log::info!("Timeline events initialized");
        }
        tx.commit()?;
        log::info!("Database tables initialized");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Current heart count (0 when the singleton row is missing)
    pub fn heart_count(&self) -> Result<i64> {
        let count = self
            .conn()?
            .query_row(
                "SELECT count FROM heart_clicks ORDER BY id DESC LIMIT 1",
                params![],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.unwrap_or(0))
    }

    /// Overwrite the heart count
    pub fn set_heart_count(&self, count: i64) -> Result<()> {
        self.conn()?.execute(
            "UPDATE heart_clicks SET count = ?1, last_updated = CURRENT_TIMESTAMP
             WHERE id = (SELECT id FROM heart_clicks LIMIT 1)",
            params![count],
        )?;
        Ok(())
    }

    /// All timeline events, in display order
    pub fn timeline_events(&self) -> Result<Vec<TimelineEvent>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, date, description, order_index, created_at
             FROM timeline_events ORDER BY order_index ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![], |row| {
            Ok(TimelineEvent {
                id: row.get(0)?,
                title: row.get(1)?,
                date: row.get(2)?,
                description: row.get(3)?,
                order_index: row.get(4)?,
                created_at: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a timeline event, returning its id
    pub fn add_timeline_event(&self, event: &NewTimelineEvent) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO timeline_events (title, date, description, order_index)
             VALUES (?1, ?2, ?3, ?4)",
            params![event.title, event.date, event.description, event.order_index],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All cart items, newest first
    pub fn cart_items(&self) -> Result<Vec<CartItem>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, item_name, image, added_at FROM cart ORDER BY added_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![], |row| {
            Ok(CartItem {
                id: row.get(0)?,
                item_name: row.get(1)?,
                image: row.get(2)?,
                added_at: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a cart item, returning its id
    pub fn add_cart_item(&self, item: &NewCartItem) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO cart (item_name, image) VALUES (?1, ?2)",
            params![item.item_name, item.image],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a game outcome, returning its id
    pub fn record_high_score(&self, score: u32) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute("INSERT INTO flappy_scores (score) VALUES (?1)", params![score])?;
        Ok(conn.last_insert_rowid())
    }

    /// Best scores first, earliest first among ties
    pub fn high_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, score, created_at FROM flappy_scores
             ORDER BY score DESC, id ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(HighScoreEntry {
                id: row.get(0)?,
                score: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Append a visitor log row
    pub fn record_visit(&self, ip_address: Option<&str>, user_agent: Option<&str>) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO visitors (ip_address, user_agent) VALUES (?1, ?2)",
            params![ip_address, user_agent],
        )?;
        Ok(())
    }

    /// Visit totals, heart count and number of distinct visit days
    pub fn stats(&self) -> Result<VisitStats> {
        let stats = self.conn()?.query_row(
            "SELECT
                (SELECT COUNT(*) FROM visitors),
                (SELECT COALESCE((SELECT count FROM heart_clicks LIMIT 1), 0)),
                (SELECT COUNT(DISTINCT DATE(visited_at)) FROM visitors)",
            params![],
            |row| {
                Ok(VisitStats {
                    total_visits: row.get(0)?,
                    total_hearts: row.get(1)?,
                    unique_days: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    #[test]
    fn test_heart_counter_starts_at_zero_and_overwrites() {
        let store = store();
        assert_eq!(store.heart_count().unwrap(), 0);

        store.set_heart_count(41).unwrap();
        store.set_heart_count(42).unwrap();

        assert_eq!(store.heart_count().unwrap(), 42);
    }

    #[test]
    fn test_timeline_seeded_in_order() {
        let events = store().timeline_events().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].title, "First Meeting");
        assert_eq!(events[3].title, "Today & Forever");
        assert!(events.windows(2).all(|w| w[0].order_index <= w[1].order_index));
    }

    #[test]
    fn test_seeds_applied_once_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("valentine.db");

        {
            let store = Store::open(&path).unwrap();
            store.set_heart_count(7).unwrap();
        }
        let store = Store::open(&path).unwrap();

        assert_eq!(store.timeline_events().unwrap().len(), 4);
        assert_eq!(store.heart_count().unwrap(), 7);
        assert_eq!(store.stats().unwrap().total_hearts, 7);
    }

    #[test]
    fn test_new_timeline_event_sorted_by_order_index() {
        let store = store();
        let id = store
            .add_timeline_event(&NewTimelineEvent {
                title: "Engagement".to_string(),
                date: "June 2026".to_string(),
                description: "Yes!".to_string(),
                order_index: 0,
            })
            .unwrap();

        let events = store.timeline_events().unwrap();
        assert_eq!(events[0].id, id);
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_cart_newest_first() {
        let store = store();
        let first = store
            .add_cart_item(&NewCartItem {
                item_name: "Roses".to_string(),
                image: None,
            })
            .unwrap();
        let second = store
            .add_cart_item(&NewCartItem {
                item_name: "Chocolate".to_string(),
                image: Some("choc.png".to_string()),
            })
            .unwrap();

        let items = store.cart_items().unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(items[0].image.as_deref(), Some("choc.png"));
    }

    #[test]
    fn test_high_scores_best_first_and_limited() {
        let store = store();
        for score in [3, 10, 7, 10] {
            store.record_high_score(score).unwrap();
        }

        let top = store.high_scores(3).unwrap();
        assert_eq!(top.iter().map(|e| e.score).collect::<Vec<_>>(), vec![10, 10, 7]);
        assert!(top[0].id < top[1].id);
    }

    #[test]
    fn test_stats_count_visits() {
        let store = store();
        assert_eq!(store.stats().unwrap(), VisitStats::default());

        store.record_visit(Some("127.0.0.1"), Some("test-agent")).unwrap();
        store.record_visit(None, None).unwrap();
        store.set_heart_count(3).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_visits, 2);
        assert_eq!(stats.total_hearts, 3);
        assert_eq!(stats.unique_days, 1);
    }
}
