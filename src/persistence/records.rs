//! Row types returned by the store and serialized by the API

use serde::{Deserialize, Serialize};

/// A `timeline_events` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub description: String,
    pub order_index: i64,
    pub created_at: Option<String>,
}

/// Fields of a timeline event to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimelineEvent {
    pub title: String,
    pub date: String,
    pub description: String,
    pub order_index: i64,
}

/// A `cart` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i64,
    pub item_name: String,
    pub image: Option<String>,
    pub added_at: Option<String>,
}

/// Fields of a cart item to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub item_name: String,
    pub image: Option<String>,
}

/// A `flappy_scores` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub id: i64,
    pub score: i64,
    pub created_at: Option<String>,
}

/// Aggregate visit analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisitStats {
    pub total_visits: i64,
    pub total_hearts: i64,
    pub unique_days: i64,
}
