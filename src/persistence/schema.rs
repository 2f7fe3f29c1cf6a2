//! Table layout and seed data

/// One independent table per feature; no foreign keys
pub const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS flappy_scores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        score INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS heart_clicks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        count INTEGER NOT NULL DEFAULT 0,
        last_updated DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS visitors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ip_address TEXT,
        user_agent TEXT,
        visited_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS cart (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        item_name TEXT NOT NULL,
        image TEXT,
        added_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS timeline_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        order_index INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
";

/// The heart counter is a singleton row
pub const SEED_HEART_ROW: &str = "
    INSERT INTO heart_clicks (count)
    SELECT 0
    WHERE NOT EXISTS (SELECT 1 FROM heart_clicks LIMIT 1)
";

/// (title, date, description, order_index), inserted only into an empty table
pub const DEFAULT_TIMELINE: [(&str, &str, &str, i64); 4] = [
    (
        "First Meeting",
        "January 2024",
        "The day I met you, my life changed forever. Your smile lit up the entire room.",
        1,
    ),
    (
        "Our First Date",
        "February 2024",
        "That magical evening where time stood still. I knew you were the one.",
        2,
    ),
    (
        "Adventure Together",
        "March 2024",
        "Every adventure with you becomes my favorite memory.",
        3,
    ),
    (
        "Today & Forever",
        "Valentine's 2026",
        "Here's to all our future memories together. I love you more each day.",
        4,
    ),
];

/// Order index used when a new timeline event does not specify one
pub const DEFAULT_ORDER_INDEX: i64 = 999;
