use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Image used when a review is stored without one.
pub const DEFAULT_REVIEW_IMG_URL: &str =
    "https://images.pexels.com/photos/163064/play-stone-network-networked-interactive-163064.jpeg";

pub const CURRENT_VERSION: i64 = 1;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| {
            r.get(0)
        })?;

    if version < 1 {
        info!("Database: running migration v1 (initial schema)");
        conn.execute_batch(&format!(
            "
            CREATE TABLE categories (
                slug        TEXT PRIMARY KEY,
                description TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE users (
                username    TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                avatar_url  TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE reviews (
                review_id       INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                review_body     TEXT NOT NULL,
                designer        TEXT NOT NULL,
                review_img_url  TEXT NOT NULL DEFAULT '{img}',
                votes           INTEGER NOT NULL DEFAULT 0,
                category        TEXT NOT NULL REFERENCES categories(slug),
                owner           TEXT NOT NULL REFERENCES users(username),
                created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE comments (
                comment_id  INTEGER PRIMARY KEY AUTOINCREMENT,
                author      TEXT NOT NULL REFERENCES users(username),
                review_id   INTEGER NOT NULL REFERENCES reviews(review_id),
                votes       INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                body        TEXT NOT NULL
            );

            CREATE INDEX idx_comments_review ON comments(review_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
            img = DEFAULT_REVIEW_IMG_URL,
        ))?;
    }

    info!("Database migrations complete (schema v{})", CURRENT_VERSION);
    Ok(())
}
