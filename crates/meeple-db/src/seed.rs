use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use serde::Deserialize;
use tracing::info;

use crate::migrations::DEFAULT_REVIEW_IMG_URL;

const TEST_DATA: &str = include_str!("../data/test-data.json");

/// A complete dataset, in dependency order.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub categories: Vec<SeedCategory>,
    pub users: Vec<SeedUser>,
    pub reviews: Vec<SeedReview>,
    pub comments: Vec<SeedComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedReview {
    pub title: String,
    pub review_body: String,
    pub designer: String,
    pub review_img_url: Option<String>,
    #[serde(default)]
    pub votes: i64,
    pub category: String,
    pub owner: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// `review_id` is 1-based, matching the order of `reviews` after a reseed.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedComment {
    pub body: String,
    #[serde(default)]
    pub votes: i64,
    pub author: String,
    pub review_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedStats {
    pub categories: usize,
    pub users: usize,
    pub reviews: usize,
    pub comments: usize,
}

impl SeedData {
    /// Small fixture dataset bundled with the crate.
    pub fn test() -> Result<Self> {
        serde_json::from_str(TEST_DATA).context("parsing bundled test data")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed data {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing seed data {}", path.display()))
    }
}

fn stored_timestamp(ts: &Option<DateTime<Utc>>) -> String {
    ts.unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Replace every row with `data` in one transaction. Identifier sequences are
/// reset so reviews and comments are numbered from 1 in input order.
pub fn seed(conn: &mut Connection, data: &SeedData) -> Result<SeedStats> {
    let tx = conn.transaction()?;

    tx.execute_batch(
        "DELETE FROM comments;
         DELETE FROM reviews;
         DELETE FROM users;
         DELETE FROM categories;
         DELETE FROM sqlite_sequence WHERE name IN ('reviews', 'comments');",
    )?;

    {
        let mut stmt = tx.prepare("INSERT INTO categories (slug, description) VALUES (?1, ?2)")?;
        for category in &data.categories {
            stmt.execute(params![category.slug, category.description])?;
        }

        let mut stmt =
            tx.prepare("INSERT INTO users (username, name, avatar_url) VALUES (?1, ?2, ?3)")?;
        for user in &data.users {
            stmt.execute(params![user.username, user.name, user.avatar_url])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO reviews (title, review_body, designer, review_img_url, votes, category, owner, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for review in &data.reviews {
            stmt.execute(params![
                review.title,
                review.review_body,
                review.designer,
                review.review_img_url.as_deref().unwrap_or(DEFAULT_REVIEW_IMG_URL),
                review.votes,
                review.category,
                review.owner,
                stored_timestamp(&review.created_at),
            ])
            .with_context(|| format!("seeding review '{}'", review.title))?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO comments (body, votes, author, review_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for comment in &data.comments {
            stmt.execute(params![
                comment.body,
                comment.votes,
                comment.author,
                comment.review_id,
                stored_timestamp(&comment.created_at),
            ])
            .with_context(|| format!("seeding comment on review {}", comment.review_id))?;
        }
    }

    tx.commit()?;

    let stats = SeedStats {
        categories: data.categories.len(),
        users: data.users.len(),
        reviews: data.reviews.len(),
        comments: data.comments.len(),
    };
    info!(
        "Seeded {} categories, {} users, {} reviews, {} comments",
        stats.categories, stats.users, stats.reviews, stats.comments
    );
    Ok(stats)
}
