use chrono::{DateTime, NaiveDateTime, Utc};
use meeple_types::models::{
    Category, Comment, CommentCount, Review, ReviewDetail, ReviewSummary, User, UserSummary,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::Database;
use crate::error::{StoreError, StoreResult};
use crate::guard::ensure_review_exists;
use crate::listing;
use crate::validate::{ListParams, ReviewId, validate_list_params};

pub(crate) const REVIEW_COLUMNS: &str =
    "review_id, title, review_body, designer, review_img_url, votes, category, owner, created_at";

pub(crate) const COMMENT_COLUMNS: &str = "comment_id, author, review_id, votes, created_at, body";

impl Database {
    // -- Reviews --

    pub fn list_reviews(&self, params: ListParams<'_>) -> StoreResult<Vec<ReviewSummary>> {
        self.with_conn(|conn| {
            let query = validate_list_params(conn, params)?;
            listing::fetch(conn, &query)
        })
    }

    pub fn get_review(&self, raw_id: &str) -> StoreResult<ReviewDetail> {
        self.with_conn(|conn| {
            let id = ensure_review_exists(conn, raw_id)?;
            query_review_detail(conn, id)?.ok_or_else(|| StoreError::not_found("review", id))
        })
    }

    // -- Comments --

    pub fn list_comments(&self, raw_review_id: &str) -> StoreResult<Vec<Comment>> {
        self.with_conn(|conn| {
            let id = ensure_review_exists(conn, raw_review_id)?;
            query_comments_for_review(conn, id)
        })
    }

    // -- Catalog --

    pub fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.with_conn(query_categories)
    }

    pub fn list_users(&self) -> StoreResult<Vec<UserSummary>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT username FROM users ORDER BY username")?;
            let rows = stmt
                .query_map([], |row| Ok(UserSummary { username: row.get(0)? }))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user(&self, username: &str) -> StoreResult<User> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT username, name, avatar_url FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(User {
                        username: row.get(0)?,
                        name: row.get(1)?,
                        avatar_url: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| StoreError::not_found("user", username))
        })
    }
}

fn query_review_detail(conn: &Connection, id: ReviewId) -> StoreResult<Option<ReviewDetail>> {
    let row = conn
        .query_row(
            "SELECT r.review_id, r.title, r.review_body, r.designer, r.review_img_url,
                    r.votes, r.category, r.owner, r.created_at,
                    COUNT(c.comment_id) AS comment_count
             FROM reviews r
             LEFT JOIN comments c ON c.review_id = r.review_id
             WHERE r.review_id = ?1
             GROUP BY r.review_id",
            [id.0],
            |row| {
                Ok(ReviewDetail {
                    review: review_from_row(row)?,
                    comment_count: CommentCount(row.get(9)?),
                })
            },
        )
        .optional()?;

    Ok(row)
}

fn query_comments_for_review(conn: &Connection, id: ReviewId) -> StoreResult<Vec<Comment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM comments WHERE review_id = ?1 ORDER BY created_at DESC, comment_id",
        COMMENT_COLUMNS
    ))?;
    let rows = stmt
        .query_map([id.0], comment_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_categories(conn: &Connection) -> StoreResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT slug, description FROM categories ORDER BY slug")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Category {
                slug: row.get(0)?,
                description: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Expects the column order of [`REVIEW_COLUMNS`].
pub(crate) fn review_from_row(row: &Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        review_id: row.get(0)?,
        title: row.get(1)?,
        review_body: row.get(2)?,
        designer: row.get(3)?,
        review_img_url: row.get(4)?,
        votes: row.get(5)?,
        category: row.get(6)?,
        owner: row.get(7)?,
        created_at: timestamp(row, 8)?,
    })
}

/// Expects the column order of [`COMMENT_COLUMNS`].
pub(crate) fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        comment_id: row.get(0)?,
        author: row.get(1)?,
        review_id: row.get(2)?,
        votes: row.get(3)?,
        created_at: timestamp(row, 4)?,
        body: row.get(5)?,
    })
}

/// Read a TEXT timestamp column. Accepts RFC 3339 and SQLite's
/// `YYYY-MM-DD HH:MM:SS[.fff]` form, which is taken as UTC.
pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
