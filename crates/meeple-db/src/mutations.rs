use meeple_types::models::{Comment, Review};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::Value;
use tracing::info;

use crate::Database;
use crate::error::{StoreError, StoreResult};
use crate::guard::ensure_review_exists;
use crate::queries::{COMMENT_COLUMNS, REVIEW_COLUMNS, comment_from_row, review_from_row};
use crate::validate::{CommentId, NewComment, ReviewId, parse_vote_delta};

/// A row whose `votes` column can be incremented in place.
pub trait Votable: Sized {
    const ENTITY: &'static str;
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Votable for Review {
    const ENTITY: &'static str = "review";
    const TABLE: &'static str = "reviews";
    const ID_COLUMN: &'static str = "review_id";
    const COLUMNS: &'static str = REVIEW_COLUMNS;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        review_from_row(row)
    }
}

impl Votable for Comment {
    const ENTITY: &'static str = "comment";
    const TABLE: &'static str = "comments";
    const ID_COLUMN: &'static str = "comment_id";
    const COLUMNS: &'static str = COMMENT_COLUMNS;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        comment_from_row(row)
    }
}

/// Add `delta` to the entity's votes in one statement and return the updated row.
///
/// The update only matches while `votes + delta` stays within `i64`; SQLite
/// would otherwise store the sum as REAL. When nothing matches, a second
/// lookup separates an absent row from an out-of-range delta.
pub fn apply_vote_delta<E: Votable>(conn: &Connection, id: i64, delta: i64) -> StoreResult<E> {
    let sql = format!(
        "UPDATE {table} SET votes = votes + ?1
         WHERE {id_col} = ?2
           AND (?1 <= 0 OR votes <= ?3 - ?1)
           AND (?1 >= 0 OR votes >= ?4 - ?1)
         RETURNING {cols}",
        table = E::TABLE,
        id_col = E::ID_COLUMN,
        cols = E::COLUMNS,
    );

    let updated = conn
        .query_row(&sql, params![delta, id, i64::MAX, i64::MIN], E::from_row)
        .optional()?;
    if let Some(row) = updated {
        return Ok(row);
    }

    let exists: bool = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
            E::TABLE,
            E::ID_COLUMN
        ),
        [id],
        |row| row.get(0),
    )?;
    if exists {
        Err(StoreError::bad_request(format!(
            "inc_votes {} overflows votes of {} {}",
            delta,
            E::ENTITY,
            id
        )))
    } else {
        Err(StoreError::not_found(E::ENTITY, id))
    }
}

fn insert_comment(conn: &Connection, review_id: ReviewId, comment: &NewComment<'_>) -> StoreResult<Comment> {
    let sql = format!(
        "INSERT INTO comments (author, review_id, body) VALUES (?1, ?2, ?3) RETURNING {}",
        COMMENT_COLUMNS
    );
    let row = conn.query_row(
        &sql,
        params![comment.username, review_id.0, comment.body],
        comment_from_row,
    )?;
    Ok(row)
}

impl Database {
    /// Checks run in order: id shape, review existence, required fields, then
    /// the insert itself, where an unknown author trips the foreign key.
    pub fn add_comment(
        &self,
        raw_review_id: &str,
        username: Option<&str>,
        body: Option<&str>,
    ) -> StoreResult<Comment> {
        self.with_conn_mut(|conn| {
            let review_id = ensure_review_exists(conn, raw_review_id)?;
            let comment = NewComment::from_fields(username, body)?;
            let created = insert_comment(conn, review_id, &comment)?;
            info!(
                "Comment {} added to review {} by {}",
                created.comment_id, review_id, created.author
            );
            Ok(created)
        })
    }

    pub fn set_review_votes(&self, raw_id: &str, inc_votes: Option<&Value>) -> StoreResult<Review> {
        let id: ReviewId = raw_id.parse()?;
        let delta = parse_vote_delta(inc_votes)?;
        let review: Review = self.with_conn_mut(|conn| apply_vote_delta(conn, id.0, delta))?;
        info!("Review {} votes {:+} (now {})", id, delta, review.votes);
        Ok(review)
    }

    /// No existence pre-check: the update's empty result is the absence signal.
    pub fn set_comment_votes(&self, raw_id: &str, inc_votes: Option<&Value>) -> StoreResult<Comment> {
        let id: CommentId = raw_id.parse()?;
        let delta = parse_vote_delta(inc_votes)?;
        let comment: Comment = self.with_conn_mut(|conn| apply_vote_delta(conn, id.0, delta))?;
        info!("Comment {} votes {:+} (now {})", id, delta, comment.votes);
        Ok(comment)
    }

    pub fn delete_comment(&self, raw_id: &str) -> StoreResult<()> {
        let id: CommentId = raw_id.parse()?;
        self.with_conn_mut(|conn| {
            let affected = conn.execute("DELETE FROM comments WHERE comment_id = ?1", [id.0])?;
            if affected == 0 {
                return Err(StoreError::not_found("comment", id));
            }
            info!("Comment {} deleted", id);
            Ok(())
        })
    }
}
