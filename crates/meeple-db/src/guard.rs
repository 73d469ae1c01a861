use rusqlite::Connection;

use crate::error::{StoreError, StoreResult};
use crate::validate::ReviewId;

/// Parse `raw` as a review id and confirm the review exists.
///
/// Malformed ids fail before the store is touched. This is a separate round
/// trip from whatever the caller does next; a review removed in between is
/// reported by the dependent query.
pub fn ensure_review_exists(conn: &Connection, raw: &str) -> StoreResult<ReviewId> {
    let id: ReviewId = raw.parse()?;

    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM reviews WHERE review_id = ?1)",
        [id.0],
        |row| row.get(0),
    )?;

    if exists {
        Ok(id)
    } else {
        Err(StoreError::not_found("review", id))
    }
}
