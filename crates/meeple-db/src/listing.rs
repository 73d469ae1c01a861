use meeple_types::models::{CommentCount, ReviewSummary};
use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::error::StoreResult;
use crate::queries::timestamp;
use crate::validate::{ListQuery, SortField};

const LISTING_COLUMNS: &str =
    "r.owner, r.title, r.review_id, r.category, r.review_img_url, r.created_at, r.votes";

/// Rendered listing statement and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSql {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build the review listing statement.
///
/// Only the whitelisted sort expression and direction are written into the
/// text; the category travels as a bound parameter.
pub fn render(query: &ListQuery) -> ListingSql {
    let mut sql = format!(
        "SELECT {cols}, COUNT(c.comment_id) AS comment_count
         FROM reviews r
         LEFT JOIN comments c ON c.review_id = r.review_id",
        cols = LISTING_COLUMNS,
    );
    let mut params = Vec::new();

    if let Some(category) = &query.category {
        params.push(category.clone());
        sql.push_str(&format!("\n         WHERE r.category = ?{}", params.len()));
    }

    sql.push_str(&format!("\n         GROUP BY {}", LISTING_COLUMNS));
    sql.push_str(&format!(
        "\n         ORDER BY {} {}",
        query.sort_by.sql_expr(),
        query.order.as_sql()
    ));
    if query.sort_by != SortField::ReviewId {
        sql.push_str(", r.review_id ASC");
    }

    ListingSql { sql, params }
}

pub fn fetch(conn: &Connection, query: &ListQuery) -> StoreResult<Vec<ReviewSummary>> {
    let ListingSql { sql, params } = render(query);
    debug!("Review listing: {} {:?}", sql, params);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), |row| {
            Ok(ReviewSummary {
                owner: row.get(0)?,
                title: row.get(1)?,
                review_id: row.get(2)?,
                category: row.get(3)?,
                review_img_url: row.get(4)?,
                created_at: timestamp(row, 5)?,
                votes: row.get(6)?,
                comment_count: CommentCount(row.get(7)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::SortOrder;

    #[test]
    fn default_listing_has_no_where_clause() {
        let rendered = render(&ListQuery::default());

        assert!(rendered.params.is_empty());
        assert!(!rendered.sql.contains("WHERE"));
        assert!(rendered.sql.contains("LEFT JOIN comments c"));
        assert!(rendered.sql.ends_with("ORDER BY r.created_at DESC, r.review_id ASC"));
    }

    #[test]
    fn category_is_bound_not_interpolated() {
        let query = ListQuery {
            sort_by: SortField::Votes,
            order: SortOrder::Asc,
            category: Some("children's games".to_string()),
        };
        let rendered = render(&query);

        assert!(rendered.sql.contains("WHERE r.category = ?1"));
        assert!(!rendered.sql.contains("children"));
        assert_eq!(rendered.params, vec!["children's games".to_string()]);
        assert!(rendered.sql.ends_with("ORDER BY r.votes ASC, r.review_id ASC"));
    }

    #[test]
    fn comment_count_orders_by_alias() {
        let query = ListQuery {
            sort_by: SortField::CommentCount,
            ..ListQuery::default()
        };
        assert!(render(&query).sql.contains("ORDER BY comment_count DESC"));
    }

    #[test]
    fn review_id_sort_skips_tiebreak() {
        let query = ListQuery {
            sort_by: SortField::ReviewId,
            order: SortOrder::Asc,
            category: None,
        };
        assert!(render(&query).sql.ends_with("ORDER BY r.review_id ASC"));
    }
}
