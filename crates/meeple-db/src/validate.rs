//! Parsing of untrusted request parameters into typed values.
//!
//! Nothing client-supplied reaches SQL text except through [`SortField`] and
//! [`SortOrder`], which can only hold whitelisted values.

use std::fmt;
use std::str::FromStr;

use rusqlite::Connection;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Columns a review listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Owner,
    Title,
    ReviewId,
    Category,
    ReviewImgUrl,
    #[default]
    CreatedAt,
    Votes,
    CommentCount,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        Self::Owner,
        Self::Title,
        Self::ReviewId,
        Self::Category,
        Self::ReviewImgUrl,
        Self::CreatedAt,
        Self::Votes,
        Self::CommentCount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Title => "title",
            Self::ReviewId => "review_id",
            Self::Category => "category",
            Self::ReviewImgUrl => "review_img_url",
            Self::CreatedAt => "created_at",
            Self::Votes => "votes",
            Self::CommentCount => "comment_count",
        }
    }

    /// Expression used in the listing's ORDER BY clause.
    pub fn sql_expr(self) -> &'static str {
        match self {
            Self::Owner => "r.owner",
            Self::Title => "r.title",
            Self::ReviewId => "r.review_id",
            Self::Category => "r.category",
            Self::ReviewImgUrl => "r.review_img_url",
            Self::CreatedAt => "r.created_at",
            Self::Votes => "r.votes",
            Self::CommentCount => "comment_count",
        }
    }
}

impl FromStr for SortField {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| StoreError::bad_request(format!("invalid sort_by '{}'", s)))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(StoreError::bad_request(format!("invalid order '{}'", s)))
        }
    }
}

/// Raw listing parameters, exactly as received.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListParams<'a> {
    pub sort_by: Option<&'a str>,
    pub order: Option<&'a str>,
    pub category: Option<&'a str>,
}

/// Listing parameters that passed validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub sort_by: SortField,
    pub order: SortOrder,
    pub category: Option<String>,
}

/// Live lookup of known category slugs.
pub trait CategoryCatalog {
    fn category_exists(&self, slug: &str) -> StoreResult<bool>;
}

impl CategoryCatalog for Connection {
    fn category_exists(&self, slug: &str) -> StoreResult<bool> {
        let exists = self.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE slug = ?1)",
            [slug],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

/// Sort and order are checked before the category is looked up, so a bad
/// sort field always wins over an unknown category.
pub fn validate_list_params<C>(catalog: &C, params: ListParams<'_>) -> StoreResult<ListQuery>
where
    C: CategoryCatalog + ?Sized,
{
    let sort_by = params.sort_by.map(str::parse::<SortField>).transpose()?.unwrap_or_default();
    let order = params.order.map(str::parse::<SortOrder>).transpose()?.unwrap_or_default();

    let category = match params.category {
        Some(slug) if catalog.category_exists(slug)? => Some(slug.to_string()),
        Some(slug) => return Err(StoreError::not_found("category", slug)),
        None => None,
    };

    Ok(ListQuery {
        sort_by,
        order,
        category,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReviewId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommentId(pub i64);

fn parse_integer(raw: &str, what: &str) -> StoreResult<i64> {
    raw.parse()
        .map_err(|_| StoreError::bad_request(format!("malformed {} '{}'", what, raw)))
}

impl FromStr for ReviewId {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        parse_integer(s, "review_id").map(Self)
    }
}

impl FromStr for CommentId {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        parse_integer(s, "comment_id").map(Self)
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vote increment from an untyped `inc_votes` value. Absent or null means 0.
pub fn parse_vote_delta(inc_votes: Option<&Value>) -> StoreResult<i64> {
    match inc_votes {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| StoreError::bad_request(format!("inc_votes must be an integer, got {}", value))),
    }
}

/// A comment ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment<'a> {
    pub username: &'a str,
    pub body: &'a str,
}

impl<'a> NewComment<'a> {
    pub fn from_fields(username: Option<&'a str>, body: Option<&'a str>) -> StoreResult<Self> {
        match (username, body) {
            (Some(username), Some(body)) if !username.is_empty() && !body.is_empty() => {
                Ok(Self { username, body })
            }
            _ => Err(StoreError::bad_request("comment requires username and body")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use std::cell::Cell;

    struct FakeCatalog {
        slugs: Vec<&'static str>,
        lookups: Cell<usize>,
    }

    impl FakeCatalog {
        fn new(slugs: &[&'static str]) -> Self {
            Self {
                slugs: slugs.to_vec(),
                lookups: Cell::new(0),
            }
        }
    }

    impl CategoryCatalog for FakeCatalog {
        fn category_exists(&self, slug: &str) -> StoreResult<bool> {
            self.lookups.set(self.lookups.get() + 1);
            Ok(self.slugs.iter().any(|known| *known == slug))
        }
    }

    fn params<'a>(sort_by: Option<&'a str>, order: Option<&'a str>, category: Option<&'a str>) -> ListParams<'a> {
        ListParams {
            sort_by,
            order,
            category,
        }
    }

    #[test]
    fn defaults() {
        let catalog = FakeCatalog::new(&["dexterity"]);
        let query = validate_list_params(&catalog, ListParams::default()).unwrap();

        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.category, None);
        assert_eq!(catalog.lookups.get(), 0);
    }

    #[test]
    fn every_whitelisted_field_parses() {
        for field in SortField::ALL {
            assert_eq!(field.as_str().parse::<SortField>().unwrap(), field);
        }
    }

    #[test]
    fn unknown_sort_field_is_bad_request() {
        for raw in ["bad_query", "review_body", "votes; DROP TABLE reviews", "VOTES", ""] {
            let err = raw.parse::<SortField>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest, "{}", raw);
        }
    }

    #[test]
    fn order_is_case_insensitive() {
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("Desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!(
            "invalid".parse::<SortOrder>().unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn unknown_category_is_not_found() {
        let catalog = FakeCatalog::new(&["dexterity"]);
        let err = validate_list_params(&catalog, params(None, None, Some("no_such_category"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let ok = validate_list_params(&catalog, params(Some("votes"), Some("asc"), Some("dexterity"))).unwrap();
        assert_eq!(ok.category.as_deref(), Some("dexterity"));
        assert_eq!(ok.order, SortOrder::Asc);
    }

    #[test]
    fn bad_sort_wins_over_unknown_category() {
        let catalog = FakeCatalog::new(&[]);
        let err = validate_list_params(&catalog, params(Some("bad"), None, Some("nowhere"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = validate_list_params(&catalog, params(None, Some("sideways"), Some("nowhere"))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(catalog.lookups.get(), 0);
    }

    #[test]
    fn category_is_looked_up_on_every_call() {
        let catalog = FakeCatalog::new(&["dexterity"]);
        for _ in 0..3 {
            validate_list_params(&catalog, params(None, None, Some("dexterity"))).unwrap();
        }
        assert_eq!(catalog.lookups.get(), 3);
    }

    #[test]
    fn ids_must_be_whole_integers() {
        assert_eq!("2".parse::<ReviewId>().unwrap(), ReviewId(2));
        assert_eq!("-7".parse::<CommentId>().unwrap(), CommentId(-7));
        for raw in ["invalid_id", "2abc", "1.5", "", " 3", "99999999999999999999"] {
            assert_eq!(raw.parse::<ReviewId>().unwrap_err().kind(), ErrorKind::BadRequest, "{}", raw);
        }
    }

    #[test]
    fn vote_delta() {
        assert_eq!(parse_vote_delta(None).unwrap(), 0);
        assert_eq!(parse_vote_delta(Some(&Value::Null)).unwrap(), 0);
        assert_eq!(parse_vote_delta(Some(&json!(-4))).unwrap(), -4);
        for bad in [json!("4 votes"), json!("4"), json!(1.5), json!(true), json!([1]), json!({"n": 1})] {
            assert_eq!(parse_vote_delta(Some(&bad)).unwrap_err().kind(), ErrorKind::BadRequest);
        }
    }

    #[test]
    fn new_comment_requires_both_fields() {
        assert!(NewComment::from_fields(Some("mallionaire"), Some("Great")).is_ok());
        for (username, body) in [
            (None, Some("Great")),
            (Some("mallionaire"), None),
            (Some(""), Some("Great")),
            (Some("mallionaire"), Some("")),
        ] {
            let err = NewComment::from_fields(username, body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
        }
    }
}
