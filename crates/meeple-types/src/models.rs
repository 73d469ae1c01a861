use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

/// Projection returned by the user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
}

/// A full review row, as returned after a vote update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: i64,
    pub title: String,
    pub review_body: String,
    pub designer: String,
    pub review_img_url: String,
    pub votes: i64,
    pub category: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// A review joined with its live comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDetail {
    #[serde(flatten)]
    pub review: Review,
    pub comment_count: CommentCount,
}

/// Listing projection: no `review_body` or `designer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub owner: String,
    pub title: String,
    pub review_id: i64,
    pub category: String,
    pub review_img_url: String,
    pub created_at: DateTime<Utc>,
    pub votes: i64,
    pub comment_count: CommentCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: i64,
    pub author: String,
    pub review_id: i64,
    pub votes: i64,
    pub created_at: DateTime<Utc>,
    pub body: String,
}

/// Number of comments attached to a review, computed at query time.
///
/// Numeric in-process, textual on the wire (`"3"`). Deserialisation accepts
/// either form so clients that already hold a number can round-trip it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommentCount(pub i64);

impl CommentCount {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CommentCount {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

impl fmt::Display for CommentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CommentCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CommentCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Number(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(Self(n)),
            Wire::Text(s) => s
                .parse()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid comment_count '{}'", s))),
        }
    }
}
