use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Category, Comment, Review, ReviewDetail, ReviewSummary, User, UserSummary};

// -- Requests --

/// Query string of `GET /api/reviews`. Values stay raw; the store validates them.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ReviewListQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
}

/// Body of `POST /api/reviews/{review_id}/comments`. Unknown fields are ignored.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewCommentRequest {
    pub username: Option<String>,
    pub body: Option<String>,
}

/// Body of the vote PATCH endpoints.
///
/// `inc_votes` is kept untyped so a wrong-shaped value is reported by the
/// store layer instead of failing deserialisation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct VotePatchRequest {
    pub inc_votes: Option<Value>,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewDetailResponse {
    pub review: ReviewDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review: Review,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub msg: String,
}
