use axum::{
    Router,
    routing::{get, patch},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;
use crate::{catalog, comments, endpoints, reviews};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(endpoints::describe))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/reviews", get(reviews::list_reviews))
        .route(
            "/api/reviews/{review_id}",
            get(reviews::get_review).patch(reviews::patch_review),
        )
        .route(
            "/api/reviews/{review_id}/comments",
            get(comments::list_comments).post(comments::post_comment),
        )
        .route(
            "/api/comments/{comment_id}",
            patch(comments::patch_comment).delete(comments::delete_comment),
        )
        .route("/api/users", get(catalog::list_users))
        .route("/api/users/{username}", get(catalog::get_user))
        .fallback(unknown_route)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("no such route".into())
}
