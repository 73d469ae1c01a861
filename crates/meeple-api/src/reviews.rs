use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use bytes::Bytes;

use meeple_db::validate::ListParams;
use meeple_types::api::{
    ReviewDetailResponse, ReviewListQuery, ReviewResponse, ReviewsResponse, VotePatchRequest,
};

use crate::error::ApiError;
use crate::state::{AppState, parse_body, path_param, run_blocking};

pub async fn list_reviews(
    State(state): State<AppState>,
    query: Result<Query<ReviewListQuery>, QueryRejection>,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let reviews = run_blocking(&state, move |db| {
        db.list_reviews(ListParams {
            sort_by: query.sort_by.as_deref(),
            order: query.order.as_deref(),
            category: query.category.as_deref(),
        })
    })
    .await?;

    Ok(Json(ReviewsResponse { reviews }))
}

pub async fn get_review(
    State(state): State<AppState>,
    review_id: Result<Path<String>, PathRejection>,
) -> Result<Json<ReviewDetailResponse>, ApiError> {
    let review_id = path_param(review_id)?;
    let review = run_blocking(&state, move |db| db.get_review(&review_id)).await?;
    Ok(Json(ReviewDetailResponse { review }))
}

/// `{"inc_votes": n}` adds `n` to the review's votes; an absent delta is 0.
pub async fn patch_review(
    State(state): State<AppState>,
    review_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review_id = path_param(review_id)?;
    let req: VotePatchRequest = parse_body(&body)?;

    let review = run_blocking(&state, move |db| {
        db.set_review_votes(&review_id, req.inc_votes.as_ref())
    })
    .await?;

    Ok(Json(ReviewResponse { review }))
}
