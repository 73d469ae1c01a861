use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::Bytes;

use meeple_types::api::{CommentResponse, NewCommentRequest, VotePatchRequest};
use meeple_types::models::Comment;

use crate::error::ApiError;
use crate::state::{AppState, parse_body, path_param, run_blocking};

/// Comments for a review, newest first, as a bare array.
pub async fn list_comments(
    State(state): State<AppState>,
    review_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let review_id = path_param(review_id)?;
    let comments = run_blocking(&state, move |db| db.list_comments(&review_id)).await?;
    Ok(Json(comments))
}

pub async fn post_comment(
    State(state): State<AppState>,
    review_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let review_id = path_param(review_id)?;
    let req: NewCommentRequest = parse_body(&body)?;

    let comment = run_blocking(&state, move |db| {
        db.add_comment(&review_id, req.username.as_deref(), req.body.as_deref())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

pub async fn patch_comment(
    State(state): State<AppState>,
    comment_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<CommentResponse>, ApiError> {
    let comment_id = path_param(comment_id)?;
    let req: VotePatchRequest = parse_body(&body)?;

    let comment = run_blocking(&state, move |db| {
        db.set_comment_votes(&comment_id, req.inc_votes.as_ref())
    })
    .await?;

    Ok(Json(CommentResponse { comment }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    comment_id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let comment_id = path_param(comment_id)?;
    run_blocking(&state, move |db| db.delete_comment(&comment_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
