use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use meeple_types::api::{CategoriesResponse, UserResponse, UsersResponse};

use crate::error::ApiError;
use crate::state::{AppState, path_param, run_blocking};

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let categories = run_blocking(&state, |db| db.list_categories()).await?;
    Ok(Json(CategoriesResponse { categories }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = run_blocking(&state, |db| db.list_users()).await?;
    Ok(Json(UsersResponse { users }))
}

pub async fn get_user(
    State(state): State<AppState>,
    username: Result<Path<String>, PathRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let username = path_param(username)?;
    let user = run_blocking(&state, move |db| db.get_user(&username)).await?;
    Ok(Json(UserResponse { user }))
}
