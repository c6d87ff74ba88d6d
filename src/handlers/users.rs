use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::page_params;
use crate::models::{NewUser, User};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    email: Option<String>,
    name: Option<String>,
    page_size: Option<i64>,
    page_num: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    name: String,
    email: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    id: i64,
    name: String,
    email: String,
}

/// `GET /users` — all users, a single user by `email`, or a page of users by
/// `name`.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Response, AppError> {
    if let Some(email) = query.email {
        let user = state.facade.users.find_by_email(&email).await?;
        return Ok(success(user, "User found by email").into_response());
    }
    if let Some(name) = query.name {
        let (size, num) = page_params(query.page_size, query.page_num)?;
        let users = state.facade.users.find_by_name(&name, size, num).await?;
        return Ok(success(users, "Users found by name").into_response());
    }
    let users = state.facade.users.list().await?;
    Ok(success(users, "All users").into_response())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = state.facade.users.get(id).await?;
    Ok(success(user, "User found").into_response())
}

pub async fn create_user(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<CreateUserRequest>,
) -> Result<Response, AppError> {
    let user = state
        .facade
        .users
        .create(NewUser {
            name: body.name,
            email: body.email,
        })
        .await?;
    Ok(created(user, "User created").into_response())
}

pub async fn update_user(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<UpdateUserRequest>,
) -> Result<Response, AppError> {
    let user = User {
        id: body.id,
        name: body.name,
        email: body.email,
    };
    let user = state.facade.users.update(&user).await?;
    Ok(success(user, "User updated").into_response())
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.facade.users.delete(id).await?;
    Ok(empty_success("User deleted").into_response())
}
