//! HTTP surface for the users resource.
//!
//! Handlers deserialize the request, build a command or query, and dispatch
//! it through the mediator; every business rule and validation lives behind
//! that dispatch. Domain events are published after successful mutations.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::{AppError, AppJson, UuidPath};
use serde::Deserialize;

use domain_users::{
    CreateUser, DeleteUser, GetUserById, ListUsers, UpdateUser, UserDto, UserError, UserType,
};

use super::dispatch;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(state)
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, UserError> {
    let users = dispatch(&state.mediator, ListUsers {}).await?;
    Ok(Json(users))
}

async fn create_user(
    State(state): State<AppState>,
    AppJson(command): AppJson<CreateUser>,
) -> Result<(StatusCode, Json<UserDto>), UserError> {
    let user = dispatch(&state.mediator, command).await?;
    state.events.user_created(&user).await;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<Json<UserDto>, AppError> {
    let user = dispatch(&state.mediator, GetUserById { id })
        .await
        .map_err(AppError::from)?;

    match user {
        Some(dto) => Ok(Json(dto)),
        None => Err(AppError::NotFound(format!("User {id} not found"))),
    }
}

/// Update payload; the target ID comes from the path
#[derive(Debug, Deserialize)]
struct UpdateUserBody {
    name: Option<String>,
    email: Option<String>,
    user_type: Option<UserType>,
}

async fn update_user(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    AppJson(body): AppJson<UpdateUserBody>,
) -> Result<Json<UserDto>, UserError> {
    let command = UpdateUser {
        id,
        name: body.name,
        email: body.email,
        user_type: body.user_type,
    };

    let user = dispatch(&state.mediator, command).await?;
    state.events.user_updated(&user).await;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, UserError> {
    dispatch(&state.mediator, DeleteUser { id }).await?;
    state.events.user_deleted(id).await;
    Ok(StatusCode::NO_CONTENT)
}
