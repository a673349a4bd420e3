use axum::{Json, extract::State};
use tracing::debug;

use tracker_types::api::CreateUserRequest;
use tracker_types::models::User;

use crate::error::{ApiError, ApiResult};
use crate::extract::FormOrJson;
use crate::{AppState, run_blocking};

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = run_blocking(&state, |store| Ok(store.list_users()?)).await?;
    Ok(Json(users))
}

/// Duplicate usernames are allowed; every call creates a new user.
pub async fn create_user(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    let username = validate_username(req.username)?;

    let user = run_blocking(&state, move |store| Ok(store.create_user(&username)?)).await?;
    debug!("Created user {} ({})", user.username, user.id);

    Ok(Json(user))
}

fn validate_username(username: Option<String>) -> ApiResult<String> {
    match username {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ApiError::validation("username is required")),
    }
}
