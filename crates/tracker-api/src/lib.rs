pub mod error;
pub mod exercises;
pub mod extract;
pub mod logs;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::error;
use uuid::Uuid;

use tracker_db::ExerciseStore;

use crate::error::{ApiError, ApiResult};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Box<dyn ExerciseStore>,
}

impl AppStateInner {
    pub fn new(store: impl ExerciseStore + 'static) -> AppState {
        Arc::new(Self {
            store: Box::new(store),
        })
    }
}

/// The `/api` routes, with state applied. The server adds the landing page,
/// static files and middleware on top.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route("/api/users/{user_id}/exercises", post(exercises::create_exercise))
        .route("/api/users/{user_id}/logs", get(logs::get_logs))
        .with_state(state)
}

/// Run store calls off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&dyn ExerciseStore) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(state.store.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
}

/// A path id that is not a UUID cannot name a stored user.
pub(crate) fn parse_user_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::UserNotFound)
}
