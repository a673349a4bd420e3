use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use tracker_types::api::{LogEntry, LogQuery, LogResponse};
use tracker_types::date::{format_date, parse_date};
use tracker_types::models::{DEFAULT_LOG_LIMIT, ExerciseFilter};

use crate::error::{ApiError, ApiResult};
use crate::{AppState, parse_user_id, run_blocking};

pub async fn get_logs(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: Result<Query<LogQuery>, QueryRejection>,
) -> ApiResult<Json<LogResponse>> {
    let Query(query) = query.map_err(|e| ApiError::validation(e.body_text()))?;
    let user_id = parse_user_id(&user_id)?;
    let filter = build_filter(user_id, &query)?;

    let (user, exercises) = run_blocking(&state, move |store| {
        let user = store.get_user(user_id)?.ok_or(ApiError::UserNotFound)?;
        let exercises = store.find_exercises(&filter)?;
        Ok((user, exercises))
    })
    .await?;

    let log: Vec<LogEntry> = exercises
        .into_iter()
        .map(|e| LogEntry {
            description: e.description,
            duration: e.duration,
            date: format_date(e.date),
        })
        .collect();

    Ok(Json(LogResponse {
        username: user.username,
        count: log.len(),
        id: user.id,
        log,
    }))
}

fn build_filter(user_id: Uuid, query: &LogQuery) -> ApiResult<ExerciseFilter> {
    Ok(ExerciseFilter {
        user_id,
        from: parse_bound("from", query.from.as_deref())?,
        to: parse_bound("to", query.to.as_deref())?,
        limit: parse_limit(query.limit.as_deref()),
    })
}

fn parse_bound(name: &str, raw: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| ApiError::validation(format!("invalid {} date: {}", name, text))),
    }
}

/// Anything other than a positive integer means "use the default".
fn parse_limit(raw: Option<&str>) -> u32 {
    let Some(text) = raw else {
        return DEFAULT_LOG_LIMIT;
    };

    match text.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            debug!("Ignoring unusable limit '{}', using {}", text, DEFAULT_LOG_LIMIT);
            DEFAULT_LOG_LIMIT
        }
    }
}
