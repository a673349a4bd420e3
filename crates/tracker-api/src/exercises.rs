use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{NaiveDate, Utc};
use tracing::debug;

use tracker_types::api::{CreateExerciseRequest, DurationInput, ExerciseResponse};
use tracker_types::date::{format_date, parse_date};
use tracker_types::models::NewExercise;

use crate::error::{ApiError, ApiResult};
use crate::extract::FormOrJson;
use crate::{AppState, parse_user_id, run_blocking};

/// Validated body of a create-exercise request.
#[derive(Debug, PartialEq)]
struct ExerciseInput {
    description: String,
    duration: u32,
    date: NaiveDate,
}

impl ExerciseInput {
    /// `today` is used when the client sends no date (or a blank one).
    fn parse(req: CreateExerciseRequest, today: NaiveDate) -> ApiResult<Self> {
        let description = match req.description {
            Some(d) if !d.trim().is_empty() => d,
            _ => return Err(ApiError::validation("description is required")),
        };

        let duration = parse_duration(req.duration)?;

        let date = match req.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(text) => parse_date(text)
                .ok_or_else(|| ApiError::validation(format!("invalid date: {}", text)))?,
        };

        Ok(Self {
            description,
            duration,
            date,
        })
    }
}

fn parse_duration(input: Option<DurationInput>) -> ApiResult<u32> {
    let minutes = match input {
        None => None,
        Some(DurationInput::Text(text)) if text.trim().is_empty() => None,
        Some(DurationInput::Text(text)) => Some(text.trim().parse::<u32>().ok()),
        Some(DurationInput::Number(n)) => {
            Some((n.fract() == 0.0 && n >= 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32))
        }
    };

    match minutes {
        None => Err(ApiError::validation("duration is required")),
        Some(Some(m)) if m > 0 => Ok(m),
        Some(_) => Err(ApiError::validation(
            "duration must be a positive whole number of minutes",
        )),
    }
}

pub async fn create_exercise(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    FormOrJson(req): FormOrJson<CreateExerciseRequest>,
) -> ApiResult<Json<ExerciseResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let input = ExerciseInput::parse(req, Utc::now().date_naive())?;

    // Lookup then insert; nothing is written for an unknown user.
    let (user, exercise) = run_blocking(&state, move |store| {
        let user = store.get_user(user_id)?.ok_or(ApiError::UserNotFound)?;
        let exercise = store.insert_exercise(&NewExercise {
            user_id: user.id,
            description: input.description,
            duration: input.duration,
            date: input.date,
        })?;
        Ok((user, exercise))
    })
    .await?;

    debug!("Logged exercise {} for user {}", exercise.id, user.id);

    Ok(Json(ExerciseResponse {
        id: user.id,
        username: user.username,
        description: exercise.description,
        duration: exercise.duration,
        date: format_date(exercise.date),
    }))
}
