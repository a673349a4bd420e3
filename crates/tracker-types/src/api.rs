use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- Users --

/// Body of `POST /api/users`. Fields are optional at the wire level so a
/// missing value surfaces as a validation error rather than a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
}

// -- Exercises --

/// Duration as sent by the client: a JSON number, or text from a form field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateExerciseRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<DurationInput>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub username: String,
    pub description: String,
    pub duration: u32,
    pub date: String,
}

// -- Logs --

/// Query string of `GET /api/users/{user_id}/logs`. Kept as raw text and
/// parsed by the handler so a bad `limit` can fall back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: u32,
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    pub id: Uuid,
    pub log: Vec<LogEntry>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
