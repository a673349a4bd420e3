use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of log entries returned when the caller gives no usable `limit`.
pub const DEFAULT_LOG_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// A logged exercise. `user_id` is checked against the users table by the
/// handler before insert; storage does not enforce the relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    /// Minutes, always > 0.
    pub duration: u32,
    pub date: NaiveDate,
}

/// Insert payload for an exercise. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub user_id: Uuid,
    pub description: String,
    pub duration: u32,
    pub date: NaiveDate,
}

/// Query shape for a user's log: inclusive date bounds plus a row cap.
#[derive(Debug, Clone)]
pub struct ExerciseFilter {
    pub user_id: Uuid,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: u32,
}

impl ExerciseFilter {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            from: None,
            to: None,
            limit: DEFAULT_LOG_LIMIT,
        }
    }
}
