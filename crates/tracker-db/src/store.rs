use anyhow::Result;
use uuid::Uuid;

use tracker_types::models::{Exercise, ExerciseFilter, NewExercise, User};

/// Persistence operations the request handlers depend on.
///
/// Identifiers are generated by the store on insert. Implementations are
/// blocking; async callers should go through `spawn_blocking`.
pub trait ExerciseStore: Send + Sync {
    fn create_user(&self, username: &str) -> Result<User>;

    fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// All users in insertion order.
    fn list_users(&self) -> Result<Vec<User>>;

    fn insert_exercise(&self, new: &NewExercise) -> Result<Exercise>;

    /// Exercises matching `filter`, ascending by date (ties in insertion
    /// order), at most `filter.limit` rows.
    fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>>;
}

impl<T: ExerciseStore + ?Sized> ExerciseStore for std::sync::Arc<T> {
    fn create_user(&self, username: &str) -> Result<User> {
        (**self).create_user(username)
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        (**self).get_user(id)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        (**self).list_users()
    }

    fn insert_exercise(&self, new: &NewExercise) -> Result<Exercise> {
        (**self).insert_exercise(new)
    }

    fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        (**self).find_exercises(filter)
    }
}
