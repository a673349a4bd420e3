use anyhow::Result;
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use tracker_types::models::{Exercise, ExerciseFilter, NewExercise, User};

use crate::Database;
use crate::store::ExerciseStore;

impl ExerciseStore for Database {
    // -- Users --

    fn create_user(&self, username: &str) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username) VALUES (?1, ?2)",
                (user.id.to_string(), &user.username),
            )?;
            Ok(())
        })?;

        Ok(user)
    }

    fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, username FROM users ORDER BY rowid")?;
            let rows = stmt
                .query_map([], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Exercises --

    fn insert_exercise(&self, new: &NewExercise) -> Result<Exercise> {
        let exercise = Exercise {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            description: new.description.clone(),
            duration: new.duration,
            date: new.date,
        };

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO exercises (id, user_id, description, duration, date) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    exercise.id.to_string(),
                    exercise.user_id.to_string(),
                    &exercise.description,
                    exercise.duration,
                    exercise.date,
                ],
            )?;
            Ok(())
        })?;

        Ok(exercise)
    }

    fn find_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        self.with_conn(|conn| query_exercises(conn, filter))
    }
}

fn query_user_by_id(conn: &Connection, id: Uuid) -> Result<Option<User>> {
    let mut stmt = conn.prepare("SELECT id, username FROM users WHERE id = ?1")?;
    let row = stmt.query_row([id.to_string()], map_user).optional()?;
    Ok(row)
}

fn query_exercises(conn: &Connection, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
    let user_id = filter.user_id.to_string();
    let mut sql = String::from(
        "SELECT id, user_id, description, duration, date FROM exercises WHERE user_id = ?1",
    );
    let mut params: Vec<&dyn ToSql> = vec![&user_id];

    // ISO dates compare correctly as text
    if let Some(from) = filter.from.as_ref() {
        params.push(from);
        sql.push_str(&format!(" AND date >= ?{}", params.len()));
    }
    if let Some(to) = filter.to.as_ref() {
        params.push(to);
        sql.push_str(&format!(" AND date <= ?{}", params.len()));
    }
    params.push(&filter.limit);
    sql.push_str(&format!(" ORDER BY date ASC, rowid ASC LIMIT ?{}", params.len()));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(Exercise {
                id: uuid_column(row, 0)?,
                user_id: uuid_column(row, 1)?,
                description: row.get(2)?,
                duration: row.get(3)?,
                date: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        username: row.get(1)?,
    })
}

/// Ids are stored as hyphenated text.
fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
