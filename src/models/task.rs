use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use validator::Validate;

/// Maximum number of characters in a task title.
pub const MAX_TITLE_LENGTH: usize = 50;

/// Input structure for creating or updating a task.
///
/// Updates overwrite every field, so the same shape serves both operations.
/// Unknown fields, including `id`, are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskInput {
    /// The title of the task. At most 50 characters.
    #[validate(length(max = 50))]
    pub title: String,

    /// Whether the task is done. Defaults to `false`.
    #[serde(default)]
    pub completed: bool,

    /// Owner of the task. Must be a positive id of an existing user.
    #[validate(range(min = 1))]
    pub user_id: i64,
}

/// A task as stored in the `task` table and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub user_id: i64,
}

impl Task {
    pub async fn create(pool: &SqlitePool, input: &TaskInput) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO task (title, completed, user_id) VALUES (?, ?, ?)
             RETURNING id, title, completed, user_id",
        )
        .bind(&input.title)
        .bind(input.completed)
        .bind(input.user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>("SELECT id, title, completed, user_id FROM task WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All tasks owned by `user_id`, oldest first.
    pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "SELECT id, title, completed, user_id FROM task WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrites every field of task `id`.
    ///
    /// Returns `sqlx::Error::RowNotFound` when the task does not exist.
    pub async fn update(pool: &SqlitePool, id: i64, input: &TaskInput) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            "UPDATE task SET title = ?, completed = ?, user_id = ? WHERE id = ?
             RETURNING id, title, completed, user_id",
        )
        .bind(&input.title)
        .bind(input.completed)
        .bind(input.user_id)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Returns whether a row was deleted.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
