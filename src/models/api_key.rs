//! API keys attached to a user.
//!
//! Only the SHA-256 digest of a key is stored; the plaintext is handed back
//! once from [`ApiKey::issue`]. Keys are not accepted by any route yet.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::auth::api_key::{generate_api_key, hash_api_key};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApiKey {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub hashed_key: String,
    pub created_at: NaiveDateTime,
    pub revoked: bool,
    pub name: Option<String>,
}

impl ApiKey {
    /// Creates a key for `user_id` and returns the stored row with the plaintext key.
    pub async fn issue(
        pool: &SqlitePool,
        user_id: i64,
        name: Option<&str>,
    ) -> Result<(ApiKey, String), sqlx::Error> {
        let (plaintext, hashed_key) = generate_api_key();

        let key = sqlx::query_as::<_, ApiKey>(
            "INSERT INTO api_key (user_id, hashed_key, name) VALUES (?, ?, ?)
             RETURNING id, user_id, hashed_key, created_at, revoked, name",
        )
        .bind(user_id)
        .bind(&hashed_key)
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok((key, plaintext))
    }

    /// Looks up a non-revoked key by its plaintext value.
    pub async fn find_active_by_key(
        pool: &SqlitePool,
        plaintext: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(
            "SELECT id, user_id, hashed_key, created_at, revoked, name
             FROM api_key WHERE hashed_key = ? AND revoked = FALSE",
        )
        .bind(hash_api_key(plaintext))
        .fetch_optional(pool)
        .await
    }

    pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<ApiKey>, sqlx::Error> {
        sqlx::query_as::<_, ApiKey>(
            "SELECT id, user_id, hashed_key, created_at, revoked, name
             FROM api_key WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Marks key `id` revoked if it belongs to `user_id`. Returns whether a key changed.
    pub async fn revoke(pool: &SqlitePool, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE api_key SET revoked = TRUE WHERE id = ? AND user_id = ? AND revoked = FALSE",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
