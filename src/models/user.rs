use std::fmt;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.username)
    }
}

impl User {
    pub async fn find(db_pool: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT id,username FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(db_pool)
            .await
    }

    pub async fn find_by_username(db_pool: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT id,username FROM users WHERE username=?")
            .bind(username)
            .fetch_optional(db_pool)
            .await
    }

    /// Looks the user up by name, inserting them first if they are new.
    pub async fn get_or_create(db_pool: &SqlitePool, username: &str) -> sqlx::Result<User> {
        sqlx::query("INSERT INTO users (username,joined) VALUES (?,?) ON CONFLICT (username) DO NOTHING")
            .bind(username)
            .bind(OffsetDateTime::now_utc())
            .execute(db_pool)
            .await?;

        sqlx::query_as("SELECT id,username FROM users WHERE username=?")
            .bind(username)
            .fetch_one(db_pool)
            .await
    }
}

/// Usernames follow the usual `[\w.@+-]{1,150}` rule.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= 150
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}
