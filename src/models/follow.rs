use sqlx::SqlitePool;

use super::User;

/// The follower -> author edge. `(user_id, author_id)` is unique in the
/// schema, so following is a conditional insert rather than read-then-write.
pub struct Follow;

impl Follow {
    /// Returns whether a new edge was stored. Following yourself or someone
    /// you already follow stores nothing.
    pub async fn follow(db_pool: &SqlitePool, user_id: i64, author_id: i64) -> sqlx::Result<bool> {
        if user_id == author_id {
            return Ok(false);
        }

        let result = sqlx::query("INSERT INTO follows (user_id,author_id) VALUES (?,?) ON CONFLICT (user_id,author_id) DO NOTHING")
            .bind(user_id)
            .bind(author_id)
            .execute(db_pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn unfollow(db_pool: &SqlitePool, user_id: i64, author_id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id=? AND author_id=?")
            .bind(user_id)
            .bind(author_id)
            .execute(db_pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn is_following(db_pool: &SqlitePool, user_id: i64, author_id: i64) -> sqlx::Result<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM follows WHERE user_id=? AND author_id=?)")
            .bind(user_id)
            .bind(author_id)
            .fetch_one(db_pool)
            .await
    }

    pub async fn followed_authors(db_pool: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<User>> {
        sqlx::query_as(
            "SELECT DISTINCT u.id,u.username FROM follows f JOIN users u ON u.id=f.author_id \
             WHERE f.user_id=? ORDER BY u.username",
        )
            .bind(user_id)
            .fetch_all(db_pool)
            .await
    }
}
