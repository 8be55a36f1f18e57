use std::fmt;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use super::User;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub author: User,
}

#[derive(FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    text: String,
    created: OffsetDateTime,
    author_id: i64,
    author_username: String,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            text: row.text,
            created: row.created,
            author: User { id: row.author_id, username: row.author_username },
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Comment {
    /// Oldest first, so a thread reads top to bottom.
    pub async fn list_for_post(db_pool: &SqlitePool, post_id: i64) -> sqlx::Result<Vec<Comment>> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT c.id,c.post_id,c.text,c.created,u.id AS author_id,u.username AS author_username \
             FROM comments c JOIN users u ON u.id=c.author_id \
             WHERE c.post_id=? ORDER BY julianday(c.created),c.id",
        )
            .bind(post_id)
            .fetch_all(db_pool)
            .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    pub async fn create(db_pool: &SqlitePool, post_id: i64, author_id: i64, text: &str) -> sqlx::Result<i64> {
        let result = sqlx::query("INSERT INTO comments (text,created,author_id,post_id) VALUES (?,?,?,?)")
            .bind(text)
            .bind(OffsetDateTime::now_utc())
            .bind(author_id)
            .bind(post_id)
            .execute(db_pool)
            .await?;
        Ok(result.last_insert_rowid())
    }
}
