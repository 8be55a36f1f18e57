use std::fmt;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use super::{Group, User};

/// How many characters of the text make up a post's label.
const LABEL_CHARS: usize = 15;

macro_rules! select_posts {
    ($($tail:literal),*) => {
        concat!(
            "SELECT p.id,p.text,p.created,p.image,",
            "u.id AS author_id,u.username AS author_username,",
            "g.id AS group_id,g.title AS group_title,g.slug AS group_slug,g.description AS group_description ",
            "FROM posts p JOIN users u ON u.id=p.author_id LEFT JOIN post_groups g ON g.id=p.group_id ",
            $($tail),*
        )
    };
}

// `created` is RFC 3339 text with a trimmed fraction, compare it as a time
const NEWEST_FIRST: &str = "ORDER BY julianday(p.created) DESC,p.id DESC LIMIT ? OFFSET ?";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    /// Relative to the media root, e.g. `posts/0192....png`.
    pub image: Option<String>,
    pub author: User,
    pub group: Option<Group>,
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    text: String,
    created: OffsetDateTime,
    image: Option<String>,
    author_id: i64,
    author_username: String,
    group_id: Option<i64>,
    group_title: Option<String>,
    group_slug: Option<String>,
    group_description: Option<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let group = match (row.group_id, row.group_title, row.group_slug, row.group_description) {
            (Some(id), Some(title), Some(slug), Some(description)) => Some(Group { id, title, slug, description }),
            _ => None,
        };

        Post {
            id: row.id,
            text: row.text,
            created: row.created,
            image: row.image,
            author: User { id: row.author_id, username: row.author_username },
            group,
        }
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label: String = self.text.chars().take(LABEL_CHARS).collect();
        f.write_str(&label)
    }
}

/// Fields written by create and edit.
#[derive(Debug, Clone, Copy)]
pub struct PostFields<'a> {
    pub text: &'a str,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

impl Post {
    pub async fn find(db_pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Post>> {
        let row: Option<PostRow> = sqlx::query_as(select_posts!("WHERE p.id=?"))
            .bind(id)
            .fetch_optional(db_pool)
            .await?;
        Ok(row.map(Post::from))
    }

    pub async fn count_all(db_pool: &SqlitePool) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(db_pool)
            .await
    }

    pub async fn list_all(db_pool: &SqlitePool, limit: i64, offset: i64) -> sqlx::Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!("{} {NEWEST_FIRST}", select_posts!()))
            .bind(limit)
            .bind(offset)
            .fetch_all(db_pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    pub async fn count_by_group(db_pool: &SqlitePool, group_id: i64) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id=?")
            .bind(group_id)
            .fetch_one(db_pool)
            .await
    }

    pub async fn list_by_group(db_pool: &SqlitePool, group_id: i64, limit: i64, offset: i64) -> sqlx::Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!("{} {NEWEST_FIRST}", select_posts!("WHERE p.group_id=?")))
            .bind(group_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db_pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    pub async fn count_by_author(db_pool: &SqlitePool, author_id: i64) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id=?")
            .bind(author_id)
            .fetch_one(db_pool)
            .await
    }

    pub async fn list_by_author(db_pool: &SqlitePool, author_id: i64, limit: i64, offset: i64) -> sqlx::Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(&format!("{} {NEWEST_FIRST}", select_posts!("WHERE p.author_id=?")))
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db_pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Posts written by anyone `user_id` follows.
    pub async fn count_feed(db_pool: &SqlitePool, user_id: i64) -> sqlx::Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id IN (SELECT author_id FROM follows WHERE user_id=?)")
            .bind(user_id)
            .fetch_one(db_pool)
            .await
    }

    pub async fn list_feed(db_pool: &SqlitePool, user_id: i64, limit: i64, offset: i64) -> sqlx::Result<Vec<Post>> {
        let query = format!(
            "{} {NEWEST_FIRST}",
            select_posts!("WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id=?)")
        );
        let rows: Vec<PostRow> = sqlx::query_as(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(db_pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    pub async fn create(db_pool: &SqlitePool, author_id: i64, fields: PostFields<'_>) -> sqlx::Result<i64> {
        let result = sqlx::query("INSERT INTO posts (text,created,author_id,group_id,image) VALUES (?,?,?,?,?)")
            .bind(fields.text)
            .bind(OffsetDateTime::now_utc())
            .bind(author_id)
            .bind(fields.group_id)
            .bind(fields.image)
            .execute(db_pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn update(db_pool: &SqlitePool, id: i64, fields: PostFields<'_>) -> sqlx::Result<()> {
        sqlx::query("UPDATE posts SET text=?,group_id=?,image=? WHERE id=?")
            .bind(fields.text)
            .bind(fields.group_id)
            .bind(fields.image)
            .bind(id)
            .execute(db_pool)
            .await?;
        Ok(())
    }

    /// Comments go with the post.
    pub async fn delete(db_pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id=?")
            .bind(id)
            .execute(db_pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
