use std::fmt;

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

/// Groups are provisioned out of band, the app only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl Group {
    pub async fn find_by_slug(db_pool: &SqlitePool, slug: &str) -> sqlx::Result<Option<Group>> {
        sqlx::query_as("SELECT id,title,slug,description FROM post_groups WHERE slug=?")
            .bind(slug)
            .fetch_optional(db_pool)
            .await
    }

    pub async fn all(db_pool: &SqlitePool) -> sqlx::Result<Vec<Group>> {
        sqlx::query_as("SELECT id,title,slug,description FROM post_groups ORDER BY title,id")
            .fetch_all(db_pool)
            .await
    }
}
