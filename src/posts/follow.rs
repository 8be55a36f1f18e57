use axum::{debug_handler, extract::{Path, State}, response::Redirect};
use sqlx::SqlitePool;
use tracing::info;

use crate::{auth::CurrentUser, models::{Follow, User}, AppError, AppResult, AppState};

use super::urls;

async fn author(db_pool: &SqlitePool, username: &str) -> AppResult<User> {
    User::find_by_username(db_pool, username)
        .await?
        .ok_or(AppError::NotFound("user"))
}

/// Following twice or following oneself changes nothing.
#[debug_handler(state = AppState)]
pub(crate) async fn profile_follow(
    State(db_pool): State<SqlitePool>,
    Path(username): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Redirect> {
    let author = author(&db_pool, &username).await?;

    if Follow::follow(&db_pool, user.id, author.id).await? {
        info!("u/{} follows u/{}", user.username, author.username);
    }
    Ok(Redirect::to(&urls::profile(&author.username)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile_unfollow(
    State(db_pool): State<SqlitePool>,
    Path(username): Path<String>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Redirect> {
    let author = author(&db_pool, &username).await?;

    if Follow::unfollow(&db_pool, user.id, author.id).await? > 0 {
        info!("u/{} unfollowed u/{}", user.username, author.username);
    }
    Ok(Redirect::to(&urls::profile(&author.username)))
}
