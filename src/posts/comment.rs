use axum::{debug_handler, extract::{Path, State}, response::Redirect};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{auth::CurrentUser, forms::CommentForm, models::{Comment, Post}, AppError, AppResult, AppState};

use super::{parse_post_id, urls};

/// Adds a comment and goes back to the post either way. Blank or unreadable
/// comments are dropped without a word.
#[debug_handler(state = AppState)]
pub(crate) async fn add_comment(
    State(db_pool): State<SqlitePool>,
    Path(post_id): Path<String>,
    CurrentUser(user): CurrentUser,

    form: CommentForm,
) -> AppResult<Redirect> {
    let post = Post::find(&db_pool, parse_post_id(&post_id)?)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    match form.clean() {
        Ok(text) => {
            let comment_id = Comment::create(&db_pool, post.id, user.id, &text).await?;
            info!("u/{} commented #{comment_id} on post #{}", user.username, post.id);
        }
        Err(errors) => debug!("u/{} sent an invalid comment: {errors:?}", user.username),
    }

    Ok(Redirect::to(&urls::detail(post.id)))
}
