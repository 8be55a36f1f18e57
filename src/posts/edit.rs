use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Redirect, Response}};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::{
    auth::CurrentUser,
    forms::{PostForm, PostSubmission},
    media::MediaStore,
    models::{Group, Post, PostFields, User},
    render::{self, Format},
    AppError, AppResult, AppState,
};

use super::{create::PostFormPage, parse_post_id, urls};

/// Whether an edit request may touch the post. Someone else's post is not an
/// error: the request is turned into a plain redirect to the post.
#[derive(Debug)]
pub(crate) enum EditOutcome {
    Allowed(Post),
    Forbidden { post_id: i64 },
}

impl EditOutcome {
    pub(crate) fn decide(post: Post, user: &User) -> Self {
        if post.author.id == user.id {
            EditOutcome::Allowed(post)
        } else {
            EditOutcome::Forbidden { post_id: post.id }
        }
    }
}

async fn load(db_pool: &SqlitePool, post_id: &str, user: &User) -> AppResult<EditOutcome> {
    let post = Post::find(db_pool, parse_post_id(post_id)?)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    let outcome = EditOutcome::decide(post, user);
    if let EditOutcome::Forbidden { post_id } = outcome {
        warn!("u/{} may not edit post #{post_id}", user.username);
    }
    Ok(outcome)
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_page(
    State(db_pool): State<SqlitePool>,
    Path(post_id): Path<String>,
    CurrentUser(user): CurrentUser,
    format: Format,
) -> AppResult<Response> {
    let post = match load(&db_pool, &post_id, &user).await? {
        EditOutcome::Allowed(post) => post,
        EditOutcome::Forbidden { post_id } => return Ok(Redirect::to(&urls::detail(post_id)).into_response()),
    };

    let page = PostFormPage {
        form: PostForm::for_post(&post),
        username: user.username,
        groups: Group::all(&db_pool).await?,
        post: Some(post),
        is_edit: true,
    };
    Ok(render::render(format, &page)?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn edit_post(
    State(db_pool): State<SqlitePool>,
    State(media): State<MediaStore>,
    Path(post_id): Path<String>,
    CurrentUser(user): CurrentUser,
    format: Format,

    submission: PostSubmission,
) -> AppResult<Response> {
    let post = match load(&db_pool, &post_id, &user).await? {
        EditOutcome::Allowed(post) => post,
        EditOutcome::Forbidden { post_id } => return Ok(Redirect::to(&urls::detail(post_id)).into_response()),
    };

    let groups = Group::all(&db_pool).await?;
    let form = PostForm::bind(submission);

    let clean = match form.clean(&groups) {
        Ok(clean) => clean,
        Err(errors) => {
            let page = PostFormPage {
                form: form.with_errors(errors),
                username: user.username,
                groups,
                post: Some(post),
                is_edit: true,
            };
            return Ok(render::render(format, &page)?.into_response());
        }
    };

    let uploaded = match &clean.image {
        Some(upload) => Some(media.save(upload).await?),
        None => None,
    };

    // a new upload wins over clearing, clearing wins over keeping
    let image = match (&uploaded, clean.image_clear) {
        (Some(reference), _) => Some(reference.clone()),
        (None, true) => None,
        (None, false) => post.image.clone(),
    };

    let fields = PostFields {
        text: &clean.text,
        group_id: clean.group_id,
        image: image.as_deref(),
    };
    if let Err(err) = Post::update(&db_pool, post.id, fields).await {
        if let Some(reference) = &uploaded {
            media.discard(reference).await;
        }
        return Err(err.into());
    }

    if let Some(old) = post.image.as_deref().filter(|old| image.as_deref() != Some(*old)) {
        media.discard(old).await;
    }

    info!("u/{} edited post #{}", user.username, post.id);
    Ok(Redirect::to(&urls::detail(post.id)).into_response())
}
