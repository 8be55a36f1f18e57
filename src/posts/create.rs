use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    auth::CurrentUser,
    forms::{PostForm, PostSubmission},
    include_res,
    media::MediaStore,
    models::{Group, Post, PostFields},
    render::{self, Format, Template},
    AppResult, AppState,
};

use super::urls;

/// The create and edit form, they share a page.
#[derive(Serialize)]
pub(crate) struct PostFormPage {
    pub(crate) form: PostForm,
    pub(crate) username: String,
    pub(crate) groups: Vec<Group>,
    /// The post being edited, `None` when creating.
    pub(crate) post: Option<Post>,
    pub(crate) is_edit: bool,
}

impl Template for PostFormPage {
    fn title(&self) -> String {
        if self.is_edit { "Edit post".to_owned() } else { "New post".to_owned() }
    }

    fn body(&self) -> String {
        let mut group_options = String::new();
        for group in &self.groups {
            let id = group.id.to_string();
            let selected = if self.form.group.as_deref() == Some(id.as_str()) { " selected" } else { "" };
            group_options += &format!(
                r#"<option value="{id}"{selected}>{}</option>"#,
                render::escape(&group.title)
            );
        }

        let current_image = match self.post.as_ref().and_then(|p| p.image.as_deref()) {
            Some(image) => include_res!(str, "/pages/current_image.html").replace("{image}", &render::escape(image)),
            None => String::new(),
        };

        let (action, submit) = match &self.post {
            Some(post) => (urls::edit(post.id), "Save"),
            None => ("/create/".to_owned(), "Publish"),
        };

        include_res!(str, "/pages/post_form.html")
            .replace("{action}", &action)
            .replace("{submit}", submit)
            .replace("{text_errors}", &render::field_errors(self.form.errors.get("text")))
            .replace("{group_errors}", &render::field_errors(self.form.errors.get("group")))
            .replace("{image_errors}", &render::field_errors(self.form.errors.get("image")))
            .replace("{current_image}", &current_image)
            .replace("{group_options}", &group_options)
            .replace("{text}", &render::escape(&self.form.text))
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn create_page(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    format: Format,
) -> AppResult<Response> {
    let page = PostFormPage {
        form: PostForm::default(),
        username: user.username,
        groups: Group::all(&db_pool).await?,
        post: None,
        is_edit: false,
    };
    Ok(render::render(format, &page)?.into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn create_post(
    State(db_pool): State<SqlitePool>,
    State(media): State<MediaStore>,
    CurrentUser(user): CurrentUser,
    format: Format,

    submission: PostSubmission,
) -> AppResult<Response> {
    let groups = Group::all(&db_pool).await?;
    let form = PostForm::bind(submission);

    let clean = match form.clean(&groups) {
        Ok(clean) => clean,
        Err(errors) => {
            let page = PostFormPage {
                form: form.with_errors(errors),
                username: user.username,
                groups,
                post: None,
                is_edit: false,
            };
            return Ok(render::render(format, &page)?.into_response());
        }
    };

    let image = match &clean.image {
        Some(upload) => Some(media.save(upload).await?),
        None => None,
    };

    let fields = PostFields {
        text: &clean.text,
        group_id: clean.group_id,
        image: image.as_deref(),
    };
    let post_id = match Post::create(&db_pool, user.id, fields).await {
        Ok(post_id) => post_id,
        Err(err) => {
            if let Some(reference) = &image {
                media.discard(reference).await;
            }
            return Err(err.into());
        }
    };

    info!("u/{} published post #{post_id}", user.username);
    Ok(Redirect::to(&urls::profile(&user.username)).into_response())
}
