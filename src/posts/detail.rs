use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    auth::Viewer,
    forms::CommentForm,
    include_res,
    models::{Comment, Post, User},
    render::{self, Format, Template},
    AppError, AppResult, AppState,
};

use super::{parse_post_id, urls};

#[derive(Serialize)]
pub(crate) struct DetailPage {
    post: Post,
    author: User,
    count_posts: i64,
    comments: Vec<Comment>,
    form: CommentForm,
    #[serde(skip)]
    can_edit: bool,
}

impl Template for DetailPage {
    fn title(&self) -> String {
        format!("Post {}", self.post)
    }

    fn body(&self) -> String {
        let edit_link = if self.can_edit {
            format!(r#"<a href="{}">edit</a>"#, urls::edit(self.post.id))
        } else {
            String::new()
        };

        let mut comments = String::new();
        for comment in &self.comments {
            comments += &include_res!(str, "/pages/comment.html")
                .replace("{profile_url}", &urls::profile(&comment.author.username))
                .replace("{created}", &comment.created.date().to_string())
                .replace("{author}", &render::escape(&comment.author.username))
                .replace("{text}", &render::markdown(&comment.text));
        }

        include_res!(str, "/pages/post_detail.html")
            .replace("{profile_url}", &urls::profile(&self.author.username))
            .replace("{count_posts}", &self.count_posts.to_string())
            .replace("{created}", &self.post.created.date().to_string())
            .replace("{edit_link}", &edit_link)
            .replace("{comment_url}", &urls::comment(self.post.id))
            .replace("{form_errors}", &render::field_errors(self.form.errors.get("text")))
            .replace("{group}", &render::group_link(self.post.group.as_ref()))
            .replace("{image}", &render::image(self.post.image.as_deref()))
            .replace("{author}", &render::escape(&self.author.username))
            .replace("{form_text}", &render::escape(&self.form.text))
            .replace("{text}", &render::markdown(&self.post.text))
            .replace("{comments}", &comments)
    }
}

/// A post with its comments, and an empty comment form underneath.
#[debug_handler(state = AppState)]
pub(crate) async fn post_detail(
    State(db_pool): State<SqlitePool>,
    Path(post_id): Path<String>,
    Viewer(viewer): Viewer,
    format: Format,
) -> AppResult<Response> {
    let post = Post::find(&db_pool, parse_post_id(&post_id)?)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    let author = post.author.clone();
    let count_posts = Post::count_by_author(&db_pool, author.id).await?;
    let comments = Comment::list_for_post(&db_pool, post.id).await?;
    let can_edit = viewer.is_some_and(|viewer| viewer.id == author.id);

    let detail = DetailPage {
        post,
        author,
        count_posts,
        comments,
        form: CommentForm::default(),
        can_edit,
    };
    Ok(render::render(format, &detail)?.into_response())
}
