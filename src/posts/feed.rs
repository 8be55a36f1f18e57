use axum::{debug_handler, extract::{Query, State}, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    auth::CurrentUser,
    include_res,
    models::{Follow, Post, User},
    paginate::{Page, PageQuery, Window, POSTS_PER_PAGE},
    render::{self, Format, Template},
    AppResult, AppState,
};

use super::urls;

#[derive(Serialize)]
pub(crate) struct FollowPage {
    authors: Vec<User>,
    page: Page<Post>,
}

impl Template for FollowPage {
    fn title(&self) -> String {
        "Following".to_owned()
    }

    fn body(&self) -> String {
        let authors = if self.authors.is_empty() {
            "nobody yet".to_owned()
        } else {
            self.authors
                .iter()
                .map(|a| format!(r#"<a href="{}">{}</a>"#, urls::profile(&a.username), render::escape(&a.username)))
                .collect::<Vec<_>>()
                .join(", ")
        };

        include_res!(str, "/pages/follow.html")
            .replace("{authors}", &authors)
            .replace("{posts}", &render::post_list(&self.page, "/follow/"))
    }
}

/// Posts by everyone the user follows, newest first.
#[debug_handler(state = AppState)]
pub(crate) async fn follow_index(
    State(db_pool): State<SqlitePool>,
    CurrentUser(user): CurrentUser,
    Query(PageQuery { page }): Query<PageQuery>,
    format: Format,
) -> AppResult<Response> {
    let authors = Follow::followed_authors(&db_pool, user.id).await?;

    let count = Post::count_feed(&db_pool, user.id).await?;
    let window = Window::resolve(page.as_deref(), count, POSTS_PER_PAGE);
    let posts = Post::list_feed(&db_pool, user.id, window.limit(), window.offset()).await?;

    let feed = FollowPage { authors, page: window.with(posts) };
    Ok(render::render(format, &feed)?.into_response())
}
