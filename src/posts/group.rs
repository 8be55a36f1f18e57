use axum::{debug_handler, extract::{Path, Query, State}, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    include_res,
    models::{Group, Post},
    paginate::{Page, PageQuery, Window, POSTS_PER_PAGE},
    render::{self, Format, Template},
    AppError, AppResult, AppState,
};

use super::urls;

#[derive(Serialize)]
pub(crate) struct GroupPage {
    group: Group,
    page: Page<Post>,
}

impl Template for GroupPage {
    fn title(&self) -> String {
        self.group.to_string()
    }

    fn body(&self) -> String {
        include_res!(str, "/pages/group.html")
            .replace("{posts}", &render::post_list(&self.page, &urls::group(&self.group.slug)))
            .replace("{description}", &render::escape(&self.group.description))
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn group_posts(
    State(db_pool): State<SqlitePool>,
    Path(slug): Path<String>,
    Query(PageQuery { page }): Query<PageQuery>,
    format: Format,
) -> AppResult<Response> {
    let group = Group::find_by_slug(&db_pool, &slug)
        .await?
        .ok_or(AppError::NotFound("group"))?;

    let count = Post::count_by_group(&db_pool, group.id).await?;
    let window = Window::resolve(page.as_deref(), count, POSTS_PER_PAGE);
    let posts = Post::list_by_group(&db_pool, group.id, window.limit(), window.offset()).await?;

    Ok(render::render(format, &GroupPage { group, page: window.with(posts) })?.into_response())
}
