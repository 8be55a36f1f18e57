use axum::{debug_handler, extract::{Query, State}, http::Uri, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    cache::PageCache,
    models::Post,
    paginate::{Page, PageQuery, Window, POSTS_PER_PAGE},
    render::{self, Format, Template},
    AppResult, AppState,
};

const CACHE_PREFIX: &str = "index_page";

#[derive(Serialize)]
pub(crate) struct IndexPage {
    page: Page<Post>,
}

impl Template for IndexPage {
    fn title(&self) -> String {
        "Latest posts".to_owned()
    }

    fn body(&self) -> String {
        render::post_list(&self.page, "/")
    }
}

/// Every post, newest first. Served from the page cache when possible, new
/// or deleted posts show up once the cached page expires.
#[debug_handler(state = AppState)]
pub(crate) async fn index(
    State(db_pool): State<SqlitePool>,
    State(page_cache): State<PageCache>,
    Query(PageQuery { page }): Query<PageQuery>,
    format: Format,
    uri: Uri,
) -> AppResult<Response> {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let key = PageCache::key(CACHE_PREFIX, path_and_query, format);
    if let Some(cached) = page_cache.get(&key).await {
        return Ok(cached.into_response());
    }

    let count = Post::count_all(&db_pool).await?;
    let window = Window::resolve(page.as_deref(), count, POSTS_PER_PAGE);
    let posts = Post::list_all(&db_pool, window.limit(), window.offset()).await?;

    let rendered = render::render(format, &IndexPage { page: window.with(posts) })?;
    page_cache.insert(key, rendered.clone()).await;

    Ok(rendered.into_response())
}
