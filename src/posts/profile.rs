use axum::{debug_handler, extract::{Path, Query, State}, response::{IntoResponse, Response}};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    auth::Viewer,
    include_res,
    models::{Follow, Post, User},
    paginate::{Page, PageQuery, Window, POSTS_PER_PAGE},
    render::{self, Format, Template},
    AppError, AppResult, AppState,
};

use super::urls;

#[derive(Serialize)]
pub(crate) struct ProfilePage {
    author: User,
    count_posts: i64,
    /// Whether the viewer follows `author`. Always false for anonymous
    /// viewers and on one's own profile.
    following: bool,
    #[serde(skip)]
    can_follow: bool,
    page: Page<Post>,
}

impl Template for ProfilePage {
    fn title(&self) -> String {
        format!("Posts by {}", self.author)
    }

    fn body(&self) -> String {
        let follow_button = if !self.can_follow {
            String::new()
        } else {
            let (action, label) = if self.following {
                (urls::unfollow(&self.author.username), "Unfollow")
            } else {
                (urls::follow(&self.author.username), "Follow")
            };
            include_res!(str, "/pages/follow_button.html")
                .replace("{action}", &action)
                .replace("{label}", label)
        };

        include_res!(str, "/pages/profile.html")
            .replace("{count_posts}", &self.count_posts.to_string())
            .replace("{follow_button}", &follow_button)
            .replace("{posts}", &render::post_list(&self.page, &urls::profile(&self.author.username)))
    }
}

#[debug_handler(state = AppState)]
pub(crate) async fn profile(
    State(db_pool): State<SqlitePool>,
    Path(username): Path<String>,
    Query(PageQuery { page }): Query<PageQuery>,
    Viewer(viewer): Viewer,
    format: Format,
) -> AppResult<Response> {
    let author = User::find_by_username(&db_pool, &username)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    let count_posts = Post::count_by_author(&db_pool, author.id).await?;
    let window = Window::resolve(page.as_deref(), count_posts, POSTS_PER_PAGE);
    let posts = Post::list_by_author(&db_pool, author.id, window.limit(), window.offset()).await?;

    let (following, can_follow) = match &viewer {
        Some(viewer) if viewer.id != author.id => (Follow::is_following(&db_pool, viewer.id, author.id).await?, true),
        _ => (false, false),
    };

    let profile = ProfilePage {
        author,
        count_posts,
        following,
        can_follow,
        page: window.with(posts),
    };
    Ok(render::render(format, &profile)?.into_response())
}
