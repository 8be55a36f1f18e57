mod comment;
mod create;
mod detail;
mod edit;
mod feed;
mod follow;
mod group;
mod index;
mod profile;

use axum::{routing::{get, post}, Router};

use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/group/{slug}/", get(group::group_posts))
        .route("/profile/{username}/", get(profile::profile))
        .route("/profile/{username}/follow/", get(follow::profile_follow).post(follow::profile_follow))
        .route("/profile/{username}/unfollow/", get(follow::profile_unfollow).post(follow::profile_unfollow))
        .route("/posts/{post_id}/", get(detail::post_detail))
        .route("/posts/{post_id}/edit/", get(edit::edit_page).post(edit::edit_post))
        .route("/posts/{post_id}/comment/", post(comment::add_comment))
        .route("/create/", get(create::create_page).post(create::create_post))
        .route("/follow/", get(feed::follow_index))
}

/// Post ids in paths are numeric, anything else names a post that doesn't exist.
fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound("post"))
}

pub mod urls {
    pub fn group(slug: &str) -> String {
        format!("/group/{}/", urlencoding::encode(slug))
    }

    pub fn profile(username: &str) -> String {
        format!("/profile/{}/", urlencoding::encode(username))
    }

    pub fn detail(post_id: i64) -> String {
        format!("/posts/{post_id}/")
    }

    pub fn edit(post_id: i64) -> String {
        format!("/posts/{post_id}/edit/")
    }

    pub fn comment(post_id: i64) -> String {
        format!("/posts/{post_id}/comment/")
    }

    pub fn follow(username: &str) -> String {
        format!("/profile/{}/follow/", urlencoding::encode(username))
    }

    pub fn unfollow(username: &str) -> String {
        format!("/profile/{}/unfollow/", urlencoding::encode(username))
    }
}
