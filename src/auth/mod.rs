//! The narrow interface to the identity provider: whoever is signed in sits in
//! the session under [`USER_ID`], and handlers read it through [`CurrentUser`]
//! or [`Viewer`].

mod login;
mod logout;

use anyhow::anyhow;
use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{config::AuthConfig, models::User, session::USER_ID, AppResult, AppState};

pub fn router(auth: &AuthConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/auth/logout/", get(logout::logout).post(logout::logout));

    if auth.dev_login {
        router.route("/auth/login/", get(login::login_page).post(login::login))
    } else {
        router
    }
}

/// The signed-in user. Anonymous requests are sent to the login page, which
/// brings them back afterwards.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Whoever is looking, if anyone. Never rejects a request.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
    AuthConfig: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_user(parts, state).await {
            Ok(Some(user)) => Ok(CurrentUser(user)),
            Ok(None) => {
                let next = match parts.extensions.get::<OriginalUri>() {
                    Some(OriginalUri(uri)) => uri.to_string(),
                    None => parts.uri.to_string(),
                };
                let auth = AuthConfig::from_ref(state);
                Err(login_redirect(&auth.login_url, &next).into_response())
            }
            Err(err) => Err(err.into_response()),
        }
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        session_user(parts, state)
            .await
            .map(Viewer)
            .map_err(IntoResponse::into_response)
    }
}

async fn session_user<S>(parts: &mut Parts, state: &S) -> AppResult<Option<User>>
where
    S: Send + Sync,
    SqlitePool: FromRef<S>,
{
    let session = Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| anyhow!(msg))?;

    let Some(user_id) = session.get::<i64>(USER_ID).await? else {
        return Ok(None);
    };

    // a session can outlive its user
    let db_pool = SqlitePool::from_ref(state);
    Ok(User::find(&db_pool, user_id).await?)
}

pub fn login_redirect(login_url: &str, next: &str) -> Redirect {
    Redirect::to(&format!("{login_url}?next={}", urlencoding::encode(next)))
}

/// Only same-site paths are allowed as post-login targets.
pub(crate) fn local_target(next: Option<&str>) -> &str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\") => next,
        _ => "/",
    }
}
