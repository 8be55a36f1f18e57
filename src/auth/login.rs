use axum::{debug_handler, extract::{Query, State}, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::info;

use crate::{include_res, models::{is_valid_username, User}, render, session::USER_ID, AppResult, AppState};

use super::local_target;

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) next: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    next: Option<String>,
}

fn login_html(next: &str, errors: &[String]) -> Html<String> {
    Html(render::layout(
        "Log in",
        &include_res!(str, "/pages/login.html")
            .replace("{errors}", &render::field_errors(errors))
            .replace("{next}", &render::escape(next)),
    ))
}

#[debug_handler]
pub(crate) async fn login_page(
    Query(LoginQuery { next }): Query<LoginQuery>,
) -> impl IntoResponse {
    login_html(local_target(next.as_deref()), &[])
}

/// Development sign-in: trusts the username it is given, creating the user on
/// first sight.
#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    session: Session,

    Form(LoginForm { username, next }): Form<LoginForm>,
) -> AppResult<Response> {
    let next = local_target(next.as_deref());
    let username = username.trim();

    if !is_valid_username(username) {
        let errors = ["Enter a valid username: letters, digits and @/./+/-/_ only.".to_owned()];
        return Ok(login_html(next, &errors).into_response());
    }

    let user = User::get_or_create(&db_pool, username).await?;
    session.cycle_id().await?;
    session.insert(USER_ID, user.id).await?;

    info!("welcome u/{}#{}", user.username, user.id);
    Ok(Redirect::to(next).into_response())
}
