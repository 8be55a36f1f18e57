use axum::{debug_handler, extract::Query, response::Redirect};
use tower_sessions::Session;
use tracing::info;

use super::{local_target, login::LoginQuery};

#[debug_handler]
pub(crate) async fn logout(
    Query(LoginQuery { next }): Query<LoginQuery>,
    session: Session
) -> Redirect {
    session.clear().await;
    info!("signed out");
    Redirect::to(local_target(next.as_deref()))
}
