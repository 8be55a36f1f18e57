use axum::response::{IntoResponse, Response};

use crate::res;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// The named thing (`"post"`, `"group"`, ...) does not exist.
    NotFound(&'static str),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => res::sorry(what),
            AppError::Internal(err) => {
                tracing::error!("{err:#}\n\n{}", err.backtrace());
                res::oops()
            }
        }
    }
}

// no std::error::Error impl for AppError, it would overlap with `impl From<T> for T`
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
