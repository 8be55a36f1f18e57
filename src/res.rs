use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};

use crate::render;

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub fn sorry(what: &str) -> Response {
    let body = include_res!(str, "/pages/sorry.html")
        .replace("{what}", &render::escape(what));

    (
        StatusCode::NOT_FOUND,
        Html(render::layout("Not found", &body)),
    ).into_response()
}

pub fn oops() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::layout("Server error", include_res!(str, "/pages/oops.html"))),
    ).into_response()
}

pub async fn fallback() -> Response {
    sorry("page")
}
