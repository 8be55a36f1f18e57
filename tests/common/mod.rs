#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use yatube::{
    app,
    config::{AuthConfig, Config},
    models::{Post, PostFields, User},
    AppState,
};

pub const BOUNDARY: &str = "yatube-test-boundary";

/// A 2x1 GIF that really decodes.
pub const SMALL_GIF: &[u8] = b"GIF89a\x02\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff\x21\xf9\x04\x00\x00\x00\x00\x00\x2c\x00\x00\x00\x00\x02\x00\x01\x00\x00\x02\x02\x0c\x0a\x00\x3b";

pub struct TestApp {
    pub state: AppState,
    router: Router,
    // removed with the app
    pub media_root: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let media_root = tempfile::tempdir().unwrap();
        let config = Config {
            bind_address: "127.0.0.1:0".to_owned(),
            database_url: "sqlite::memory:".to_owned(),
            media_root: media_root.path().to_owned(),
            page_cache_ttl: Duration::from_secs(20),
            max_upload_bytes: 1024 * 1024,
            auth: AuthConfig {
                login_url: "/auth/login/".to_owned(),
                dev_login: true,
                session_inactivity: time::Duration::minutes(60),
            },
        };

        let state = AppState::new(&config).await.unwrap();
        let router = app(state.clone());
        Self { state, router, media_root }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Signs `username` in and returns the session cookie.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form("/auth/login/", None, &format!("username={username}&next=/"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::get(uri).header(header::ACCEPT, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn get_html(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::get(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = self.send(request.body(Body::empty()).unwrap()).await;
        let status = response.status();
        (status, text(response).await)
    }

    /// GETs `uri` as JSON, asserting a 200.
    pub async fn get_json(&self, uri: &str, cookie: Option<&str>) -> Value {
        let response = self.get(uri, cookie).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        json(response).await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, body: &str) -> Response<Body> {
        let mut request = Request::post(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body.to_owned())).unwrap()).await
    }

    /// POST with no body and no content type.
    pub async fn post_empty(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::post(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::empty()).unwrap()).await
    }

    pub async fn post_multipart(&self, uri: &str, cookie: Option<&str>, body: Vec<u8>) -> Response<Body> {
        let mut request = Request::post(uri)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.send(request.body(Body::from(body)).unwrap()).await
    }

    pub async fn user(&self, username: &str) -> User {
        User::get_or_create(&self.state.db_pool, username).await.unwrap()
    }

    pub async fn group(&self, title: &str, slug: &str) -> i64 {
        sqlx::query("INSERT INTO post_groups (title,slug,description) VALUES (?,?,?)")
            .bind(title)
            .bind(slug)
            .bind(format!("All about {title}"))
            .execute(&self.state.db_pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn post(&self, author: &User, text: &str, group_id: Option<i64>) -> i64 {
        let fields = PostFields { text, group_id, image: None };
        Post::create(&self.state.db_pool, author.id, fields).await.unwrap()
    }
}

pub async fn text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// One multipart part, a file when `file` is `(file_name, content_type)`.
pub fn part(body: &mut Vec<u8>, name: &str, file: Option<(&str, &str)>, value: &[u8]) {
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    match file {
        Some((file_name, content_type)) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes()),
    }
    body.extend_from_slice(value);
    body.extend_from_slice(b"\r\n");
}

pub fn finish(mut body: Vec<u8>) -> Vec<u8> {
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn texts(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post["text"].as_str().unwrap().to_owned())
        .collect()
}
