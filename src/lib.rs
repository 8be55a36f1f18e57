pub mod appresult;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod forms;
pub mod media;
pub mod models;
pub mod paginate;
pub mod posts;
pub mod render;
pub mod res;
pub mod session;

use axum::{extract::{DefaultBodyLimit, FromRef}, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;

pub use appresult::{AppError, AppResult};

use cache::PageCache;
use config::{AuthConfig, Config};
use media::MediaStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub page_cache: PageCache,
    pub media: MediaStore,
    pub auth: AuthConfig,
    #[from_ref(skip)]
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Connects to the database and makes sure the schema exists.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = db::connect(&config.database_url).await?;
        db::init(&db_pool).await?;
        info!("database ready at {}", config.database_url);

        Ok(Self {
            db_pool,
            page_cache: PageCache::new(config.page_cache_ttl),
            media: MediaStore::new(&config.media_root),
            auth: config.auth.clone(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(state.auth.session_inactivity));

    Router::new()
        .merge(posts::router())
        .merge(auth::router(&state.auth))
        .fallback(res::fallback)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
