use std::{fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, anyhow};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    pub media_root: PathBuf,
    pub page_cache_ttl: Duration,
    pub max_upload_bytes: usize,
    pub auth: AuthConfig,
}

/// The slice of configuration the auth extractors need at request time.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Where anonymous visitors of protected pages are sent, `?next=` is appended.
    pub login_url: String,
    /// Mount the username-only login form. Development and tests only.
    pub dev_login: bool,
    pub session_inactivity: time::Duration,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            bind_address: try_load("BIND_ADDRESS", "0.0.0.0:8080")?,
            database_url: try_load("DATABASE_URL", "sqlite:yatube.db")?,
            media_root: try_load::<String>("MEDIA_ROOT", "media")?.into(),
            page_cache_ttl: Duration::from_secs(try_load("PAGE_CACHE_SECONDS", "20")?),
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "5242880")?,
            auth: AuthConfig {
                login_url: try_load("LOGIN_URL", "/auth/login/")?,
                dev_login: try_load("DEV_LOGIN", "false")?,
                session_inactivity: time::Duration::minutes(try_load("SESSION_INACTIVITY_MINUTES", "60")?),
            },
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let value = match dotenv::var(key) {
        Ok(value) => {
            debug!("{key} set");
            value
        }
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default.to_owned()
        }
    };

    value
        .parse()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("invalid {key} value {value:?}"))
}
