use axum::http::{header, HeaderMap};
use sqlx::sqlite::SqlitePool;

/// Shared handler state: the store handle plus what is needed to build
/// absolute links.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(pool: SqlitePool, public_url: Option<String>) -> Self {
        Self { pool, public_url }
    }

    /// Scheme and authority that pagination links are rooted at.
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(url) = &self.public_url {
            return url.clone();
        }

        let host = headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost");

        format!("http://{}", host)
    }
}
