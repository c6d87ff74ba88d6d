use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

/// Which persistence backend serves this process. Both implement the same
/// storage contract; the choice is made once, here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

pub struct Config {
    pub database_url: String,
    pub storage_backend: StorageBackend,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let storage_backend = match env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            _ => StorageBackend::Postgres,
        };
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/tickethub".to_string()),
            storage_backend,
            port: env::var("PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(3001),
        }
    }
}
