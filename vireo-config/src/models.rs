//! Typed configuration model.

/// Fully validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub recommender: RecommenderConfig,
    pub search: SearchConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Recommender service (gorse-compatible REST API).
#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// Search index service.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub base_url: String,
}

/// Object-storage upload signing.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Endpoint clients POST multipart uploads to.
    pub upload_url: String,
    /// Base URL uploaded objects are served from.
    pub public_base_url: String,
    pub access_key_id: String,
    pub access_key_secret: String,
}
