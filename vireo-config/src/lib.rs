//! Shared configuration library for Vireo.
//!
//! This crate centralizes environment-variable loading and validation so the
//! server binary and tooling share a single source of truth for keys,
//! defaults, and validation rules. Nothing here reads ambient globals at use
//! sites: configuration is loaded once at startup and passed down by value.

pub mod loader;
pub mod models;

pub use loader::{ConfigLoadError, ConfigLoader, EnvSource, ProcessEnv};
pub use models::{
    Config, DatabaseConfig, RecommenderConfig, RedisConfig, SearchConfig, ServerConfig,
    StorageConfig,
};
