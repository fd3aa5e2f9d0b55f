//! HTTP API server for the Vireo platform.
#![allow(missing_docs)]

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::{AppError, AppResult};
pub use state::AppState;
