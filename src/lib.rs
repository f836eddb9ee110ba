//! Bookhaven Book Catalog Server
//!
//! A Rust implementation of the Bookhaven catalog server, providing a REST
//! JSON API for managing books, authors, and categories with admin-gated
//! mutation.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Pool handle for readiness probes; domain access goes through services
    pub db: sqlx::PgPool,
    pub services: Arc<services::Services>,
}
