//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod categories;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BookService,
    pub authors: authors::AuthorService,
    pub categories: categories::CategoryService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            books: books::BookService::new(repository.clone()),
            authors: authors::AuthorService::new(repository.clone()),
            categories: categories::CategoryService::new(repository),
        }
    }
}
