//! Category management service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::category::{Category, CategoryQuery, CreateCategory, UpdateCategory},
    repository::Repository,
};

#[derive(Clone)]
pub struct CategoryService {
    repository: Repository,
}

impl CategoryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &CategoryQuery) -> AppResult<(Vec<Category>, i64)> {
        self.repository.categories.list(query).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create(&self, category: CreateCategory) -> AppResult<Category> {
        let created = self.repository.categories.create(&category).await?;
        tracing::info!("Created category {} ({})", created.id, created.slug);
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, category: UpdateCategory) -> AppResult<Category> {
        self.repository.categories.update(id, &category).await
    }

    /// Delete a category; children are detached rather than deleted
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.categories.delete(id).await?;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }
}
