//! Categories repository for database operations.
//!
//! `parent_id` carries ON DELETE SET NULL, so removing a category detaches
//! its children; `name` and `slug` carry unique constraints surfaced as
//! Conflict errors.

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryQuery, CreateCategory, UpdateCategory},
};

const CATEGORY_COLUMNS: &str = "id, name, slug, description, parent_id, created_at, updated_at";

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("A category with this name or slug already exists".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Category> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    pub async fn list(&self, query: &CategoryQuery) -> AppResult<(Vec<Category>, i64)> {
        let limit = query.limit();
        let offset = query.offset();

        let select = format!(
            "SELECT {} FROM categories ORDER BY name LIMIT $1 OFFSET $2",
            CATEGORY_COLUMNS
        );

        let count_fut = async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
                .fetch_one(&self.pool)
                .await
        };
        let page_fut = async {
            sqlx::query_as::<_, Category>(&select)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
        };

        let (total, categories) = tokio::try_join!(count_fut, page_fut)?;

        Ok((categories, total))
    }

    pub async fn create(&self, category: &CreateCategory) -> AppResult<Category> {
        if let Some(parent_id) = category.parent_id {
            // Reject dangling parents up front for a clearer error
            self.get_by_id(parent_id).await.map_err(|_| {
                AppError::BadRequest(format!("Parent category {} does not exist", parent_id))
            })?;
        }

        let query = format!(
            r#"
            INSERT INTO categories (name, slug, description, parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(category.parent_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)
    }

    pub async fn update(&self, id: Uuid, category: &UpdateCategory) -> AppResult<Category> {
        let query = format!(
            r#"
            UPDATE categories SET
                name = COALESCE($1, name),
                slug = COALESCE($2, slug),
                description = COALESCE($3, description),
                parent_id = COALESCE($4, parent_id),
                updated_at = $5
            WHERE id = $6
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(category.parent_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    /// Delete a category. Children are detached (parent_id set to NULL) and
    /// book join rows removed, both through the schema constraints.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted =
            sqlx::query_scalar::<_, Uuid>("DELETE FROM categories WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
