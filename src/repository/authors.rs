//! Authors repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
};

const AUTHOR_COLUMNS: &str = "id, name, bio, photo_url, birth_date, created_at, updated_at";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Author> {
        let query = format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS);

        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    pub async fn list(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        let limit = query.limit();
        let offset = query.offset();

        let select = format!(
            "SELECT {} FROM authors ORDER BY name LIMIT $1 OFFSET $2",
            AUTHOR_COLUMNS
        );

        let count_fut = async {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM authors")
                .fetch_one(&self.pool)
                .await
        };
        let page_fut = async {
            sqlx::query_as::<_, Author>(&select)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
        };

        let (total, authors) = tokio::try_join!(count_fut, page_fut)?;

        Ok((authors, total))
    }

    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let now = Utc::now();

        let query = format!(
            r#"
            INSERT INTO authors (name, bio, photo_url, birth_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );

        let created = sqlx::query_as::<_, Author>(&query)
            .bind(&author.name)
            .bind(&author.bio)
            .bind(&author.photo_url)
            .bind(author.birth_date)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn update(&self, id: Uuid, author: &UpdateAuthor) -> AppResult<Author> {
        let query = format!(
            r#"
            UPDATE authors SET
                name = COALESCE($1, name),
                bio = COALESCE($2, bio),
                photo_url = COALESCE($3, photo_url),
                birth_date = COALESCE($4, birth_date),
                updated_at = $5
            WHERE id = $6
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );

        sqlx::query_as::<_, Author>(&query)
            .bind(&author.name)
            .bind(&author.bio)
            .bind(&author.photo_url)
            .bind(author.birth_date)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Delete an author; book join rows are removed by the cascade constraint
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted =
            sqlx::query_scalar::<_, Uuid>("DELETE FROM authors WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }

        Ok(())
    }
}
