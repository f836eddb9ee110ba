//! Books repository for database operations.
//!
//! The book row and its join rows (credited authors, categories) are written
//! in one transaction; a creation that fails part-way leaves nothing behind.
//! The `isbn`/`isbn13` unique constraints are the authoritative duplicate
//! guard, surfaced here as a Conflict.

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookAuthorEntry, BookCategoryEntry, BookQuery, CreateBook, UpdateBook},
};

const BOOK_COLUMNS: &str = "id, isbn, isbn13, title, subtitle, description, publisher, edition, \
     language, publication_date, page_count, format, price, discount_price, stock_quantity, \
     cover_image_url, preview_url, average_rating, ratings_count, additional_info, \
     is_featured, is_active, created_at, updated_at";

const DUPLICATE_ISBN_MESSAGE: &str = "A book with this ISBN already exists";

fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_ISBN_MESSAGE.to_string())
        }
        _ => AppError::Database(e),
    }
}

fn map_reference_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::BadRequest("Referenced author or category does not exist".to_string())
        }
        _ => AppError::Database(e),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get a book by ID with authors and categories attached
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);

        let mut book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        book.authors = Some(self.get_book_authors(id).await?);
        book.categories = Some(self.get_book_categories(id).await?);

        Ok(book)
    }

    /// Find the id of any book whose `isbn` or `isbn13` matches the supplied
    /// values, omitting whichever is absent. Fast-path duplicate lookup only;
    /// the unique constraints remain the source of truth under concurrency.
    pub async fn find_id_by_isbn(
        &self,
        isbn: Option<&str>,
        isbn13: Option<&str>,
    ) -> AppResult<Option<Uuid>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM books
            WHERE ($1::text IS NOT NULL AND isbn = $1)
               OR ($2::text IS NOT NULL AND isbn13 = $2)
            LIMIT 1
            "#,
        )
        .bind(isbn)
        .bind(isbn13)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    /// Load credited authors via the book_authors junction table,
    /// in credited order
    async fn get_book_authors(&self, book_id: Uuid) -> AppResult<Vec<BookAuthorEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.name, ba.author_order
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = $1
            ORDER BY ba.author_order
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| BookAuthorEntry {
                id: r.get("id"),
                name: r.get("name"),
                order: r.get("author_order"),
            })
            .collect())
    }

    /// Load categories via the book_categories junction table,
    /// primary category first
    async fn get_book_categories(&self, book_id: Uuid) -> AppResult<Vec<BookCategoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.name, c.slug, bc.is_primary
            FROM book_categories bc
            JOIN categories c ON c.id = bc.category_id
            WHERE bc.book_id = $1
            ORDER BY bc.is_primary DESC, c.name
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| BookCategoryEntry {
                id: r.get("id"),
                name: r.get("name"),
                slug: r.get("slug"),
                is_primary: r.get("is_primary"),
            })
            .collect())
    }

    // =========================================================================
    // LIST
    // =========================================================================

    /// Fetch one page plus the total count under the same filter predicate.
    /// The two queries run concurrently; the total may lag the page slightly
    /// under concurrent writes, which is acceptable for listing.
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let limit = query.limit();
        let offset = query.offset();

        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM books WHERE 1=1");
        push_filters(&mut count_qb, query);

        let mut page_qb =
            QueryBuilder::new(format!("SELECT {} FROM books WHERE 1=1", BOOK_COLUMNS));
        push_filters(&mut page_qb, query);
        page_qb
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let count_fut = async {
            count_qb
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool)
                .await
        };
        let page_fut = async { page_qb.build_query_as::<Book>().fetch_all(&self.pool).await };

        let (total, books) = tokio::try_join!(count_fut, page_fut)?;

        Ok((books, total))
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    /// Create a book with its author/category join rows as a single
    /// transaction. Author order follows the input order starting at 1; only
    /// the first category is marked primary.
    pub async fn create(
        &self,
        book: &CreateBook,
        author_ids: &[Uuid],
        category_ids: &[Uuid],
    ) -> AppResult<Uuid> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO books (
                isbn, isbn13, title, subtitle, description, publisher, edition,
                language, publication_date, page_count, format, price,
                discount_price, stock_quantity, cover_image_url, preview_url,
                additional_info, is_featured, is_active, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $20
            ) RETURNING id
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.isbn13)
        .bind(&book.title)
        .bind(&book.subtitle)
        .bind(&book.description)
        .bind(&book.publisher)
        .bind(&book.edition)
        .bind(book.language.as_deref().unwrap_or("en"))
        .bind(book.publication_date)
        .bind(book.page_count)
        .bind(book.format)
        .bind(book.price)
        .bind(book.discount_price)
        .bind(book.stock_quantity.unwrap_or(0))
        .bind(&book.cover_image_url)
        .bind(&book.preview_url)
        .bind(
            book.additional_info
                .clone()
                .unwrap_or_else(|| serde_json::json!({})),
        )
        .bind(book.is_featured.unwrap_or(false))
        .bind(book.is_active.unwrap_or(true))
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        for (idx, author_id) in author_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO book_authors (book_id, author_id, author_order)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(author_id)
            .bind((idx + 1) as i16)
            .execute(&mut *tx)
            .await
            .map_err(map_reference_violation)?;
        }

        for (idx, category_id) in category_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO book_categories (book_id, category_id, is_primary)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(id)
            .bind(category_id)
            .bind(idx == 0)
            .execute(&mut *tx)
            .await
            .map_err(map_reference_violation)?;
        }

        tx.commit().await?;

        Ok(id)
    }

    // =========================================================================
    // UPDATE
    // =========================================================================

    /// Update scalar book fields. Only the supplied fields change; author and
    /// category linkage is never touched by this operation.
    pub async fn update(&self, id: Uuid, book: &UpdateBook) -> AppResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        sqlx::query(
            r#"
            UPDATE books SET
                isbn = COALESCE($1, isbn),
                isbn13 = COALESCE($2, isbn13),
                title = COALESCE($3, title),
                subtitle = COALESCE($4, subtitle),
                description = COALESCE($5, description),
                publisher = COALESCE($6, publisher),
                edition = COALESCE($7, edition),
                language = COALESCE($8, language),
                publication_date = COALESCE($9, publication_date),
                page_count = COALESCE($10, page_count),
                format = COALESCE($11, format),
                price = COALESCE($12, price),
                discount_price = COALESCE($13, discount_price),
                stock_quantity = COALESCE($14, stock_quantity),
                cover_image_url = COALESCE($15, cover_image_url),
                preview_url = COALESCE($16, preview_url),
                additional_info = COALESCE($17, additional_info),
                is_featured = COALESCE($18, is_featured),
                is_active = COALESCE($19, is_active),
                updated_at = $20
            WHERE id = $21
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.isbn13)
        .bind(&book.title)
        .bind(&book.subtitle)
        .bind(&book.description)
        .bind(&book.publisher)
        .bind(&book.edition)
        .bind(&book.language)
        .bind(book.publication_date)
        .bind(book.page_count)
        .bind(book.format)
        .bind(book.price)
        .bind(book.discount_price)
        .bind(book.stock_quantity)
        .bind(&book.cover_image_url)
        .bind(&book.preview_url)
        .bind(&book.additional_info)
        .bind(book.is_featured)
        .bind(book.is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Delete a book; join rows are removed by the cascade constraints
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = sqlx::query_scalar::<_, Uuid>("DELETE FROM books WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}

/// Append the listing filter predicate shared by the count and page queries
fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, query: &'a BookQuery) {
    if let Some(ref search) = query.search {
        qb.push(" AND title ILIKE ")
            .push_bind(format!("%{}%", search));
    }
    if let Some(format) = query.format {
        qb.push(" AND format = ").push_bind(format.as_str());
    }
    if let Some(is_active) = query.is_active {
        qb.push(" AND is_active = ").push_bind(is_active);
    }
    if let Some(is_featured) = query.is_featured {
        qb.push(" AND is_featured = ").push_bind(is_featured);
    }
}
