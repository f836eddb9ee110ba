//! Book aggregate service.
//!
//! Enforces cross-record business rules (duplicate ISBN) on top of the
//! repository and returns shaped books with relation arrays attached.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
    validation::parse_uuid_list,
};

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book with its credited authors and categories.
    ///
    /// The duplicate-ISBN lookup is a fast path only; the unique constraints
    /// on `isbn`/`isbn13` catch races between the check and the insert, and
    /// the repository reports those as the same Conflict.
    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        if book.isbn.is_some() || book.isbn13.is_some() {
            let existing = self
                .repository
                .books
                .find_id_by_isbn(book.isbn.as_deref(), book.isbn13.as_deref())
                .await?;
            if existing.is_some() {
                return Err(AppError::Conflict(
                    "A book with this ISBN already exists".to_string(),
                ));
            }
        }

        let author_ids = match &book.author_ids {
            Some(ids) => parse_uuid_list("authorIds", ids)?,
            None => Vec::new(),
        };
        let category_ids = match &book.category_ids {
            Some(ids) => parse_uuid_list("categoryIds", ids)?,
            None => Vec::new(),
        };

        let id = self
            .repository
            .books
            .create(&book, &author_ids, &category_ids)
            .await?;

        tracing::info!("Created book {} ({})", id, book.title);

        self.repository.books.get_by_id(id).await
    }

    /// List books under the query filters, returning the page and the total
    /// count under the same predicate
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(query).await
    }

    /// Get a book by ID with relations attached
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Update scalar fields and return the re-fetched shaped book
    pub async fn update(&self, id: Uuid, update: UpdateBook) -> AppResult<Book> {
        self.repository.books.update(id, &update).await?;
        self.repository.books.get_by_id(id).await
    }

    /// Delete a book and its join rows
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
