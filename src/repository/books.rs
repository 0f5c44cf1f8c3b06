//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CatalogEntry, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Check if an ISBN is already registered
    pub async fn isbn_exists(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a new book. New books start out available.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, author, isbn, is_available, created_at)
            VALUES ($1, $2, $3, TRUE, $4)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// List the whole catalog, each book joined with its open borrow.
    /// Borrow columns come back null for available books.
    pub async fn list_catalog(&self) -> AppResult<Vec<CatalogEntry>> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT b.id, b.title, b.author, b.isbn, b.is_available,
                   b.created_at, b.updated_at,
                   br.borrow_date, br.due_date, br.return_date
            FROM books b
            LEFT JOIN borrows br ON br.book_id = b.id AND br.return_date IS NULL
            ORDER BY b.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Delete a book. Refuses while an open borrow references it unless
    /// `force` is set; a forced delete cascades the ledger rows.
    pub async fn delete(&self, id: i32, force: bool) -> AppResult<()> {
        let open_borrows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE book_id = $1 AND return_date IS NULL",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if open_borrows > 0 && !force {
            return Err(AppError::Conflict(
                "Book is currently borrowed. Use force=true to delete anyway.".to_string(),
            ));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
