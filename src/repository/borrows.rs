//! Borrow ledger repository.
//!
//! Every state transition runs inside a single transaction that first locks
//! the book row with `SELECT ... FOR UPDATE`, so concurrent borrows and
//! returns of the same book serialize at the store. The partial unique index
//! on `borrows (book_id) WHERE return_date IS NULL` backs the one-open-borrow
//! invariant independently of the lock.

use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BorrowedBook},
        borrow::BorrowRecord,
    },
};

/// Loan period applied to every borrow.
pub const LOAN_PERIOD_DAYS: i64 = 7;

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book for a member.
    ///
    /// Creates the open ledger row and flips `books.is_available` in one
    /// transaction. Fails with `NotFound` when the book does not exist and
    /// `Conflict` when it is already borrowed; either failure rolls the
    /// transaction back with no visible effect.
    pub async fn borrow(&self, book_id: i32, user_id: i32) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        if !book.is_available {
            return Err(AppError::Conflict("Book is already borrowed".to_string()));
        }

        let now = Utc::now();
        let due_date = now + Duration::days(LOAN_PERIOD_DAYS);

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrows (book_id, user_id, borrow_date, due_date, return_date)
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(now)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET is_available = FALSE, updated_at = $1 WHERE id = $2")
            .bind(now)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(book_id, user_id, record_id = record.id, "book borrowed");

        Ok(record)
    }

    /// Return a borrowed book.
    ///
    /// The open ledger row is looked up by the (book, member) pair, so one
    /// member cannot close another member's loan. Sets `return_date` and
    /// flips `books.is_available` atomically; `due_date` is left untouched.
    pub async fn return_book(&self, book_id: i32, user_id: i32) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        // Lock the book row first, same order as borrow()
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            SELECT * FROM borrows
            WHERE book_id = $1 AND user_id = $2 AND return_date IS NULL
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No active borrow found for this book and user".to_string())
        })?;

        let now = Utc::now();

        sqlx::query("UPDATE borrows SET return_date = $1 WHERE id = $2")
            .bind(now)
            .bind(record.id)
            .execute(&mut *tx)
            .await?;

        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET is_available = TRUE, updated_at = $1 WHERE id = $2 RETURNING *",
        )
        .bind(now)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(book_id, user_id, record_id = record.id, "book returned");

        Ok(book)
    }

    /// List all currently borrowed books with their loan dates
    pub async fn list_borrowed(&self) -> AppResult<Vec<BorrowedBook>> {
        let borrowed = sqlx::query_as::<_, BorrowedBook>(
            r#"
            SELECT b.id, b.title, b.author, b.isbn, br.borrow_date, br.due_date
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            WHERE br.return_date IS NULL
            ORDER BY br.borrow_date
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowed)
    }

    /// List a member's open loans with book data
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<BorrowedBook>> {
        let borrowed = sqlx::query_as::<_, BorrowedBook>(
            r#"
            SELECT b.id, b.title, b.author, b.isbn, br.borrow_date, br.due_date
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            WHERE br.user_id = $1 AND br.return_date IS NULL
            ORDER BY br.borrow_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrowed)
    }
}
