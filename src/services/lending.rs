//! Lending service: the borrow/return workflow over the ledger

use crate::{
    error::AppResult,
    models::{
        book::{Book, BorrowedBook},
        borrow::BorrowRecord,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
}

impl LendingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for a member
    pub async fn borrow_book(&self, book_id: i32, user_id: i32) -> AppResult<BorrowRecord> {
        // Verify member exists; the ledger transaction handles the book side
        self.repository.users.get_by_id(user_id).await?;

        self.repository.borrows.borrow(book_id, user_id).await
    }

    /// Return a borrowed book
    pub async fn return_book(&self, book_id: i32, user_id: i32) -> AppResult<Book> {
        // Verify member exists
        self.repository.users.get_by_id(user_id).await?;

        self.repository.borrows.return_book(book_id, user_id).await
    }

    /// List all currently borrowed books
    pub async fn list_borrowed(&self) -> AppResult<Vec<BorrowedBook>> {
        self.repository.borrows.list_borrowed().await
    }

    /// List a member's open loans
    pub async fn list_user_borrows(&self, user_id: i32) -> AppResult<Vec<BorrowedBook>> {
        // Verify member exists
        self.repository.users.get_by_id(user_id).await?;

        self.repository.borrows.list_for_user(user_id).await
    }
}
