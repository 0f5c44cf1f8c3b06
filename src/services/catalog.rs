//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CatalogEntry, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a new book in the catalog
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.books.isbn_exists(&book.isbn).await? {
            return Err(AppError::Conflict("ISBN already registered".to_string()));
        }

        self.repository.books.create(&book).await
    }

    /// List the whole catalog with open-borrow metadata
    pub async fn list_catalog(&self) -> AppResult<Vec<CatalogEntry>> {
        self.repository.books.list_catalog().await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Remove a book from the catalog
    pub async fn delete_book(&self, id: i32, force: bool) -> AppResult<()> {
        // Verify book exists
        self.repository.books.get_by_id(id).await?;

        self.repository.books.delete(id, force).await
    }
}
