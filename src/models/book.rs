//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: String,
}

/// Catalog listing entry: a book joined with its open borrow, if any.
/// The borrow columns are null for available books.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CatalogEntry {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub borrow_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
}

/// A currently borrowed book with its loan dates
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BorrowedBook {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Delete book query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct DeleteBookParams {
    /// Delete even when an open borrow references the book (cascades the ledger rows)
    pub force: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn create_book_isbn_length() {
        let valid = CreateBook {
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            isbn: "9780000000001".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short = CreateBook {
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            isbn: "12345".to_string(),
        };
        assert!(short.validate().is_err());

        let long = CreateBook {
            title: "Test Book".to_string(),
            author: "Test Author".to_string(),
            isbn: "97800000000012".to_string(),
        };
        assert!(long.validate().is_err());
    }
}
