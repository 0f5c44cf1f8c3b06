//! Borrow ledger model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A single loan in the ledger. `return_date` is null while the loan is open.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub borrow_date: DateTime<Utc>,
    /// Date the book is owed back. Fixed at creation, never touched by a return.
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Borrow request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub user_id: i32,
}

/// Return request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReturnRequest {
    pub user_id: i32,
}
