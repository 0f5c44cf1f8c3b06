//! Catalog and borrow/return endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{Book, BorrowedBook, CatalogEntry, CreateBook, DeleteBookParams},
        borrow::{BorrowRecord, BorrowRequest, ReturnRequest},
    },
};

use super::AuthenticatedUser;

/// List the catalog with open-borrow metadata
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Catalog listing", body = Vec<CatalogEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let entries = state.services.catalog.list_catalog().await?;
    Ok(Json(entries))
}

/// Register a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "ISBN already registered")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create_book(book).await?;

    tracing::info!(book_id = created.id, "book created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("force" = Option<bool>, Query, description = "Delete even while borrowed")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is currently borrowed")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(params): Query<DeleteBookParams>,
) -> AppResult<StatusCode> {
    state
        .services
        .catalog
        .delete_book(id, params.force.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Book borrowed", body = BorrowRecord),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "Book is already borrowed")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state
        .services
        .lending
        .borrow_book(id, request.user_id)
        .await?;
    Ok(Json(record))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = Book),
        (status = 404, description = "No active borrow for this book and user")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .lending
        .return_book(id, request.user_id)
        .await?;
    Ok(Json(book))
}

/// List all currently borrowed books
#[utoipa::path(
    get,
    path = "/books/borrowed",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed books (empty list when none)", body = Vec<BorrowedBook>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_borrowed_books(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowedBook>>> {
    let borrowed = state.services.lending.list_borrowed().await?;
    Ok(Json(borrowed))
}
