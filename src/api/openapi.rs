//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, users};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Biblios API",
        version = "1.0.0",
        description = "Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::create_user,
        users::get_user,
        users::get_user_by_email,
        users::update_user,
        users::delete_user,
        users::get_user_borrows,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::delete_book,
        // Borrows
        books::borrow_book,
        books::return_book,
        books::list_borrowed_books,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::Login,
            crate::models::user::TokenResponse,
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::CatalogEntry,
            crate::models::book::BorrowedBook,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowRequest,
            crate::models::borrow::ReturnRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "books", description = "Catalog management"),
        (name = "borrows", description = "Borrow and return workflow")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
