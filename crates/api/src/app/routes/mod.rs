use axum::{routing::get, Router};

pub mod books;
pub mod external;
pub mod system;

/// Router for all API endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/api/v1/books", books::router())
        .route("/api/external-books", get(external::search_external_books))
}
