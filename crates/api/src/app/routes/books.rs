use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use bookstack_core::Author;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_book).get(list_books))
        .route(
            "/:id",
            get(get_book).patch(update_book).delete(delete_book),
        )
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateBookRequest>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    // Resolve author names to rows up front, deduplicating while keeping
    // the submitted order.
    let mut authors: Vec<Author> = Vec::with_capacity(body.authors.len());
    for name in &body.authors {
        if authors.iter().any(|a| &a.name == name) {
            continue;
        }
        match services.store.get_or_create_author(name).await {
            Ok(author) => authors.push(author),
            Err(e) => return errors::store_error_to_response(e),
        }
    }

    match services.store.create_book(&body, &authors).await {
        Ok(book) => (
            StatusCode::CREATED,
            // The created book rides in a single-element list keyed "book".
            Json(dto::envelope(201, json!([{ "book": book }]))),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store.list_books().await {
        Ok(books) => (StatusCode::OK, Json(dto::envelope(200, json!(books)))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.store.get_book(id).await {
        Ok(Some(book)) => (StatusCode::OK, Json(dto::envelope(200, json!(book)))).into_response(),
        Ok(None) => errors::not_found("book not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<dto::UpdateBookRequest>,
) -> axum::response::Response {
    if let Err(e) = body.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.store.update_book(id, &body).await {
        // The message quotes the post-update name.
        Ok(Some(book)) => (
            StatusCode::OK,
            Json(dto::envelope_with_message(
                200,
                format!("The book {} was updated successfully.", book.name),
                json!(book),
            )),
        )
            .into_response(),
        Ok(None) => errors::not_found("book not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.store.delete_book(id).await {
        // The message quotes the pre-delete name; data is an empty list.
        Ok(Some(book)) => (
            StatusCode::OK,
            Json(dto::envelope_with_message(
                200,
                format!("The book {} was deleted successfully.", book.name),
                json!([]),
            )),
        )
            .into_response(),
        Ok(None) => errors::not_found("book not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
