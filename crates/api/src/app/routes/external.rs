use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use bookstack_core::status;

use crate::app::errors;
use crate::app::external::LookupOutcome;
use crate::app::services::AppServices;

#[derive(Debug, Deserialize)]
pub struct ExternalBooksQuery {
    #[serde(default)]
    pub name: String,
}

pub async fn search_external_books(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ExternalBooksQuery>,
) -> axum::response::Response {
    match services.catalog.search(&query.name).await {
        Ok(LookupOutcome::Offline) => {
            // Inherited inconsistency: the offline body ships with a 200.
            tracing::warn!("returning offline error body with success-level status");
            (
                StatusCode::OK,
                Json(json!({ "error": "You are not connected to internet!" })),
            )
                .into_response()
        }
        Ok(LookupOutcome::UpstreamStatus(code)) => (
            StatusCode::OK,
            Json(json!({
                "status_code": code,
                "status": status::label(code),
            })),
        )
            .into_response(),
        Ok(LookupOutcome::Records { status_code, data }) => (
            StatusCode::OK,
            Json(json!({
                "status_code": status_code,
                "status": status::label(status_code),
                "data": data,
            })),
        )
            .into_response(),
        Err(e) => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "upstream_decode_error",
            e.to_string(),
        ),
    }
}
