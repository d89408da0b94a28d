//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: configuration and service wiring (store + catalog client)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and the response envelope
//! - `errors.rs`: consistent error responses
//! - `external.rs`: the outbound catalog client

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use bookstack_store::StoreError;

pub mod dto;
pub mod errors;
pub mod external;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub async fn build_app(config: services::AppConfig) -> Result<Router, StoreError> {
    let services = Arc::new(services::build_services(&config).await?);

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services)))
}
