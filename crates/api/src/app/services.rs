//! Configuration and service wiring.

use bookstack_store::{Store, StoreError};

use crate::app::external::CatalogClient;

const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
const DEFAULT_EXTERNAL_BOOKS_URL: &str = "https://www.anapioficeandfire.com/api/books";

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub external_books_url: String,
}

impl AppConfig {
    /// Read configuration from environment variables, falling back to dev
    /// defaults.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!("DATABASE_URL not set; using in-memory SQLite database");
            DEFAULT_DATABASE_URL.to_string()
        });
        let external_books_url =
            std::env::var("EXTERNAL_BOOKS_URL").unwrap_or_else(|_| DEFAULT_EXTERNAL_BOOKS_URL.to_string());
        Self {
            database_url,
            external_books_url,
        }
    }
}

/// Shared per-process services handed to every handler.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub store: Store,
    pub catalog: CatalogClient,
}

/// Connect the store and construct the outbound catalog client.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store = Store::connect(&config.database_url).await?;
    let catalog = CatalogClient::new(config.external_books_url.clone());
    Ok(AppServices { store, catalog })
}
