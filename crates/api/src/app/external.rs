//! Outbound client for the external book catalog.

use serde_json::Value;

use bookstack_core::catalog;

/// Outcome of an external catalog lookup, before envelope mapping.
#[derive(Debug)]
pub enum LookupOutcome {
    /// The outbound request never reached the upstream (connectivity).
    Offline,
    /// Upstream answered with a non-2xx status.
    UpstreamStatus(u16),
    /// Upstream records, already reshaped for our wire format.
    Records { status_code: u16, data: Vec<Value> },
}

/// Thin reqwest wrapper around the external catalog's book listing.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Query the catalog by book name. An empty name returns the upstream's
    /// unfiltered listing (upstream behavior, not ours).
    ///
    /// Connectivity failures and non-2xx statuses are data, not errors, so
    /// the handler can map them to their (quirky) response bodies. `Err` is
    /// reserved for an upstream body that does not decode as JSON.
    pub async fn search(&self, name: &str) -> Result<LookupOutcome, reqwest::Error> {
        let response = match self
            .http
            .get(&self.base_url)
            .query(&[("name", name)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, "external catalog unreachable");
                return Ok(LookupOutcome::Offline);
            }
        };

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            return Ok(LookupOutcome::UpstreamStatus(status_code));
        }

        let mut records: Vec<Value> = response.json().await?;
        catalog::reshape_records(&mut records);
        Ok(LookupOutcome::Records {
            status_code,
            data: records,
        })
    }
}
