//! Remote constraint sources.
//!
//! Constraints can be fetched once from a remote location, typically an HTTP
//! endpoint serving the constraint map as JSON. The fetch itself is abstracted
//! behind [`ConstraintSource`] so that the loading protocol of
//! [`crate::FieldValidator::load_from_source`] does not depend on the transport.

use crate::LoadError;
use constraints_core::ConstraintMap;
use std::future::Future;
use tracing::debug;

/// Something constraints can be fetched from.
pub trait ConstraintSource {
    /// Human-readable description of the source, used in logs.
    fn describe(&self) -> String;

    /// Fetches the complete constraint map.
    fn fetch(&self) -> impl Future<Output = Result<ConstraintMap, LoadError>> + Send;
}

/// Fetches constraints with a single HTTP GET.
///
/// The response must have a success status and a JSON body shaped like a
/// constraint map.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Creates a source for `url` with a default client.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Creates a source for `url` using an existing client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Returns the URL constraints are fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ConstraintSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<ConstraintMap, LoadError> {
        debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| LoadError::http(&self.url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::http(&self.url, e.to_string()))?;

        parse_body(&self.url, &body)
    }
}

/// Parses a response body as a constraint map.
pub fn parse_body(origin: &str, body: &str) -> Result<ConstraintMap, LoadError> {
    serde_json::from_str(body).map_err(|e| LoadError::body(origin, e.to_string()))
}
