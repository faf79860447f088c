//! Version index provider
//!
//! The coordinator only needs one question answered: which versions of a
//! package have ever been published. The `VersionIndex` trait is that seam;
//! the PyPI implementation reads the keys of the `releases` map from
//! `https://pypi.org/pypi/{package}/json`. A 404 is `PackageNotFound`,
//! which is not the same thing as a package with zero releases.

use crate::error::IndexError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// A source of published version lists
#[async_trait]
pub trait VersionIndex: Send + Sync {
    /// Human-readable index name for messages
    fn index_name(&self) -> &'static str;

    /// All published versions of `package`, unordered raw strings
    async fn list_versions(&self, package: &str) -> Result<Vec<String>, IndexError>;
}

/// PyPI JSON API implementation
pub struct PyPiIndex {
    client: reqwest::Client,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPiResponse {
    /// Release metadata keyed by version; only the keys matter here
    releases: HashMap<String, serde_json::Value>,
}

impl PyPiIndex {
    /// Creates an index client against pypi.org
    pub fn new() -> Self {
        Self::with_base_url(PYPI_API_URL)
    }

    /// Creates an index client against a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, package)
    }
}

impl Default for PyPiIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VersionIndex for PyPiIndex {
    fn index_name(&self) -> &'static str {
        "PyPI"
    }

    async fn list_versions(&self, package: &str) -> Result<Vec<String>, IndexError> {
        let url = self.build_url(package);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IndexError::network(package, self.index_name(), e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(IndexError::package_not_found(package, self.index_name()));
        }
        if !response.status().is_success() {
            return Err(IndexError::network(
                package,
                self.index_name(),
                format!("HTTP {}", response.status()),
            ));
        }

        let payload: PyPiResponse = response
            .json()
            .await
            .map_err(|e| IndexError::invalid_response(package, self.index_name(), e.to_string()))?;

        Ok(payload.releases.into_keys().collect())
    }
}
