//! Badge source module.
//!
//! The remote JSON document is the source of truth for the catalog; it is read
//! with a single unauthenticated GET.

mod document;

pub use document::*;

use std::time::Duration;

use reqwest::Client;

use crate::errors::AppError;
use crate::models::Badge;

/// HTTP client bound to one badge source URL.
#[derive(Debug, Clone)]
pub struct BadgeSource {
    client: Client,
    url: String,
}

impl BadgeSource {
    /// Build a source for `url`. Without a timeout a stalled source keeps the fetch pending.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the full badge collection.
    pub async fn fetch(&self) -> Result<Vec<Badge>, AppError> {
        tracing::debug!("Fetching badges from {}", self.url);

        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_document(&body)
    }
}
