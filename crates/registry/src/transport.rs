//! Index-fetching abstraction so client logic is unit-testable without a
//! real HTTP round trip (mirrors `cforge_process::ProcessSpawn`).

use async_trait::async_trait;
use cforge_errors::{Error, RegistryError};
use std::time::Duration;

#[async_trait]
pub trait IndexTransport: Send + Sync {
    /// Fetch the raw index document from `url`.
    async fn fetch(&self, url: &str) -> Result<String, Error>;
}

/// Production transport backed by `reqwest`, with connection pooling and a
/// small bounded retry-with-backoff loop (mirroring the ecosystem's own
/// HTTP client patterns).
pub struct ReqwestTransport {
    client: reqwest::Client,
    retries: u32,
}

impl ReqwestTransport {
    /// # Errors
    /// Returns an internal error if the underlying `reqwest::Client` cannot
    /// be built.
    pub fn new(timeout: Duration, retries: u32) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cforge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::internal(e.to_string()))?;
        Ok(Self { client, retries })
    }
}

#[async_trait]
impl IndexTransport for ReqwestTransport {
    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let mut last_error = None;
        for attempt in 0..=self.retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(250) * attempt).await;
            }
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.text().await.map_err(|e| {
                        RegistryError::RefreshFailed {
                            url: url.to_string(),
                            message: e.to_string(),
                        }
                        .into()
                    });
                }
                Ok(response) => {
                    last_error = Some(format!("HTTP {}", response.status()));
                }
                Err(e) => {
                    last_error = Some(e.to_string());
                }
            }
        }
        Err(RegistryError::RefreshFailed {
            url: url.to_string(),
            message: last_error.unwrap_or_else(|| "unknown error".to_string()),
        }
        .into())
    }
}
