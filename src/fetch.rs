use std::sync::Arc;

use eyre::{bail, Result};
use reqwest::{Client, StatusCode};
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::ScraperConfig;

/// HTTP client with a fixed-delay retry loop.
///
/// Only a `503 Service Unavailable` response or a transport error is
/// retried. Any other non-200 status ends the loop with an error.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: Arc<ScraperConfig>,
}

impl Fetcher {
    pub fn new(config: Arc<ScraperConfig>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(config.headers.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Fetches `url`, returning the page body.
    ///
    /// `Ok(None)` means every attempt failed transiently and the caller
    /// should skip this URL.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &Url) -> Result<Option<String>> {
        let max_retries = self.config.max_retries;
        let retry_delay = self.config.retry_delay;

        for attempt in 1..=max_retries {
            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    info!(%status, attempt, "Received response");
                    match status {
                        StatusCode::OK => match response.text().await {
                            Ok(body) => return Ok(Some(body)),
                            Err(e) => error!(error = %e, attempt, "Failed to read body"),
                        },
                        StatusCode::SERVICE_UNAVAILABLE => {
                            warn!(attempt, "Service temporarily unavailable (503)");
                        }
                        _ => bail!("Failed to fetch data from {}. Status code: {}", url, status),
                    }
                }
                Err(e) => error!(error = %e, attempt, "Request failed"),
            }

            if attempt < max_retries {
                warn!(delay = ?retry_delay, "Retrying");
                tokio::time::sleep(retry_delay).await;
            }
        }

        error!(max_retries, "Maximum retries reached, skipping");
        Ok(None)
    }
}
