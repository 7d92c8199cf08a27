use reqwest::{Client, StatusCode};
use screening_core::{FeedConfig, ScreeningError};
use std::time::Duration;

const MAX_ATTEMPTS: u32 = 3;
const RATE_LIMIT_WAIT: Duration = Duration::from_secs(15);

/// HTTP client for feed downloads: bounded body size, 429 retry.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    max_bytes: usize,
    retry_wait: Duration,
}

impl FeedClient {
    pub fn new(config: &FeedConfig) -> Result<Self, ScreeningError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("refdata-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScreeningError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_bytes: config.max_feed_bytes,
            retry_wait: RATE_LIMIT_WAIT,
        })
    }

    /// Override the wait between 429 retries
    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = wait;
        self
    }

    /// Download a feed body, retrying on HTTP 429.
    pub async fn fetch(&self, feed: &str, url: &str) -> Result<Vec<u8>, ScreeningError> {
        for attempt in 0..MAX_ATTEMPTS {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| ScreeningError::fetch(feed, e))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt + 1 == MAX_ATTEMPTS {
                    break;
                }
                tracing::warn!(
                    "{} rate limited, waiting {:.1}s before retry {}/{}",
                    feed,
                    self.retry_wait.as_secs_f64(),
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(self.retry_wait).await;
                continue;
            }

            if !status.is_success() {
                return Err(ScreeningError::fetch(feed, format!("HTTP {status}")));
            }

            return self.read_body(feed, response).await;
        }

        Err(ScreeningError::fetch(
            feed,
            format!("rate limited after {MAX_ATTEMPTS} attempts"),
        ))
    }

    async fn read_body(
        &self,
        feed: &str,
        mut response: reqwest::Response,
    ) -> Result<Vec<u8>, ScreeningError> {
        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(self.too_large(feed));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ScreeningError::fetch(feed, e))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(feed));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    fn too_large(&self, feed: &str) -> ScreeningError {
        ScreeningError::fetch(
            feed,
            format!("response body exceeds {} bytes", self.max_bytes),
        )
    }
}
