use crate::client::FeedClient;
use crate::parser::{parse_feed, ParsedFeed};
use async_trait::async_trait;
use screening_core::{EntryKind, FeedConfig, ScreeningError, WatchlistBatch, WatchlistSource};
use std::time::Instant;

pub const OFAC_SDN_FEED: &str = "OFAC:SDN";
pub const OFAC_CONSOLIDATED_FEED: &str = "OFAC:Consolidated";
pub const PEP_FEED: &str = "PEP";

enum FeedOutcome {
    Disabled,
    Loaded(ParsedFeed),
    Failed(ScreeningError),
}

/// Loads both reference lists from the configured CSV feeds.
pub struct WatchlistLoader {
    client: FeedClient,
    config: FeedConfig,
}

impl WatchlistLoader {
    pub fn new(config: FeedConfig) -> Result<Self, ScreeningError> {
        config.validate()?;
        let client = FeedClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// Use a preconfigured client (custom retry wait, shared connection pool)
    pub fn with_client(config: FeedConfig, client: FeedClient) -> Result<Self, ScreeningError> {
        config.validate()?;
        Ok(Self { client, config })
    }

    async fn load_feed(&self, feed: &'static str, kind: EntryKind, url: &str) -> FeedOutcome {
        let url = url.trim();
        if url.is_empty() {
            tracing::debug!("{} feed disabled (no URL configured)", feed);
            return FeedOutcome::Disabled;
        }

        let started = Instant::now();
        let result = async {
            let bytes = self.client.fetch(feed, url).await?;
            let size = bytes.len();
            // CSV parsing of multi-megabyte payloads stays off the async workers
            let parsed = tokio::task::spawn_blocking(move || parse_feed(&bytes, feed, kind))
                .await
                .map_err(|e| ScreeningError::parse(feed, e))??;
            Ok::<_, ScreeningError>((parsed, size))
        }
        .await;

        match result {
            Ok((parsed, size)) => {
                tracing::info!(
                    "{} loaded: {} entries, {} rows skipped, {} bytes in {:.1}s",
                    feed,
                    parsed.entries.len(),
                    parsed.skipped,
                    size,
                    started.elapsed().as_secs_f64()
                );
                FeedOutcome::Loaded(parsed)
            }
            Err(e) => {
                tracing::warn!("{} failed, contributing no entries: {}", feed, e);
                FeedOutcome::Failed(e)
            }
        }
    }
}

#[async_trait]
impl WatchlistSource for WatchlistLoader {
    async fn fetch_all(&self) -> Result<WatchlistBatch, ScreeningError> {
        let (sdn, consolidated, peps) = tokio::join!(
            self.load_feed(OFAC_SDN_FEED, EntryKind::Sanction, &self.config.ofac_sdn_url),
            self.load_feed(
                OFAC_CONSOLIDATED_FEED,
                EntryKind::Sanction,
                &self.config.ofac_consolidated_url
            ),
            self.load_feed(PEP_FEED, EntryKind::Pep, &self.config.pep_csv_url),
        );

        let mut batch = WatchlistBatch::default();
        let mut failures = Vec::new();
        let mut enabled = 0;

        for (outcome, kind) in [
            (sdn, EntryKind::Sanction),
            (consolidated, EntryKind::Sanction),
            (peps, EntryKind::Pep),
        ] {
            match outcome {
                FeedOutcome::Disabled => {}
                FeedOutcome::Loaded(parsed) => {
                    enabled += 1;
                    match kind {
                        EntryKind::Sanction => batch.sanctions.extend(parsed.entries),
                        EntryKind::Pep => batch.peps.extend(parsed.entries),
                    }
                }
                FeedOutcome::Failed(e) => {
                    enabled += 1;
                    failures.push(e);
                }
            }
        }

        if failures.len() == enabled {
            return Err(ScreeningError::AllFeedsFailed { failures });
        }

        if !failures.is_empty() {
            tracing::warn!(
                "Partial watchlist load: {} of {} feeds failed",
                failures.len(),
                enabled
            );
        }

        Ok(batch)
    }
}
