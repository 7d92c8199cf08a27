use anyhow::{Context, Result};
use screening_core::{FeedConfig, ScreeningConfig, DEFAULT_REFRESH_CRON};
use screening_engine::RefreshSchedule;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub feeds: FeedConfig,
    pub screening: ScreeningConfig,
    pub schedule: RefreshSchedule,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());
        let defaults = FeedConfig::default();

        let feeds = FeedConfig {
            ofac_sdn_url: get("REFDATA_OFAC_SDN_URL", &defaults.ofac_sdn_url),
            ofac_consolidated_url: get("REFDATA_OFAC_CONSOLIDATED_URL", &defaults.ofac_consolidated_url),
            pep_csv_url: get("REFDATA_PEP_CSV_URL", &defaults.pep_csv_url),
            request_timeout: Duration::from_secs(
                get("REFDATA_FETCH_TIMEOUT_SECS", "90")
                    .trim()
                    .parse()
                    .context("REFDATA_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            max_feed_bytes: get("REFDATA_MAX_FEED_BYTES", "33554432")
                .trim()
                .parse()
                .context("REFDATA_MAX_FEED_BYTES must be a byte count")?,
        };

        let screening = ScreeningConfig {
            sanction_threshold: get("SCREENING_SANCTION_THRESHOLD", "0.92")
                .trim()
                .parse()
                .context("SCREENING_SANCTION_THRESHOLD must be a number")?,
            pep_threshold: get("SCREENING_PEP_THRESHOLD", "0.90")
                .trim()
                .parse()
                .context("SCREENING_PEP_THRESHOLD must be a number")?,
            token_weight: get("SCREENING_TOKEN_WEIGHT", "0.35")
                .trim()
                .parse()
                .context("SCREENING_TOKEN_WEIGHT must be a number")?,
            max_matches: get("SCREENING_MAX_MATCHES", "10")
                .trim()
                .parse()
                .context("SCREENING_MAX_MATCHES must be a positive integer")?,
        };

        let schedule = RefreshSchedule::parse(&get("REFDATA_REFRESH_CRON", DEFAULT_REFRESH_CRON))
            .context("REFDATA_REFRESH_CRON is invalid")?;

        let config = Self {
            feeds,
            screening,
            schedule,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.feeds.validate().context("invalid feed configuration")?;
        self.screening
            .validate()
            .context("invalid screening configuration")?;
        Ok(())
    }
}
