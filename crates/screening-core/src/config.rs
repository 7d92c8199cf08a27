use crate::ScreeningError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OFAC_SDN_URL: &str = "https://www.treasury.gov/ofac/downloads/sdn.csv";
pub const DEFAULT_OFAC_CONSOLIDATED_URL: &str =
    "https://www.treasury.gov/ofac/downloads/consolidated/consolidated.csv";
pub const DEFAULT_PEP_CSV_URL: &str = "https://data.opensanctions.org/datasets/peps/latest/peps.csv";
/// Daily at 03:30:00 UTC
pub const DEFAULT_REFRESH_CRON: &str = "0 30 3 * * *";

/// Scoring parameters for a screening call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub sanction_threshold: f64, // 0.92
    pub pep_threshold: f64,      // 0.90
    /// Share of the blended score taken by token overlap
    pub token_weight: f64, // 0.35
    /// Per-category result cap
    pub max_matches: usize, // 10
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            sanction_threshold: 0.92,
            pep_threshold: 0.90,
            token_weight: 0.35,
            max_matches: 10,
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<(), ScreeningError> {
        check_unit_interval("sanction_threshold", self.sanction_threshold)?;
        check_unit_interval("pep_threshold", self.pep_threshold)?;
        check_unit_interval("token_weight", self.token_weight)?;
        if self.max_matches == 0 {
            return Err(ScreeningError::Configuration(
                "max_matches must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), ScreeningError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ScreeningError::Configuration(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Where and how to fetch the reference-data feeds.
///
/// A blank URL disables that feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub ofac_sdn_url: String,
    pub ofac_consolidated_url: String,
    pub pep_csv_url: String,
    pub request_timeout: Duration,
    /// Response bodies larger than this are rejected
    pub max_feed_bytes: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ofac_sdn_url: DEFAULT_OFAC_SDN_URL.to_string(),
            ofac_consolidated_url: DEFAULT_OFAC_CONSOLIDATED_URL.to_string(),
            pep_csv_url: DEFAULT_PEP_CSV_URL.to_string(),
            request_timeout: Duration::from_secs(90),
            max_feed_bytes: 32 * 1024 * 1024,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), ScreeningError> {
        let urls = [
            ("ofac_sdn_url", &self.ofac_sdn_url),
            ("ofac_consolidated_url", &self.ofac_consolidated_url),
            ("pep_csv_url", &self.pep_csv_url),
        ];

        if urls.iter().all(|(_, url)| url.trim().is_empty()) {
            return Err(ScreeningError::Configuration(
                "at least one feed URL must be configured".to_string(),
            ));
        }

        for (name, url) in urls {
            let url = url.trim();
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ScreeningError::Configuration(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(ScreeningError::Configuration(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        if self.max_feed_bytes == 0 {
            return Err(ScreeningError::Configuration(
                "max_feed_bytes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
