use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreeningError {
    #[error("Feed fetch error ({feed}): {reason}")]
    FeedFetch { feed: String, reason: String },

    #[error("Feed parse error ({feed}): {reason}")]
    FeedParse { feed: String, reason: String },

    #[error("All watchlist feeds failed: {}", join_failures(.failures))]
    AllFeedsFailed { failures: Vec<ScreeningError> },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ScreeningError {
    pub fn fetch(feed: &str, reason: impl ToString) -> Self {
        ScreeningError::FeedFetch {
            feed: feed.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(feed: &str, reason: impl ToString) -> Self {
        ScreeningError::FeedParse {
            feed: feed.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Feed identifier for per-feed errors, `None` otherwise.
    pub fn feed(&self) -> Option<&str> {
        match self {
            ScreeningError::FeedFetch { feed, .. } | ScreeningError::FeedParse { feed, .. } => {
                Some(feed)
            }
            _ => None,
        }
    }
}

fn join_failures(failures: &[ScreeningError]) -> String {
    if failures.is_empty() {
        return "no feeds attempted".to_string();
    }
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
