use async_trait::async_trait;
use crate::{ScreeningError, WatchlistBatch};

/// Trait for anything that can produce a full set of reference lists.
///
/// Implementations recover per-feed failures themselves and only return
/// `ScreeningError::AllFeedsFailed` when nothing could be loaded.
#[async_trait]
pub trait WatchlistSource: Send + Sync {
    async fn fetch_all(&self) -> Result<WatchlistBatch, ScreeningError>;
}
