//! Watchlist Feeds
//!
//! Fetches the sanctions and PEP reference feeds over HTTP and turns their
//! CSV payloads into `WatchlistEntry` lists. A failing feed is logged and
//! contributes nothing; the load as a whole only fails when every feed does.

pub mod client;
pub mod columns;
pub mod loader;
pub mod parser;

pub use client::FeedClient;
pub use loader::{WatchlistLoader, OFAC_CONSOLIDATED_FEED, OFAC_SDN_FEED, PEP_FEED};
pub use parser::{parse_feed, ParsedFeed};
