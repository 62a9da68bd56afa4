//! newswire — multi-source feed aggregation.
//!
//! Fetches a configured list of syndication feeds concurrently, normalizes
//! their divergent item shapes into one canonical [`Article`] model, and
//! returns a single sequence sorted newest-first. Sources are unreliable
//! by assumption: a feed that is down, slow, or malformed contributes zero
//! articles instead of failing the batch.
//!
//! ```no_run
//! use newswire::{aggregate_all, AggregateOptions, FeedSource};
//!
//! # async fn run() {
//! let client = reqwest::Client::new();
//! let sources = vec![FeedSource::new("https://example.com/feed.xml")];
//! let articles = aggregate_all(&client, &sources, &AggregateOptions::default()).await;
//! # }
//! ```

pub mod config;
pub mod feed;
pub mod util;

pub use config::{Config, ConfigError};
pub use feed::{
    aggregate_all, aggregate_all_with_report, normalize, AggregateOptions, Article, FeedSource,
    FetchError, RawFeed, RawItem, SourceOutcome,
};
pub use util::validate_url;
