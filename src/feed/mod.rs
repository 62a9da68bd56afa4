//! The feed aggregation pipeline.
//!
//! The stages, leaf-first:
//!
//! - [`parser`] - RSS/Atom documents into the source-native [`parser::RawItem`] shape
//! - [`fetcher`] - HTTP retrieval of one source with a bounded deadline
//! - [`normalize`] - source-native items into canonical [`Article`]s via fallback chains
//! - [`aggregator`] - concurrent fan-out over all sources, merge, deterministic sort
//!
//! A source that fails at any stage contributes zero articles; the
//! aggregate itself never fails.

pub mod aggregator;
pub mod fetcher;
pub mod normalize;
pub mod parser;

pub use aggregator::{aggregate_all, aggregate_all_with_report, AggregateOptions, FeedSource, SourceOutcome};
pub use fetcher::{fetch_feed, FetchError};
pub use normalize::{normalize, Article, DEFAULT_AUTHOR, DEFAULT_CATEGORY, PLACEHOLDER_IMAGE};
pub use parser::{parse_feed, RawFeed, RawItem};
