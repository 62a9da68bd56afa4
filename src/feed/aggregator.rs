//! Concurrent fan-out across all configured sources, failure isolation,
//! and the deterministic merge into one time-ordered article sequence.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::feed::fetcher::{fetch_feed, FetchError};
use crate::feed::normalize::{normalize, Article};

/// One configured feed origin: a URL plus its derived display name.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Display name used when the fetched feed declares no usable title:
    /// the URL's host component, or the raw URL if it has none.
    pub fn host_name(&self) -> String {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.url.clone())
    }
}

/// Knobs for one aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Per-source fetch deadline. A stalled source loses its contribution
    /// instead of blocking the join.
    pub timeout: Duration,
    /// Upper bound on in-flight fetches.
    pub max_concurrent: usize,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_concurrent: 8,
        }
    }
}

/// Per-source result of an aggregation pass, for diagnostics only.
///
/// `Ok` carries the number of items the source contributed; `Err` carries
/// the fetch failure that reduced it to zero.
#[derive(Debug)]
pub struct SourceOutcome {
    pub url: String,
    pub result: Result<usize, FetchError>,
}

/// Fetches every source concurrently and returns one normalized,
/// time-ordered article sequence.
///
/// Failure semantics: this function never fails. A source that errors,
/// times out, or returns garbage contributes zero articles; an empty
/// source list (or a batch where every source failed) yields an empty
/// vector, not an error.
///
/// Ordering: the result is sorted by `published_at` descending with a
/// stable sort, and per-source article lists are concatenated in the order
/// the sources were configured. Two articles with identical timestamps
/// therefore keep their configured-source relative order no matter which
/// fetch finished first.
pub async fn aggregate_all(
    client: &reqwest::Client,
    sources: &[FeedSource],
    options: &AggregateOptions,
) -> Vec<Article> {
    aggregate_all_with_report(client, sources, options).await.0
}

/// Like [`aggregate_all`], but also reports each source's outcome so
/// callers can surface per-source diagnostics.
pub async fn aggregate_all_with_report(
    client: &reqwest::Client,
    sources: &[FeedSource],
    options: &AggregateOptions,
) -> (Vec<Article>, Vec<SourceOutcome>) {
    if sources.is_empty() {
        return (Vec::new(), Vec::new());
    }

    // `buffered` (unlike `buffer_unordered`) yields results in input
    // order, which keeps the concatenation below deterministic while the
    // fetches themselves still run concurrently.
    let fetched: Vec<(usize, Result<_, FetchError>)> = stream::iter(sources.iter().enumerate())
        .map(|(index, source)| {
            let client = client.clone();
            async move {
                let result = fetch_feed(&client, &source.url, options.timeout).await;
                (index, result)
            }
        })
        .buffered(options.max_concurrent.max(1))
        .collect()
        .await;

    let mut articles = Vec::new();
    let mut outcomes = Vec::with_capacity(sources.len());

    for (index, result) in fetched {
        let source = &sources[index];
        match result {
            Ok(feed) => {
                let name = feed.title.unwrap_or_else(|| source.host_name());
                let count = feed.items.len();
                tracing::debug!(url = %source.url, source = %name, items = count, "Fetched feed");
                articles.extend(feed.items.into_iter().map(|item| normalize(item, &name)));
                outcomes.push(SourceOutcome {
                    url: source.url.clone(),
                    result: Ok(count),
                });
            }
            Err(e) => {
                tracing::warn!(url = %source.url, error = %e, "Feed fetch failed, source contributes no articles");
                outcomes.push(SourceOutcome {
                    url: source.url.clone(),
                    result: Err(e),
                });
            }
        }
    }

    sort_newest_first(&mut articles);
    (articles, outcomes)
}

/// Stable sort by publish time, newest first. Equal timestamps keep their
/// concatenation-time relative order.
fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}
