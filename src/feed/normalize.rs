//! Canonical article model and the per-item normalization fallback chains.
//!
//! Source feeds disagree about where (and whether) they carry identifiers,
//! categories, images, dates, and authors. `normalize` resolves every
//! `Article` field through a chain: structured field first, then a scrape of
//! the HTML body where that makes sense, then a hardcoded default. It is a
//! pure function and it never fails; the worst possible input still yields
//! a usable article.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::feed::parser::RawItem;

/// Category assigned when a source supplies none.
pub const DEFAULT_CATEGORY: &str = "General";

/// Attribution used when a source names no author.
pub const DEFAULT_AUTHOR: &str = "Newswire";

/// Image shown for items with no derivable image of their own.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?auto=format&fit=crop&w=2070&q=80";

static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]+src=["']([^"'>]+)["']"#).unwrap());

/// The canonical, normalized representation of one feed item.
///
/// Every field is guaranteed populated: id, title, source, author, category
/// and image_url are never empty, and `published_at` is always a concrete
/// timestamp. Articles are transient values, recomputed on every
/// aggregation pass and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    /// Raw HTML body; may be empty
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub published_at: DateTime<Utc>,
    /// Display name of the originating feed
    pub source: String,
    pub author: String,
}

/// Converts one source-native item into an [`Article`].
///
/// Pure and infallible. The only time-dependent path is the
/// `published_at` fallback to `Utc::now()` when the source supplied no
/// parseable date; every other field depends on the item alone.
pub fn normalize(item: RawItem, source_name: &str) -> Article {
    let id = resolve_id(&item);
    let image_url = resolve_image(&item);
    let category = item
        .categories
        .iter()
        .find(|c| !c.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let excerpt = item.summary.clone().unwrap_or_default();
    // The plain description is the body when no encoded variant exists
    let content = item.content.or(item.summary).unwrap_or_default();

    Article {
        id,
        title: item
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        excerpt,
        content,
        category,
        image_url,
        published_at: item.published.unwrap_or_else(Utc::now),
        source: source_name.to_string(),
        author: item
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
    }
}

/// Identifier chain: guid, else permalink, else a digest of what's left.
///
/// The digest keeps the id stable across aggregation passes for sources
/// that ship neither a guid nor a link.
fn resolve_id(item: &RawItem) -> String {
    for candidate in [item.guid.as_deref(), item.link.as_deref()] {
        if let Some(value) = candidate {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    let input = format!(
        "{}|{}|{}",
        item.title.as_deref().unwrap_or(""),
        item.summary.as_deref().unwrap_or(""),
        item.published
            .map(|p| p.timestamp().to_string())
            .unwrap_or_default()
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Image chain: structured media reference, else the first `<img src>`
/// occurrence in the body (then the summary), else the placeholder.
fn resolve_image(item: &RawItem) -> String {
    if let Some(url) = item.media_url.as_deref() {
        if !url.trim().is_empty() {
            return url.trim().to_string();
        }
    }

    for html in [item.content.as_deref(), item.summary.as_deref()]
        .into_iter()
        .flatten()
    {
        if let Some(caps) = IMG_SRC.captures(html) {
            if let Some(m) = caps.get(1) {
                return m.as_str().to_string();
            }
        }
    }

    PLACEHOLDER_IMAGE.to_string()
}
