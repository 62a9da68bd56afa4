use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

/// One feed entry in its source-native shape.
///
/// Feeds are not schema-consistent: depending on the dialect, any of these
/// fields may be missing, empty, or spelled differently at the XML level.
/// All dialect-specific extraction happens here, so downstream code never
/// branches on feed kind. The normalizer resolves the remaining gaps with
/// fallback chains.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    /// Source-declared unique identifier (guid / atom id)
    pub guid: Option<String>,
    /// Permalink to the item
    pub link: Option<String>,
    pub title: Option<String>,
    /// Short summary (RSS description / atom summary)
    pub summary: Option<String>,
    /// Full HTML body. `feed-rs` prefers the richer `content:encoded`
    /// variant over a plain description when both are present.
    pub content: Option<String>,
    pub categories: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    /// Item creator (dc:creator / atom author)
    pub author: Option<String>,
    /// Structured media reference (media:content / media:thumbnail)
    pub media_url: Option<String>,
}

/// A fetched feed document reduced to the fields the pipeline consumes.
#[derive(Debug, Clone, Default)]
pub struct RawFeed {
    pub title: Option<String>,
    pub link: Option<String>,
    pub items: Vec<RawItem>,
}

/// Parses RSS/Atom bytes into a [`RawFeed`].
///
/// Returns an error only for documents that cannot be parsed at all;
/// individual entries with missing fields come back as `None`-holed
/// [`RawItem`]s rather than being dropped.
pub fn parse_feed(bytes: &[u8]) -> Result<RawFeed> {
    // feed-rs invents an id for guid-less entries (a content hash, or a
    // random UUID when there is nothing to hash), which would shadow the
    // guid -> permalink -> digest chain and change ids between passes.
    // An empty id maps to `guid: None` below, so the normalizer's own
    // chain stays in charge.
    let feed = parser::Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build()
        .parse(bytes)?;

    let title = feed.title.map(|t| t.content).and_then(non_empty);
    let link = feed.links.first().map(|l| l.href.clone());
    let items = feed.entries.into_iter().map(raw_item).collect();

    Ok(RawFeed { title, link, items })
}

fn raw_item(entry: feed_rs::model::Entry) -> RawItem {
    let link = entry.links.first().map(|l| l.href.clone());

    // media:content URL first, media:thumbnail as the structured fallback
    let media_url = entry.media.iter().find_map(|m| {
        m.content
            .iter()
            .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
            .or_else(|| m.thumbnails.first().map(|t| t.image.uri.clone()))
    });

    RawItem {
        guid: non_empty(entry.id),
        link,
        title: entry.title.map(|t| t.content).and_then(non_empty),
        summary: entry.summary.map(|s| s.content),
        content: entry.content.and_then(|c| c.body),
        categories: entry
            .categories
            .into_iter()
            .filter_map(|c| non_empty(c.label.unwrap_or(c.term)))
            .collect(),
        published: entry.published.or(entry.updated),
        author: entry
            .authors
            .into_iter()
            .next()
            .and_then(|p| non_empty(p.name)),
        media_url,
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rss_item_fields() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/">
<channel>
    <title>Example Times</title>
    <link>https://example.com</link>
    <item>
        <guid>https://example.com/posts/1</guid>
        <link>https://example.com/posts/1</link>
        <title>First Post</title>
        <description>A short summary</description>
        <content:encoded><![CDATA[<p>Full body</p>]]></content:encoded>
        <category>Business</category>
        <category>Economy</category>
        <dc:creator>Ama Serwah</dc:creator>
        <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
        <media:content url="https://example.com/img/1.jpg" medium="image"/>
    </item>
</channel></rss>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(feed.title.as_deref(), Some("Example Times"));
        // feed-rs normalizes the channel link with a trailing slash
        assert_eq!(feed.link.as_deref(), Some("https://example.com/"));
        assert_eq!(feed.items.len(), 1);

        let item = &feed.items[0];
        assert_eq!(item.guid.as_deref(), Some("https://example.com/posts/1"));
        assert_eq!(item.link.as_deref(), Some("https://example.com/posts/1"));
        assert_eq!(item.title.as_deref(), Some("First Post"));
        assert_eq!(item.summary.as_deref(), Some("A short summary"));
        assert_eq!(item.content.as_deref(), Some("<p>Full body</p>"));
        assert_eq!(item.categories, vec!["Business", "Economy"]);
        assert_eq!(item.author.as_deref(), Some("Ama Serwah"));
        assert_eq!(
            item.media_url.as_deref(),
            Some("https://example.com/img/1.jpg")
        );
        assert_eq!(
            item.published,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_minimal_item_yields_none_fields() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Sparse Feed</title>
    <item><title>Only a title</title></item>
</channel></rss>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();
        let item = &feed.items[0];
        assert_eq!(item.title.as_deref(), Some("Only a title"));
        assert_eq!(item.guid, None);
        assert_eq!(item.link, None);
        assert_eq!(item.author, None);
        assert_eq!(item.media_url, None);
        assert_eq!(item.published, None);
        assert!(item.categories.is_empty());
    }

    #[test]
    fn test_guidless_item_ids_are_stable_across_parses() {
        // Without a guid the item must come back with `guid: None` on
        // every parse (no synthesized id), so downstream id resolution
        // lands on the permalink and stays identical between passes.
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Linked Feed</title>
    <item><title>T</title><link>https://example.com/story</link></item>
</channel></rss>"#;

        let first = parse_feed(xml.as_bytes()).unwrap();
        let second = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(first.items[0].guid, None);
        assert_eq!(second.items[0].guid, None);

        let id_a = crate::feed::normalize(first.items[0].clone(), "S").id;
        let id_b = crate::feed::normalize(second.items[0].clone(), "S").id;
        assert_eq!(id_a, "https://example.com/story");
        assert_eq!(id_a, id_b);
    }

    #[test]
    fn test_guidless_linkless_item_ids_are_stable_across_parses() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Bare Feed</title>
    <item><title>Orphan</title></item>
</channel></rss>"#;

        let first = parse_feed(xml.as_bytes()).unwrap();
        let second = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(first.items[0].guid, None);

        // Digest fallback depends on item fields only, never on the parse
        let id_a = crate::feed::normalize(first.items[0].clone(), "S").id;
        let id_b = crate::feed::normalize(second.items[0].clone(), "S").id;
        assert_eq!(id_a, id_b);
        assert_eq!(id_a.len(), 64);
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Empty</title></channel></rss>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert!(feed.items.is_empty());
    }

    #[test]
    fn test_parse_untitled_feed_has_no_title() {
        // A whitespace-only title must not count as a display name
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>   </title></channel></rss>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(feed.title, None);
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_feed(b"<not a feed").is_err());
    }

    #[test]
    fn test_updated_date_used_when_published_missing() {
        let xml = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Feed</title>
    <entry>
        <id>urn:1</id>
        <title>Entry</title>
        <updated>2024-02-02T12:00:00Z</updated>
    </entry>
</feed>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(
            feed.items[0].published,
            Some(Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 0).unwrap())
        );
    }
}
