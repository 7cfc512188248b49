//! Property Finder blog article extractor.
//!
//! Property Finder rejects the default client user agent, so requests carry a
//! desktop browser string. Every missing field becomes `"N/A"`.

use super::{first, first_attr, selector, stripped_text, trimmed_text};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

pub const PLACEHOLDER: &str = "N/A";

static TITLE: Lazy<Selector> = Lazy::new(|| selector("h1"));
static POST_DATE: Lazy<Selector> = Lazy::new(|| selector("p.post-date"));
static CONTENT: Lazy<Selector> = Lazy::new(|| selector(".entry-content"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static CANONICAL: Lazy<Selector> = Lazy::new(|| selector(r#"link[rel="canonical"]"#));
static SCHEMA_GRAPH: Lazy<Selector> =
    Lazy::new(|| selector(r#"script.yoast-schema-graph[type="application/ld+json"]"#));

pub fn extract(document: &Html) -> ArticleRecord {
    let or_placeholder = |value: Option<String>| value.unwrap_or_else(|| PLACEHOLDER.to_string());

    let title = or_placeholder(first(document, &TITLE).map(trimmed_text));
    let publish_date = or_placeholder(first(document, &POST_DATE).map(trimmed_text));
    let article_content = or_placeholder(first(document, &CONTENT).map(stripped_text));
    let meta_description = or_placeholder(first_attr(document, &META_DESCRIPTION, "content"));
    let canonical_link = or_placeholder(first_attr(document, &CANONICAL, "href"));
    let yoast_schema_graph = or_placeholder(
        first(document, &SCHEMA_GRAPH).map(|el| el.text().collect::<String>().trim().to_string()),
    );

    debug!(%title, content_bytes = article_content.len(), "Extracted Property Finder article");
    ArticleRecord {
        title,
        publish_date,
        meta_description,
        canonical_link,
        article_content,
        yoast_schema_graph,
    }
}
