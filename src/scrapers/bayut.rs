//! MyBayut blog article extractor.
//!
//! Bayut blog pages are WordPress posts with a Yoast SEO schema block.
//! Missing fields get a descriptive `"no ..."` placeholder.
//!
//! The HTML parser already decodes character references in text and
//! attributes. Script bodies are raw text, so the schema graph is decoded
//! explicitly.

use super::{decode_entities, first, first_attr, selector, stripped_text, trimmed_text};
use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;

static TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.entry-title"));
static PUBLISH_DATE: Lazy<Selector> = Lazy::new(|| selector("div.publishing-date"));
static META_DESCRIPTION: Lazy<Selector> = Lazy::new(|| selector(r#"meta[name="description"]"#));
static CANONICAL: Lazy<Selector> = Lazy::new(|| selector(r#"link[rel="canonical"]"#));
static CONTENT_BLOCKS: Lazy<Selector> = Lazy::new(|| {
    selector(
        "article .entry-content p, article .entry-content h1, article .entry-content h2, \
         article .entry-content h3, article .entry-content h4, article .entry-content h5, \
         article .entry-content h6, article .entry-content ul, article .entry-content ol, \
         article .entry-content li",
    )
});
static SCHEMA_GRAPH: Lazy<Selector> =
    Lazy::new(|| selector("script.yoast-schema-graph.yoast-schema-graph--main"));

/// The record used for fields a Bayut page lacks, and for pages that could
/// not be fetched at all.
pub fn placeholders() -> ArticleRecord {
    ArticleRecord {
        title: "no title".to_string(),
        publish_date: "no date".to_string(),
        meta_description: "no description".to_string(),
        canonical_link: "no link".to_string(),
        article_content: "no content".to_string(),
        yoast_schema_graph: "no schema graph".to_string(),
    }
}

/// Extract an article from a parsed MyBayut page.
///
/// # Arguments
///
/// * `document` - The parsed page
///
/// # Returns
///
/// A record with every field filled, either from the page or from
/// [`placeholders`]. Content blocks are joined with a single space.
pub fn extract(document: &Html) -> ArticleRecord {
    let fallback = placeholders();

    let title = first(document, &TITLE)
        .map(trimmed_text)
        .unwrap_or(fallback.title);
    let publish_date = first(document, &PUBLISH_DATE)
        .map(|el| trimmed_text(el).replace("Published: ", ""))
        .unwrap_or(fallback.publish_date);
    let meta_description =
        first_attr(document, &META_DESCRIPTION, "content").unwrap_or(fallback.meta_description);
    let canonical_link = first_attr(document, &CANONICAL, "href").unwrap_or(fallback.canonical_link);

    let blocks: Vec<String> = document.select(&CONTENT_BLOCKS).map(stripped_text).collect();
    let article_content = if blocks.is_empty() {
        fallback.article_content
    } else {
        blocks.join(" ")
    };

    let yoast_schema_graph = first(document, &SCHEMA_GRAPH)
        .map(|el| decode_entities(&el.text().collect::<String>()))
        .unwrap_or(fallback.yoast_schema_graph);

    debug!(%title, blocks = blocks.len(), "Extracted Bayut article");
    ArticleRecord {
        title,
        publish_date,
        meta_description,
        canonical_link,
        article_content,
        yoast_schema_graph,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html><head>
<meta name="description" content="Everything about living in JVC &amp; nearby.">
<link rel="canonical" href="https://www.bayut.com/mybayut/living-in-jvc/">
<script type="application/ld+json" class="yoast-schema-graph yoast-schema-graph--main">{"@graph":[]}</script>
</head><body>
<article>
  <h1 class="entry-title">  Living in JVC  </h1>
  <div class="publishing-date">Published: May 6, 2025</div>
  <div class="entry-content">
    <h2>Overview</h2>
    <p>JVC is a <strong>family</strong> community.</p>
    <ul><li>Parks</li></ul>
  </div>
</article>
</body></html>"#;

    #[test]
    fn test_extracts_all_fields() {
        let record = extract(&Html::parse_document(PAGE));
        assert_eq!(record.title, "Living in JVC");
        assert_eq!(record.publish_date, "May 6, 2025");
        assert_eq!(record.meta_description, "Everything about living in JVC & nearby.");
        assert_eq!(record.canonical_link, "https://www.bayut.com/mybayut/living-in-jvc/");
        assert_eq!(record.yoast_schema_graph, r#"{"@graph":[]}"#);
        // h2, p, ul and li are each collected in document order.
        assert_eq!(
            record.article_content,
            "Overview JVC is afamilycommunity. Parks Parks"
        );
    }

    #[test]
    fn test_schema_graph_entities_decoded() {
        let page = r#"<html><head>
<script type="application/ld+json" class="yoast-schema-graph yoast-schema-graph--main">{"name":"Sales &amp; Rentals","headline":"JVC&#8217;s parks"}</script>
</head><body></body></html>"#;
        let record = extract(&Html::parse_document(page));
        assert_eq!(
            record.yoast_schema_graph,
            "{\"name\":\"Sales & Rentals\",\"headline\":\"JVC\u{2019}s parks\"}"
        );
    }

    #[test]
    fn test_missing_fields_use_placeholders() {
        let record = extract(&Html::parse_document("<html><body><p>nothing</p></body></html>"));
        assert_eq!(record, placeholders());
    }
}
