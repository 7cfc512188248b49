//! Site-specific article extractors.
//!
//! Each supported blog has its own module holding its selector rules and
//! placeholder strings. [`Site`] dispatches on the URL.
//!
//! # Supported Sources
//!
//! | Source | Module | Matched by | Missing-field placeholder |
//! |--------|--------|------------|---------------------------|
//! | Bayut blog (MyBayut) | [`bayut`] | `bayut.com` | `"no title"`, `"no date"`, ... |
//! | Property Finder blog | [`property_finder`] | `propertyfinder.ae` | `"N/A"` |
//!
//! URLs matching neither source are skipped by the extractor.

use crate::models::ArticleRecord;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};
use std::fmt;

pub mod bayut;
pub mod property_finder;

/// A blog the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Bayut,
    PropertyFinder,
}

impl Site {
    /// Recognize a URL by substring, Bayut first.
    pub fn detect(url: &str) -> Option<Site> {
        if url.contains("bayut.com") {
            Some(Site::Bayut)
        } else if url.contains("propertyfinder.ae") {
            Some(Site::PropertyFinder)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Site::Bayut => "bayut",
            Site::PropertyFinder => "propertyfinder",
        }
    }

    /// `User-Agent` header the site needs, if any.
    pub fn user_agent(&self) -> Option<&'static str> {
        match self {
            Site::Bayut => None,
            Site::PropertyFinder => Some(property_finder::USER_AGENT),
        }
    }

    /// The record written when a page for this site cannot be fetched.
    pub fn placeholders(&self) -> ArticleRecord {
        match self {
            Site::Bayut => bayut::placeholders(),
            Site::PropertyFinder => ArticleRecord::filled_with(property_finder::PLACEHOLDER),
        }
    }

    /// Parse a page body and apply this site's extraction rules.
    pub fn extract(&self, body: &str) -> ArticleRecord {
        let document = Html::parse_document(body);
        match self {
            Site::Bayut => bayut::extract(&document),
            Site::PropertyFinder => property_finder::extract(&document),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a selector known at compile time.
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// All descendant text concatenated, then trimmed.
pub(crate) fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Each descendant text node trimmed, empty ones dropped, concatenated
/// without a separator.
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<String>()
}

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("static regex compiles")
});

/// Decode HTML character references left in raw text such as `<script>` bodies.
///
/// Numeric references and the common named ones are decoded; unknown names
/// are left as written. Invalid code points become `U+FFFD`.
///
/// # Arguments
///
/// * `s` - Text that may contain `&amp;`, `&#39;`, `&#x2019;` and the like
///
/// # Returns
///
/// The decoded text.
pub(crate) fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures<'_>| {
            let name = &caps[1];
            let numeric = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                Some(u32::from_str_radix(hex, 16).ok())
            } else {
                name.strip_prefix('#').map(|dec| dec.parse::<u32>().ok())
            };
            match numeric {
                Some(code) => code
                    .and_then(char::from_u32)
                    .filter(|c| *c != '\0')
                    .unwrap_or('\u{FFFD}')
                    .to_string(),
                None => match name {
                    "amp" => "&".to_string(),
                    "lt" => "<".to_string(),
                    "gt" => ">".to_string(),
                    "quot" => "\"".to_string(),
                    "apos" => "'".to_string(),
                    "nbsp" => "\u{a0}".to_string(),
                    _ => caps[0].to_string(),
                },
            }
        })
        .into_owned()
}

/// First element matching `sel`.
pub(crate) fn first<'a>(document: &'a Html, sel: &Selector) -> Option<ElementRef<'a>> {
    document.select(sel).next()
}

/// Attribute `attr` of the first element matching `sel`.
pub(crate) fn first_attr(document: &Html, sel: &Selector, attr: &str) -> Option<String> {
    first(document, sel)
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}
