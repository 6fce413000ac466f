// src/matcher/html.rs
// =============================================================================
// Reads a parsed HTML page: what text it contains and where it links to.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Two jobs live here:
// 1. Scan the page's candidate fragments (hrefs, element text, meta
//    description) with the keyword matcher
// 2. Extract every anchor as an absolute URL, keeping only in-scope links
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use super::keywords::KeywordMatcher;
use super::scope::url_in_scope;
use crate::crawl::{MatchRecord, MatchType};

// Elements whose href and visible text are checked for keywords
const CONTENT_SELECTOR: &str = "a, div, section, title, main, article";
const META_DESCRIPTION_SELECTOR: &str = r#"meta[name="description"]"#;
const ANCHOR_SELECTOR: &str = "a[href]";

/// Fragments up to this length are stored whole as match context
const SHORT_CONTEXT_CHARS: usize = 50;
/// Longer fragments are cut to this many characters
const MAX_CONTEXT_CHARS: usize = 200;

// The selectors above are constants and known to be valid
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Visible text of an element: every text node trimmed, blanks dropped,
/// joined with single spaces
pub fn visible_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Context stored with a match: whole fragment if short, else its first 200 chars
pub fn match_context(fragment: &str) -> String {
    if fragment.chars().count() > SHORT_CONTEXT_CHARS {
        fragment.chars().take(MAX_CONTEXT_CHARS).collect()
    } else {
        fragment.to_string()
    }
}

// Runs the keyword matcher over every candidate fragment of a page
//
// Parameters:
//   document: the parsed page
//   page_url: the final URL of the page (recorded as the match source)
//   matcher: compiled keywords
//
// Returns: one MatchRecord per matching fragment, in document order
//
// A page can produce several records, e.g. a matching <a> nested in a
// matching <div> yields a record for each.
pub fn find_matches(document: &Html, page_url: &str, matcher: &KeywordMatcher) -> Vec<MatchRecord> {
    let mut matches = Vec::new();

    for element in document.select(&selector(CONTENT_SELECTOR)) {
        if let Some(href) = element.value().attr("href") {
            if matcher.contains_keyword(href) {
                matches.push(MatchRecord::new(page_url, MatchType::UrlMatch, match_context(href)));
            }
        }

        let text = visible_text(&element);
        if matcher.contains_keyword(&text) {
            matches.push(MatchRecord::new(page_url, MatchType::ContentMatch, match_context(&text)));
        }
    }

    if let Some(meta) = document.select(&selector(META_DESCRIPTION_SELECTOR)).next() {
        if let Some(content) = meta.value().attr("content") {
            if matcher.contains_keyword(content) {
                matches.push(MatchRecord::new(
                    page_url,
                    MatchType::MetaContentMatch,
                    match_context(content),
                ));
            }
        }
    }

    matches
}

// Extracts the in-scope links of a page that have not been visited yet
//
// Parameters:
//   document: the parsed page
//   base: the final URL of the page (for resolving relative links)
//   main_domain: the domain being crawled
//   visited: URLs already fetched in this crawl
//
// Returns: absolute URLs in document order (duplicates are possible;
// the frontier discards already-visited entries when they are popped)
pub fn extract_scoped_links(
    document: &Html,
    base: &Url,
    main_domain: &str,
    visited: &HashSet<String>,
) -> Vec<String> {
    let mut links = Vec::new();

    for element in document.select(&selector(ANCHOR_SELECTOR)) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute) = resolve_url(base, href) else {
            continue;
        };

        if url_in_scope(&absolute, main_domain) {
            let absolute = absolute.to_string();
            if !visited.contains(&absolute) {
                links.push(absolute);
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute URL
//
// Every href is resolved, fragments included: "#main" on
// "https://example.com/" becomes "https://example.com/#main". Schemes
// without a host (mailto:, tel:, javascript:) resolve but never pass the
// scope check.
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}
