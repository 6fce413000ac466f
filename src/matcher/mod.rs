// src/matcher/mod.rs
// =============================================================================
// This module holds everything that inspects a single page.
//
// Submodules:
// - scope: Is a host part of the domain being crawled?
// - keywords: Does a text fragment contain one of the target keywords?
// - html: Scans a parsed page for matches and in-scope links
//
// Nothing in here does network I/O; the crawl module feeds it parsed pages.
// =============================================================================

mod html;
mod keywords;
mod scope;

pub use html::{extract_scoped_links, find_matches, resolve_url, visible_text};
pub use keywords::{contains_keyword, KeywordMatcher};
pub use scope::{in_scope, url_in_scope};
