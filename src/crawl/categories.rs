// src/crawl/categories.rs
// =============================================================================
// Discovers the fallback "category" sections of a site from its homepage.
//
// If the main domain has no keyword mentions, the crawl moves on to the
// site's sections one by one. Three sections are the most likely places for
// partner mentions, so they are always tried first, in this order:
//   travel, blog, resources
// Every other `/category/<name>` link on the homepage is appended after them
// in the order it was discovered.
// =============================================================================

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

use crate::error::CrawlError;
use crate::matcher::visible_text;

/// Well-known sections, in fallback priority order
pub const PRIORITY_CATEGORIES: [&str; 3] = ["travel", "blog", "resources"];

/// A site section to crawl when the main domain yields nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub url: String,
}

impl Category {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn category_segment() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/category/([^/?#]+)").expect("static regex"))
}

fn is_skipped_href(href: &str) -> bool {
    href.is_empty()
        || href.starts_with("javascript:")
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
}

// Does this anchor point at the well-known section `name`?
//
// The name has to show up in the href or the link text, and the href has
// to look like a section path: /category/..., /<name>/... or .../<name>
fn points_at(name: &str, href: &str, text: &str) -> bool {
    let mentions = href.contains(name) || text.contains(name);
    let section_path = href.contains("/category/")
        || href.contains(&format!("/{}/", name))
        || href.ends_with(&format!("/{}", name));

    mentions && section_path
}

// Extracts the ordered list of fallback categories from a page
//
// Parameters:
//   document: the parsed homepage
//   base_url: the page's URL, used to resolve relative hrefs
//
// Returns: well-known categories first (travel, blog, resources - only the
// ones found), then every other /category/<segment> in discovery order.
// The first link found for a name wins.
pub fn extract_categories(document: &Html, base_url: &str) -> Result<Vec<Category>, CrawlError> {
    let base = Url::parse(base_url).map_err(|source| CrawlError::CategoryBase {
        url: base_url.to_string(),
        source,
    })?;

    let anchors = Selector::parse("a[href]").expect("static selector");

    let mut well_known: [Option<String>; 3] = [None, None, None];
    let mut others: Vec<Category> = Vec::new();
    let mut other_names: HashSet<String> = HashSet::new();

    for element in document.select(&anchors) {
        let raw_href = element.value().attr("href").unwrap_or("").trim();
        let href = raw_href.to_lowercase();
        let text = visible_text(&element).to_lowercase();

        if is_skipped_href(&href) {
            continue;
        }

        let Ok(absolute) = base.join(raw_href) else {
            continue;
        };

        for (slot, name) in well_known.iter_mut().zip(PRIORITY_CATEGORIES) {
            if slot.is_none() && points_at(name, &href, &text) {
                *slot = Some(absolute.to_string());
            }
        }

        if let Some(captures) = category_segment().captures(&href) {
            let segment = captures[1].to_string();
            if !PRIORITY_CATEGORIES.contains(&segment.as_str()) && other_names.insert(segment.clone()) {
                others.push(Category::new(segment, absolute.to_string()));
            }
        }
    }

    let mut categories: Vec<Category> = PRIORITY_CATEGORIES
        .iter()
        .zip(well_known)
        .filter_map(|(name, url)| url.map(|url| Category::new(*name, url)))
        .collect();
    categories.extend(others);

    Ok(categories)
}
