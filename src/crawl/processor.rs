// src/crawl/processor.rs
// =============================================================================
// Processes one URL: the unit of work the crawl repeats.
//
// Steps:
// 1. Skip the URL if it was already visited, otherwise mark it visited
//    (before fetching, so a failed fetch is never retried)
// 2. Fetch it; transport errors and non-2xx statuses are logged dead ends
// 3. Non-HTML responses are silent dead ends
// 4. If a redirect left the domain, log a skip and stop here
// 5. Parse the HTML, record keyword matches, collect in-scope links
//
// Nothing in here fails the crawl: every problem is a logged dead end.
// =============================================================================

use scraper::Html;
use std::collections::HashSet;
use std::time::Instant;
use url::Url;

use super::fetch::PageFetcher;
use super::results::{MatchType, ResultCollector};
use super::status::{StatusKind, StatusLog};
use crate::error::FetchError;
use crate::matcher::{extract_scoped_links, find_matches, url_in_scope, KeywordMatcher};

/// What processing one URL produced
#[derive(Debug, Default)]
pub struct PageOutcome {
    /// URL the page was served from after redirects
    pub final_url: Option<String>,
    /// In-scope, not-yet-visited links found on the page
    pub new_links: Vec<String>,
    /// The parsed page, for category extraction by the caller
    pub document: Option<Html>,
}

impl PageOutcome {
    fn dead_end() -> Self {
        Self::default()
    }
}

pub struct PageProcessor<F> {
    fetcher: F,
    matcher: KeywordMatcher,
}

impl<F: PageFetcher> PageProcessor<F> {
    pub fn new(fetcher: F, matcher: KeywordMatcher) -> Self {
        Self { fetcher, matcher }
    }

    // Fetches and inspects a single URL
    //
    // Parameters:
    //   url: the page to process
    //   main_domain: host of the seed URL (defines the crawl scope)
    //   visited: URLs already processed; `url` is added to it
    //   results: match records are appended here
    //   status_log: progress and failures are appended here
    pub async fn process_url(
        &self,
        url: &str,
        main_domain: &str,
        visited: &mut HashSet<String>,
        results: &mut ResultCollector,
        status_log: &mut StatusLog,
    ) -> PageOutcome {
        if !visited.insert(url.to_string()) {
            return PageOutcome::dead_end();
        }

        let started = Instant::now();
        let page = match self.fetcher.fetch(url).await {
            Ok(page) if page.is_success() => page,
            Ok(page) => {
                let e = FetchError::Status(page.status);
                status_log.push(StatusKind::FetchFailed, format!("Error fetching {}: {}", url, e));
                return PageOutcome::dead_end();
            }
            Err(e) => {
                status_log.push(StatusKind::FetchFailed, format!("Error fetching {}: {}", url, e));
                return PageOutcome::dead_end();
            }
        };

        status_log.push(
            StatusKind::Crawled,
            format!("Crawled: {} ({:.2}s)", url, started.elapsed().as_secs_f64()),
        );

        if !page.is_html() {
            tracing::debug!(url = %url, content_type = ?page.content_type, "Skipping non-HTML page");
            return PageOutcome::dead_end();
        }

        let final_url = match Url::parse(&page.final_url) {
            Ok(final_url) if url_in_scope(&final_url, main_domain) => final_url,
            _ => {
                status_log.push(
                    StatusKind::ScopeSkipped,
                    format!("Skipping non-subdomain: {}", page.final_url),
                );
                return PageOutcome::dead_end();
            }
        };

        let document = Html::parse_document(&page.body);

        let matches = find_matches(&document, final_url.as_str(), &self.matcher);
        for record in &matches {
            let (kind, label) = match record.match_type {
                MatchType::UrlMatch => (StatusKind::UrlMatch, "Match in URL"),
                MatchType::ContentMatch => (StatusKind::ContentMatch, "Match in content"),
                MatchType::MetaContentMatch => (StatusKind::ContentMatch, "Match in meta content"),
            };
            status_log.push(kind, format!("{}: {}", label, record.context));
        }
        results.extend(matches);

        let new_links = extract_scoped_links(&document, &final_url, main_domain, visited);
        tracing::debug!(url = %final_url, links = new_links.len(), "Extracted in-scope links");

        PageOutcome {
            final_url: Some(final_url.to_string()),
            new_links,
            document: Some(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::ScriptedFetcher;
    use pretty_assertions::assert_eq;

    struct Harness {
        visited: HashSet<String>,
        results: ResultCollector,
        status_log: StatusLog,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                visited: HashSet::new(),
                results: ResultCollector::new(),
                status_log: StatusLog::new(),
            }
        }

        async fn process(&mut self, fetcher: &ScriptedFetcher, url: &str) -> PageOutcome {
            let matcher = KeywordMatcher::new(["go with guide"]).unwrap();
            let processor = PageProcessor::new(fetcher, matcher);
            processor
                .process_url(url, "example.com", &mut self.visited, &mut self.results, &mut self.status_log)
                .await
        }
    }

    #[tokio::test]
    async fn test_html_page_yields_links_and_document() {
        let fetcher = ScriptedFetcher::new().html(
            "https://example.com/",
            r#"<a href="/about">About</a><a href="https://other.com/">Out</a>"#,
        );
        let mut harness = Harness::new();

        let outcome = harness.process(&fetcher, "https://example.com/").await;

        assert_eq!(outcome.new_links, vec!["https://example.com/about".to_string()]);
        assert!(outcome.document.is_some());
        assert_eq!(outcome.final_url.as_deref(), Some("https://example.com/"));
        assert!(harness.visited.contains("https://example.com/"));
        assert_eq!(harness.status_log.count(StatusKind::Crawled), 1);
    }

    #[tokio::test]
    async fn test_already_visited_is_not_fetched() {
        let fetcher = ScriptedFetcher::new().html("https://example.com/", "<p>hi</p>");
        let mut harness = Harness::new();
        harness.visited.insert("https://example.com/".to_string());

        let outcome = harness.process(&fetcher, "https://example.com/").await;

        assert!(outcome.document.is_none());
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_logged_dead_end() {
        let fetcher = ScriptedFetcher::new().status("https://example.com/broken", 500);
        let mut harness = Harness::new();

        let outcome = harness.process(&fetcher, "https://example.com/broken").await;

        assert!(outcome.new_links.is_empty());
        assert!(outcome.document.is_none());
        assert!(harness.visited.contains("https://example.com/broken"));
        assert_eq!(harness.status_log.count(StatusKind::FetchFailed), 1);
        assert_eq!(
            harness.status_log.events()[0].message,
            "Error fetching https://example.com/broken: HTTP 500"
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_logged_dead_end() {
        let fetcher = ScriptedFetcher::new().transport_error("https://example.com/", "connection refused");
        let mut harness = Harness::new();

        let outcome = harness.process(&fetcher, "https://example.com/").await;

        assert!(outcome.document.is_none());
        assert_eq!(harness.status_log.count(StatusKind::FetchFailed), 1);
    }

    #[tokio::test]
    async fn test_non_html_is_silent_dead_end() {
        let fetcher = ScriptedFetcher::new().content_type("https://example.com/file.pdf", "application/pdf");
        let mut harness = Harness::new();

        let outcome = harness.process(&fetcher, "https://example.com/file.pdf").await;

        assert!(outcome.document.is_none());
        assert_eq!(harness.status_log.count(StatusKind::FetchFailed), 0);
        assert_eq!(harness.status_log.count(StatusKind::ScopeSkipped), 0);
    }

    #[tokio::test]
    async fn test_redirect_out_of_scope_is_skipped() {
        let fetcher = ScriptedFetcher::new().redirect(
            "https://example.com/partner",
            "https://partner.org/landing",
            r#"<a href="/go">go with guide</a>"#,
        );
        let mut harness = Harness::new();

        let outcome = harness.process(&fetcher, "https://example.com/partner").await;

        assert!(outcome.document.is_none());
        assert!(harness.results.is_empty());
        assert_eq!(harness.status_log.count(StatusKind::ScopeSkipped), 1);
    }

    #[tokio::test]
    async fn test_redirect_within_scope_resolves_against_final_url() {
        let fetcher = ScriptedFetcher::new().redirect(
            "https://example.com/old",
            "https://blog.example.com/new/",
            r#"<a href="post">Post</a>"#,
        );
        let mut harness = Harness::new();

        let outcome = harness.process(&fetcher, "https://example.com/old").await;

        assert_eq!(outcome.new_links, vec!["https://blog.example.com/new/post".to_string()]);
    }

    #[tokio::test]
    async fn test_matches_are_recorded_against_final_url() {
        let fetcher = ScriptedFetcher::new().html(
            "https://example.com/tours",
            r#"<html><head><meta name="description" content="Go with Guide tours"></head>
               <body><a href="/x">go with guide</a></body></html>"#,
        );
        let mut harness = Harness::new();

        harness.process(&fetcher, "https://example.com/tours").await;

        let types: Vec<_> = harness.results.as_slice().iter().map(|r| r.match_type).collect();
        assert_eq!(types, vec![MatchType::ContentMatch, MatchType::MetaContentMatch]);
        assert!(harness
            .results
            .as_slice()
            .iter()
            .all(|r| r.source_url == "https://example.com/tours"));
        assert_eq!(harness.status_log.count(StatusKind::ContentMatch), 2);
    }
}
