// src/crawl/session.rs
// =============================================================================
// The mutable context of one crawl run.
//
// A CrawlSession owns everything the crawl accumulates: the frontier queue,
// the visited set, match results, the status feed, discovered categories
// and the phase bookkeeping. The phase controller mutates it one step at a
// time; whoever drives the crawl (the CLI loop, tests) holds exactly one
// session and can inspect it between steps.
//
// Lifecycle:
//   new()      -> Idle
//   start()    -> MainDomainPhase (wipes everything from a previous run)
//   user_stop  -> Stopped(UserStopped), state kept for inspection/export
//   resume()   -> back into the phase it stopped in
//   reset()    -> Idle again, everything discarded
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

use super::categories::Category;
use super::results::ResultCollector;
use super::status::{StatusKind, StatusLog};
use crate::error::CrawlError;

/// Why a crawl stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// At least one keyword match was recorded
    MatchFound,
    /// Every category was crawled without a match
    NoMoreCategoriesNoMatch,
    /// Main domain exhausted and the homepage listed no categories
    NoPagesNoCategories,
    /// The user asked the crawl to stop
    UserStopped,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::MatchFound => "match found",
            StopReason::NoMoreCategoriesNoMatch => "all categories crawled, no match",
            StopReason::NoPagesNoCategories => "main domain exhausted, no categories",
            StopReason::UserStopped => "stopped by user",
        };
        f.write_str(text)
    }
}

/// Where the crawl state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    MainDomainPhase,
    /// Crawling `categories[index]`
    CategoryPhase(usize),
    Stopped(StopReason),
}

impl CrawlState {
    pub fn is_active(&self) -> bool {
        matches!(self, CrawlState::MainDomainPhase | CrawlState::CategoryPhase(_))
    }
}

// Adds https:// to bare domains and trims whitespace
//
// "example.com"         -> "https://example.com"
// " http://example.com" -> "http://example.com"
pub fn normalize_seed(input: &str) -> String {
    let input = input.trim();
    let lowered = input.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

#[derive(Debug, Clone)]
pub struct CrawlSession {
    pub(super) running: bool,
    pub(super) frontier: VecDeque<String>,
    pub(super) visited: HashSet<String>,
    pub(super) results: ResultCollector,
    pub(super) status_log: StatusLog,
    pub(super) seed_url: String,
    pub(super) main_domain: String,
    pub(super) categories: Vec<Category>,
    pub(super) categories_extracted: bool,
    /// Index into `categories`; None during the main-domain phase
    pub(super) current_category: Option<usize>,
    pub(super) pages_crawled_in_phase: usize,
    pub(super) max_pages_per_phase: usize,
    pub(super) stop_reason: Option<StopReason>,
    /// Results length when the crawl was last started or resumed; only
    /// matches beyond this point halt the crawl
    pub(super) match_watermark: usize,
    pub(super) started_at: Option<Instant>,
}

impl CrawlSession {
    pub fn new(max_pages_per_phase: usize) -> Self {
        Self {
            running: false,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            results: ResultCollector::new(),
            status_log: StatusLog::new(),
            seed_url: String::new(),
            main_domain: String::new(),
            categories: Vec::new(),
            categories_extracted: false,
            current_category: None,
            pages_crawled_in_phase: 0,
            max_pages_per_phase,
            stop_reason: None,
            match_watermark: 0,
            started_at: None,
        }
    }

    // Starts a fresh crawl from `seed`
    //
    // Any previous frontier, visited set, results and categories are
    // discarded. The main domain is the seed's host.
    pub fn start(&mut self, seed: &str) -> Result<(), CrawlError> {
        let seed_url = normalize_seed(seed);
        let parsed = Url::parse(&seed_url).map_err(|source| CrawlError::InvalidSeedUrl {
            url: seed_url.clone(),
            source,
        })?;
        let main_domain = parsed
            .host_str()
            .ok_or_else(|| CrawlError::MissingHost(seed_url.clone()))?
            .to_string();

        *self = Self::new(self.max_pages_per_phase);
        self.running = true;
        self.seed_url = parsed.to_string();
        self.frontier.push_back(self.seed_url.clone());
        self.main_domain = main_domain;
        self.started_at = Some(Instant::now());
        self.status_log
            .push(StatusKind::Started, format!("Starting crawl of {}", self.seed_url));

        Ok(())
    }

    /// Pauses an active crawl; everything gathered so far is kept
    pub fn user_stop(&mut self) {
        if !self.state().is_active() {
            return;
        }
        self.status_log.push(StatusKind::Stopped, "Crawl stopped by user.");
        self.stop(StopReason::UserStopped);
    }

    // Re-enters the phase the crawl stopped in, with its frontier and
    // counters untouched
    //
    // Results are kept, but only matches found after this point stop the
    // crawl again. Returns false if there was nothing to resume.
    pub fn resume(&mut self) -> bool {
        let Some(reason) = self.stop_reason else {
            return false;
        };

        self.stop_reason = None;
        self.running = true;
        self.match_watermark = self.results.len();
        self.status_log.push(
            StatusKind::Info,
            format!("Resuming crawl (previously stopped: {}).", reason),
        );
        true
    }

    /// Discards the whole crawl and returns to Idle
    pub fn reset(&mut self) {
        *self = Self::new(self.max_pages_per_phase);
    }

    pub fn state(&self) -> CrawlState {
        if let Some(reason) = self.stop_reason {
            return CrawlState::Stopped(reason);
        }
        if self.started_at.is_none() {
            return CrawlState::Idle;
        }
        match self.current_category {
            Some(index) => CrawlState::CategoryPhase(index),
            None => CrawlState::MainDomainPhase,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running && self.state().is_active()
    }

    pub(super) fn stop(&mut self, reason: StopReason) {
        self.running = false;
        self.stop_reason = Some(reason);
    }

    /// Switches to `categories[index]` with a fresh frontier and budget
    pub(super) fn enter_category(&mut self, index: usize) {
        let category = &self.categories[index];
        self.frontier = VecDeque::from([category.url.clone()]);
        self.current_category = Some(index);
        self.pages_crawled_in_phase = 0;
    }

    pub(super) fn has_new_matches(&self) -> bool {
        self.results.len() > self.match_watermark
    }

    /// "main domain" or "'blog' category", for status messages
    pub(super) fn phase_label(&self) -> String {
        match self.current_category() {
            Some(category) => format!("'{}' category", category.name),
            None => "main domain".to_string(),
        }
    }

    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    pub fn main_domain(&self) -> &str {
        &self.main_domain
    }

    pub fn frontier(&self) -> &VecDeque<String> {
        &self.frontier
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    pub fn results(&self) -> &ResultCollector {
        &self.results
    }

    pub fn status_log(&self) -> &StatusLog {
        &self.status_log
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn current_category(&self) -> Option<&Category> {
        self.current_category.and_then(|index| self.categories.get(index))
    }

    pub fn pages_crawled_in_phase(&self) -> usize {
        self.pages_crawled_in_phase
    }

    pub fn max_pages_per_phase(&self) -> usize {
        self.max_pages_per_phase
    }

    /// Share of the current phase's budget used, 0.0 to 1.0
    pub fn phase_progress(&self) -> f64 {
        if self.max_pages_per_phase == 0 {
            return 1.0;
        }
        (self.pages_crawled_in_phase as f64 / self.max_pages_per_phase as f64).min(1.0)
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_seed() {
        assert_eq!(normalize_seed("example.com"), "https://example.com");
        assert_eq!(normalize_seed("  http://example.com "), "http://example.com");
        assert_eq!(normalize_seed("HTTPS://Example.com"), "HTTPS://Example.com");
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = CrawlSession::new(6);
        assert_eq!(session.state(), CrawlState::Idle);
        assert!(!session.is_running());
    }

    #[test]
    fn test_start_seeds_frontier_and_domain() {
        let mut session = CrawlSession::new(6);
        session.start("www.example.com").unwrap();

        assert_eq!(session.state(), CrawlState::MainDomainPhase);
        assert_eq!(session.main_domain(), "www.example.com");
        assert_eq!(session.frontier().len(), 1);
        assert_eq!(session.frontier()[0], "https://www.example.com/");
        assert_eq!(session.status_log().count(StatusKind::Started), 1);
        assert!(session.is_running());
    }

    #[test]
    fn test_start_rejects_url_without_host() {
        let mut session = CrawlSession::new(6);
        assert!(session.start("https://").is_err());
        assert_eq!(session.state(), CrawlState::Idle);
    }

    #[test]
    fn test_user_stop_and_resume() {
        let mut session = CrawlSession::new(6);
        session.start("https://example.com").unwrap();

        session.user_stop();
        assert_eq!(session.state(), CrawlState::Stopped(StopReason::UserStopped));
        assert_eq!(session.frontier().len(), 1);

        assert!(session.resume());
        assert_eq!(session.state(), CrawlState::MainDomainPhase);
        assert!(session.is_running());
    }

    #[test]
    fn test_user_stop_on_idle_is_noop() {
        let mut session = CrawlSession::new(6);
        session.user_stop();
        assert_eq!(session.state(), CrawlState::Idle);
        assert!(!session.resume());
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut session = CrawlSession::new(4);
        session.start("https://example.com").unwrap();
        session.reset();

        assert_eq!(session.state(), CrawlState::Idle);
        assert!(session.frontier().is_empty());
        assert!(session.status_log().is_empty());
        assert_eq!(session.max_pages_per_phase(), 4);
    }

    #[test]
    fn test_enter_category_replaces_frontier() {
        let mut session = CrawlSession::new(6);
        session.start("https://example.com").unwrap();
        session.frontier.push_back("https://example.com/a".to_string());
        session.pages_crawled_in_phase = 6;
        session.categories = vec![Category::new("blog", "https://example.com/category/blog")];

        session.enter_category(0);

        assert_eq!(session.state(), CrawlState::CategoryPhase(0));
        assert_eq!(session.frontier().len(), 1);
        assert_eq!(session.pages_crawled_in_phase(), 0);
        assert_eq!(session.phase_label(), "'blog' category");
    }
}
