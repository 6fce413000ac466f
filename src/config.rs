// src/config.rs
// =============================================================================
// Settings for one crawl.
//
// Defaults match what the inspector has always used: the partner keywords,
// six pages per phase, a 15 second timeout and a plain browser User-Agent.
// The CLI overrides them through the with_* builder methods.
// =============================================================================

use std::time::Duration;

use crate::error::CrawlError;
use crate::matcher::KeywordMatcher;

pub const DEFAULT_KEYWORDS: [&str; 4] = ["gowithguide", "go with guide", "go-with-guide", "87121"];
pub const DEFAULT_MAX_PAGES_PER_PHASE: usize = 6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_STEP_SIZE: usize = 1;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub keywords: Vec<String>,
    /// Pages fetched in one phase before falling back to the next category
    pub max_pages_per_phase: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Pages processed per call to the controller's step
    pub step_size: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            max_pages_per_phase: DEFAULT_MAX_PAGES_PER_PHASE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            step_size: DEFAULT_STEP_SIZE,
        }
    }
}

impl CrawlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the keyword set; an empty list keeps the defaults
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        if !keywords.is_empty() {
            self.keywords = keywords;
        }
        self
    }

    pub fn with_max_pages_per_phase(mut self, pages: usize) -> Self {
        self.max_pages_per_phase = pages;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_step_size(mut self, step_size: usize) -> Self {
        self.step_size = step_size;
        self
    }

    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.keywords.is_empty() {
            return Err(CrawlError::InvalidConfig("at least one keyword is required".to_string()));
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(CrawlError::InvalidConfig("keywords must not be blank".to_string()));
        }
        if self.max_pages_per_phase == 0 {
            return Err(CrawlError::InvalidConfig("max pages per phase must be at least 1".to_string()));
        }
        if self.step_size == 0 {
            return Err(CrawlError::InvalidConfig("step size must be at least 1".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(CrawlError::InvalidConfig("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn keyword_matcher(&self) -> Result<KeywordMatcher, CrawlError> {
        KeywordMatcher::new(&self.keywords)
    }
}
