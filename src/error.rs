// src/error.rs
// =============================================================================
// Typed errors for the crawler.
//
// Two families:
// - CrawlError: problems setting up a crawl (bad seed URL, bad keywords,
//   bad configuration, HTTP client construction)
// - FetchError: why a single page could not be fetched
//
// FetchError never aborts a crawl - the page processor logs it and moves on.
// CrawlError is only returned before the crawl starts.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidSeedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL has no host: {0}")]
    MissingHost(String),

    #[error("Invalid keyword '{keyword}': {source}")]
    InvalidKeyword {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Cannot resolve category links against '{url}': {source}")]
    CategoryBase {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Why a single fetch failed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    #[error("Too many redirects")]
    TooManyRedirects,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Failed to read body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

impl FetchError {
    // Buckets: timeout, redirect loop, connection trouble, body read,
    // everything else
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_connect() {
            FetchError::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            FetchError::Body(error.to_string())
        } else {
            FetchError::Other(error.to_string())
        }
    }
}
