// src/lib.rs
// =============================================================================
// site-inspector: crawls one website (and its subdomains) looking for
// keyword mentions, falling back to the site's category sections when the
// main domain has none.
//
// Modules:
// - matcher: scope filter, keyword matcher, per-page HTML scanning
// - crawl: session state, page processor, category discovery and the
//   phase controller that drives the crawl one step at a time
// - config / error: crawl settings and typed errors
// - report: CSV / JSON export of match results
// - cli: the command-line surface used by the binary
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod error;
pub mod matcher;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::{CrawlSession, CrawlState, MatchRecord, MatchType, PhaseController, StopReason};
pub use error::{CrawlError, FetchError};
