// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a website in phases.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Stays on the seed's domain and its subdomains
// - A fixed page budget per phase
// - Falls back to the site's category sections when the main domain has
//   no keyword mentions
// - Stops at the first match
//
// Submodules:
// - session: The mutable state of one crawl
// - controller: The phase state machine, advanced one step at a time
// - processor: Fetches and inspects a single URL
// - categories: Finds fallback sections on the homepage
// - fetch: The HTTP seam (reqwest in production, scripted in tests)
// - results / status: Match records and the live activity feed
// =============================================================================

mod categories;
mod controller;
mod fetch;
mod processor;
mod results;
mod session;
mod status;

#[cfg(test)]
mod testing;

pub use categories::{extract_categories, Category, PRIORITY_CATEGORIES};
pub use controller::{PhaseController, StepReport};
pub use fetch::{FetchedPage, HttpFetcher, PageFetcher};
pub use processor::{PageOutcome, PageProcessor};
pub use results::{MatchRecord, MatchType, ResultCollector};
pub use session::{normalize_seed, CrawlSession, CrawlState, StopReason};
pub use status::{StatusEvent, StatusKind, StatusLog};
