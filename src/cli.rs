// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    CrawlConfig, DEFAULT_MAX_PAGES_PER_PHASE, DEFAULT_STEP_SIZE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "site-inspector",
    version = "0.1.0",
    about = "Crawls a website looking for keyword mentions",
    long_about = "site-inspector crawls a domain (and its subdomains) breadth-first looking for keyword \
                  mentions. If the main domain has none, it falls back to the site's travel, blog, \
                  resources and other category sections, stopping at the first match."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website in phases until a keyword match is found
    ///
    /// Example: site-inspector crawl example.com --keyword "go with guide"
    Crawl {
        /// Website URL to crawl (https:// is added if missing)
        website_url: String,

        #[command(flatten)]
        options: CrawlOptions,

        /// Output results in JSON format instead of a list
        #[arg(long)]
        json: bool,

        /// Write results as CSV to this file (or into this directory)
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Status events shown in the final activity feed
        #[arg(long, default_value_t = 15)]
        feed: usize,

        /// Matches shown in the results list
        #[arg(long, default_value_t = 10)]
        results: usize,
    },

    /// Inspect a single page: matches, in-scope links and categories
    ///
    /// Example: site-inspector check https://example.com/blog/
    Check {
        /// Page URL to inspect
        website_url: String,

        #[command(flatten)]
        options: CrawlOptions,
    },
}

/// Options shared by every command that fetches pages
#[derive(Args, Debug, Clone)]
pub struct CrawlOptions {
    /// Keyword to look for (repeatable; defaults to the partner keywords)
    #[arg(long = "keyword", short = 'k', value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Pages fetched per phase before falling back to the next category
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES_PER_PHASE)]
    pub max_pages_per_phase: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Pages processed per crawl step (Ctrl-C is honored between steps)
    #[arg(long, default_value_t = DEFAULT_STEP_SIZE)]
    pub step_size: usize,
}

impl CrawlOptions {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::new()
            .with_keywords(self.keywords.clone())
            .with_max_pages_per_phase(self.max_pages_per_phase)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_user_agent(self.user_agent.clone())
            .with_step_size(self.step_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_defaults() {
        let cli = Cli::parse_from(["site-inspector", "crawl", "example.com"]);
        let Commands::Crawl { website_url, options, json, csv, .. } = cli.command else {
            panic!("expected crawl command");
        };

        assert_eq!(website_url, "example.com");
        assert!(!json);
        assert!(csv.is_none());

        let config = options.to_config();
        assert_eq!(config.max_pages_per_phase, 6);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.keywords.len(), 4);
    }

    #[test]
    fn test_repeated_keywords() {
        let cli = Cli::parse_from([
            "site-inspector", "check", "https://example.com", "-k", "foo", "--keyword", "bar baz",
        ]);
        let Commands::Check { options, .. } = cli.command else {
            panic!("expected check command");
        };

        assert_eq!(options.to_config().keywords, vec!["foo".to_string(), "bar baz".to_string()]);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
