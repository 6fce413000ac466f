// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Drive the crawl step by step, honoring Ctrl-C between steps
// 5. Print the activity feed, summary and results; export if asked
// 6. Exit with proper code (0 = no match, 1 = match found, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use site_inspector::cli::{Cli, Commands, CrawlOptions};
use site_inspector::crawl::{
    extract_categories, normalize_seed, CrawlSession, CrawlState, HttpFetcher, PageProcessor,
    PhaseController, ResultCollector, StatusLog, StopReason,
};
use site_inspector::report;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site_inspector=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no keyword match
//   Ok(1) = at least one match found
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            website_url,
            options,
            json,
            csv,
            feed,
            results,
        } => handle_crawl(&website_url, &options, json, csv.as_deref(), feed, results).await,
        Commands::Check { website_url, options } => handle_check(&website_url, &options).await,
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(
    website_url: &str,
    options: &CrawlOptions,
    json: bool,
    csv: Option<&Path>,
    feed_window: usize,
    results_window: usize,
) -> Result<i32> {
    let config = options.to_config();
    config.validate()?;

    let matcher = config.keyword_matcher()?;
    let fetcher = HttpFetcher::new(&config)?;
    let controller = PhaseController::new(fetcher, matcher);

    let mut session = CrawlSession::new(config.max_pages_per_phase);
    session.start(website_url)?;

    println!("🔍 Crawling website: {}", session.seed_url());
    println!("🔑 Keywords: {}", config.keywords.join(", "));
    println!("📊 Max pages per phase: {}", config.max_pages_per_phase);
    println!();

    // Ctrl-C can't interrupt a fetch in flight; it pauses the crawl
    // before the next step
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupted.store(true, Ordering::SeqCst);
            }
        });
    }

    while session.is_running() {
        if interrupted.load(Ordering::SeqCst) {
            session.user_stop();
            break;
        }

        let report = controller.step(&mut session, config.step_size).await;
        if report.pages_processed > 0 {
            print_progress(&session);
        }
    }

    println!();
    print_feed(session.status_log(), feed_window);
    print_summary(&session);

    if json {
        println!("{}", report::to_json(session.results().as_slice())?);
    } else {
        print_results(session.results(), results_window);
    }

    if let Some(target) = csv {
        let now = chrono::Local::now();
        let path = report::resolve_csv_path(target, now);
        let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        report::write_csv(BufWriter::new(file), session.results().as_slice(), now)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("💾 Saved {} result(s) to {}", session.results().len(), path.display());
    }

    if session.results().is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'check' subcommand: one page, no phases
async fn handle_check(website_url: &str, options: &CrawlOptions) -> Result<i32> {
    let config = options.to_config();
    config.validate()?;

    let url = normalize_seed(website_url);
    let parsed = Url::parse(&url).with_context(|| format!("Invalid URL '{}'", url))?;
    let main_domain = parsed
        .host_str()
        .with_context(|| format!("URL has no host: {}", url))?
        .to_string();

    let processor = PageProcessor::new(HttpFetcher::new(&config)?, config.keyword_matcher()?);
    let mut visited = HashSet::new();
    let mut results = ResultCollector::new();
    let mut status_log = StatusLog::new();

    println!("🔍 Checking page: {}", parsed);

    let outcome = processor
        .process_url(parsed.as_str(), &main_domain, &mut visited, &mut results, &mut status_log)
        .await;

    for event in status_log.events() {
        println!("   {}", event);
    }

    if let (Some(document), Some(final_url)) = (&outcome.document, &outcome.final_url) {
        let categories = extract_categories(document, final_url)?;
        println!("\n🗂️  Categories ({}):", categories.len());
        for category in &categories {
            println!("   {:<12} {}", category.name, category.url);
        }

        println!("\n🔗 In-scope links ({}):", outcome.new_links.len());
        for link in &outcome.new_links {
            println!("   {}", link);
        }
    }

    println!();
    print_results(&results, usize::MAX);

    if results.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn print_progress(session: &CrawlSession) {
    let phase = match session.current_category() {
        Some(category) => format!("category '{}'", category.name),
        None => "main domain".to_string(),
    };
    println!(
        "  [{}] {}/{} pages ({:.0}%) | queued {} | matches {}",
        phase,
        session.pages_crawled_in_phase(),
        session.max_pages_per_phase(),
        session.phase_progress() * 100.0,
        session.frontier().len(),
        session.results().len()
    );
}

// Most recent events first
fn print_feed(status_log: &StatusLog, window: usize) {
    if window == 0 {
        return;
    }
    println!("📡 Activity feed (latest {}):", window.min(status_log.len()));
    for event in status_log.recent(window) {
        println!("   {}", event);
    }
    println!();
}

fn print_summary(session: &CrawlSession) {
    println!("📊 Summary:");
    println!("   ⏱️  Elapsed: {:.1}s", session.elapsed().as_secs_f64());
    println!("   📄 Processed: {} pages", session.visited().len());
    println!("   🗂️  Queued: {} pages", session.frontier().len());
    println!("   🔍 Matches: {}", session.results().len());
    println!("   🏁 Outcome: {}", format_state(session.state()));
    println!();
}

fn print_results(results: &ResultCollector, window: usize) {
    if results.is_empty() {
        println!("✅ No keyword matches found");
        return;
    }

    println!("🎯 Matches found ({}):", results.len());
    println!("{:<50} {:<25} {:<40}", "URL", "TYPE", "CONTEXT");
    println!("{}", "=".repeat(115));

    for record in results.recent(window) {
        println!(
            "{:<50} {:<25} {:<40}",
            truncate(&record.source_url, 47),
            record.match_type.label(),
            truncate(&record.context, 60)
        );
    }
    println!();
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

fn format_state(state: CrawlState) -> String {
    match state {
        CrawlState::Idle => "⏸️  Idle".to_string(),
        CrawlState::MainDomainPhase => "🌐 Crawling main domain".to_string(),
        CrawlState::CategoryPhase(index) => format!("🗂️  Crawling category #{}", index + 1),
        CrawlState::Stopped(StopReason::MatchFound) => "🎯 Stopped: match found".to_string(),
        CrawlState::Stopped(StopReason::UserStopped) => "⏹️  Stopped by user".to_string(),
        CrawlState::Stopped(reason) => format!("ℹ️  Finished: {}", reason),
    }
}
