// src/crawl/controller.rs
// =============================================================================
// The crawl state machine: a phased, breadth-first walk of the frontier.
//
// How it works:
// 1. Main-domain phase: start from the seed URL, pop URLs first-in
//    first-out, process each one and append its new links to the back of
//    the queue
// 2. The first page that parses successfully also yields the site's
//    fallback categories (done once per crawl)
// 3. Any keyword match stops the crawl immediately
// 4. When a phase has used its page budget (or run out of pages) without
//    a match, move to the next category with a fresh frontier and budget
// 5. When no category is left, the crawl ends with no match
//
// The controller never loops on its own: `step` processes at most N pages
// and returns, so whoever drives the crawl decides when to continue, pause
// or stop. Fetches happen one at a time.
// =============================================================================

use super::categories::extract_categories;
use super::fetch::PageFetcher;
use super::processor::{PageOutcome, PageProcessor};
use super::session::{CrawlSession, CrawlState, StopReason};
use super::status::StatusKind;
use crate::matcher::KeywordMatcher;

/// What one call to `step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Pages fetched (or attempted) during this call
    pub pages_processed: usize,
    pub state: CrawlState,
}

pub struct PhaseController<F> {
    processor: PageProcessor<F>,
}

impl<F: PageFetcher> PhaseController<F> {
    pub fn new(fetcher: F, matcher: KeywordMatcher) -> Self {
        Self {
            processor: PageProcessor::new(fetcher, matcher),
        }
    }

    // Advances the crawl by at most `max_pages` fetches
    //
    // Returns early when the crawl stops (match found, categories exhausted,
    // or the session was stopped by the user before this call). Popping an
    // already-visited URL and switching phases do not count as pages.
    pub async fn step(&self, session: &mut CrawlSession, max_pages: usize) -> StepReport {
        let mut pages_processed = 0;

        while session.is_running() && pages_processed < max_pages {
            // Only reachable after resuming a crawl that had used its budget
            if session.pages_crawled_in_phase >= session.max_pages_per_phase {
                self.finish_phase(session);
                continue;
            }

            let Some(url) = session.frontier.pop_front() else {
                let message = format!(
                    "No more pages to crawl in {} after {} pages.",
                    session.phase_label(),
                    session.pages_crawled_in_phase
                );
                session.status_log.push(StatusKind::Info, message);
                self.finish_phase(session);
                continue;
            };

            if session.visited.contains(&url) {
                continue;
            }

            let outcome = self
                .processor
                .process_url(
                    &url,
                    &session.main_domain,
                    &mut session.visited,
                    &mut session.results,
                    &mut session.status_log,
                )
                .await;

            pages_processed += 1;
            session.pages_crawled_in_phase += 1;

            self.absorb_outcome(session, outcome);

            if session.has_new_matches() {
                let message = format!(
                    "Found {} matches in {}! Stopping crawl.",
                    session.results.len(),
                    session.phase_label()
                );
                session.status_log.push(StatusKind::MatchFound, message);
                session.stop(StopReason::MatchFound);
                break;
            }

            if session.pages_crawled_in_phase >= session.max_pages_per_phase {
                let message = format!(
                    "Reached max pages limit ({}) for {}.",
                    session.max_pages_per_phase,
                    session.phase_label()
                );
                session.status_log.push(StatusKind::BudgetReached, message);
                self.finish_phase(session);
            }
        }

        StepReport {
            pages_processed,
            state: session.state(),
        }
    }

    /// Steps until the crawl stops; mostly useful for tests and batch runs
    pub async fn run_to_completion(&self, session: &mut CrawlSession, pages_per_step: usize) -> CrawlState {
        let pages_per_step = pages_per_step.max(1);
        while session.is_running() {
            self.step(session, pages_per_step).await;
        }
        session.state()
    }

    // Queues new links and, on the first parsed page of the main domain,
    // discovers the fallback categories
    fn absorb_outcome(&self, session: &mut CrawlSession, outcome: PageOutcome) {
        if session.current_category.is_none() && !session.categories_extracted {
            if let (Some(document), Some(base_url)) = (&outcome.document, &outcome.final_url) {
                session.categories_extracted = true;
                match extract_categories(document, base_url) {
                    Ok(categories) => {
                        if !categories.is_empty() {
                            let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
                            let message = format!("Found categories: {}", names.join(", "));
                            session.status_log.push(StatusKind::CategoriesFound, message);
                        }
                        session.categories = categories;
                    }
                    // Only when the page's final URL cannot serve as a base
                    Err(e) => {
                        session
                            .status_log
                            .push(StatusKind::CategoryError, format!("Error extracting categories: {}", e));
                    }
                }
            }
        }

        for link in outcome.new_links {
            if !session.visited.contains(&link) {
                session.frontier.push_back(link);
            }
        }
    }

    // The current phase is over without a match: fall back to the next
    // category, or stop if there is none
    fn finish_phase(&self, session: &mut CrawlSession) {
        let next = match session.current_category {
            None => 0,
            Some(index) => index + 1,
        };

        if next < session.categories.len() {
            let message = format!(
                "No matches found in {}. Moving to '{}' category.",
                session.phase_label(),
                session.categories[next].name
            );
            session.status_log.push(StatusKind::PhaseChanged, message);
            session.enter_category(next);
            let message = format!("Starting crawl of {}", session.phase_label());
            session.status_log.push(StatusKind::Info, message);
            return;
        }

        if session.current_category.is_none() {
            session
                .status_log
                .push(StatusKind::Info, "No categories found. Crawl completed with no matches.");
            session.stop(StopReason::NoPagesNoCategories);
        } else {
            session.status_log.push(
                StatusKind::Info,
                "No more categories to crawl. Crawl completed with no matches.",
            );
            session.stop(StopReason::NoMoreCategoriesNoMatch);
        }
    }
}
