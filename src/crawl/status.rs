// src/crawl/status.rs
// =============================================================================
// The live activity feed of a crawl.
//
// Every notable thing the crawler does (page fetched, fetch failed, match
// found, phase changed, ...) becomes a StatusEvent. The log is append-only;
// a display reads the most recent events newest-first.
//
// Each event is also forwarded to `tracing`, so running with
// RUST_LOG=site_inspector=debug shows the same feed on stderr.
// =============================================================================

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Started,
    Crawled,
    FetchFailed,
    ScopeSkipped,
    UrlMatch,
    ContentMatch,
    CategoriesFound,
    CategoryError,
    Info,
    BudgetReached,
    PhaseChanged,
    MatchFound,
    Stopped,
}

impl StatusKind {
    pub fn icon(&self) -> &'static str {
        match self {
            StatusKind::Started => "🚀",
            StatusKind::Crawled => "✅",
            StatusKind::FetchFailed => "❌",
            StatusKind::ScopeSkipped | StatusKind::CategoryError => "⚠️",
            StatusKind::UrlMatch => "🔗",
            StatusKind::ContentMatch => "📄",
            StatusKind::CategoriesFound => "🗂️",
            StatusKind::Info => "ℹ️",
            StatusKind::BudgetReached => "🛑",
            StatusKind::PhaseChanged => "🔄",
            StatusKind::MatchFound => "🎯",
            StatusKind::Stopped => "⏹️",
        }
    }

    fn is_warning(&self) -> bool {
        matches!(
            self,
            StatusKind::FetchFailed | StatusKind::ScopeSkipped | StatusKind::CategoryError
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub kind: StatusKind,
    pub message: String,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.icon(), self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    events: Vec<StatusEvent>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: StatusKind, message: impl Into<String>) {
        let message = message.into();

        if kind.is_warning() {
            tracing::warn!(kind = ?kind, "{}", message);
        } else {
            tracing::info!(kind = ?kind, "{}", message);
        }

        self.events.push(StatusEvent { kind, message });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// The last `n` events, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &StatusEvent> {
        self.events.iter().rev().take(n)
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }
}
