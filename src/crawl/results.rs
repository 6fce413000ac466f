// src/crawl/results.rs
// =============================================================================
// Match records and the collector that accumulates them during a crawl.
//
// The collector is append-only: identical records are kept, nothing is ever
// removed, and reporting code reads a window of the most recent records
// without touching the underlying sequence.
// =============================================================================

use serde::Serialize;
use std::fmt;

/// Where on the page the keyword was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// In an element's href
    UrlMatch,
    /// In an element's visible text
    ContentMatch,
    /// In the page's meta description
    MetaContentMatch,
}

impl MatchType {
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::UrlMatch => "Keyword in URL",
            MatchType::ContentMatch => "Keyword in content",
            MatchType::MetaContentMatch => "Keyword in meta content",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One keyword occurrence on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Final URL of the page the match was found on
    pub source_url: String,
    pub match_type: MatchType,
    /// The matching fragment, at most 200 characters
    pub context: String,
}

impl MatchRecord {
    pub fn new(source_url: impl Into<String>, match_type: MatchType, context: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            match_type,
            context: context.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    records: Vec<MatchRecord>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MatchRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = MatchRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[MatchRecord] {
        &self.records
    }

    /// The last `n` records, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &MatchRecord> {
        self.records.iter().rev().take(n)
    }
}
