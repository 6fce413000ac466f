// src/matcher/keywords.rs
// =============================================================================
// Keyword matching over text fragments (hrefs, element text, meta content).
//
// A keyword matches when:
// - it appears as a whole word somewhere in the text, or
// - the whole (trimmed) text is exactly the keyword
//
// Each keyword is compiled into one regex up front, so a crawl that checks
// thousands of fragments never recompiles a pattern.
//
// Keywords containing punctuation (e.g. "go-with-guide") only get word
// boundaries at their outer ends, so they behave close to a substring match.
// That is accepted behavior.
// =============================================================================

use regex::Regex;

use crate::error::CrawlError;

#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<Regex>,
}

impl KeywordMatcher {
    /// Compiles one case-folded pattern per keyword
    pub fn new<I, S>(keywords: I) -> Result<Self, CrawlError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut patterns = Vec::new();

        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                return Err(CrawlError::InvalidConfig(
                    "keywords must not be blank".to_string(),
                ));
            }

            let escaped = regex::escape(&keyword);
            let pattern = Regex::new(&format!(r"\b{escaped}\b|^{escaped}$")).map_err(|source| {
                CrawlError::InvalidKeyword {
                    keyword,
                    source,
                }
            })?;

            patterns.push(pattern);
        }

        Ok(Self { patterns })
    }

    // Returns true if any keyword is found in `text`
    //
    // Empty text never matches. Stops at the first keyword that hits.
    pub fn contains_keyword(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        let text = text.to_lowercase();
        self.patterns.iter().any(|pattern| pattern.is_match(&text))
    }
}

/// One-shot form for callers that don't keep a matcher around
pub fn contains_keyword<S: AsRef<str>>(text: Option<&str>, keywords: &[S]) -> bool {
    let Some(text) = text else {
        return false;
    };

    match KeywordMatcher::new(keywords.iter().map(|k| AsRef::<str>::as_ref(k))) {
        Ok(matcher) => matcher.contains_keyword(text),
        Err(_) => false,
    }
}
