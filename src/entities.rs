//! Company-name candidate extraction from article text.
//!
//! The default extractor is a proper-noun heuristic: maximal runs of
//! capitalized words (joined by spaces, `&`, `.` or `-`) with at least two
//! tokens, minus anything that mentions a blacklisted term or a known
//! publisher. It is deliberately noisy; a stronger extractor can be plugged in
//! through [`EntityExtractor`] without touching the pipeline.

use crate::config::{Config, Publishers};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static PROPER_NOUN_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z&.\-]*(?:[ \t]+(?:&|[A-Z][A-Za-z&.\-]*))*")
        .expect("proper-noun pattern")
});

static LEGAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:pvt|ltd|private|limited)\b\.?").expect("legal suffix pattern")
});

/// Pluggable named-entity extraction.
pub trait EntityExtractor {
    /// Candidate company names found in `text`. Never fails; may be empty.
    fn extract(&self, text: &str) -> BTreeSet<String>;
}

/// Regex heuristic filtered by a blacklist and the publisher set.
#[derive(Debug, Clone)]
pub struct RegexEntityExtractor {
    blacklist: Vec<String>,
    publishers: Publishers,
}

impl RegexEntityExtractor {
    pub fn new(blacklist: Vec<String>, publishers: Publishers) -> Self {
        Self {
            blacklist,
            publishers,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.settings.blacklist.clone(), config.publishers.clone())
    }
}

impl EntityExtractor for RegexEntityExtractor {
    fn extract(&self, text: &str) -> BTreeSet<String> {
        extract_company_candidates(text, &self.blacklist, &self.publishers)
    }
}

/// Scan `text` for multi-word capitalized phrases that are not blacklisted and
/// do not name a publisher.
pub fn extract_company_candidates(
    text: &str,
    blacklist: &[String],
    publishers: &Publishers,
) -> BTreeSet<String> {
    PROPER_NOUN_RUN
        .find_iter(text)
        .filter_map(|m| {
            let name = m
                .as_str()
                .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '-' | '&'))
                .trim();
            if name.split_whitespace().count() < 2 {
                return None;
            }

            let lower = name.to_lowercase();
            if blacklist.iter().any(|term| lower.contains(term.as_str())) {
                return None;
            }
            if publishers.mentioned_in(&lower) {
                return None;
            }
            Some(name.to_string())
        })
        .collect()
}

/// Lower-case a company name and strip legal-form words.
///
/// `"Acme Renewables Pvt. Ltd"` → `"acme renewables"`.
pub fn normalize_company(name: &str) -> String {
    let lower = name.to_lowercase();
    LEGAL_SUFFIX
        .replace_all(&lower, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
