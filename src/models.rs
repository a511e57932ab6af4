//! Data models flowing through the pipeline and out to the CSV tables.
//!
//! - [`FeedItem`]: one entry from an RSS/Atom feed
//! - [`ArticleRecord`]: a fetched, keyword-relevant article
//! - [`CompanyRecord`]: a resolved company keyed by registrable domain
//! - [`ContactResult`] / [`ContactRecord`]: harvested contact facts
//! - [`NewsRow`], [`CompanyRow`], [`ContactRow`]: flat export rows

use chrono::{DateTime, SecondsFormat, Utc};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Separator for multi-valued fields in the exported tables.
pub const FIELD_SEPARATOR: &str = "; ";

/// One entry produced by feed ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub link: String,
    pub title: String,
    /// RFC 3339 publication timestamp when the feed carries one.
    pub published: Option<String>,
}

/// An article that passed fetching. Consumed once by the orchestrator.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub source_url: String,
    pub title: String,
    pub published_at: Option<String>,
    /// Feed title, extracted title and body text, newline separated, original case.
    pub raw_text: String,
}

/// Coarse trust level for how a company's website was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        };
        f.write_str(label)
    }
}

/// A company keyed by its registrable domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    pub domain: String,
    pub company_name: String,
    pub website_url: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub confidence: Confidence,
}

impl CompanyRecord {
    pub fn new(
        domain: impl Into<String>,
        company_name: impl Into<String>,
        website_url: impl Into<String>,
        seen_at: DateTime<Utc>,
        confidence: Confidence,
    ) -> Self {
        Self {
            domain: domain.into(),
            company_name: company_name.into(),
            website_url: website_url.into(),
            first_seen: seen_at,
            last_seen: seen_at,
            confidence,
        }
    }
}

/// Contact facts harvested for one domain. Sets keep output deduplicated and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactResult {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
}

impl ContactResult {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.addresses.is_empty()
    }
}

/// Contact details for one company in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub domain: String,
    pub company_name: String,
    pub website_url: String,
    pub contacts: ContactResult,
}

impl ContactRecord {
    pub fn from_company(company: &CompanyRecord, contacts: ContactResult) -> Self {
        Self {
            domain: company.domain.clone(),
            company_name: company.company_name.clone(),
            website_url: company.website_url.clone(),
            contacts,
        }
    }
}

/// Row of `news.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsRow {
    pub domain: String,
    pub title: String,
    pub url: String,
    pub publish_date: String,
    pub matched_keywords: String,
}

/// Row of `companies.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyRow {
    pub company_name: String,
    pub domain: String,
    pub website: String,
    pub first_seen: String,
    pub last_seen: String,
    pub confidence: String,
}

impl From<&CompanyRecord> for CompanyRow {
    fn from(record: &CompanyRecord) -> Self {
        Self {
            company_name: record.company_name.clone(),
            domain: record.domain.clone(),
            website: record.website_url.clone(),
            first_seen: timestamp(&record.first_seen),
            last_seen: timestamp(&record.last_seen),
            confidence: record.confidence.to_string(),
        }
    }
}

/// Row of `contacts.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactRow {
    pub company_name: String,
    pub domain: String,
    pub website: String,
    pub emails: String,
    pub phones: String,
    pub addresses: String,
}

impl From<&ContactRecord> for ContactRow {
    fn from(record: &ContactRecord) -> Self {
        Self {
            company_name: record.company_name.clone(),
            domain: record.domain.clone(),
            website: record.website_url.clone(),
            emails: record.contacts.emails.iter().join(FIELD_SEPARATOR),
            phones: record.contacts.phones.iter().join(FIELD_SEPARATOR),
            addresses: record.contacts.addresses.iter().join(FIELD_SEPARATOR),
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn acme(at: DateTime<Utc>) -> CompanyRecord {
        CompanyRecord::new(
            "acmerenewables.com",
            "Acme Renewables Pvt Ltd",
            "https://acmerenewables.com/",
            at,
            Confidence::High,
        )
    }

    #[test]
    fn test_new_company_has_equal_first_and_last_seen() {
        let at = Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        let record = acme(at);
        assert_eq!(record.first_seen, record.last_seen);
    }

    #[test]
    fn test_company_row_formats_timestamps_and_confidence() {
        let at = Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        let row = CompanyRow::from(&acme(at));
        assert_eq!(row.first_seen, "2025-05-06T14:30:00Z");
        assert_eq!(row.confidence, "High");
        assert_eq!(row.website, "https://acmerenewables.com/");
    }

    #[test]
    fn test_contact_row_joins_sets_sorted() {
        let at = Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        let mut contacts = ContactResult::default();
        contacts.emails.insert("sales@acmerenewables.com".to_string());
        contacts.emails.insert("info@acmerenewables.com".to_string());
        contacts.emails.insert("info@acmerenewables.com".to_string());

        let row = ContactRow::from(&ContactRecord::from_company(&acme(at), contacts));
        assert_eq!(row.emails, "info@acmerenewables.com; sales@acmerenewables.com");
        assert_eq!(row.phones, "");
        assert_eq!(row.addresses, "");
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
        assert_eq!(Confidence::Medium.to_string(), "Medium");
    }
}
