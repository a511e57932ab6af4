//! CSV export of the three run tables.
//!
//! ```text
//! output_dir/
//! ├── news.csv       # domain, title, url, publish_date, matched_keywords
//! ├── companies.csv  # company_name, domain, website, first_seen, last_seen, confidence
//! └── contacts.csv   # company_name, domain, website, emails, phones, addresses
//! ```
//!
//! A table with no rows is not written. Each table is written independently,
//! so one failing write does not stop the others.

use crate::models::{CompanyRow, ContactRow};
use crate::pipeline::RunReport;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Result of writing one table.
#[derive(Debug)]
pub enum TableStatus {
    Written { path: PathBuf, rows: usize },
    Empty,
    Failed(String),
}

/// Outcome for each of the three tables, in export order.
#[derive(Debug)]
pub struct ExportSummary {
    pub news: TableStatus,
    pub companies: TableStatus,
    pub contacts: TableStatus,
}

/// Write `news.csv`, `companies.csv` and `contacts.csv` into `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.as_ref().display()))]
pub async fn write_tables(report: &RunReport, output_dir: impl AsRef<Path>) -> ExportSummary {
    let dir = output_dir.as_ref();

    let companies: Vec<CompanyRow> = report.companies.iter().map(CompanyRow::from).collect();
    let contacts: Vec<ContactRow> = report.contacts.iter().map(ContactRow::from).collect();

    ExportSummary {
        news: write_table(&dir.join("news.csv"), &report.news).await,
        companies: write_table(&dir.join("companies.csv"), &companies).await,
        contacts: write_table(&dir.join("contacts.csv"), &contacts).await,
    }
}

async fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> TableStatus {
    if rows.is_empty() {
        warn!(path = %path.display(), "No rows; table not written");
        return TableStatus::Empty;
    }

    match write_csv(path, rows).await {
        Ok(()) => {
            info!(path = %path.display(), rows = rows.len(), "Wrote table");
            TableStatus::Written {
                path: path.to_path_buf(),
                rows: rows.len(),
            }
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to write table");
            TableStatus::Failed(e.to_string())
        }
    }
}

/// Serialize `rows` with a header line and write them to `path`.
pub async fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyRecord, Confidence, ContactRecord, ContactResult, NewsRow};
    use chrono::{TimeZone, Utc};

    fn report() -> RunReport {
        let at = Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap();
        let company = CompanyRecord::new(
            "acmerenewables.com",
            "Acme Renewables, Pvt Ltd",
            "https://acmerenewables.com/",
            at,
            Confidence::High,
        );
        let mut found = ContactResult::default();
        found.emails.insert("sales@acmerenewables.com".to_string());
        found.emails.insert("info@acmerenewables.com".to_string());
        found.phones.insert("+91 98765 43210".to_string());

        RunReport {
            news: vec![NewsRow {
                domain: "example.co.in".to_string(),
                title: "Acme commissions solar park".to_string(),
                url: "https://news.example.co.in/acme-50mw".to_string(),
                publish_date: "2025-05-06T14:30:00Z".to_string(),
                matched_keywords: "solar".to_string(),
            }],
            contacts: vec![ContactRecord::from_company(&company, found)],
            companies: vec![company],
            ..RunReport::default()
        }
    }

    #[tokio::test]
    async fn test_write_tables_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let summary = write_tables(&report(), dir.path()).await;
        assert!(matches!(summary.news, TableStatus::Written { rows: 1, .. }));
        assert!(matches!(summary.companies, TableStatus::Written { rows: 1, .. }));

        let companies = std::fs::read_to_string(dir.path().join("companies.csv")).unwrap();
        let mut lines = companies.lines();
        assert_eq!(
            lines.next(),
            Some("company_name,domain,website,first_seen,last_seen,confidence")
        );
        assert_eq!(
            lines.next(),
            Some("\"Acme Renewables, Pvt Ltd\",acmerenewables.com,https://acmerenewables.com/,2025-05-06T14:30:00Z,2025-05-06T14:30:00Z,High")
        );

        let contacts = std::fs::read_to_string(dir.path().join("contacts.csv")).unwrap();
        assert!(contacts.starts_with("company_name,domain,website,emails,phones,addresses\n"));
        assert!(contacts.contains("info@acmerenewables.com; sales@acmerenewables.com"));
        assert!(contacts.contains("+91 98765 43210"));

        let news = std::fs::read_to_string(dir.path().join("news.csv")).unwrap();
        assert!(news.starts_with("domain,title,url,publish_date,matched_keywords\n"));
    }

    #[tokio::test]
    async fn test_empty_tables_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let summary = write_tables(&RunReport::default(), dir.path()).await;
        assert!(matches!(summary.news, TableStatus::Empty));
        assert!(matches!(summary.contacts, TableStatus::Empty));
        assert!(!dir.path().join("news.csv").exists());
    }

    #[tokio::test]
    async fn test_unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does/not/exist");
        let summary = write_tables(&report(), &missing).await;
        assert!(matches!(summary.news, TableStatus::Failed(_)));
    }
}
