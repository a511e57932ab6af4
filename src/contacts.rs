//! Contact harvesting from a company's well-known pages.
//!
//! For each domain the harvester walks an ordered list of candidate paths
//! (`/contact`, `/contact-us`, ...) over HTTPS and pulls three kinds of facts
//! out of the visible page text:
//!
//! - **emails**: `local@domain.tld` matches, lower-cased, asset names dropped
//! - **phones**: digit spans that parse as valid numbers for the default
//!   region, formatted in international form
//! - **addresses**: lines mentioning "address" or holding a 5+ digit run
//!
//! The walk stops at the first path that yields anything. Between misses the
//! harvester pauses for the politeness delay. Unreachable pages are skipped;
//! a domain where every path fails produces an empty [`ContactResult`].

use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::models::ContactResult;
use once_cell::sync::Lazy;
use phonenumber::{Mode, PhoneNumber, country};
use regex::Regex;
use scraper::Html;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("email pattern")
});

static PHONE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+?\(?\d[\d \t().\-]{5,}\d").expect("phone span pattern")
});

static POSTAL_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{5,}").expect("postal pattern"));

const ASSET_SUFFIXES: [&str; 6] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

const HIDDEN_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Walks contact paths on a domain and accumulates what it finds.
#[derive(Debug, Clone)]
pub struct ContactHarvester<F> {
    fetcher: F,
    paths: Vec<String>,
    region: country::Id,
    delay: Duration,
}

impl<F: PageFetcher> ContactHarvester<F> {
    pub fn new(fetcher: F, paths: Vec<String>, region: country::Id, delay: Duration) -> Self {
        Self {
            fetcher,
            paths,
            region,
            delay,
        }
    }

    pub fn from_config(fetcher: F, config: &Config) -> Self {
        Self::new(
            fetcher,
            config.settings.contact_paths.clone(),
            config.region,
            config.politeness_delay(),
        )
    }

    /// Probe each contact path on `domain` until one yields a contact fact.
    ///
    /// Paths are tried in configured order as `https://{domain}/{path}`. The
    /// politeness delay is slept before every path except the first, so a hit
    /// on the first path costs no delay and a hit on the n-th costs n - 1.
    ///
    /// # Arguments
    ///
    /// * `domain` - Registrable domain of the company, e.g. `acme.co.in`
    ///
    /// # Returns
    ///
    /// The union of facts from the first page that yielded any. Fetch
    /// failures are logged and skipped; if every path misses the result is
    /// empty.
    #[instrument(level = "info", skip_all, fields(%domain))]
    pub async fn harvest(&self, domain: &str) -> ContactResult {
        let mut found = ContactResult::default();

        for (attempt, path) in self.paths.iter().enumerate() {
            // Reaching a later path means the previous one missed.
            if attempt > 0 && !self.delay.is_zero() {
                sleep(self.delay).await;
            }

            let url = format!("https://{}/{}", domain, path.trim_start_matches('/'));
            info!(%url, "Trying contact page");

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(%url, error = %e, "Contact page fetch failed");
                    continue;
                }
            };

            let page = extract_contacts(&body, self.region);
            debug!(
                %url,
                emails = page.emails.len(),
                phones = page.phones.len(),
                addresses = page.addresses.len(),
                "Parsed contact page"
            );
            found.emails.extend(page.emails);
            found.phones.extend(page.phones);
            found.addresses.extend(page.addresses);

            if !found.is_empty() {
                break;
            }
        }

        info!(
            emails = found.emails.len(),
            phones = found.phones.len(),
            addresses = found.addresses.len(),
            "Contact harvest finished"
        );
        found
    }
}

/// All contact facts on one HTML page.
pub fn extract_contacts(html: &str, region: country::Id) -> ContactResult {
    let lines = visible_text_lines(html);
    let text = lines.join("\n");

    ContactResult {
        emails: find_emails(&text).into_iter().collect(),
        phones: find_phones(&text, region).into_iter().collect(),
        addresses: find_address_candidates(&lines).into_iter().collect(),
    }
}

/// Non-empty, trimmed lines of text a browser would render.
pub fn visible_text_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            (!hidden).then(|| (**text).to_string())
        })
        .flat_map(|chunk| {
            chunk
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn find_emails(text: &str) -> Vec<String> {
    EMAIL
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches('.').to_lowercase())
        .filter(|email| !ASSET_SUFFIXES.iter().any(|ext| email.ends_with(ext)))
        .collect()
}

/// Valid phone numbers for `region`, in international display form.
pub fn find_phones(text: &str, region: country::Id) -> Vec<String> {
    PHONE_SPAN
        .find_iter(text)
        .flat_map(|m| numbers_in_span(m.as_str().trim(), region))
        .map(|number| number.format().mode(Mode::International).to_string())
        .collect()
}

/// A digit span may hold several numbers separated only by whitespace, or a
/// postal code followed by a number. When the whole span is not one valid
/// number, its space-separated groups are scanned left to right, taking the
/// longest run of groups that parses at each position.
fn numbers_in_span(span: &str, region: country::Id) -> Vec<PhoneNumber> {
    if let Some(number) = parse_valid(span, region) {
        return vec![number];
    }

    let groups: Vec<&str> = span.split_whitespace().collect();
    let mut numbers = Vec::new();
    let mut start = 0;
    while start < groups.len() {
        let hit = (start + 1..=groups.len())
            .rev()
            .find_map(|end| parse_valid(&groups[start..end].join(" "), region).map(|n| (end, n)));
        match hit {
            Some((end, number)) => {
                numbers.push(number);
                start = end;
            }
            None => start += 1,
        }
    }
    numbers
}

fn parse_valid(candidate: &str, region: country::Id) -> Option<PhoneNumber> {
    phonenumber::parse(Some(region), candidate)
        .ok()
        .filter(phonenumber::is_valid)
}

/// Lines that mention "address" or carry a postal-code-like digit run.
pub fn find_address_candidates(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.to_lowercase().contains("address") || POSTAL_DIGITS.is_match(line))
        .cloned()
        .collect()
}
