//! Orchestrates one run: feed items → relevant articles → companies → contacts.
//!
//! Per article:
//!
//! ```text
//! Fetched → KeywordFiltered → EntityExtracted → Dropped (no entities) | Accepted
//! ```
//!
//! Per candidate in an accepted article:
//!
//! ```text
//! Candidate → WebsiteResolved | Unresolved (dropped)
//!           → DomainComputed  → PublisherRejected (dropped) | Upserted
//! ```
//!
//! After every article is processed the harvester runs once per stored
//! company. All network failures are absorbed inside their own step; nothing
//! here aborts the run.

use crate::config::Config;
use crate::contacts::ContactHarvester;
use crate::entities::{EntityExtractor, normalize_company};
use crate::fetch::PageFetcher;
use crate::models::{
    ArticleRecord, CompanyRecord, Confidence, ContactRecord, FIELD_SEPARATOR, FeedItem, NewsRow,
};
use crate::resolver::{WebsiteResolver, domain_of};
use crate::scrapers::article::ArticleExtractor;
use crate::store::{CompanyStore, UpsertOutcome};
use chrono::Utc;
use itertools::Itertools;
use tracing::{info, instrument, warn};

/// Confidence given to a company whose website came from a search lookup.
pub const DEFAULT_CONFIDENCE: Confidence = Confidence::Medium;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub feed_items: usize,
    pub skipped_no_keyword: usize,
    pub dropped_no_entities: usize,
    pub accepted_articles: usize,
    pub candidates: usize,
    pub unresolved: usize,
    pub publisher_rejected: usize,
    pub companies_inserted: usize,
    pub companies_merged: usize,
    pub contacts_with_signal: usize,
}

/// Everything a run produces, ready for export.
#[derive(Debug, Default)]
pub struct RunReport {
    pub news: Vec<NewsRow>,
    pub companies: Vec<CompanyRecord>,
    pub contacts: Vec<ContactRecord>,
    pub stats: RunStats,
}

/// How one article left the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleOutcome {
    NoKeywordMatch,
    NoEntities,
    Accepted(NewsRow),
}

pub struct Pipeline<'a, F, R, E> {
    config: &'a Config,
    articles: ArticleExtractor<F>,
    harvester: ContactHarvester<F>,
    resolver: R,
    extractor: E,
    store: CompanyStore,
    stats: RunStats,
}

impl<'a, F, R, E> Pipeline<'a, F, R, E>
where
    F: PageFetcher + Clone,
    R: WebsiteResolver,
    E: EntityExtractor,
{
    pub fn new(config: &'a Config, fetcher: F, resolver: R, extractor: E) -> Self {
        Self {
            config,
            articles: ArticleExtractor::new(fetcher.clone()),
            harvester: ContactHarvester::from_config(fetcher, config),
            resolver,
            extractor,
            store: CompanyStore::new(config.publishers.clone()),
            stats: RunStats::default(),
        }
    }

    /// Process every feed item, then harvest contacts for every company found.
    #[instrument(level = "info", skip_all, fields(items = items.len()))]
    pub async fn run(mut self, items: Vec<FeedItem>) -> RunReport {
        let mut news = Vec::new();
        self.stats.feed_items = items.len();

        for item in &items {
            if let ArticleOutcome::Accepted(row) = self.process_item(item).await {
                news.push(row);
            }
        }

        if self.store.is_empty() {
            info!("No companies found, skipping contact pages");
        } else {
            info!(companies = self.store.len(), "Scraping contact pages");
        }
        let companies = self.store.into_records();

        let mut contacts = Vec::with_capacity(companies.len());
        for company in &companies {
            let found = self.harvester.harvest(&company.domain).await;
            if !found.is_empty() {
                self.stats.contacts_with_signal += 1;
            }
            contacts.push(ContactRecord::from_company(company, found));
        }

        RunReport {
            news,
            companies,
            contacts,
            stats: self.stats,
        }
    }

    /// Take one feed item through fetch, keyword filter and entity extraction,
    /// upserting every company it resolves.
    #[instrument(level = "info", skip_all, fields(link = %item.link))]
    pub async fn process_item(&mut self, item: &FeedItem) -> ArticleOutcome {
        let article = self.fetch_article(item).await;
        let lower = article.raw_text.to_lowercase();

        let config = self.config;
        let matched: Vec<&str> = config
            .keywords
            .iter()
            .filter(|k| lower.contains(k.as_str()))
            .map(String::as_str)
            .collect();
        if matched.is_empty() {
            info!(url = %article.source_url, "Skipped (no keyword match)");
            self.stats.skipped_no_keyword += 1;
            return ArticleOutcome::NoKeywordMatch;
        }

        let candidates = self.extractor.extract(&article.raw_text);
        if candidates.is_empty() {
            info!(url = %article.source_url, "Dropped (no company candidates)");
            self.stats.dropped_no_entities += 1;
            return ArticleOutcome::NoEntities;
        }

        self.stats.accepted_articles += 1;
        info!(
            url = %article.source_url,
            keywords = %matched.iter().join(FIELD_SEPARATOR),
            candidates = candidates.len(),
            "Accepted article"
        );

        for candidate in &candidates {
            self.resolve_candidate(candidate).await;
        }

        ArticleOutcome::Accepted(NewsRow {
            domain: domain_of(&article.source_url).unwrap_or_default(),
            title: article.title,
            url: article.source_url,
            publish_date: article.published_at.unwrap_or_default(),
            matched_keywords: matched.iter().join(FIELD_SEPARATOR),
        })
    }

    /// Build the article record; an unreachable page contributes empty title and text.
    async fn fetch_article(&self, item: &FeedItem) -> ArticleRecord {
        let source_url = crate::utils::unwrap_redirect_url(&item.link);
        let extracted = self.articles.extract(&source_url).await.unwrap_or_default();

        let raw_text = [item.title.as_str(), extracted.title.as_str(), extracted.text.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .join("\n");

        ArticleRecord {
            title: if item.title.is_empty() {
                extracted.title
            } else {
                item.title.clone()
            },
            published_at: item.published.clone().or(extracted.publish_date),
            source_url,
            raw_text,
        }
    }

    async fn resolve_candidate(&mut self, candidate: &str) {
        self.stats.candidates += 1;

        let Some(website) = self.resolver.resolve_website(candidate).await else {
            info!(%candidate, "Unresolved candidate");
            self.stats.unresolved += 1;
            return;
        };

        let Some(domain) = domain_of(&website) else {
            warn!(%candidate, %website, "Resolved website has no registrable domain");
            self.stats.unresolved += 1;
            return;
        };

        if self.store.reject_if_publisher(&domain) {
            info!(%candidate, %domain, "Rejected publisher domain");
            self.stats.publisher_rejected += 1;
            return;
        }

        let record = CompanyRecord::new(
            domain.as_str(),
            candidate,
            website.as_str(),
            Utc::now(),
            confidence_for(candidate, &domain),
        );
        match self.store.upsert(record) {
            UpsertOutcome::Inserted => {
                info!(%candidate, %domain, "New company");
                self.stats.companies_inserted += 1;
            }
            UpsertOutcome::Merged => self.stats.companies_merged += 1,
            UpsertOutcome::Rejected => self.stats.publisher_rejected += 1,
        }
    }
}

/// `High` when the normalized name, spaces removed, appears in the domain;
/// otherwise [`DEFAULT_CONFIDENCE`].
pub fn confidence_for(company_name: &str, domain: &str) -> Confidence {
    let compact: String = normalize_company(company_name)
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();
    if !compact.is_empty() && domain.replace('-', "").contains(&compact) {
        Confidence::High
    } else {
        DEFAULT_CONFIDENCE
    }
}
