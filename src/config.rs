//! Run configuration loaded once at startup.
//!
//! The configuration directory holds three required list files and one
//! optional settings file:
//!
//! ```text
//! config/
//! ├── rss_feeds.yaml    # feeds: [url]
//! ├── keywords.yaml     # keywords: [string]
//! ├── publishers.yaml   # publishers: [domain or name]
//! └── settings.yaml     # optional harvester / resolver tuning
//! ```
//!
//! A broken configuration makes the whole run meaningless, so every error in
//! this module is fatal and surfaces out of `main`.

use crate::resolver::domain_of;
use itertools::Itertools;
use phonenumber::country;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors raised while loading the configuration directory.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unknown phone region `{0}` (expected an ISO-3166 alpha-2 code such as IN or US)")]
    InvalidRegion(String),

    #[error("request timeout must be at least one second")]
    InvalidTimeout,
}

#[derive(Debug, Deserialize)]
struct FeedsFile {
    feeds: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordsFile {
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PublishersFile {
    publishers: Vec<String>,
}

/// Tunables for the resolver and contact harvester. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Paths probed, in order, on each company domain.
    pub contact_paths: Vec<String>,
    /// Region used to interpret phone numbers written without a country code.
    pub default_region: String,
    /// Pause before each contact path after the first one missed.
    pub politeness_delay_ms: u64,
    /// Per-request timeout for every network operation.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Search endpoint queried as `<search_url>?q=<name> official website`.
    pub search_url: String,
    /// Lower-case terms that disqualify a company candidate.
    pub blacklist: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contact_paths: [
                "/contact",
                "/contact-us",
                "/contacts",
                "/about",
                "/about-us",
                "/company/contact",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            default_region: "IN".to_string(),
            politeness_delay_ms: 1000,
            request_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (compatible; CompetitorBot/1.0; +https://example.com/bot)"
                .to_string(),
            search_url: "https://www.google.com/search".to_string(),
            blacklist: [
                "mnre",
                "ministry of new and renewable energy",
                "government",
                "india",
                "policy",
                "award",
                "scheme",
            ]
            .iter()
            .map(|b| b.to_string())
            .collect(),
        }
    }
}

/// Normalized set of known media outlets.
///
/// Holds registrable domains (for rejecting resolved companies) and name
/// terms (for filtering entity candidates out of article text).
#[derive(Debug, Clone, Default)]
pub struct Publishers {
    domains: Vec<String>,
    terms: Vec<String>,
    /// Distinct configured entries after normalization.
    entries: usize,
}

impl Publishers {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut domains = Vec::new();
        let mut terms = Vec::new();
        let mut names = Vec::new();

        for entry in entries {
            let entry = entry.as_ref().trim().to_lowercase();
            if entry.is_empty() {
                continue;
            }

            if entry.contains('.') {
                let domain = domain_of(&entry).unwrap_or(entry);
                if let Some(label) = domain.split('.').next() {
                    terms.push(label.to_string());
                }
                terms.push(domain.clone());
                domains.push(domain);
            } else {
                terms.push(entry.clone());
                names.push(entry);
            }
        }

        let domains: Vec<String> = domains.into_iter().unique().collect();
        let names = names.into_iter().unique().count();
        Self {
            entries: domains.len() + names,
            domains,
            terms: terms.into_iter().unique().collect(),
        }
    }

    /// True when `domain` is a configured publisher domain or name.
    pub fn contains_domain(&self, domain: &str) -> bool {
        let domain = domain.trim().to_lowercase();
        self.domains.iter().any(|d| *d == domain) || self.terms.iter().any(|t| *t == domain)
    }

    /// True when the lower-cased `text` mentions any publisher term.
    pub fn mentioned_in(&self, lower_text: &str) -> bool {
        self.terms.iter().any(|t| lower_text.contains(t.as_str()))
    }

    /// Number of configured publishers (domains plus bare names).
    pub fn len(&self) -> usize {
        self.entries
    }
}

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub feeds: Vec<String>,
    /// Lower-cased, de-duplicated, in file order.
    pub keywords: Vec<String>,
    pub publishers: Publishers,
    pub settings: Settings,
    /// `settings.default_region` validated against the phone metadata.
    pub region: country::Id,
}

impl Config {
    /// Load every file from `dir`. Missing list files or keys are fatal.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory holding `rss_feeds.yaml`, `keywords.yaml`,
    ///   `publishers.yaml` and, optionally, `settings.yaml`
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if a required file is missing or any file
    ///   cannot be read (including an I/O error while probing for
    ///   `settings.yaml`)
    /// - [`ConfigError::Parse`] if a file is not valid YAML or lacks its key
    /// - [`ConfigError::InvalidRegion`] / [`ConfigError::InvalidTimeout`] for
    ///   bad settings values
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display()))]
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();

        let feeds = read_yaml::<FeedsFile>(&dir.join("rss_feeds.yaml")).await?;
        let keywords = read_yaml::<KeywordsFile>(&dir.join("keywords.yaml")).await?;
        let publishers = read_yaml::<PublishersFile>(&dir.join("publishers.yaml")).await?;

        let settings = read_optional_settings(&dir.join("settings.yaml")).await?;

        let config = Self::from_parts(feeds.feeds, keywords.keywords, publishers.publishers, settings)?;
        info!(
            feeds = config.feeds.len(),
            keywords = config.keywords.len(),
            publishers = config.publishers.len(),
            region = %config.settings.default_region,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Assemble and validate a configuration from already-parsed lists.
    pub fn from_parts(
        feeds: Vec<String>,
        keywords: Vec<String>,
        publishers: Vec<String>,
        mut settings: Settings,
    ) -> Result<Self, ConfigError> {
        if settings.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        settings.default_region = settings.default_region.trim().to_uppercase();
        let region = parse_region(&settings.default_region)?;
        settings.blacklist = settings
            .blacklist
            .iter()
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty())
            .collect();

        Ok(Self {
            feeds: feeds
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .unique()
                .collect(),
            publishers: Publishers::new(publishers),
            settings,
            region,
        })
    }

    /// Override the phone region (e.g. from the command line).
    pub fn with_region(mut self, region: &str) -> Result<Self, ConfigError> {
        let region = region.trim().to_uppercase();
        self.region = parse_region(&region)?;
        self.settings.default_region = region;
        Ok(self)
    }

    pub fn with_politeness_delay_ms(mut self, delay_ms: u64) -> Self {
        self.settings.politeness_delay_ms = delay_ms;
        self
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.settings.politeness_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.request_timeout_secs)
    }
}

fn parse_region(code: &str) -> Result<country::Id, ConfigError> {
    code.parse::<country::Id>()
        .map_err(|_| ConfigError::InvalidRegion(code.to_string()))
}

/// Settings file contents, or the defaults when the file does not exist.
async fn read_optional_settings(path: &Path) -> Result<Settings, ConfigError> {
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    if exists {
        read_yaml(path).await
    } else {
        Ok(Settings::default())
    }
}

async fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
