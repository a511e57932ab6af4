//! Company website resolution and registrable-domain computation.
//!
//! Website lookup is a best-effort search-engine scrape: the query
//! `"<company> official website"` is sent to the configured search endpoint
//! and the first outbound result link is taken as the official site. Every
//! failure (blocked, timed out, no qualifying link) is reported as `None`.

use crate::fetch::PageFetcher;
use crate::utils::unwrap_redirect_url;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::{Host, Url};

/// Map a company name to its putative official website.
pub trait WebsiteResolver {
    async fn resolve_website(&self, company_name: &str) -> Option<String>;
}

/// [`WebsiteResolver`] that scrapes a search engine's HTML result page.
#[derive(Debug, Clone)]
pub struct SearchResolver<F> {
    fetcher: F,
    search_url: String,
    /// Label identifying the engine's own links, e.g. `google`.
    engine_label: String,
}

impl<F: PageFetcher> SearchResolver<F> {
    pub fn new(fetcher: F, search_url: &str) -> Self {
        let engine_label = domain_of(search_url)
            .and_then(|d| d.split('.').next().map(str::to_string))
            .unwrap_or_else(|| "google".to_string());
        Self {
            fetcher,
            search_url: search_url.to_string(),
            engine_label,
        }
    }

    fn query_url(&self, company_name: &str) -> String {
        let query = format!("{company_name} official website");
        format!("{}?q={}", self.search_url, urlencoding::encode(&query))
    }
}

impl<F: PageFetcher> WebsiteResolver for SearchResolver<F> {
    #[instrument(level = "info", skip_all, fields(company = %company_name))]
    async fn resolve_website(&self, company_name: &str) -> Option<String> {
        let url = self.query_url(company_name);
        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Website search failed");
                return None;
            }
        };

        let website = first_result_link(&body, &self.engine_label);
        match &website {
            Some(site) => info!(website = %site, "Resolved company website"),
            None => debug!("No qualifying result link"),
        }
        website
    }
}

/// First anchor on a result page that points off-engine over http(s).
pub fn first_result_link(html: &str, engine_label: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]").ok()?;

    document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(unwrap_redirect_url)
        .find(|href| {
            let lower = href.to_lowercase();
            (lower.starts_with("http://") || lower.starts_with("https://"))
                && !lower.contains(engine_label)
        })
}

/// Registrable domain (public suffix plus one label) of a URL or bare host.
///
/// # Arguments
///
/// * `url` - An absolute URL (`https://www.example.co.in/about`) or a bare
///   host (`www.example.co.in`)
///
/// # Returns
///
/// The lower-cased registrable domain, e.g. `example.co.in`, computed against
/// the public suffix list so multi-part suffixes such as `co.uk` are kept
/// whole. `None` for IP addresses, bare public suffixes and unparseable
/// input. Applying it to its own output returns the same value.
pub fn domain_of(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = Url::parse(url)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| Url::parse(&format!("https://{url}")).ok())?;

    let host = match parsed.host()? {
        Host::Domain(host) => host.trim_end_matches('.').to_lowercase(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };

    let domain = psl::domain_str(&host)?;
    Some(domain.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFetcher;

    const RESULTS: &str = r#"
        <html><body>
          <a href="/search?q=acme&tbm=isch">Images</a>
          <a href="https://maps.google.com/?q=acme">Maps</a>
          <a href="/url?q=https://acmerenewables.com/&sa=U">Acme Renewables</a>
          <a href="https://in.linkedin.com/company/acme">LinkedIn</a>
        </body></html>"#;

    #[test]
    fn test_domain_of_multi_part_suffix() {
        assert_eq!(domain_of("https://www.example.co.in/about-us").as_deref(), Some("example.co.in"));
        assert_eq!(domain_of("https://news.bbc.co.uk/x").as_deref(), Some("bbc.co.uk"));
        assert_eq!(domain_of("https://acmerenewables.com/").as_deref(), Some("acmerenewables.com"));
    }

    #[test]
    fn test_domain_of_bare_host_and_case() {
        assert_eq!(domain_of("WWW.AcmeRenewables.COM").as_deref(), Some("acmerenewables.com"));
        assert_eq!(domain_of("acmerenewables.com").as_deref(), Some("acmerenewables.com"));
    }

    #[test]
    fn test_domain_of_is_idempotent() {
        for url in [
            "https://www.example.co.in/about",
            "http://shop.acme-solar.com:8080/contact?x=1",
            "https://blog.acmerenewables.com",
        ] {
            let once = domain_of(url).unwrap();
            let twice = domain_of(&format!("https://{once}")).unwrap();
            assert_eq!(once, twice);
            assert_eq!(domain_of(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_domain_of_rejects_non_domains() {
        assert_eq!(domain_of("https://127.0.0.1/contact"), None);
        assert_eq!(domain_of("co.in"), None);
        assert_eq!(domain_of(""), None);
    }

    #[test]
    fn test_first_result_link_skips_engine_links() {
        assert_eq!(
            first_result_link(RESULTS, "google").as_deref(),
            Some("https://acmerenewables.com/")
        );
    }

    #[test]
    fn test_first_result_link_keeps_sites_with_url_parameters() {
        let html = r#"<a href="https://acme.com/login?url=/home">Acme</a>"#;
        assert_eq!(
            first_result_link(html, "google").as_deref(),
            Some("https://acme.com/login?url=/home")
        );
    }

    #[test]
    fn test_first_result_link_none_when_no_outbound_link() {
        let html = r#"<a href="/preferences">Settings</a><a href="https://accounts.google.com">Sign in</a>"#;
        assert_eq!(first_result_link(html, "google"), None);
    }

    #[tokio::test]
    async fn test_search_resolver_queries_official_website() {
        let fetcher = FakeFetcher::new().with_page(
            "https://www.google.com/search?q=Acme%20Renewables%20Pvt%20Ltd%20official%20website",
            RESULTS,
        );
        let resolver = SearchResolver::new(fetcher.clone(), "https://www.google.com/search");

        let website = resolver.resolve_website("Acme Renewables Pvt Ltd").await;
        assert_eq!(website.as_deref(), Some("https://acmerenewables.com/"));
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_search_failure_resolves_to_none() {
        let resolver = SearchResolver::new(FakeFetcher::new(), "https://www.google.com/search");
        assert_eq!(resolver.resolve_website("Unknown Corp").await, None);
    }
}
