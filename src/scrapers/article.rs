//! Generic article extraction: title, body text and publish date.
//!
//! Pages are parsed with `scraper`. The title prefers `og:title` over
//! `<title>`, the body is paragraph text (falling back to all visible text),
//! and the publish date comes from the usual article meta tags.

use crate::contacts::visible_text_lines;
use crate::fetch::PageFetcher;
use crate::utils::truncate_for_log;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

const DATE_META: [&str; 4] = [
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="pubdate"]"#,
    r#"meta[name="publish-date"]"#,
    r#"meta[name="date"]"#,
];

/// What the article extractor pulled out of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub text: String,
    pub publish_date: Option<String>,
}

/// Downloads and parses news articles.
#[derive(Debug, Clone)]
pub struct ArticleExtractor<F> {
    fetcher: F,
}

impl<F: PageFetcher> ArticleExtractor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch and parse `url`; `None` if the page could not be fetched.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract(&self, url: &str) -> Option<ExtractedArticle> {
        match self.fetcher.fetch(url).await {
            Ok(body) => {
                let article = parse_article(&body);
                debug!(
                    title = %article.title,
                    bytes = article.text.len(),
                    preview = %truncate_for_log(&article.text, 160),
                    "Parsed article"
                );
                Some(article)
            }
            Err(e) => {
                warn!(error = %e, "Article fetch failed");
                None
            }
        }
    }
}

pub fn parse_article(html: &str) -> ExtractedArticle {
    let document = Html::parse_document(html);

    let title = meta_content(&document, r#"meta[property="og:title"]"#)
        .or_else(|| first_text(&document, "title"))
        .or_else(|| first_text(&document, "h1"))
        .unwrap_or_default();

    let paragraphs = Selector::parse("p")
        .map(|p| {
            document
                .select(&p)
                .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let text = if paragraphs.is_empty() {
        visible_text_lines(html).join("\n")
    } else {
        paragraphs.join("\n")
    };

    let publish_date = DATE_META.iter().find_map(|sel| meta_content(&document, sel));

    ExtractedArticle {
        title,
        text,
        publish_date,
    }
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeFetcher;

    const ARTICLE: &str = r#"
        <html>
          <head>
            <title>Acme commissions plant | PV News</title>
            <meta property="og:title" content="Acme Renewables commissions 50 MW solar park">
            <meta property="article:published_time" content="2025-05-06T14:30:00+05:30">
          </head>
          <body>
            <nav>Home | Markets</nav>
            <p>Acme Renewables Pvt Ltd has commissioned a solar park.</p>
            <p>The plant will supply <b>power</b> to the grid.</p>
          </body>
        </html>"#;

    #[test]
    fn test_parse_article_prefers_og_title_and_paragraphs() {
        let article = parse_article(ARTICLE);
        assert_eq!(article.title, "Acme Renewables commissions 50 MW solar park");
        assert!(article.text.starts_with("Acme Renewables Pvt Ltd has commissioned"));
        assert!(article.text.contains("power"));
        assert!(!article.text.contains("Markets"));
        assert_eq!(article.publish_date.as_deref(), Some("2025-05-06T14:30:00+05:30"));
    }

    #[test]
    fn test_parse_article_falls_back_to_visible_text() {
        let article = parse_article("<html><head><title>Brief</title></head><body><div>Solar tender opens</div></body></html>");
        assert_eq!(article.title, "Brief");
        assert_eq!(article.text, "Solar tender opens");
        assert_eq!(article.publish_date, None);
    }

    #[tokio::test]
    async fn test_extract_failure_is_none() {
        let extractor = ArticleExtractor::new(FakeFetcher::new());
        assert_eq!(extractor.extract("https://news.example.co.in/gone").await, None);
    }
}
