//! RSS / Atom feed ingestion.
//!
//! Each configured feed is fetched in turn and parsed with `feed-rs`; every
//! entry with a link becomes a [`FeedItem`]. A feed that cannot be fetched or
//! parsed is logged and skipped.

use crate::fetch::PageFetcher;
use crate::models::FeedItem;
use chrono::SecondsFormat;
use futures::stream::{self, StreamExt};
use std::error::Error;
use tracing::{error, info, instrument};

/// Fetch every feed sequentially and concatenate their items in feed order.
#[instrument(level = "info", skip_all, fields(feeds = feed_urls.len()))]
pub async fn fetch_feed_items<F: PageFetcher>(fetcher: &F, feed_urls: &[String]) -> Vec<FeedItem> {
    let items: Vec<FeedItem> = stream::iter(feed_urls)
        .then(|url| async move {
            match fetch_feed(fetcher, url).await {
                Ok(items) => {
                    info!(%url, count = items.len(), "Indexed feed items");
                    items
                }
                Err(e) => {
                    error!(%url, error = %e, "Feed fetch failed");
                    Vec::new()
                }
            }
        })
        .concat()
        .await;

    info!(count = items.len(), "Total feed items");
    items
}

async fn fetch_feed<F: PageFetcher>(fetcher: &F, url: &str) -> Result<Vec<FeedItem>, Box<dyn Error>> {
    let body = fetcher.fetch(url).await?;
    parse_feed(&body)
}

/// Parse an RSS 2.0 or Atom document into feed items.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, Box<dyn Error>> {
    let feed = feed_rs::parser::parse(xml.as_bytes())?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .or_else(|| entry.id.starts_with("http").then(|| entry.id.clone()))?;

            Some(FeedItem {
                link,
                title: entry.title.map(|t| t.content.trim().to_string()).unwrap_or_default(),
                published: entry
                    .published
                    .or(entry.updated)
                    .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            })
        })
        .collect();

    Ok(items)
}
