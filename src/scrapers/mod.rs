//! Input side of the pipeline: where articles come from.
//!
//! | Module | Role |
//! |--------|------|
//! | [`rss`] | Fetch configured RSS/Atom feeds into [`FeedItem`](crate::models::FeedItem)s |
//! | [`article`] | Fetch one article page and pull out title, text and publish date |
//!
//! Both modules read through [`PageFetcher`](crate::fetch::PageFetcher) and
//! degrade to "no data" on any fetch or parse failure.

pub mod article;
pub mod rss;
