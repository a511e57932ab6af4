//! Small helpers shared across the pipeline.
//!
//! - Log-friendly string truncation
//! - Unwrapping of search-engine and alert redirect links
//! - Output directory validation

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Extract the real target from a redirect link.
///
/// Google Alerts feed links carry the article in a `url` query parameter and
/// search result anchors use `/url?q=<target>`. Only links whose path is
/// `/url` are unwrapped; anything else (including an ordinary page that
/// happens to carry a `url=` parameter) is returned unchanged. Relative links
/// are resolved against `https://www.google.com`.
pub fn unwrap_redirect_url(link: &str) -> String {
    let parsed = match Url::parse(link) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            match Url::parse("https://www.google.com").and_then(|base| base.join(link)) {
                Ok(url) => url,
                Err(_) => return link.to_string(),
            }
        }
        Err(_) => return link.to_string(),
    };

    if parsed.path() != "/url" {
        return link.to_string();
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "url" || key == "q")
        .map(|(_, target)| target.into_owned())
        .unwrap_or_else(|| link.to_string())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
