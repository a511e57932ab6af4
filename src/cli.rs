//! Command-line interface definitions for Sector Scout.
//!
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for a single scouting run.
///
/// # Examples
///
/// ```sh
/// # Defaults: ./config in, ./data/processed out
/// sector_scout
///
/// # Explicit directories, US phone numbers, faster crawl
/// sector_scout -c ./config -o ./out --region US --delay-ms 250
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory holding rss_feeds.yaml, keywords.yaml, publishers.yaml and optional settings.yaml
    #[arg(short, long, env = "SCOUT_CONFIG_DIR", default_value = "config")]
    pub config_dir: String,

    /// Output directory for news.csv, companies.csv and contacts.csv
    #[arg(short, long, env = "SCOUT_OUTPUT_DIR", default_value = "data/processed")]
    pub output_dir: String,

    /// Default phone region (ISO-3166 alpha-2), overrides settings.yaml
    #[arg(long, env = "SCOUT_REGION")]
    pub region: Option<String>,

    /// Politeness delay between contact-page misses in milliseconds, overrides settings.yaml
    #[arg(long, env = "SCOUT_DELAY_MS")]
    pub delay_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["sector_scout"]);
        assert_eq!(cli.config_dir, "config");
        assert_eq!(cli.output_dir, "data/processed");
        assert_eq!(cli.region, None);
        assert_eq!(cli.delay_ms, None);
    }

    #[test]
    fn test_cli_long_flags() {
        let cli = Cli::parse_from([
            "sector_scout",
            "--config-dir",
            "./conf",
            "--output-dir",
            "./out",
            "--region",
            "US",
            "--delay-ms",
            "250",
        ]);

        assert_eq!(cli.config_dir, "./conf");
        assert_eq!(cli.output_dir, "./out");
        assert_eq!(cli.region.as_deref(), Some("US"));
        assert_eq!(cli.delay_ms, Some(250));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["sector_scout", "-c", "/tmp/conf", "-o", "/tmp/out"]);

        assert_eq!(cli.config_dir, "/tmp/conf");
        assert_eq!(cli.output_dir, "/tmp/out");
    }
}
