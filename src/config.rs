// File: ./src/config.rs
// Handles configuration loading and defaults.
use anyhow::{Context, Result};
use chrono_tz::Tz;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

fn default_base_url() -> String {
    "https://roulette.org/calendar/".to_string()
}
fn default_output_file() -> PathBuf {
    PathBuf::from("docs/roulette.ics")
}
fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_max_pages() -> usize {
    6
}
fn default_duration_mins() -> u32 {
    120
}
fn default_location() -> String {
    "Roulette Intermedium, 509 Atlantic Ave, Brooklyn, NY".to_string()
}
fn default_calendar_name() -> String {
    "Roulette".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("roulette-cal/{}", env!("CARGO_PKG_VERSION"))
}

fn default_heading_selector() -> String {
    "h2".to_string()
}
fn default_listing_marker() -> String {
    "Tickets".to_string()
}

fn default_true() -> bool {
    true
}
fn default_detail_selectors() -> Vec<String> {
    ["article", "div.entry-content", "div.content", "main", "div#content"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_detail_min_chars() -> usize {
    120
}
fn default_detail_concurrency() -> usize {
    1
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Hard cap on followed "Next page" links, page 1 included.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_duration_mins")]
    pub event_duration_mins: u32,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_heading_selector")]
    pub heading_selector: String,
    #[serde(default = "default_listing_marker")]
    pub listing_marker: String,

    #[serde(default = "default_true")]
    pub fetch_details: bool,
    #[serde(default = "default_detail_selectors")]
    pub detail_selectors: Vec<String>,
    #[serde(default = "default_detail_min_chars")]
    pub detail_min_chars: usize,
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        // Match the serde defaults
        Self {
            base_url: default_base_url(),
            output_file: default_output_file(),
            timezone: default_timezone(),
            max_pages: default_max_pages(),
            event_duration_mins: default_duration_mins(),
            location: default_location(),
            calendar_name: default_calendar_name(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            heading_selector: default_heading_selector(),
            listing_marker: default_listing_marker(),
            fetch_details: true,
            detail_selectors: default_detail_selectors(),
            detail_min_chars: default_detail_min_chars(),
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

impl Config {
    /// Load the configuration from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        self.tz()?;
        if self.max_pages == 0 {
            anyhow::bail!("max_pages must be at least 1");
        }
        if self.event_duration_mins == 0 {
            anyhow::bail!("event_duration_mins must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }
        Selector::parse(&self.heading_selector).map_err(|e| {
            anyhow::anyhow!("Invalid heading selector '{}': {:?}", self.heading_selector, e)
        })?;
        for sel in &self.detail_selectors {
            Selector::parse(sel)
                .map_err(|e| anyhow::anyhow!("Invalid detail selector '{}': {:?}", sel, e))?;
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Invalid base URL '{}'", self.base_url))
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown time zone '{}': {}", self.timezone, e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn event_duration(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.event_duration_mins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://roulette.org/calendar/");
        assert_eq!(config.output_file, PathBuf::from("docs/roulette.ics"));
        assert_eq!(config.tz().unwrap(), chrono_tz::America::New_York);
        assert_eq!(config.max_pages, 6);
        assert_eq!(config.event_duration(), chrono::Duration::hours(2));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.detail_min_chars, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            base_url = "http://localhost:8080/events/"
            max_pages = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/events/");
        assert_eq!(config.max_pages, 2);
        assert_eq!(config.listing_marker, "Tickets");
        assert_eq!(config.detail_selectors.len(), 5);
    }

    #[test]
    fn test_rejects_unknown_timezone() {
        let err = Config::from_toml_str(r#"timezone = "Mars/Olympus_Mons""#).unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_rejects_zero_page_cap() {
        assert!(Config::from_toml_str("max_pages = 0").is_err());
    }

    #[test]
    fn test_rejects_bad_selector() {
        let config = Config {
            detail_selectors: vec!["div[".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/roulette.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/roulette.toml"));
    }
}
