// src/config/options.rs
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Datelike;
use serde::Deserialize;

use super::consts::*;
use crate::browser::Locator;
use crate::error::ConfigError;

/// Source of the reporting year. Absent key or absent source → current year.
pub trait ConfigProvider {
    fn year(&self) -> i32;
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> char {
        match self { ExportFormat::Csv => ',', ExportFormat::Tsv => '\t' }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            other => Err(ConfigError::Invalid(format!("unknown format: {other}"))),
        }
    }
}

/// `config.toml` as written by hand. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "YEAR", alias = "year")]
    pub year: Option<i32>,
    pub out_dir: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub listing_url: Option<String>,
    pub ready_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub headless: Option<bool>,
    pub browser_path: Option<PathBuf>,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// CSS overrides for when the site shifts its markup.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SelectorConfig {
    pub period_select: Option<String>,
    pub length_select: Option<String>,
    pub listing_rows: Option<String>,
    pub roll_call: Option<String>,
}

impl FileConfig {
    /// A missing file is an empty config; an unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

impl ConfigProvider for FileConfig {
    fn year(&self) -> i32 {
        self.year.unwrap_or_else(current_year)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSelectors {
    pub period_select: Locator,
    pub length_select: Locator,
    pub listing_rows: Locator,
    pub roll_call: Locator,
    /// Visible text of the "show every row" option.
    pub show_all_text: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            period_select: Locator::css(PERIOD_SELECT),
            length_select: Locator::css(LENGTH_SELECT),
            listing_rows: Locator::css(LISTING_ROWS),
            roll_call: Locator::css(ROLL_CALL),
            show_all_text: s!(SHOW_ALL_TEXT),
        }
    }
}

impl SiteSelectors {
    fn with_overrides(cfg: &SelectorConfig) -> Self {
        let mut sel = Self::default();
        if let Some(v) = &cfg.period_select { sel.period_select = Locator::css(v); }
        if let Some(v) = &cfg.length_select { sel.length_select = Locator::css(v); }
        if let Some(v) = &cfg.listing_rows  { sel.listing_rows = Locator::css(v); }
        if let Some(v) = &cfg.roll_call     { sel.roll_call = Locator::css(v); }
        sel
    }
}

/// Resolved settings for one run.
#[derive(Clone, Debug)]
pub struct ScrapeOptions {
    pub year: i32,
    pub listing_url: String,
    pub out_dir: PathBuf,
    pub format: ExportFormat,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
    pub headless: bool,
    pub browser_path: Option<PathBuf>,
    pub selectors: SiteSelectors,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            year: current_year(),
            listing_url: s!(LISTING_URL),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            format: ExportFormat::Csv,
            ready_timeout: Duration::from_millis(READY_TIMEOUT_MS),
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            headless: true,
            browser_path: None,
            selectors: SiteSelectors::default(),
        }
    }
}

impl ScrapeOptions {
    pub fn from_config(cfg: &FileConfig) -> Result<Self, ConfigError> {
        let d = Self::default();
        let opts = Self {
            year: cfg.year(),
            listing_url: cfg.listing_url.clone().unwrap_or(d.listing_url),
            out_dir: cfg.out_dir.clone().unwrap_or(d.out_dir),
            format: cfg.format.unwrap_or(d.format),
            ready_timeout: cfg.ready_timeout_ms.map(Duration::from_millis).unwrap_or(d.ready_timeout),
            poll_interval: cfg.poll_interval_ms.map(Duration::from_millis).unwrap_or(d.poll_interval),
            headless: cfg.headless.unwrap_or(d.headless),
            browser_path: cfg.browser_path.clone(),
            selectors: SiteSelectors::with_overrides(&cfg.selectors),
        };
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1000..=9999).contains(&self.year) {
            return Err(ConfigError::Invalid(format!("YEAR out of range: {}", self.year)));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid(s!("poll_interval_ms must be > 0")));
        }
        if self.poll_interval > self.ready_timeout {
            return Err(ConfigError::Invalid(s!("poll_interval_ms exceeds ready_timeout_ms")));
        }
        url::Url::parse(&self.listing_url)
            .map_err(|e| ConfigError::Invalid(format!("listing_url: {e}")))?;
        Ok(())
    }
}

impl ConfigProvider for ScrapeOptions {
    fn year(&self) -> i32 {
        self.year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_key_is_read() {
        let cfg = FileConfig::parse("YEAR = 2019\n").unwrap();
        assert_eq!(cfg.year(), 2019);
    }

    #[test]
    fn absent_year_defaults_to_current() {
        let cfg = FileConfig::parse("out_dir = \"data\"\n").unwrap();
        assert_eq!(cfg.year(), current_year());
        assert_eq!(cfg.out_dir.as_deref(), Some(Path::new("data")));
    }

    #[test]
    fn missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FileConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert!(cfg.year.is_none());
        assert_eq!(cfg.year(), current_year());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "YEAR = = 3").unwrap();
        assert!(matches!(FileConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn overrides_flow_into_options() {
        let cfg = FileConfig::parse(
            "YEAR = 2021\nformat = \"tsv\"\nready_timeout_ms = 500\npoll_interval_ms = 50\n\
             [selectors]\nroll_call = \"div.votes\"\n",
        )
        .unwrap();
        let opts = ScrapeOptions::from_config(&cfg).unwrap();
        assert_eq!(opts.year, 2021);
        assert_eq!(opts.format, ExportFormat::Tsv);
        assert_eq!(opts.ready_timeout, Duration::from_millis(500));
        assert_eq!(opts.selectors.roll_call, Locator::css("div.votes"));
        assert_eq!(opts.selectors.period_select, Locator::css(PERIOD_SELECT));
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let cfg = FileConfig::parse("poll_interval_ms = 0\n").unwrap();
        assert!(ScrapeOptions::from_config(&cfg).is_err());
    }
}
