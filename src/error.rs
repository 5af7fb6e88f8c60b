// src/error.rs
use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

use crate::browser::Locator;

/// Failures of the browser capability itself.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigate { url: String, reason: String },

    #[error("history back failed: {0}")]
    Back(String),

    #[error("control {locator} not found")]
    MissingControl { locator: Locator },

    #[error("control {locator} has no option #{index}")]
    NoSuchOption { locator: Locator, index: usize },

    #[error("browser query failed: {0}")]
    Query(String),
}

/// Row-level failures. Past listing setup, the runner contains every one of these at the row boundary.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Expected link/control missing.
    #[error("navigation failure: {0}")]
    Navigation(String),

    #[error("detail view not ready after {waited:?} (waiting for {marker})")]
    ReadinessTimeout { waited: Duration, marker: Locator },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("malformed config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("table {table}: {reason}")]
    Shape { table: String, reason: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }
}
