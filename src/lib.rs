// src/lib.rs

#[macro_use]
pub mod macros;

pub mod browser;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod members;
pub mod navigator;
pub mod specs;
pub mod types;

pub mod csv;
pub mod file;
pub mod progress;
pub mod runner;
pub mod store;

pub use browser::{Browser, Element, Locator};
pub use error::{BrowserError, ScrapeError};
pub use members::{Member, MemberRegistry};
pub use runner::{run, RunSummary};
pub use store::{Dataset, TableSink};
pub use types::{AttendanceRecord, VoteRecord};
