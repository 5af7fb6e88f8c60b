// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific knowledge of the vote detail view: *where the ground truth
//! lives in the markup* and *how to read it tolerantly*.
//!
//! ## What lives here
//! - **Labeled fields** (`fields`): `<b>Vote Number:</b> 115` style pairs,
//!   located through the browser by an emphasized-label locator.
//! - **Roll call** (`rollcall`): the alternating `Name (P-ST), <b>Yea</b>`
//!   fragment, turned into attendance rows.
//!
//! ## What does **not** live here
//! - **Navigation** (listing, period selection, back/forward): `navigator`.
//! - **Persistence**: `store`.
//! - **Row loop and failure isolation**: `runner`.
//!
//! ## Conventions
//! - Case-insensitive tag detection; `<b>` and `<strong>` are both emphasis.
//! - Nothing in here aborts a vote for one bad entry: skip, warn, continue.
//! - Specs are testable offline against `browser::memory::MemoryBrowser`.
pub mod fields;
pub mod rollcall;

pub use fields::{clean_measure_number, FieldExtractor};
pub use rollcall::{ParseReport, RollCallWarning};
