// src/specs/fields.rs
//! Labeled fields of a vote's detail view.
//!
//! The page renders each field as `<b>Label:</b> value` inside some container.
//! We find the emphasized label, take the container's whole text and keep what
//! follows the last colon. A missing label yields `""`, same as a present but
//! empty value.

use crate::browser::{Browser, Locator};
use crate::config::consts::*;
use crate::core::{html, sanitize};
use crate::error::BrowserError;
use crate::types::VoteRecord;

pub struct FieldExtractor<'a, B: Browser + ?Sized> {
    browser: &'a B,
}

impl<'a, B: Browser + ?Sized> FieldExtractor<'a, B> {
    pub fn new(browser: &'a B) -> Self {
        Self { browser }
    }

    /// Value text for `label`, or `""` when the label isn't on the page.
    pub fn extract(&self, label: &str) -> Result<String, BrowserError> {
        let Some(container) = self.browser.locate(&Locator::emphasized_label(label))? else {
            tracing::debug!("field {label:?} absent");
            return Ok(s!());
        };
        let text = if container.text.trim().is_empty() {
            html::strip_tags(&container.html)
        } else {
            container.text
        };
        Ok(s!(sanitize::after_last_colon(&text)))
    }

    /// All five vote fields. The measure number loses its parenthesized suffix.
    pub fn vote_record(&self) -> Result<VoteRecord, BrowserError> {
        Ok(VoteRecord {
            vote_number: self.extract(VOTE_NUMBER_LABEL)?,
            vote_date: self.extract(VOTE_DATE_LABEL)?,
            result: self.extract(RESULT_LABEL)?,
            measure_number: clean_measure_number(&self.extract(MEASURE_NUMBER_LABEL)?),
            measure_title: self.extract(MEASURE_TITLE_LABEL)?,
        })
    }
}

/// `"H.R. 123 (Amdt 456)"` → `"H.R. 123"`.
pub fn clean_measure_number(raw: &str) -> String {
    s!(sanitize::before_paren(raw))
}
