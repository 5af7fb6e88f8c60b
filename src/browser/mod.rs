// src/browser/mod.rs
//! Browser capability used by the navigator and extractors.
//!
//! Everything the scraper needs from a live session goes through [`Browser`]:
//! navigation, history, element lookup by a typed [`Locator`], and choosing an
//! option in a `<select>` control. Elements come back as owned snapshots
//! (visible text + raw markup), so extraction code never holds a borrow on the
//! session and can be tested against [`memory::MemoryBrowser`].

use std::{fmt, thread, time::{Duration, Instant}};

use crate::error::BrowserError;

pub mod memory;
#[cfg(feature = "chrome")]
pub mod chrome;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum By {
    Css,
    XPath,
}

/// Lookup strategy plus key, e.g. `css:table#listOfVotes tbody tr`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locator {
    pub by: By,
    pub key: String,
}

impl Locator {
    pub fn css(key: impl Into<String>) -> Self {
        Self { by: By::Css, key: key.into() }
    }

    pub fn xpath(key: impl Into<String>) -> Self {
        Self { by: By::XPath, key: key.into() }
    }

    /// Container of an emphasized (`<b>`/`<strong>`) element whose text contains `label`.
    pub fn emphasized_label(label: &str) -> Self {
        Self::xpath(format!(
            "//*[self::b or self::strong][contains(normalize-space(.), {})]/..",
            xpath_literal(label)
        ))
    }

    /// `<option>` children of a select control.
    pub fn options_of(&self) -> Self {
        match self.by {
            By::Css => Self::css(format!("{} option", self.key)),
            By::XPath => Self::xpath(format!("{}/option", self.key)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.by {
            By::Css => write!(f, "css:{}", self.key),
            By::XPath => write!(f, "xpath:{}", self.key),
        }
    }
}

/// XPath 1.0 has no escapes; quotes are handled by picking the other quote
/// or falling back to `concat()`.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{s}'");
    }
    if !s.contains('"') {
        return format!("\"{s}\"");
    }
    let parts: Vec<String> = s.split('\'').map(|p| format!("'{p}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Snapshot of a located element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Rendered text, as the browser reports it.
    pub text: String,
    /// Outer markup.
    pub html: String,
}

impl Element {
    pub fn new(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self { text: text.into(), html: html.into() }
    }
}

pub trait Browser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    fn go_back(&mut self) -> Result<(), BrowserError>;

    /// All matches in document order. No match is `Ok(vec![])`.
    fn locate_all(&self, locator: &Locator) -> Result<Vec<Element>, BrowserError>;

    /// First match, if any.
    fn locate(&self, locator: &Locator) -> Result<Option<Element>, BrowserError> {
        Ok(self.locate_all(locator)?.into_iter().next())
    }

    /// Choose option `index` (document order) of a `<select>` and fire its change event.
    fn select_index(&mut self, control: &Locator, index: usize) -> Result<(), BrowserError>;
}

impl<B: Browser + ?Sized> Browser for &mut B {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        (**self).navigate(url)
    }
    fn go_back(&mut self) -> Result<(), BrowserError> {
        (**self).go_back()
    }
    fn locate_all(&self, locator: &Locator) -> Result<Vec<Element>, BrowserError> {
        (**self).locate_all(locator)
    }
    fn locate(&self, locator: &Locator) -> Result<Option<Element>, BrowserError> {
        (**self).locate(locator)
    }
    fn select_index(&mut self, control: &Locator, index: usize) -> Result<(), BrowserError> {
        (**self).select_index(control, index)
    }
}

/// Poll `locator` until it is present or `timeout` elapses.
/// `Ok(None)` means the element never showed up.
pub fn wait_for<B: Browser + ?Sized>(
    browser: &B,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> Result<Option<Element>, BrowserError> {
    poll_until(timeout, interval, || browser.locate(locator))
}

/// Call `check` every `interval` until it yields `Some` or `timeout` elapses.
pub fn poll_until<T, E>(
    timeout: Duration,
    interval: Duration,
    mut check: impl FnMut() -> Result<Option<T>, E>,
) -> Result<Option<T>, E> {
    let started = Instant::now();
    loop {
        if let Some(found) = check()? {
            return Ok(Some(found));
        }
        let waited = started.elapsed();
        if waited >= timeout {
            return Ok(None);
        }
        thread::sleep(interval.min(timeout - waited));
    }
}
