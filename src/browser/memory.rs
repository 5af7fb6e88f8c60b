// src/browser/memory.rs
//! In-memory browser: pages are maps from locator to element snapshots.
//! Used by tests and benches; nothing here touches the network.

use std::{cell::Cell, collections::HashMap};

use super::{Browser, Element, Locator};
use crate::error::BrowserError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Navigate(String),
    Back,
    Select { control: Locator, index: usize },
}

#[derive(Clone, Debug, Default)]
pub struct MemoryPage {
    elements: HashMap<Locator, Vec<Element>>,
    /// Number of lookups that find nothing after the page loads.
    hidden_polls: usize,
    /// Selecting on these controls loads another page: (url, lookups before it shows).
    loads: HashMap<Locator, (String, usize)>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `el` to the matches of `locator`.
    pub fn with(mut self, locator: Locator, el: Element) -> Self {
        self.elements.entry(locator).or_default().push(el);
        self
    }

    /// A labeled detail field, rendered as `<div><b>{label}</b> {value}</div>`.
    pub fn with_field(self, label: &str, value: &str) -> Self {
        let text = format!("{label} {value}");
        let html = format!("<div><b>{label}</b> {value}</div>");
        self.with(Locator::emphasized_label(label), Element::new(text, html))
    }

    /// A `<select>` whose options carry the given visible texts.
    pub fn with_select(mut self, control: &Locator, options: &[&str]) -> Self {
        let html = options
            .iter()
            .map(|o| format!("<option>{o}</option>"))
            .collect::<String>();
        self = self.with(control.clone(), Element::new(options.join("\n"), format!("<select>{html}</select>")));
        for o in options {
            self = self.with(control.options_of(), Element::new(*o, format!("<option>{o}</option>")));
        }
        self
    }

    /// Any selection on `control` loads `url`. The current page keeps answering
    /// the first `stale_polls` lookups after the selection.
    pub fn with_select_loading(mut self, control: &Locator, url: impl Into<String>, stale_polls: usize) -> Self {
        self.loads.insert(control.clone(), (url.into(), stale_polls));
        self
    }

    /// Content stays invisible for the first `polls` lookups.
    pub fn ready_after(mut self, polls: usize) -> Self {
        self.hidden_polls = polls;
        self
    }
}

/// A page load started by a selection and not yet visible.
#[derive(Debug)]
struct PendingLoad {
    url: String,
    stale_left: Cell<usize>,
}

#[derive(Debug, Default)]
pub struct MemoryBrowser {
    pages: HashMap<String, MemoryPage>,
    history: Vec<String>,
    pending: Option<PendingLoad>,
    polls: Cell<usize>,
    events: Vec<Event>,
    fail_back: bool,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, page: MemoryPage) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    /// Make every `go_back` fail, to exercise the reload fallback.
    pub fn failing_back(mut self) -> Self {
        self.fail_back = true;
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn current_url(&self) -> Option<&str> {
        match &self.pending {
            Some(p) if p.stale_left.get() == 0 => Some(p.url.as_str()),
            _ => self.history.last().map(String::as_str),
        }
    }

    /// Commit a finished selection load to history; drop one still in flight.
    fn settle(&mut self) {
        if let Some(p) = self.pending.take() {
            if p.stale_left.get() == 0 {
                self.history.push(p.url);
            }
        }
    }

    fn current_page(&self) -> Result<&MemoryPage, BrowserError> {
        let url = self
            .current_url()
            .ok_or_else(|| BrowserError::Query(s!("no page loaded")))?;
        self.pages
            .get(url)
            .ok_or_else(|| BrowserError::Query(format!("page vanished: {url}")))
    }
}

impl Browser for MemoryBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.settle();
        self.events.push(Event::Navigate(s!(url)));
        if !self.pages.contains_key(url) {
            return Err(BrowserError::Navigate { url: s!(url), reason: s!("404 Not Found") });
        }
        self.history.push(s!(url));
        self.polls.set(0);
        Ok(())
    }

    fn go_back(&mut self) -> Result<(), BrowserError> {
        self.settle();
        self.events.push(Event::Back);
        if self.fail_back {
            return Err(BrowserError::Back(s!("history unavailable")));
        }
        if self.history.len() < 2 {
            return Err(BrowserError::Back(s!("no previous page")));
        }
        self.history.pop();
        self.polls.set(0);
        Ok(())
    }

    fn locate_all(&self, locator: &Locator) -> Result<Vec<Element>, BrowserError> {
        let page = self.current_page()?;
        if let Some(p) = &self.pending {
            let left = p.stale_left.get();
            if left > 0 {
                p.stale_left.set(left - 1);
                // the old page answers this one; the new one starts fresh after
                if left == 1 {
                    self.polls.set(0);
                }
                return Ok(page.elements.get(locator).cloned().unwrap_or_default());
            }
        }
        let seen = self.polls.get();
        self.polls.set(seen + 1);
        if seen < page.hidden_polls {
            return Ok(Vec::new());
        }
        Ok(page.elements.get(locator).cloned().unwrap_or_default())
    }

    fn select_index(&mut self, control: &Locator, index: usize) -> Result<(), BrowserError> {
        self.settle();
        let page = self.current_page()?;
        if !page.elements.contains_key(control) {
            return Err(BrowserError::MissingControl { locator: control.clone() });
        }
        let options = page.elements.get(&control.options_of()).map_or(0, Vec::len);
        if index >= options {
            return Err(BrowserError::NoSuchOption { locator: control.clone(), index });
        }
        let load = page.loads.get(control).cloned();
        self.events.push(Event::Select { control: control.clone(), index });
        if let Some((url, stale_polls)) = load {
            let pending = PendingLoad { url, stale_left: Cell::new(stale_polls) };
            if stale_polls == 0 {
                self.polls.set(0);
            }
            self.pending = Some(pending);
        }
        Ok(())
    }
}
