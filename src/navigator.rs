// src/navigator.rs
//! Listing ⇄ detail navigation.
//!
//! Two states: `Listing` (initial, and after every return) and `Detail`.
//! A detail view is handed out as a [`DetailView`] guard; dropping it, or
//! calling [`DetailView::close`], returns the session to the listing, so every
//! exit path out of `Detail` goes back whether extraction worked or not.

use std::time::Duration;

use url::Url;

use crate::browser::{poll_until, wait_for, Browser, Locator};
use crate::config::consts::VOTE_NUMBER_LABEL;
use crate::config::{ScrapeOptions, SiteSelectors};
use crate::core::{html, sanitize};
use crate::error::ScrapeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavState {
    Listing,
    Detail,
}

/// One listing row, captured before any navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRow {
    pub index: usize,
    /// Visible row text, whitespace-collapsed. Used for logs.
    pub text: String,
    /// Absolute detail URL, if the row has a link.
    pub link: Option<String>,
}

pub struct Navigator<B: Browser> {
    browser: B,
    listing_url: Url,
    selectors: SiteSelectors,
    detail_ready: Locator,
    ready_timeout: Duration,
    poll_interval: Duration,
    state: NavState,
}

impl<B: Browser> Navigator<B> {
    pub fn new(browser: B, opts: &ScrapeOptions) -> Result<Self, ScrapeError> {
        let listing_url = Url::parse(&opts.listing_url)
            .map_err(|e| ScrapeError::Navigation(format!("bad listing url {:?}: {e}", opts.listing_url)))?;
        Ok(Self {
            browser,
            listing_url,
            selectors: opts.selectors.clone(),
            detail_ready: Locator::emphasized_label(VOTE_NUMBER_LABEL),
            ready_timeout: opts.ready_timeout,
            poll_interval: opts.poll_interval,
            state: NavState::Listing,
        })
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn browser(&self) -> &B {
        &self.browser
    }

    fn wait(&self, locator: &Locator) -> Result<(), ScrapeError> {
        match wait_for(&self.browser, locator, self.ready_timeout, self.poll_interval)? {
            Some(_) => Ok(()),
            None => Err(ScrapeError::ReadinessTimeout {
                waited: self.ready_timeout,
                marker: locator.clone(),
            }),
        }
    }

    /// Load the listing page and wait for its period control.
    pub fn open_listing(&mut self) -> Result<(), ScrapeError> {
        tracing::debug!("opening listing {}", self.listing_url);
        self.browser.navigate(self.listing_url.as_str())?;
        self.state = NavState::Listing;
        self.wait(&self.selectors.period_select)
    }

    /// Choose the first period option (document order) whose text contains `year`.
    /// Returns the chosen option's text.
    pub fn select_period(&mut self, year: i32) -> Result<String, ScrapeError> {
        let control = &self.selectors.period_select;
        let options = self.browser.locate_all(&control.options_of())?;
        let needle = year.to_string();

        let Some(index) = options.iter().position(|o| o.text.contains(&needle)) else {
            return Err(ScrapeError::Navigation(format!(
                "no reporting period mentions {year} ({} options at {control})",
                options.len()
            )));
        };
        let chosen = sanitize::normalize_ws(&options[index].text);
        let before = self.row_markup()?;
        self.browser.select_index(&self.selectors.period_select, index)?;
        self.await_listing_change(&before, &chosen)?;

        tracing::info!("period: {chosen}");
        Ok(chosen)
    }

    /// Switch pagination to show every row.
    pub fn select_show_all(&mut self) -> Result<(), ScrapeError> {
        let control = &self.selectors.length_select;
        let want = &self.selectors.show_all_text;
        let options = self.browser.locate_all(&control.options_of())?;

        let Some(index) = options.iter().position(|o| o.text.trim().eq_ignore_ascii_case(want)) else {
            return Err(ScrapeError::Navigation(format!("no {want:?} option at {control}")));
        };
        let before = self.row_markup()?;
        self.browser.select_index(&self.selectors.length_select, index)?;
        self.await_listing_change(&before, &self.selectors.show_all_text)
    }

    fn row_markup(&self) -> Result<Vec<String>, ScrapeError> {
        let rows = self.browser.locate_all(&self.selectors.listing_rows)?;
        Ok(rows.into_iter().map(|el| el.html).collect())
    }

    /// Wait until the listing shows rows that differ from `before`. A selection
    /// that happens to leave the rows as they were only costs one timeout.
    fn await_listing_change(&self, before: &[String], after: &str) -> Result<(), ScrapeError> {
        let changed = poll_until(self.ready_timeout, self.poll_interval, || {
            let now = self.row_markup()?;
            Ok::<_, ScrapeError>((!now.is_empty() && now != before).then_some(()))
        })?;
        if changed.is_none() {
            tracing::warn!("listing unchanged {:?} after selecting {after:?}", self.ready_timeout);
        }
        Ok(())
    }

    /// Snapshot of every listing row. An empty listing (after waiting) is not an error.
    pub fn rows(&self) -> Result<Vec<ListingRow>, ScrapeError> {
        let locator = &self.selectors.listing_rows;
        if wait_for(&self.browser, locator, self.ready_timeout, self.poll_interval)?.is_none() {
            tracing::warn!("listing shows no rows at {locator}");
            return Ok(Vec::new());
        }

        let rows = self
            .browser
            .locate_all(locator)?
            .into_iter()
            .enumerate()
            .map(|(index, el)| ListingRow {
                index,
                text: sanitize::normalize_ws(&el.text),
                link: html::first_link_href(&el.html).and_then(|href| self.resolve(&href)),
            })
            .collect();
        Ok(rows)
    }

    fn resolve(&self, href: &str) -> Option<String> {
        match self.listing_url.join(href) {
            Ok(u) => Some(u.to_string()),
            Err(e) => {
                tracing::debug!("unusable link {href:?}: {e}");
                None
            }
        }
    }

    /// Open a row's detail view and wait until its content is present.
    /// Fails with `Navigation` when the row has no link and `ReadinessTimeout`
    /// when the view never fills in; in the latter case the session is already
    /// back on the listing when this returns.
    pub fn open_row(&mut self, row: &ListingRow) -> Result<DetailView<'_, B>, ScrapeError> {
        let Some(link) = row.link.as_deref() else {
            return Err(ScrapeError::Navigation(format!("row {} has no detail link", row.index)));
        };

        if self.state == NavState::Detail {
            // a previous return failed; the detail URL is absolute so carry on
            if let Err(e) = self.return_to_listing() {
                tracing::warn!("still on a detail view: {e}");
            }
        }

        tracing::debug!("row {}: opening {link}", row.index);
        self.browser.navigate(link)?;
        self.state = NavState::Detail;

        let view = DetailView { nav: self, closed: false };
        view.nav.wait(&view.nav.detail_ready)?;
        Ok(view)
    }

    /// Back to the listing. Falls back to reloading the listing URL when history
    /// navigation fails; period/paging choices are lost then, which is fine
    /// because rows are captured up front.
    pub fn return_to_listing(&mut self) -> Result<(), ScrapeError> {
        if self.state == NavState::Listing {
            return Ok(());
        }
        if let Err(e) = self.browser.go_back() {
            tracing::warn!("{e}; reloading listing");
            self.browser.navigate(self.listing_url.as_str())?;
        }
        self.state = NavState::Listing;
        Ok(())
    }
}

/// An open detail view. Returns to the listing when closed or dropped.
pub struct DetailView<'a, B: Browser> {
    nav: &'a mut Navigator<B>,
    closed: bool,
}

impl<B: Browser> DetailView<'_, B> {
    pub fn browser(&self) -> &B {
        &self.nav.browser
    }

    /// Return to the listing, reporting any failure.
    pub fn close(mut self) -> Result<(), ScrapeError> {
        self.closed = true;
        self.nav.return_to_listing()
    }
}

impl<B: Browser> Drop for DetailView<'_, B> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.nav.return_to_listing() {
                tracing::warn!("could not return to listing: {e}");
            }
        }
    }
}
