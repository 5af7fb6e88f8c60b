// tests/common/mod.rs
//
// Fixture site built on the in-memory browser.
//
#![allow(dead_code)]

use std::time::Duration;

use rollcall_scrape::browser::memory::{MemoryBrowser, MemoryPage};
use rollcall_scrape::browser::Element;
use rollcall_scrape::config::{ScrapeOptions, SiteSelectors};

pub const LISTING: &str = "https://senate.test/legislative/votes_new.htm";

pub fn opts(year: i32) -> ScrapeOptions {
    ScrapeOptions {
        year,
        listing_url: LISTING.into(),
        ready_timeout: Duration::from_millis(40),
        poll_interval: Duration::from_millis(2),
        ..ScrapeOptions::default()
    }
}

pub fn detail_url(vote: &str) -> String {
    format!("https://senate.test/legislative/LIS/vote_118_2_{vote}.htm")
}

/// Listing row; `None` renders a row without a link.
pub fn row(vote: &str, link: Option<&str>) -> Element {
    let cell = match link {
        Some(href) => format!(r#"<a href="{href}">{vote}</a>"#),
        None => vote.to_string(),
    };
    Element::new(format!("{vote} Motion"), format!("<tr><td>{cell}</td><td>Motion</td></tr>"))
}

pub fn listing(rows: Vec<Element>) -> MemoryPage {
    let sel = SiteSelectors::default();
    let mut page = MemoryPage::new()
        .with_select(&sel.period_select, &["119th Congress - 1st Session (2025)", "118th Congress - 2nd Session (2024)"])
        .with_select(&sel.length_select, &["10", "25", "All"]);
    for r in rows {
        page = page.with(sel.listing_rows.clone(), r);
    }
    page
}

pub struct Vote<'a> {
    pub number: &'a str,
    pub date: &'a str,
    pub result: &'a str,
    pub measure: &'a str,
    pub title: &'a str,
    pub entries: &'a [&'a str],
}

pub fn detail(v: &Vote) -> MemoryPage {
    let sel = SiteSelectors::default();
    let fragment = format!(r#"<span class="contenttext">{}</span>"#, join_entries(v.entries));
    MemoryPage::new()
        .with_field("Vote Number:", v.number)
        .with_field("Vote Date:", v.date)
        .with_field("Result:", v.result)
        .with_field("Measure Number:", v.measure)
        .with_field("Measure Title:", v.title)
        .with(sel.roll_call, Element::new("", fragment))
}

/// Identity/position entries, a `<br>` after every position.
fn join_entries(entries: &[&str]) -> String {
    let mut out = String::new();
    for e in entries {
        out.push_str(e);
        if e.starts_with("<b>") {
            out.push_str("<br>");
        }
    }
    out
}

pub fn site(rows: Vec<Element>, details: Vec<(String, MemoryPage)>) -> MemoryBrowser {
    let mut b = MemoryBrowser::new().with_page(LISTING, listing(rows));
    for (url, page) in details {
        b = b.with_page(url, page);
    }
    b
}
