// src/browser/chrome.rs
// Chromium session via headless_chrome. Any Chromium-family binary works
// (Chrome, Chromium, Brave) when passed as `path`.

use std::{ffi::OsStr, path::PathBuf, sync::Arc};

use headless_chrome::{
    browser::tab::NoElementFound, types::RemoteError, Browser as Chromium, LaunchOptions, Tab,
};

use super::{Browser, By, Element, Locator};
use crate::error::BrowserError;

pub struct ChromeBrowser {
    // Dropping the browser kills the process; keep it alive with the tab.
    _browser: Chromium,
    tab: Arc<Tab>,
}

fn no_match(e: &(dyn std::error::Error + 'static)) -> bool {
    e.is::<NoElementFound>() || e.is::<RemoteError>()
}

fn query<E: std::fmt::Display>(e: E) -> BrowserError {
    BrowserError::Query(e.to_string())
}

impl ChromeBrowser {
    pub fn launch(headless: bool, path: Option<PathBuf>) -> Result<Self, BrowserError> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .path(path)
            .args(vec![
                OsStr::new("--disable-extensions"),
                OsStr::new("--disable-infobars"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
            ])
            .build()
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let browser = Chromium::new(options).map_err(|e| BrowserError::Launch(e.to_string()))?;
        let tab = browser.new_tab().map_err(|e| BrowserError::Launch(e.to_string()))?;
        Ok(Self { _browser: browser, tab })
    }

    fn find_js(control: &Locator) -> Result<String, BrowserError> {
        let key = serde_json::to_string(&control.key).map_err(query)?;
        Ok(match control.by {
            By::Css => format!("document.querySelector({key})"),
            By::XPath => format!(
                "document.evaluate({key}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            ),
        })
    }
}

impl Browser for ChromeBrowser {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| BrowserError::Navigate { url: s!(url), reason: e.to_string() })
    }

    fn go_back(&mut self) -> Result<(), BrowserError> {
        self.tab
            .evaluate("window.history.back()", false)
            .and_then(|_| self.tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| BrowserError::Back(e.to_string()))
    }

    fn locate_all(&self, locator: &Locator) -> Result<Vec<Element>, BrowserError> {
        let found = match locator.by {
            By::Css => self.tab.find_elements(&locator.key),
            By::XPath => self.tab.find_elements_by_xpath(&locator.key),
        };
        // "Nothing matched" comes back as an error: `NoElementFound` for CSS, a
        // protocol-level `RemoteError` for an empty XPath search. A dead session
        // fails at the transport instead and is reported.
        let elements = match found {
            Ok(elements) => elements,
            Err(e) if no_match(&*e) => return Ok(Vec::new()),
            Err(e) => return Err(query(e)),
        };

        elements
            .iter()
            .map(|el| {
                let text = el.get_inner_text().map_err(query)?;
                let html = el.get_content().map_err(query)?;
                Ok(Element { text, html })
            })
            .collect()
    }

    fn select_index(&mut self, control: &Locator, index: usize) -> Result<(), BrowserError> {
        let find = Self::find_js(control)?;
        let js = format!(
            "(function() {{ \
                const s = {find}; \
                if (!s) return 'missing'; \
                if ({index} >= s.options.length) return 'range'; \
                s.selectedIndex = {index}; \
                s.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                return 'ok'; \
            }})()"
        );
        let res = self.tab.evaluate(&js, false).map_err(query)?;

        match res.value.as_ref().and_then(|v| v.as_str()) {
            Some("ok") => Ok(()),
            Some("missing") => Err(BrowserError::MissingControl { locator: control.clone() }),
            Some("range") => Err(BrowserError::NoSuchOption { locator: control.clone(), index }),
            other => Err(BrowserError::Query(format!("unexpected select result: {other:?}"))),
        }
    }
}
