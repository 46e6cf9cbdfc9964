//! Search results page.

use amo_probe::{locators, Page, PageObject, ProbeResult, Scope, Session};

/// Search results, reached from a query or a category link
#[derive(Debug, Clone)]
pub struct Search {
    base: PageObject,
}

locators! {
    Search {
        CONTEXT_HEADER = css(".SearchContextCard-header"),
        RESULT_ITEMS = class_name("SearchResult"),
        RESULT_NAMES = class_name("SearchResult-link"),
        NO_RESULTS = css(".SearchResults-message"),
    }
}

impl Page for Search {
    const NAME: &'static str = "Search";

    fn path() -> Option<&'static str> {
        Some("/en-US/firefox/search/")
    }

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::CONTEXT_HEADER)?;
        Ok(self)
    }
}

impl Search {
    /// Search for `query`
    pub fn open_for(session: &Session, query: &str) -> ProbeResult<Self> {
        let query: String = query
            .chars()
            .map(|c| if c.is_whitespace() { '+' } else { c })
            .collect();
        Self::open_at(session, &format!("/en-US/firefox/search/?q={query}"))
    }

    /// Summary above the results ("3 results found for ...")
    pub fn context_header(&self) -> ProbeResult<String> {
        self.base.find(&Self::CONTEXT_HEADER)?.text()
    }

    /// Names of the results in display order
    pub fn result_names(&self) -> ProbeResult<Vec<String>> {
        self.base
            .find_all(&Self::RESULT_NAMES)?
            .iter()
            .map(amo_probe::Element::text)
            .collect()
    }

    /// Number of results on this page
    pub fn result_count(&self) -> ProbeResult<usize> {
        Ok(self.base.find_all(&Self::RESULT_ITEMS)?.len())
    }

    /// "No results" message, if shown
    pub fn no_results_message(&self) -> ProbeResult<Option<String>> {
        self.base
            .find_optional(&Self::NO_RESULTS)?
            .map(|message| message.text())
            .transpose()
    }
}
