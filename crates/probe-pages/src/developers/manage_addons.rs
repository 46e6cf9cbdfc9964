//! "Manage My Submissions" list.

use crate::developers::{EditAddon, SubmitAddon};
use amo_probe::{locators, Element, Page, PageObject, ProbeError, ProbeResult, Scope};

/// Every add-on the logged-in developer owns
#[derive(Debug, Clone)]
pub struct ManageAddons {
    base: PageObject,
}

locators! {
    ManageAddons {
        PAGE_TITLE = css(".section header h2"),
        ADDON_ITEMS = css(".item.addon"),
        ADDON_NAMES = css(".item.addon .info h3 a"),
        SUBMIT_ADDON = css(".submit-addon a"),
        SORT_BY_CREATED = link_text("Created"),
    }
}

/// Title every variant of the list page carries
const TITLE_FRAGMENT: &str = "Manage My Submissions";

impl Page for ManageAddons {
    const NAME: &'static str = "ManageAddons";

    fn path() -> Option<&'static str> {
        Some("/en-US/developers/addons")
    }

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_title_update(TITLE_FRAGMENT)?;
        Ok(self)
    }
}

impl ManageAddons {
    /// Heading above the list
    pub fn page_title(&self) -> ProbeResult<String> {
        self.base.find(&Self::PAGE_TITLE)?.text()
    }

    /// Add-on rows; empty for a developer without add-ons
    pub fn addon_list_items(&self) -> ProbeResult<Vec<Element>> {
        self.base.find_all(&Self::ADDON_ITEMS)
    }

    /// Names of the listed add-ons in display order
    pub fn addon_names(&self) -> ProbeResult<Vec<String>> {
        self.base
            .find_all(&Self::ADDON_NAMES)?
            .iter()
            .map(Element::text)
            .collect()
    }

    /// Sort the list by creation date, newest first
    pub fn sort_by_created(&self) -> ProbeResult<Self> {
        self.base.find(&Self::SORT_BY_CREATED)?.click()?;
        self.base.follow()
    }

    /// Open the edit page of the add-on called `name`
    pub fn open_addon(&self, name: &str) -> ProbeResult<EditAddon> {
        for link in self.base.find_all(&Self::ADDON_NAMES)? {
            if link.text()? == name {
                link.click()?;
                return self.base.follow();
            }
        }
        Err(ProbeError::assertion(format!("no add-on named {name:?} in the list")))
    }

    /// Start a new submission
    pub fn click_submit_addon(&self) -> ProbeResult<SubmitAddon> {
        self.base.find(&Self::SUBMIT_ADDON)?.click()?;
        self.base.follow()
    }
}
