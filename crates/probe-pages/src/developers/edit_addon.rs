//! Listing editor of a single add-on.

use crate::developers::ManageVersions;
use amo_probe::{locators, Page, PageObject, ProbeResult, Scope, Session};

/// Edit Product Page
#[derive(Debug, Clone)]
pub struct EditAddon {
    base: PageObject,
}

locators! {
    EditAddon {
        EDIT_NAV = id("edit-addon-nav"),
        ADDON_NAME_TITLE = css(".section header h2"),
        MANAGE_VERSIONS = link_text("Manage Status & Versions"),
        ADDON_STATUS = css(".addon-status b"),
    }
}

impl Page for EditAddon {
    const NAME: &'static str = "EditAddon";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::EDIT_NAV)?;
        Ok(self)
    }
}

impl EditAddon {
    /// Open the editor of the add-on with `slug`
    pub fn open_for(session: &Session, slug: &str) -> ProbeResult<Self> {
        Self::open_at(session, &format!("/en-US/developers/addon/{slug}/edit"))
    }

    /// Add-on name in the page header
    pub fn name(&self) -> ProbeResult<String> {
        self.base.find(&Self::ADDON_NAME_TITLE)?.text()
    }

    /// Review status shown in the sidebar
    pub fn addon_status(&self) -> ProbeResult<String> {
        self.base.find(&Self::ADDON_STATUS)?.text()
    }

    /// Sidebar link to the version list
    pub fn click_manage_versions_link(&self) -> ProbeResult<ManageVersions> {
        self.base.find(&Self::MANAGE_VERSIONS)?.click()?;
        self.base.follow()
    }
}
