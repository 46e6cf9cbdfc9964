//! Status & Versions page of a single add-on.

use crate::developers::ManageAddons;
use amo_probe::{
    locators, Element, Page, PageObject, PollOutcome, ProbeError, ProbeResult, Region, Scope,
    Session,
};

/// Version list, listing visibility and deletion of one add-on
#[derive(Debug, Clone)]
pub struct ManageVersions {
    base: PageObject,
}

locators! {
    ManageVersions {
        ADDON_NAME_TITLE = css("div[class=\"section\"] header h2"),
        LISTING_VISIBILITY_SECTION = css("#edit-addon h3:nth-child(1)"),
        VISIBLE_LISTING_RADIO = css("input[value=\"listed\"]"),
        VISIBLE_EXPLAINER = css("#addon-current-state label:nth-child(1)"),
        INVISIBLE_LISTING_RADIO = css("input[value=\"hidden\"]"),
        INVISIBLE_EXPLAINER = css("#addon-current-state label:nth-of-type(2)"),
        HIDE_CONFIRMATION_TEXT = css("#modal-disable p:nth-child(1)"),
        HIDE_ADDON_BUTTON = css("#modal-disable p button"),
        HIDE_CANCEL_LINK = css("#modal-disable p a"),
        VERSION_LIST = id("version-list"),
        VERSION_APPROVAL_STATUS = css("#version-list .file-status div:nth-child(1)"),
        INCOMPLETE_STATUS = css(".status-incomplete b"),
        ADDON_LISTED_STATUS = css(".addon-listed-status b"),
        DELETE_ADDON_BUTTON = class_name("delete-button.delete-addon"),
    }
}

impl Page for ManageVersions {
    const NAME: &'static str = "ManageVersions";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::VERSION_LIST)?;
        Ok(self)
    }
}

impl ManageVersions {
    /// Open the versions page of the add-on with `slug`
    pub fn open_for(session: &Session, slug: &str) -> ProbeResult<Self> {
        Self::open_at(session, &format!("/en-US/developers/addon/{slug}/versions"))
    }

    /// Add-on name in the page header
    pub fn version_page_title(&self) -> ProbeResult<String> {
        self.base.find(&Self::ADDON_NAME_TITLE)?.text()
    }

    /// Listing visibility section heading
    pub fn listing_visibility_section(&self) -> ProbeResult<String> {
        self.base.find(&Self::LISTING_VISIBILITY_SECTION)?.text()
    }

    /// Select "Visible" and check that it took
    pub fn set_addon_visible(&self) -> ProbeResult<()> {
        let radio = self.base.find(&Self::VISIBLE_LISTING_RADIO)?;
        radio.click()?;
        if radio.is_selected()? {
            Ok(())
        } else {
            Err(ProbeError::assertion("visible listing radio is not selected"))
        }
    }

    /// Explanation under the "Visible" option
    pub fn visible_status_explainer(&self) -> ProbeResult<String> {
        self.base.find(&Self::VISIBLE_EXPLAINER)?.text()
    }

    /// Explanation under the "Invisible" option
    pub fn invisible_status_explainer(&self) -> ProbeResult<String> {
        self.base.find(&Self::INVISIBLE_EXPLAINER)?.text()
    }

    /// Select "Invisible" and wait for the hide confirmation modal
    pub fn set_addon_invisible(&self) -> ProbeResult<()> {
        self.base.find(&Self::INVISIBLE_LISTING_RADIO)?.click()?;
        let _ = self.base.wait_for_clickable(&Self::HIDE_CONFIRMATION_TEXT)?;
        Ok(())
    }

    /// Confirm hiding the add-on
    pub fn click_hide_addon(&self) -> ProbeResult<()> {
        self.base.find(&Self::HIDE_ADDON_BUTTON)?.click()
    }

    /// Text of the hide confirmation modal
    pub fn hide_addon_confirmation_text(&self) -> ProbeResult<String> {
        self.base.find(&Self::HIDE_CONFIRMATION_TEXT)?.text()
    }

    /// Back out of hiding; "Visible" must remain selected
    pub fn cancel_hide_addon_process(&self) -> ProbeResult<()> {
        self.base.find(&Self::HIDE_CANCEL_LINK)?.click()?;
        if self.base.find(&Self::VISIBLE_LISTING_RADIO)?.is_selected()? {
            Ok(())
        } else {
            Err(ProbeError::assertion(
                "visible listing radio lost its selection after cancelling",
            ))
        }
    }

    /// Listing status ("Approved", "Invisible", ...)
    pub fn addon_listed_status(&self) -> ProbeResult<String> {
        self.base.find(&Self::ADDON_LISTED_STATUS)?.text()
    }

    /// Incomplete status marker
    pub fn incomplete_status(&self) -> ProbeResult<Element> {
        self.base.find(&Self::INCOMPLETE_STATUS)
    }

    /// Review status of each version, newest first
    pub fn version_approval_status(&self) -> ProbeResult<Vec<Element>> {
        self.base.find_all(&Self::VERSION_APPROVAL_STATUS)
    }

    /// Refresh until the newest version's status contains `value`
    ///
    /// Bounded by the session's approval poll settings. On timeout the
    /// error carries the last status seen. The page is rebound to the
    /// last loaded document either way.
    pub fn wait_for_version_autoapproval(&mut self, value: &str) -> ProbeResult<PollOutcome> {
        let session = self.base.session().clone();
        let result = session.approval_poller().poll_until(
            format!("newest version status containing {value:?}"),
            || session.refresh(),
            || {
                PageObject::new(&session, Self::NAME)
                    .find(&Self::VERSION_APPROVAL_STATUS)?
                    .text()
            },
            |status| status.contains(value),
        );
        self.base = PageObject::new(&session, Self::NAME);
        let outcome = result?;
        tracing::info!(
            status = %outcome.value,
            attempts = outcome.attempts,
            elapsed = ?outcome.elapsed,
            "version auto-approved"
        );
        Ok(outcome)
    }

    /// Open the delete confirmation modal
    pub fn delete_addon(&self) -> ProbeResult<DeleteAddonModal> {
        self.base.find(&Self::DELETE_ADDON_BUTTON)?.click()?;
        let region = Region::wait_for(&self.base, &DeleteAddonModal::ROOT, "DeleteAddonModal")?;
        Ok(DeleteAddonModal {
            page: self.base.clone(),
            region,
        })
    }
}

// =============================================================================
// DELETE MODAL
// =============================================================================

/// Modal asking to type the add-on slug before deleting
#[derive(Debug, Clone)]
pub struct DeleteAddonModal {
    page: PageObject,
    region: Region,
}

locators! {
    DeleteAddonModal {
        ROOT = id("modal-delete"),
        CONFIRMATION_STRING = css("p:nth-of-type(2) > label"),
        CONFIRMATION_INPUT = css("input[name=\"slug\"]"),
        DELETE_BUTTON = css(".delete-button"),
    }
}

impl DeleteAddonModal {
    /// The modal's region
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Slug the modal asks for, read from the label on every call
    pub fn delete_confirmation_string(&self) -> ProbeResult<String> {
        let label = self.region.find(&Self::CONFIRMATION_STRING)?.text()?;
        label
            .split_whitespace()
            .last()
            .map(str::to_string)
            .ok_or_else(|| ProbeError::assertion("delete confirmation label is empty"))
    }

    /// Type the slug into the confirmation input
    pub fn input_delete_confirmation_string(&self) -> ProbeResult<()> {
        let slug = self.delete_confirmation_string()?;
        self.region
            .find(&Self::CONFIRMATION_INPUT)?
            .send_keys(&slug)
    }

    /// Delete the add-on and land on the add-on list
    pub fn confirm_delete_addon(self) -> ProbeResult<ManageAddons> {
        self.region.find(&Self::DELETE_BUTTON)?.click()?;
        self.page.follow()
    }
}
