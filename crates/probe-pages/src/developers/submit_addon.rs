//! Add-on submission flow: distribution, upload, source, listing details.
//!
//! ```text
//! SubmitAddon ──upload──► wait_for_validation ──► ValidatedUpload
//!                                                     │ continue_upload
//!                                                     ▼
//!                     SubmissionConfirmationPage ◄── UploadSource ──► ListedAddonSubmissionForm
//! ```
//!
//! Continuing past the upload step requires a [`ValidatedUpload`], which
//! only [`SubmitAddon::wait_for_validation`] hands out.

use std::path::Path;

use crate::developers::{EditAddon, ManageAddons, ManageVersions};
use amo_probe::{locators, Element, Page, PageObject, ProbeError, ProbeResult, Scope};

// =============================================================================
// DISTRIBUTION AND UPLOAD
// =============================================================================

/// Distribution choice and file upload steps
#[derive(Debug, Clone)]
pub struct SubmitAddon {
    base: PageObject,
}

locators! {
    SubmitAddon {
        MY_ADDONS_PAGE_LOGO = css(".site-titles"),
        SUBMISSION_FORM_HEADER = css(".is_addon"),
        DISTRIBUTION_HEADER = css(".addon-submission-process h3"),
        LISTED_OPTION = css("input[value=\"listed\"]"),
        UNLISTED_OPTION = css("input[value=\"unlisted\"]"),
        CHANGE_DISTRIBUTION_LINK = css(".addon-submit-distribute a"),
        CONTINUE = css(".addon-submission-field button"),
        UPLOAD_FILE_INPUT = css(".invisible-upload input"),
        FIREFOX_COMPAT_CHECKBOX = css(".app.firefox input"),
        ANDROID_COMPAT_CHECKBOX = css(".app.android input"),
        CREATE_THEME_BUTTON = id("wizardlink"),
        SUBMIT_FILE_BUTTON = id("submit-upload-file-finish"),
        VALIDATION_SUCCESS = class_name("bar-success"),
        VALIDATION_FAIL_MESSAGE = class_name("status-fail"),
        VALIDATION_SUCCESS_MESSAGE = id("upload-status-results"),
    }
}

impl Page for SubmitAddon {
    const NAME: &'static str = "SubmitAddon";

    fn path() -> Option<&'static str> {
        Some("/en-US/developers/addon/submit/distribution")
    }

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::DISTRIBUTION_HEADER)?;
        Ok(self)
    }
}

impl SubmitAddon {
    /// Developer Hub logo in the page header
    pub fn my_addons_page_logo(&self) -> ProbeResult<Element> {
        self.base.find(&Self::MY_ADDONS_PAGE_LOGO)
    }

    /// Header of the add-on submission form
    pub fn submission_form_header(&self) -> ProbeResult<Element> {
        self.base.find(&Self::SUBMISSION_FORM_HEADER)
    }

    /// Step header ("How to Distribute this Version", ...)
    pub fn distribution_header(&self) -> ProbeResult<Element> {
        self.base.find(&Self::DISTRIBUTION_HEADER)
    }

    /// Distribute on this site
    pub fn select_listed_option(&self) -> ProbeResult<()> {
        self.base.find(&Self::LISTED_OPTION)?.click()
    }

    /// Distribute on your own
    pub fn select_unlisted_option(&self) -> ProbeResult<()> {
        self.base.find(&Self::UNLISTED_OPTION)?.click()
    }

    /// Reopen the distribution choice while submitting a new version
    pub fn change_version_distribution(&self) -> ProbeResult<()> {
        self.base.find(&Self::CHANGE_DISTRIBUTION_LINK)?.click()?;
        let _ = self.base.wait_for_visible(&Self::LISTED_OPTION)?;
        Ok(())
    }

    /// Continue from the distribution step to the upload step
    pub fn click_continue(&self) -> ProbeResult<Self> {
        self.base.find(&Self::CONTINUE)?.click()?;
        self.base.follow()
    }

    /// Hand the archive at `archive` to the upload input
    pub fn upload_addon(&self, archive: &Path) -> ProbeResult<()> {
        tracing::debug!(archive = %archive.display(), "upload addon");
        self.base
            .find(&Self::UPLOAD_FILE_INPUT)?
            .send_keys(&archive.display().to_string())
    }

    /// Firefox compatibility checkbox
    pub fn firefox_compat_checkbox(&self) -> ProbeResult<Element> {
        self.base.find(&Self::FIREFOX_COMPAT_CHECKBOX)
    }

    /// Android compatibility checkbox
    pub fn android_compat_checkbox(&self) -> ProbeResult<Element> {
        self.base.find(&Self::ANDROID_COMPAT_CHECKBOX)
    }

    /// Theme generator link
    pub fn create_theme_button(&self) -> ProbeResult<Element> {
        self.base.find(&Self::CREATE_THEME_BUTTON)
    }

    /// Block until the validator reports success
    ///
    /// A failed or slow validation surfaces as a `Timeout` naming the
    /// success bar; the returned token is the only way to continue.
    pub fn wait_for_validation(&self) -> ProbeResult<ValidatedUpload> {
        let _ = self.base.wait_for_visible(&Self::VALIDATION_SUCCESS)?;
        tracing::debug!("upload validated");
        Ok(ValidatedUpload {
            page: self.clone(),
        })
    }

    /// Validator failure summary
    pub fn failed_validation_message(&self) -> ProbeResult<Element> {
        self.base.find(&Self::VALIDATION_FAIL_MESSAGE)
    }

    /// Validator success summary
    pub fn success_validation_message(&self) -> ProbeResult<Element> {
        self.base.find(&Self::VALIDATION_SUCCESS_MESSAGE)
    }

    /// Whether the continue button is disabled
    pub fn submit_button_disabled(&self) -> ProbeResult<bool> {
        Ok(!self.base.find(&Self::SUBMIT_FILE_BUTTON)?.is_enabled()?)
    }
}

/// Upload step that has passed validation
#[derive(Debug)]
pub struct ValidatedUpload {
    page: SubmitAddon,
}

impl ValidatedUpload {
    /// The upload page, still usable for inspecting validator results
    #[must_use]
    pub const fn page(&self) -> &SubmitAddon {
        &self.page
    }

    /// Continue to the source code step
    pub fn continue_upload(self) -> ProbeResult<UploadSource> {
        self.page.base.find(&SubmitAddon::SUBMIT_FILE_BUTTON)?.click()?;
        self.page.base.follow()
    }
}

// =============================================================================
// SOURCE CODE
// =============================================================================

/// Source code submission step
#[derive(Debug, Clone)]
pub struct UploadSource {
    base: PageObject,
}

locators! {
    UploadSource {
        HEADER = css(".addon-submission-process h3"),
        YES_SUBMIT_SOURCE = id("id_has_source_0"),
        NO_SUBMIT_SOURCE = id("id_has_source_1"),
        CHOOSE_SOURCE_FILE = id("id_source"),
        CONTINUE = css(".submission-buttons button:nth-child(1)"),
        ERROR_MESSAGE = css(".errorlist li"),
    }
}

impl Page for UploadSource {
    const NAME: &'static str = "UploadSource";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::HEADER)?;
        Ok(self)
    }
}

impl UploadSource {
    /// Step header
    pub fn submit_source_page_header(&self) -> ProbeResult<String> {
        self.base.find(&Self::HEADER)?.text()
    }

    /// Answer "yes" to submitting source code
    pub fn select_yes_to_submit_source(&self) -> ProbeResult<()> {
        self.base.find(&Self::YES_SUBMIT_SOURCE)?.click()
    }

    /// Answer "no" to submitting source code
    pub fn select_no_to_omit_source(&self) -> ProbeResult<()> {
        self.base.find(&Self::NO_SUBMIT_SOURCE)?.click()
    }

    /// Attach the source archive at `archive`
    pub fn choose_source(&self, archive: &Path) -> ProbeResult<()> {
        self.base
            .find(&Self::CHOOSE_SOURCE_FILE)?
            .send_keys(&archive.display().to_string())
    }

    /// Finish an unlisted submission
    pub fn continue_unlisted_submission(&self) -> ProbeResult<SubmissionConfirmationPage> {
        self.base.find(&Self::CONTINUE)?.click()?;
        self.base.follow()
    }

    /// Continue a listed submission to the details form
    pub fn continue_listed_submission(&self) -> ProbeResult<ListedAddonSubmissionForm> {
        self.base.find(&Self::CONTINUE)?.click()?;
        self.base.follow()
    }

    /// Error shown when the source upload is rejected
    pub fn source_upload_fail_message(&self) -> ProbeResult<String> {
        self.base.find(&Self::ERROR_MESSAGE)?.text()
    }
}

// =============================================================================
// LISTING DETAILS
// =============================================================================

/// Listing details form for listed submissions
#[derive(Debug, Clone)]
pub struct ListedAddonSubmissionForm {
    base: PageObject,
}

locators! {
    ListedAddonSubmissionForm {
        NAME_FIELD = css("#trans-name input:nth-child(1)"),
        EDIT_SLUG_LINK = id("edit_slug"),
        SLUG_FIELD = id("id_slug"),
        SUMMARY_FIELD = id("id_summary_0"),
        DETAIL_FIELDS_INFO = css(".edit-addon-details"),
        SUMMARY_CHAR_COUNT = css(".char-count[data-for-startswith='id_summary_'] > b"),
        DESCRIPTION_FIELD = id("id_description_0"),
        IS_EXPERIMENTAL = id("id_is_experimental"),
        REQUIRES_PAYMENT = id("id_requires_payment"),
        CATEGORIES_SECTION = id("addon-categories-edit"),
        FIREFOX_CATEGORIES = css(".addon-app-cats:nth-of-type(1) > ul input"),
        ANDROID_CATEGORIES = css(".addon-app-cats:nth-of-type(2) > ul input"),
        SUPPORT_EMAIL = id("id_support_email_0"),
        SUPPORT_SITE = id("id_support_url_0"),
        LICENSE_OPTIONS = class_name("license"),
        LICENSE_DETAILS_LINK = css(".xx.extra"),
        CUSTOM_LICENSE_NAME = id("id_license-name"),
        CUSTOM_LICENSE_TEXT = id("id_license-text"),
        PRIVACY_POLICY_CHECKBOX = id("id_has_priv"),
        PRIVACY_POLICY_TEXT = id("id_privacy_policy_0"),
        REVIEWER_NOTES = id("id_approval_notes"),
        SUBMIT = css(".submission-buttons button:nth-child(1)"),
        CANCEL = css(".submission-buttons button:nth-child(2)"),
    }
}

impl Page for ListedAddonSubmissionForm {
    const NAME: &'static str = "ListedAddonSubmissionForm";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::SUMMARY_FIELD)?;
        Ok(self)
    }
}

impl ListedAddonSubmissionForm {
    fn type_into(&self, locator: &amo_probe::Locator, value: &str) -> ProbeResult<()> {
        self.base.find(locator)?.send_keys(value)
    }

    /// Pick the `index`-th checkbox among `locator` matches
    fn click_nth(&self, locator: &amo_probe::Locator, index: usize) -> ProbeResult<()> {
        let options = self.base.find_all(locator)?;
        let count = options.len();
        options
            .into_iter()
            .nth(index)
            .ok_or_else(|| {
                ProbeError::assertion(format!(
                    "option {index} out of range for {locator} ({count} available)"
                ))
            })?
            .click()
    }

    /// Type the add-on name
    pub fn set_addon_name(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::NAME_FIELD, value)
    }

    /// Name input
    pub fn addon_name_field(&self) -> ProbeResult<Element> {
        self.base.find(&Self::NAME_FIELD)
    }

    /// Open the slug editor and type `value`
    pub fn edit_addon_slug(&self, value: &str) -> ProbeResult<()> {
        self.base.find(&Self::EDIT_SLUG_LINK)?.click()?;
        self.base.wait_for_visible(&Self::SLUG_FIELD)?.send_keys(value)
    }

    /// Type the summary
    pub fn set_addon_summary(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::SUMMARY_FIELD, value)
    }

    /// Helper texts next to the detail fields
    pub fn addon_detail_fields_info_text(&self) -> ProbeResult<Vec<Element>> {
        self.base.find_all(&Self::DETAIL_FIELDS_INFO)
    }

    /// Remaining characters for the summary
    pub fn summary_character_count(&self) -> ProbeResult<String> {
        self.base.find(&Self::SUMMARY_CHAR_COUNT)?.text()
    }

    /// Type the description
    pub fn set_addon_description(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::DESCRIPTION_FIELD, value)
    }

    /// Experimental checkbox
    pub fn is_experimental(&self) -> ProbeResult<Element> {
        self.base.find(&Self::IS_EXPERIMENTAL)
    }

    /// Requires-payment checkbox
    pub fn requires_payment(&self) -> ProbeResult<Element> {
        self.base.find(&Self::REQUIRES_PAYMENT)
    }

    /// Category picker
    pub fn categories_section(&self) -> ProbeResult<Element> {
        self.base.find(&Self::CATEGORIES_SECTION)
    }

    /// Tick the `index`-th Firefox category
    pub fn select_firefox_categories(&self, index: usize) -> ProbeResult<()> {
        self.click_nth(&Self::FIREFOX_CATEGORIES, index)
    }

    /// Tick the `index`-th Android category
    pub fn select_android_categories(&self, index: usize) -> ProbeResult<()> {
        self.click_nth(&Self::ANDROID_CATEGORIES, index)
    }

    /// Type the support email
    pub fn email_input_field(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::SUPPORT_EMAIL, value)
    }

    /// Type the support site
    pub fn support_site_input_field(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::SUPPORT_SITE, value)
    }

    /// License radio buttons
    pub fn select_license_options(&self) -> ProbeResult<Vec<Element>> {
        self.base.find_all(&Self::LICENSE_OPTIONS)
    }

    /// Attribute `name` of the `index`-th license option
    pub fn license_option_names(&self, index: usize, name: &str) -> ProbeResult<Option<String>> {
        let options = self.select_license_options()?;
        match options.get(index) {
            Some(option) => option.attribute(name),
            None => Err(ProbeError::assertion(format!(
                "license option {index} out of range ({} available)",
                options.len()
            ))),
        }
    }

    /// Reveal the custom license fields
    pub fn license_details_link(&self) -> ProbeResult<()> {
        self.base.find(&Self::LICENSE_DETAILS_LINK)?.click()
    }

    /// Type the custom license name
    pub fn set_custom_license_name(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::CUSTOM_LICENSE_NAME, value)
    }

    /// Type the custom license text
    pub fn set_custom_license_text(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::CUSTOM_LICENSE_TEXT, value)
    }

    /// Enable the privacy policy and type its text
    pub fn set_privacy_policy(&self, value: &str) -> ProbeResult<()> {
        self.base.find(&Self::PRIVACY_POLICY_CHECKBOX)?.click()?;
        self.type_into(&Self::PRIVACY_POLICY_TEXT, value)
    }

    /// Type notes for the reviewers
    pub fn set_reviewer_notes(&self, value: &str) -> ProbeResult<()> {
        self.type_into(&Self::REVIEWER_NOTES, value)
    }

    /// Submit the listing
    pub fn submit_addon(&self) -> ProbeResult<SubmissionConfirmationPage> {
        self.base.find(&Self::SUBMIT)?.click()?;
        self.base.follow()
    }

    /// Abandon the listing and land on the edit page
    pub fn cancel_submission(&self) -> ProbeResult<EditAddon> {
        self.base.find(&Self::CANCEL)?.click()?;
        self.base.follow()
    }
}

// =============================================================================
// CONFIRMATION
// =============================================================================

/// Final step of a submission
#[derive(Debug, Clone)]
pub struct SubmissionConfirmationPage {
    base: PageObject,
}

locators! {
    SubmissionConfirmationPage {
        HEADER = css(".addon-submission-process h3"),
        MESSAGES = css(".addon-submission-process p"),
        MANAGE_LISTING = link_text("Go to My Submissions"),
        EDIT_VERSION = css(".addon-submission-process p:nth-child(6) > a"),
        EDIT_LISTING = link_text("Manage Listing"),
        THEME_PREVIEW = css(".addon-submission-process img"),
    }
}

impl Page for SubmissionConfirmationPage {
    const NAME: &'static str = "SubmissionConfirmationPage";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::HEADER)?;
        Ok(self)
    }
}

impl SubmissionConfirmationPage {
    /// Confirmation paragraphs
    pub fn submission_confirmation_messages(&self) -> ProbeResult<Vec<Element>> {
        self.base.find_all(&Self::MESSAGES)
    }

    /// Back to the add-on list
    pub fn click_manage_listing_button(&self) -> ProbeResult<ManageAddons> {
        self.base.find(&Self::MANAGE_LISTING)?.click()?;
        self.base.follow()
    }

    /// Open the version list of the new add-on
    pub fn click_edit_version_button(&self) -> ProbeResult<ManageVersions> {
        self.base.find(&Self::EDIT_VERSION)?.click()?;
        self.base.follow()
    }

    /// Open the listing editor of the new add-on
    pub fn click_edit_listing_button(&self) -> ProbeResult<EditAddon> {
        self.base.find(&Self::EDIT_LISTING)?.click()?;
        self.base.follow()
    }

    /// Preview generated for a theme submission
    pub fn generated_theme_preview(&self) -> ProbeResult<Element> {
        self.base.find(&Self::THEME_PREVIEW)
    }
}
