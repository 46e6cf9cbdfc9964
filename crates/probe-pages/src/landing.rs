//! Resolve the browser's current URL to a loaded page.
//!
//! Useful after flows whose destination depends on server state, such as a
//! login redirect or a submission that may skip the source step.

use crate::developers::{
    DevHubHome, EditAddon, ListedAddonSubmissionForm, ManageAddons, ManageVersions,
    SubmissionConfirmationPage, SubmitAddon, UploadSource,
};
use crate::frontend::{Search, UserProfile};
use amo_probe::{Page, PageRegistry, ProbeError, ProbeResult, Session};

/// A page the browser may have landed on
#[derive(Debug, Clone)]
pub enum DevHubPage {
    /// Developer Hub landing page
    Home(DevHubHome),
    /// List of the developer's submissions
    ManageAddons(ManageAddons),
    /// Status and versions of one add-on
    ManageVersions(ManageVersions),
    /// Listing editor of one add-on
    EditAddon(EditAddon),
    /// Distribution and upload steps
    SubmitAddon(SubmitAddon),
    /// Source code step
    UploadSource(UploadSource),
    /// Listing details form of a listed submission
    ListedForm(ListedAddonSubmissionForm),
    /// Final step of a submission
    Confirmation(SubmissionConfirmationPage),
    /// Public user profile
    UserProfile(UserProfile),
    /// Search results
    Search(Search),
}

impl DevHubPage {
    /// Name of the wrapped page
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home(_) => DevHubHome::NAME,
            Self::ManageAddons(_) => ManageAddons::NAME,
            Self::ManageVersions(_) => ManageVersions::NAME,
            Self::EditAddon(_) => EditAddon::NAME,
            Self::SubmitAddon(_) => SubmitAddon::NAME,
            Self::UploadSource(_) => UploadSource::NAME,
            Self::ListedForm(_) => ListedAddonSubmissionForm::NAME,
            Self::Confirmation(_) => SubmissionConfirmationPage::NAME,
            Self::UserProfile(_) => UserProfile::NAME,
            Self::Search(_) => Search::NAME,
        }
    }
}

/// URL patterns of every known page; earlier patterns win
#[must_use]
pub fn registry() -> PageRegistry {
    PageRegistry::new()
        .with_page(SubmitAddon::NAME, "/:locale/developers/addon/submit/:step")
        .with_page(UploadSource::NAME, "/:locale/developers/addon/:slug/submit/source")
        .with_page(
            ListedAddonSubmissionForm::NAME,
            "/:locale/developers/addon/:slug/submit/details",
        )
        .with_page(
            SubmissionConfirmationPage::NAME,
            "/:locale/developers/addon/:slug/submit/finish",
        )
        .with_page(ManageVersions::NAME, "/:locale/developers/addon/:slug/versions")
        .with_page(EditAddon::NAME, "/:locale/developers/addon/:slug/edit")
        .with_page(ManageAddons::NAME, "/:locale/developers/addons")
        .with_page(DevHubHome::NAME, "/:locale/developers")
        .with_page(Search::NAME, "/:locale/firefox/search")
        .with_page(UserProfile::NAME, "/:locale/firefox/user/:user")
}

/// Slug of the add-on a developer page belongs to
#[must_use]
pub fn addon_slug(url: &str) -> Option<String> {
    let registry = registry();
    let name = registry.identify(url)?;
    registry
        .get(name)?
        .extract_params(url)
        .remove("slug")
}

/// Identify the current page and run its load barrier
pub fn landed(session: &Session) -> ProbeResult<DevHubPage> {
    let url = session.current_url()?;
    let Some(name) = registry().identify(&url) else {
        return Err(ProbeError::assertion(format!("no known page at {url}")));
    };
    tracing::debug!(%url, page = name, "landed");

    let page = match name {
        DevHubHome::NAME => DevHubPage::Home(DevHubHome::wait_for_page(session)?),
        ManageAddons::NAME => DevHubPage::ManageAddons(ManageAddons::wait_for_page(session)?),
        ManageVersions::NAME => DevHubPage::ManageVersions(ManageVersions::wait_for_page(session)?),
        EditAddon::NAME => DevHubPage::EditAddon(EditAddon::wait_for_page(session)?),
        SubmitAddon::NAME => DevHubPage::SubmitAddon(SubmitAddon::wait_for_page(session)?),
        UploadSource::NAME => DevHubPage::UploadSource(UploadSource::wait_for_page(session)?),
        ListedAddonSubmissionForm::NAME => {
            DevHubPage::ListedForm(ListedAddonSubmissionForm::wait_for_page(session)?)
        }
        SubmissionConfirmationPage::NAME => {
            DevHubPage::Confirmation(SubmissionConfirmationPage::wait_for_page(session)?)
        }
        UserProfile::NAME => DevHubPage::UserProfile(UserProfile::wait_for_page(session)?),
        Search::NAME => DevHubPage::Search(Search::wait_for_page(session)?),
        other => return Err(ProbeError::assertion(format!("page {other} has no constructor"))),
    };
    Ok(page)
}
