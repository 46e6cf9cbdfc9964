//! Public user profile.

use amo_probe::{locators, Page, PageObject, ProbeResult, Scope, Session};

/// A user's public profile page
#[derive(Debug, Clone)]
pub struct UserProfile {
    base: PageObject,
}

locators! {
    UserProfile {
        USER_DISPLAY_NAME = class_name("UserProfile-name"),
        USER_AVATAR = css(".UserProfile-avatar img"),
        USER_HOMEPAGE = css(".UserProfile-homepage a"),
        ADDONS_COUNT = css(".UserProfile-number-of-addons dd"),
        EDIT_PROFILE = class_name("UserProfile-edit-link"),
    }
}

impl Page for UserProfile {
    const NAME: &'static str = "UserProfile";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        self.wait_for_user_to_load()
    }
}

impl UserProfile {
    /// Open the profile of user `user_id`
    pub fn open_for(session: &Session, user_id: &str) -> ProbeResult<Self> {
        Self::open_at(session, &format!("/en-US/firefox/user/{user_id}/"))
    }

    /// Block until the profile card has rendered the user's name
    pub fn wait_for_user_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::USER_DISPLAY_NAME)?;
        Ok(self)
    }

    /// Displayed user name
    pub fn user_display_name(&self) -> ProbeResult<String> {
        self.base.find(&Self::USER_DISPLAY_NAME)?.text()
    }

    /// Whether the avatar image is shown
    pub fn has_avatar(&self) -> ProbeResult<bool> {
        self.base.is_element_displayed(&Self::USER_AVATAR)
    }

    /// Homepage link target, if the user set one
    pub fn user_homepage(&self) -> ProbeResult<Option<String>> {
        match self.base.find_optional(&Self::USER_HOMEPAGE)? {
            Some(link) => link.attribute("href"),
            None => Ok(None),
        }
    }

    /// Number of add-ons shown on the card
    pub fn addons_count(&self) -> ProbeResult<String> {
        self.base.find(&Self::ADDONS_COUNT)?.text()
    }

    /// Whether the viewer may edit this profile
    pub fn can_edit_profile(&self) -> ProbeResult<bool> {
        Ok(self.base.find_optional(&Self::EDIT_PROFILE)?.is_some())
    }
}
