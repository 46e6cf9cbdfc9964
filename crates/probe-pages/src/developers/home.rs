//! DevHub home page and its regions.

use crate::developers::{ManageAddons, SubmitAddon};
use crate::frontend::UserProfile;
use crate::login::LoginPage;
use crate::mail::{MailMessage, Mailbox, MAIL_POLL};
use amo_probe::{
    locators, Element, Page, PageObject, Poller, ProbeError, ProbeResult, Region, Scope,
};

/// Developer Hub landing page
#[derive(Debug, Clone)]
pub struct DevHubHome {
    base: PageObject,
}

locators! {
    DevHubHome {
        PAGE_LOGO = css(".DevHub-Navigation-Logo"),
        EXTENSION_WORKSHOP = css(".DevHub-Navigation-Item:nth-child(1) a"),
        DOCUMENTATION = css(".DevHub-Navigation-Item:nth-child(2) a"),
        SUPPORT = css(".DevHub-Navigation-Item:nth-child(3) a"),
        BLOG = css(".DevHub-Navigation-Item:nth-child(4) a"),
        HEADER_LOGIN_BUTTON = css(".DevHub-Navigation-Register a"),
        USER_AVATAR = css(".DevHub-Navigation-Avatar img"),
        USER_PROFILE_LINK = css(".DevHub-Navigation-Avatar a"),
        MY_ADDONS_HEADER_LINK = css(".DevHub-Navigation-MyAddons a"),
        SIGN_OUT = link_text("Sign out"),
        OVERVIEW_TITLE = css(".DevHub-Overview h2"),
        OVERVIEW_SUMMARY = css(".DevHub-Overview p"),
        OVERVIEW_LEARN_HOW = css(".DevHub-Overview .Button"),
        CONTENT_TITLE = css(".DevHub-content-header h2"),
        CONTENT_SUMMARY = css(".DevHub-content-copy p"),
        CONTENT_IMAGE = css(".DevHub-content-image"),
        CONTENT_LOGIN_LINK = css(".DevHub-content-copy a"),
        GET_INVOLVED_TITLE = css(".DevHub-callout-box h2"),
        GET_INVOLVED_SUMMARY = css(".DevHub-callout-box p"),
        GET_INVOLVED_IMAGE = css(".DevHub-callout-box img"),
        GET_INVOLVED_LINK = css(".DevHub-callout-box a"),
        HERO_BANNER_HEADER = css(".DevHub-Hero-LoggedIn h1"),
        HERO_BANNER_TEXT = css(".DevHub-Hero-LoggedIn p"),
        HERO_BANNER_LINK = css(".DevHub-Hero-LoggedIn a"),
        MY_ADDONS_ITEM = class_name("DevHub-MyAddons-item"),
        SEE_ALL_ADDONS = css(".DevHub-MyAddons-item-buttons-all"),
        SUBMIT_ADDON = css(".DevHub-MyAddons-item-buttons-submit a:nth-child(1)"),
        SUBMIT_THEME = css(".DevHub-MyAddons-item-buttons-submit a:nth-child(2)"),
    }
}

impl Page for DevHubHome {
    const NAME: &'static str = "DevHubHome";

    fn path() -> Option<&'static str> {
        Some("/en-US/developers/")
    }

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::PAGE_LOGO)?;
        Ok(self)
    }
}

impl DevHubHome {
    fn text(&self, locator: &amo_probe::Locator) -> ProbeResult<String> {
        self.base.find(locator)?.text()
    }

    /// Click an external link and wait for the URL to reach `fragment`
    fn leave_via(&self, locator: &amo_probe::Locator, fragment: &str) -> ProbeResult<String> {
        self.base.find(locator)?.click_and_navigate()?;
        self.base.wait_for_current_url(fragment)
    }

    // ===== Header =====

    /// Site logo
    pub fn page_logo(&self) -> ProbeResult<Element> {
        self.base.find(&Self::PAGE_LOGO)
    }

    /// Click the logo, which reloads the home page
    pub fn click_page_logo(&self) -> ProbeResult<Self> {
        self.base.find(&Self::PAGE_LOGO)?.click()?;
        self.base.follow()
    }

    /// Header Extension Workshop link
    pub fn click_extension_workshop(&self) -> ProbeResult<String> {
        self.leave_via(&Self::EXTENSION_WORKSHOP, "extensionworkshop")
    }

    /// Header Documentation link
    pub fn click_documentation(&self) -> ProbeResult<String> {
        self.leave_via(&Self::DOCUMENTATION, "developer.mozilla.org")
    }

    /// Header Support link
    pub fn click_support(&self) -> ProbeResult<String> {
        self.leave_via(&Self::SUPPORT, "Add-ons#Get_in_touch")
    }

    /// Header Blog link
    pub fn click_blog(&self) -> ProbeResult<String> {
        self.leave_via(&Self::BLOG, "blog.mozilla.org")
    }

    /// Block until the Extension Workshop has loaded
    pub fn extension_workshop_is_loaded(&self) -> ProbeResult<String> {
        self.base.wait_for_current_url("extensionworkshop")
    }

    /// Header login button (visible when logged out)
    pub fn header_login_button(&self) -> ProbeResult<Element> {
        self.base.find(&Self::HEADER_LOGIN_BUTTON)
    }

    /// User avatar (visible when logged in)
    pub fn user_avatar(&self) -> ProbeResult<Element> {
        self.base.find(&Self::USER_AVATAR)
    }

    /// Whether a user is logged in
    pub fn is_logged_in(&self) -> ProbeResult<bool> {
        self.base.is_element_displayed(&Self::USER_AVATAR)
    }

    /// Log in as the configured user `user`
    pub fn devhub_login(&self, user: &str) -> ProbeResult<Self> {
        let credentials = self.base.session().config().user(user)?.clone();
        self.base.find(&Self::HEADER_LOGIN_BUTTON)?.click()?;
        let login: LoginPage = self.base.follow()?;
        login.login(&credentials)
    }

    /// Sign out
    pub fn click_sign_out(&self) -> ProbeResult<Self> {
        self.base.find(&Self::SIGN_OUT)?.click()?;
        self.base.follow()
    }

    /// Header My Add-ons link
    pub fn click_my_addons_header_link(&self) -> ProbeResult<ManageAddons> {
        self.base.find(&Self::MY_ADDONS_HEADER_LINK)?.click()?;
        self.base.follow()
    }

    /// Avatar link to the user's public profile
    pub fn click_user_profile_picture(&self) -> ProbeResult<UserProfile> {
        self.base.find(&Self::USER_PROFILE_LINK)?.click()?;
        self.base.follow()
    }

    // ===== Page sections =====

    /// Overview section title
    pub fn devhub_overview_title(&self) -> ProbeResult<String> {
        self.text(&Self::OVERVIEW_TITLE)
    }

    /// Overview section summary
    pub fn devhub_overview_summary(&self) -> ProbeResult<String> {
        self.text(&Self::OVERVIEW_SUMMARY)
    }

    /// Overview "learn how" button, which opens the Extension Workshop
    pub fn click_overview_learn_how_button(&self) -> ProbeResult<String> {
        self.leave_via(&Self::OVERVIEW_LEARN_HOW, "extensionworkshop")
    }

    /// Content section title
    pub fn devhub_content_title(&self) -> ProbeResult<String> {
        self.text(&Self::CONTENT_TITLE)
    }

    /// Content section summary
    pub fn devhub_content_summary(&self) -> ProbeResult<String> {
        self.text(&Self::CONTENT_SUMMARY)
    }

    /// Content section illustration
    pub fn devhub_content_image(&self) -> ProbeResult<Element> {
        self.base.find(&Self::CONTENT_IMAGE)
    }

    /// Content section login link, which opens the accounts site
    pub fn click_content_login_link(&self) -> ProbeResult<LoginPage> {
        self.base.find(&Self::CONTENT_LOGIN_LINK)?.click()?;
        self.base.follow()
    }

    /// Get Involved section title
    pub fn devhub_get_involved_title(&self) -> ProbeResult<String> {
        self.text(&Self::GET_INVOLVED_TITLE)
    }

    /// Get Involved section summary
    pub fn devhub_get_involved_summary(&self) -> ProbeResult<String> {
        self.text(&Self::GET_INVOLVED_SUMMARY)
    }

    /// Get Involved section illustration
    pub fn devhub_get_involved_image(&self) -> ProbeResult<Element> {
        self.base.find(&Self::GET_INVOLVED_IMAGE)
    }

    /// Get Involved link, which opens the contribute wiki page
    pub fn click_get_involved_link(&self) -> ProbeResult<String> {
        self.base.find(&Self::GET_INVOLVED_LINK)?.click_and_navigate()?;
        self.base.wait_for_title_update("Add-ons/Contribute")
    }

    /// Logged-in hero banner header
    pub fn logged_in_hero_banner_header(&self) -> ProbeResult<String> {
        self.text(&Self::HERO_BANNER_HEADER)
    }

    /// Logged-in hero banner text
    pub fn logged_in_hero_banner_text(&self) -> ProbeResult<String> {
        self.text(&Self::HERO_BANNER_TEXT)
    }

    /// Logged-in hero banner Extension Workshop link
    pub fn click_logged_in_hero_banner_extension_workshop_link(&self) -> ProbeResult<String> {
        self.leave_via(&Self::HERO_BANNER_LINK, "extensionworkshop")
    }

    // ===== My Add-ons =====

    /// Latest add-ons of the logged-in user (at most three)
    pub fn my_addons_list(&self) -> ProbeResult<Vec<MyAddonItem>> {
        Ok(self
            .base
            .find_all(&Self::MY_ADDONS_ITEM)?
            .into_iter()
            .map(|root| MyAddonItem {
                region: Region::from_element(root, "MyAddonItem"),
            })
            .collect())
    }

    /// "See all" link under the add-on list
    pub fn click_see_all_addons_link(&self) -> ProbeResult<ManageAddons> {
        self.base.find(&Self::SEE_ALL_ADDONS)?.click()?;
        self.base.follow()
    }

    /// Submit a new add-on
    pub fn click_submit_addon_button(&self) -> ProbeResult<SubmitAddon> {
        self.base.find(&Self::SUBMIT_ADDON)?.click()?;
        self.base.follow()
    }

    /// Submit a new theme
    pub fn click_submit_theme_button(&self) -> ProbeResult<SubmitAddon> {
        self.base.find(&Self::SUBMIT_THEME)?.click()?;
        self.base.follow()
    }

    // ===== Regions =====

    /// "Connect with us" block
    pub fn connect(&self) -> ProbeResult<Connect> {
        Ok(Connect {
            region: Region::locate(&self.base, &Connect::ROOT, "Connect")?,
        })
    }

    /// Site footer
    pub fn footer(&self) -> ProbeResult<Footer> {
        Ok(Footer {
            region: Region::locate(&self.base, &Footer::ROOT, "Footer")?,
        })
    }

    /// Switch the site language through the footer picker
    pub fn footer_language_picker(&self, language: &str) -> ProbeResult<Self> {
        self.footer()?.select_language(language)
    }
}

// =============================================================================
// MY ADD-ONS ITEM
// =============================================================================

/// Rating shown for an add-on in the My Add-ons list
#[derive(Debug, Clone)]
pub enum AddonRating {
    /// Placeholder text such as "Not yet rated"
    NotYetRated(String),
    /// Star widget
    Stars(Element),
}

/// One entry in the My Add-ons list
#[derive(Debug, Clone)]
pub struct MyAddonItem {
    region: Region,
}

locators! {
    MyAddonItem {
        ICON = css(".DevHub-MyAddons-item-icon"),
        NAME = css(".DevHub-MyAddons-item-name"),
        VERSION_NUMBER = css(".DevHub-MyAddons-VersionNumber"),
        LAST_MODIFIED = css(".DevHub-MyAddons-item-modified"),
        NOT_RATED = css(".DevHub-MyAddons-item-rating-placeholder"),
        RATING_STARS = css(".DevHub-MyAddons-item-rating .Rating"),
        VERSION_STATUS = css(".DevHub-MyAddons-item-versions > span"),
        UNLISTED_BADGE = css(".DevHub-MyAddons-item-unlisted"),
    }
}

impl MyAddonItem {
    /// The item's region
    #[must_use]
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// Add-on icon
    pub fn icon(&self) -> ProbeResult<Element> {
        self.region.find(&Self::ICON)
    }

    /// Add-on name
    pub fn name(&self) -> ProbeResult<Element> {
        self.region.find(&Self::NAME)
    }

    /// Latest version number
    pub fn version_number(&self) -> ProbeResult<Element> {
        self.region.find(&Self::VERSION_NUMBER)
    }

    /// Last modified date
    pub fn last_modified_date(&self) -> ProbeResult<Element> {
        self.region.find(&Self::LAST_MODIFIED)
    }

    /// Latest version review status
    pub fn version_status(&self) -> ProbeResult<Element> {
        self.region.find(&Self::VERSION_STATUS)
    }

    /// Placeholder text for unrated add-ons, stars otherwise
    pub fn rating(&self) -> ProbeResult<AddonRating> {
        match self.region.find_optional(&Self::NOT_RATED)? {
            Some(placeholder) => Ok(AddonRating::NotYetRated(placeholder.text()?)),
            None => Ok(AddonRating::Stars(self.region.find(&Self::RATING_STARS)?)),
        }
    }

    /// Listed add-ons carry no unlisted badge
    pub fn is_listed_addon(&self) -> ProbeResult<bool> {
        Ok(self.region.find_optional(&Self::UNLISTED_BADGE)?.is_none())
    }
}

// =============================================================================
// CONNECT
// =============================================================================

/// Social links and newsletter signup
#[derive(Debug, Clone)]
pub struct Connect {
    region: Region,
}

locators! {
    Connect {
        ROOT = class_name("DevHub-Connect"),
        TITLE = css(".DevHub-Connect-title"),
        TWITTER_TITLE = css(".DevHub-Connect-twitter h3"),
        TWITTER_LINKS = css(".DevHub-Connect-twitter a"),
        MORE_TITLE = css(".DevHub-Connect-more h3"),
        MORE_LINKS = css(".DevHub-Connect-more a"),
        NEWSLETTER_HEADER = css(".DevHub-Newsletter h3"),
        NEWSLETTER_INFO = css(".DevHub-Newsletter-info"),
        NEWSLETTER_PRIVACY_LINK = css(".DevHub-Newsletter-privacy a"),
        NEWSLETTER_EMAIL = id("newsletter-email"),
        NEWSLETTER_PRIVACY_CHECKBOX = id("newsletter-privacy"),
        NEWSLETTER_SIGN_UP = css(".DevHub-Newsletter-signup button"),
        SIGNUP_CONFIRMATION_HEADER = css(".DevHub-Newsletter-thanks h3"),
        SIGNUP_CONFIRMATION_MESSAGE = css(".DevHub-Newsletter-thanks p"),
    }
}

impl Connect {
    fn text(&self, locator: &amo_probe::Locator) -> ProbeResult<String> {
        self.region.find(locator)?.text()
    }

    /// Block title
    pub fn connect_footer_title(&self) -> ProbeResult<String> {
        self.text(&Self::TITLE)
    }

    /// Twitter column title
    pub fn connect_twitter_title(&self) -> ProbeResult<String> {
        self.text(&Self::TWITTER_TITLE)
    }

    /// Twitter links
    pub fn twitter_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::TWITTER_LINKS)
    }

    /// "More" column title
    pub fn connect_more_title(&self) -> ProbeResult<String> {
        self.text(&Self::MORE_TITLE)
    }

    /// Chat and forum links
    pub fn more_connect_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::MORE_LINKS)
    }

    /// Newsletter header
    pub fn newsletter_section_header(&self) -> ProbeResult<String> {
        self.text(&Self::NEWSLETTER_HEADER)
    }

    /// Newsletter explanation
    pub fn newsletter_info_text(&self) -> ProbeResult<String> {
        self.text(&Self::NEWSLETTER_INFO)
    }

    /// Open the newsletter privacy notice
    pub fn click_newsletter_privacy_notice_link(&self) -> ProbeResult<()> {
        self.region
            .find(&Self::NEWSLETTER_PRIVACY_LINK)?
            .click_and_navigate()
    }

    /// Type the signup address
    pub fn newsletter_email_input_field(&self, email: &str) -> ProbeResult<()> {
        self.region.find(&Self::NEWSLETTER_EMAIL)?.send_keys(email)
    }

    /// Accept the privacy policy
    pub fn click_privacy_checkbox(&self) -> ProbeResult<()> {
        self.region.find(&Self::NEWSLETTER_PRIVACY_CHECKBOX)?.click()
    }

    /// Sign up button
    pub fn newsletter_sign_up(&self) -> ProbeResult<Element> {
        self.region.find(&Self::NEWSLETTER_SIGN_UP)
    }

    /// Submit the form and wait for the form to give way to the confirmation
    pub fn sign_up_to_newsletter(&self) -> ProbeResult<()> {
        let button = self.newsletter_sign_up()?;
        button.click()?;
        self.region.wait_for_element_hidden(&button)?;
        let _ = self.region.wait_for_visible(&Self::SIGNUP_CONFIRMATION_HEADER)?;
        Ok(())
    }

    /// Confirmation header shown after signing up
    pub fn newsletter_signup_confirmation_header(&self) -> ProbeResult<String> {
        self.text(&Self::SIGNUP_CONFIRMATION_HEADER)
    }

    /// Confirmation message shown after signing up
    pub fn newsletter_signup_confirmation_message(&self) -> ProbeResult<String> {
        self.text(&Self::SIGNUP_CONFIRMATION_MESSAGE)
    }

    /// Poll `mailbox` until the subscription confirmation for `email` arrives
    pub fn check_newsletter_signup_email(
        &self,
        mailbox: &dyn Mailbox,
        email: &str,
    ) -> ProbeResult<MailMessage> {
        let poller = Poller::new(self.region.session().clock().clone(), MAIL_POLL);
        let mut received = None;
        let _ = poller.poll_until(
            format!("newsletter confirmation for {email}"),
            || Ok(()),
            || {
                received = mailbox.latest_message(email)?;
                Ok(received
                    .as_ref()
                    .map(|m| m.subject.clone())
                    .unwrap_or_default())
            },
            |subject| !subject.is_empty(),
        )?;
        received.ok_or_else(|| ProbeError::assertion(format!("no message for {email}")))
    }
}

// =============================================================================
// FOOTER
// =============================================================================

/// Site footer with link groups and the language picker
#[derive(Debug, Clone)]
pub struct Footer {
    region: Region,
}

locators! {
    Footer {
        ROOT = css(".Footer"),
        MOZILLA_LINK = css(".Footer-mozilla-link"),
        ADDON_LINKS = css(".Footer-amo-links a"),
        BROWSERS_LINKS = css(".Footer-browsers-links a"),
        PRODUCTS_LINKS = css(".Footer-product-links a"),
        SOCIAL_LINKS = css(".Footer-social-links a"),
        LEGAL_LINKS = css(".Footer-legal-links a"),
        LANGUAGE_PICKER = id("lang-picker"),
        LANGUAGE_OPTION = tag_name("option"),
    }
}

impl Footer {
    /// Mozilla logo link
    pub fn mozilla_link(&self) -> ProbeResult<Element> {
        self.region.find(&Self::MOZILLA_LINK)
    }

    /// Add-ons column links
    pub fn addon_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::ADDON_LINKS)
    }

    /// Browsers column links
    pub fn browsers_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::BROWSERS_LINKS)
    }

    /// Products column links
    pub fn products_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::PRODUCTS_LINKS)
    }

    /// Social links
    pub fn social_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::SOCIAL_LINKS)
    }

    /// Legal links
    pub fn legal_links(&self) -> ProbeResult<Vec<Element>> {
        self.region.find_all(&Self::LEGAL_LINKS)
    }

    /// Pick `language` by its displayed name; the page reloads localized
    pub fn select_language(&self, language: &str) -> ProbeResult<DevHubHome> {
        let picker = Region::locate(&self.region, &Self::LANGUAGE_PICKER, "LanguagePicker")?;
        let mut available = Vec::new();
        for option in picker.find_all(&Self::LANGUAGE_OPTION)? {
            let name = option.attribute("textContent")?.unwrap_or_default();
            if name.trim() == language {
                option.click_and_navigate()?;
                return DevHubHome::wait_for_page(self.region.session());
            }
            available.push(name);
        }
        Err(ProbeError::assertion(format!(
            "language {language:?} not offered; available: {available:?}"
        )))
    }
}
