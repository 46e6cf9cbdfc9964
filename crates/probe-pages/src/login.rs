//! Account login (two-step email then password form).

use amo_probe::{locators, Credentials, Page, PageObject, ProbeResult, Scope};

/// Accounts login page
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: PageObject,
}

locators! {
    LoginPage {
        EMAIL = name("email"),
        CONTINUE = css(".button-row button"),
        PASSWORD = id("password"),
        SUBMIT = id("submit-btn"),
    }
}

impl Page for LoginPage {
    const NAME: &'static str = "LoginPage";

    fn from_base(base: PageObject) -> Self {
        Self { base }
    }

    fn base(&self) -> &PageObject {
        &self.base
    }

    fn wait_for_page_to_load(self) -> ProbeResult<Self> {
        let _ = self.base.wait_for_visible(&Self::EMAIL)?;
        Ok(self)
    }
}

impl LoginPage {
    /// Sign in and return to the page that started the login
    pub fn login<P: Page>(self, credentials: &Credentials) -> ProbeResult<P> {
        tracing::debug!(email = %credentials.email, "login");
        self.base.find(&Self::EMAIL)?.send_keys(&credentials.email)?;
        self.base.find(&Self::CONTINUE)?.click()?;
        self.base
            .wait_for_visible(&Self::PASSWORD)?
            .send_keys(&credentials.password)?;
        self.base.find(&Self::SUBMIT)?.click()?;
        self.base.follow()
    }
}
