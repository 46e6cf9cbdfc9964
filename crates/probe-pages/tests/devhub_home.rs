//! DevHub home page scenarios against the in-memory driver
//!
//! Covers the header edges, login and logout, the My Add-ons list, the
//! newsletter signup and the footer language picker.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use amo_probe::{
    Credentials, FakeClock, MockDriver, Node, Page, ProbeError, ProbeResult, Session,
    SessionConfig,
};
use amo_probe_pages::developers::{AddonRating, DevHubHome, ManageAddons};
use amo_probe_pages::{MailMessage, Mailbox};

const BASE: &str = "https://amo.test";
const HOME: &str = "/en-US/developers/";

// ============================================================================
// Fixture site
// ============================================================================

fn nav_item(href: &str, label: &str) -> Node {
    Node::new("li")
        .class("DevHub-Navigation-Item")
        .child(Node::new("a").attr("href", href).text(label))
}

fn header() -> Node {
    Node::new("div").class("DevHub-Navigation").children([
        Node::new("a")
            .class("DevHub-Navigation-Logo")
            .attr("href", HOME)
            .text("Firefox Add-on Developer Hub"),
        Node::new("ul").children([
            nav_item("https://extensionworkshop.test/", "Extension Workshop"),
            nav_item("https://developer.mozilla.org/docs/Mozilla/Add-ons", "Documentation"),
            nav_item("https://wiki.mozilla.org/Add-ons#Get_in_touch", "Support"),
            nav_item("https://blog.mozilla.org/addons/", "Blog"),
        ]),
        Node::new("div")
            .class("DevHub-Navigation-Register")
            .child(Node::new("a").attr("href", "/accounts/login").text("Log in")),
    ])
}

fn logged_in_nodes() -> Vec<Node> {
    vec![
        Node::new("div").class("DevHub-Navigation-Avatar").child(
            Node::new("a")
                .attr("href", "/en-US/firefox/user/42/")
                .child(Node::new("img").attr("src", "/avatar.png")),
        ),
        Node::new("div")
            .class("DevHub-Navigation-MyAddons")
            .child(Node::new("a").attr("href", "/en-US/developers/addons").text("My Add-ons")),
        Node::new("a").class("sign-out").attr("href", "#").text("Sign out"),
        Node::new("div").class("DevHub-Hero-LoggedIn").children([
            Node::new("h1").text("Welcome back"),
            Node::new("p").text("Ready to build?"),
            Node::new("a").attr("href", "https://extensionworkshop.test/").text("Workshop"),
        ]),
        Node::new("div").class("DevHub-MyAddons").children([
            addon_item("Dark Reader", "4.9.1", None, true),
            addon_item("Tab Stash", "1.2", Some("4.5"), false),
            Node::new("div").class("DevHub-MyAddons-item-buttons-all").child(
                Node::new("a").attr("href", "/en-US/developers/addons").text("See all"),
            ),
        ]),
    ]
}

fn addon_item(name: &str, version: &str, rating: Option<&str>, listed: bool) -> Node {
    let mut item = Node::new("div").class("DevHub-MyAddons-item").children([
        Node::new("img").class("DevHub-MyAddons-item-icon"),
        Node::new("h3").class("DevHub-MyAddons-item-name").text(name),
        Node::new("span").class("DevHub-MyAddons-VersionNumber").text(version),
        Node::new("span")
            .class("DevHub-MyAddons-item-modified")
            .text("Last updated: Jan 5, 2026"),
        Node::new("div")
            .class("DevHub-MyAddons-item-versions")
            .child(Node::new("span").text("Approved")),
    ]);
    item = match rating {
        None => item.child(
            Node::new("div")
                .class("DevHub-MyAddons-item-rating-placeholder")
                .text("Not yet rated"),
        ),
        Some(stars) => item.child(
            Node::new("div")
                .class("DevHub-MyAddons-item-rating")
                .child(Node::new("div").class("Rating").attr("title", stars)),
        ),
    };
    if !listed {
        item = item.child(Node::new("span").class("DevHub-MyAddons-item-unlisted").text("Unlisted"));
    }
    item
}

fn connect() -> Node {
    Node::new("div").class("DevHub-Connect").children([
        Node::new("h2").class("DevHub-Connect-title").text("Connect with us"),
        Node::new("div").class("DevHub-Connect-twitter").children([
            Node::new("h3").text("Twitter"),
            Node::new("a").attr("href", "https://twitter.test/mozamo").text("@mozamo"),
            Node::new("a").attr("href", "https://twitter.test/rockyourfirefox").text("@rock"),
        ]),
        Node::new("div").class("DevHub-Connect-more").children([
            Node::new("h3").text("More"),
            Node::new("a").attr("href", "https://matrix.test/").text("Matrix"),
            Node::new("a").attr("href", "https://discourse.test/").text("Discourse"),
        ]),
        Node::new("div").class("DevHub-Newsletter").children([
            Node::new("h3").text("Stay updated"),
            Node::new("p").class("DevHub-Newsletter-info").text("Get news by email"),
            Node::new("div")
                .class("DevHub-Newsletter-privacy")
                .child(Node::new("a").attr("href", "https://mozilla.test/privacy").text("Privacy")),
            Node::new("input").id("newsletter-email").attr("type", "email"),
            Node::new("input").id("newsletter-privacy").attr("type", "checkbox"),
            Node::new("div")
                .class("DevHub-Newsletter-signup")
                .child(Node::new("button").text("Sign up now")),
            Node::new("div").class("DevHub-Newsletter-thanks").hidden().children([
                Node::new("h3").text("Thanks!"),
                Node::new("p").text("Check your inbox to confirm."),
            ]),
        ]),
    ])
}

fn footer() -> Node {
    Node::new("footer").class("Footer").children([
        Node::new("a").class("Footer-mozilla-link").attr("href", "https://mozilla.test/"),
        Node::new("ul").class("Footer-amo-links").children([
            Node::new("li").child(Node::new("a").attr("href", "/about").text("About")),
            Node::new("li").child(Node::new("a").attr("href", "/blog").text("Blog")),
        ]),
        Node::new("ul").class("Footer-browsers-links").children([
            Node::new("li").child(Node::new("a").attr("href", "/desktop").text("Desktop")),
        ]),
        Node::new("ul").class("Footer-product-links").children([
            Node::new("li").child(Node::new("a").attr("href", "/vpn").text("VPN")),
            Node::new("li").child(Node::new("a").attr("href", "/relay").text("Relay")),
            Node::new("li").child(Node::new("a").attr("href", "/monitor").text("Monitor")),
        ]),
        Node::new("ul").class("Footer-social-links").children([
            Node::new("li").child(Node::new("a").attr("href", "https://twitter.test/").text("Twitter")),
        ]),
        Node::new("ul").class("Footer-legal-links").children([
            Node::new("li").child(Node::new("a").attr("href", "/privacy").text("Privacy")),
            Node::new("li").child(Node::new("a").attr("href", "/legal").text("Legal")),
        ]),
        Node::new("select").id("lang-picker").children([
            Node::new("option").attr("value", "en-US").attr("selected", "selected").text("English (US)"),
            Node::new("option").attr("value", "de").text("Deutsch"),
            Node::new("option").attr("value", "fr").text("Français"),
        ]),
    ])
}

fn home_page() -> Node {
    Node::new("body").children([
        header(),
        Node::new("div").class("DevHub-Overview").children([
            Node::new("h2").text("Build extensions for Firefox"),
            Node::new("p").text("Create and share extensions."),
            Node::new("a")
                .class("Button")
                .attr("href", "https://extensionworkshop.test/")
                .text("Learn how"),
        ]),
        connect(),
        footer(),
    ])
}

fn login_page() -> Node {
    Node::new("body").child(Node::new("form").children([
        Node::new("input").attr("name", "email").attr("type", "email"),
        Node::new("div")
            .class("button-row")
            .child(Node::new("button").text("Continue")),
        Node::new("input").id("password").attr("type", "password").hidden(),
        Node::new("button").id("submit-btn").hidden().text("Sign in"),
    ]))
}

/// A site whose home page reflects a login flag flipped by the login form
fn site() -> (Arc<MockDriver>, Arc<AtomicBool>) {
    let driver = Arc::new(MockDriver::new(BASE));
    let logged_in = Arc::new(AtomicBool::new(false));

    driver.route(HOME, home_page());
    driver.route("/de/developers/", home_page());
    driver.route("/accounts/login", login_page());
    driver.route(
        "/en-US/developers/addons",
        Node::new("html").children([
            Node::new("head").child(Node::new("title").text("Manage My Submissions :: Developer Hub")),
            Node::new("body"),
        ]),
    );

    let flag = logged_in.clone();
    driver.on_load(HOME, move |doc| {
        if !flag.load(Ordering::SeqCst) {
            return;
        }
        for register in doc.select(".DevHub-Navigation-Register").unwrap() {
            doc.detach(register);
        }
        let nav = doc.select(".DevHub-Navigation").unwrap()[0];
        for node in logged_in_nodes() {
            let _ = doc.append_child(nav, node);
        }
    });

    driver
        .on_click(".button-row button", |doc, _| {
            for id in doc.select("#password, #submit-btn").unwrap() {
                doc.set_hidden(id, false);
            }
            None
        })
        .unwrap();

    let flag = logged_in.clone();
    driver
        .on_click("#submit-btn", move |doc, _| {
            let email = doc.select("input[name=email]").unwrap()[0];
            let password = doc.select("#password").unwrap()[0];
            let ok = doc.node(email).and_then(|n| n.attr("value")) == Some("dev@amo.test")
                && doc.node(password).and_then(|n| n.attr("value")) == Some("hunter2");
            flag.store(ok, Ordering::SeqCst);
            Some(HOME.to_string())
        })
        .unwrap();

    let flag = logged_in.clone();
    driver
        .on_click("a.sign-out", move |_, _| {
            flag.store(false, Ordering::SeqCst);
            Some(HOME.to_string())
        })
        .unwrap();

    driver
        .on_click("#lang-picker option", |doc, option| {
            let lang = doc.node(option)?.attr("value")?.to_string();
            Some(format!("/{lang}/developers/"))
        })
        .unwrap();

    driver
        .on_click(".DevHub-Newsletter-signup button", |doc, _| {
            for id in doc.select(".DevHub-Newsletter-signup").unwrap() {
                doc.set_hidden(id, true);
            }
            for id in doc.select(".DevHub-Newsletter-thanks").unwrap() {
                doc.set_hidden(id, false);
            }
            None
        })
        .unwrap();

    (driver, logged_in)
}

fn config() -> SessionConfig {
    SessionConfig::new(BASE).with_user("developer", Credentials::new("dev@amo.test", "hunter2"))
}

fn session() -> (Arc<MockDriver>, Session) {
    amo_probe::init_test_tracing();
    let (driver, _) = site();
    let session = Session::new(driver.clone(), config());
    (driver, session)
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn test_open_runs_barrier() {
    let (driver, session) = session();
    let home = DevHubHome::open(&session).unwrap();

    assert!(driver.was_called("navigate:https://amo.test/en-US/developers/"));
    assert_eq!(
        home.page_logo().unwrap().text().unwrap(),
        "Firefox Add-on Developer Hub"
    );
    assert!(!home.is_logged_in().unwrap());
    assert!(home.header_login_button().unwrap().is_displayed().unwrap());
}

#[test]
fn test_external_header_links() {
    let (_, session) = session();

    let url = DevHubHome::open(&session).unwrap().click_extension_workshop().unwrap();
    assert!(url.contains("extensionworkshop"));

    let url = DevHubHome::open(&session).unwrap().click_documentation().unwrap();
    assert!(url.starts_with("https://developer.mozilla.org"));

    let url = DevHubHome::open(&session).unwrap().click_support().unwrap();
    assert!(url.ends_with("#Get_in_touch"));

    let url = DevHubHome::open(&session).unwrap().click_blog().unwrap();
    assert!(url.contains("blog.mozilla.org"));
}

#[test]
fn test_logo_reloads_home() {
    let (driver, session) = session();
    let home = DevHubHome::open(&session).unwrap();
    let before = driver.document_count();

    let reloaded = home.click_page_logo().unwrap();
    assert_eq!(driver.document_count(), before + 1);
    assert!(reloaded.page_logo().is_ok());
}

#[test]
fn test_overview_section() {
    let (_, session) = session();
    let home = DevHubHome::open(&session).unwrap();
    assert_eq!(
        home.devhub_overview_title().unwrap(),
        "Build extensions for Firefox"
    );
    assert_eq!(
        home.devhub_overview_summary().unwrap(),
        "Create and share extensions."
    );
}

// ============================================================================
// Login
// ============================================================================

#[test]
fn test_login_and_logout() {
    let (driver, session) = session();
    let home = DevHubHome::open(&session).unwrap();

    let home = home.devhub_login("developer").unwrap();
    assert!(home.is_logged_in().unwrap());
    assert!(driver.was_called("send_keys:input:dev@amo.test"));
    assert!(driver.was_called("send_keys:input#password:hunter2"));
    assert_eq!(home.logged_in_hero_banner_header().unwrap(), "Welcome back");

    let home = home.click_sign_out().unwrap();
    assert!(!home.is_logged_in().unwrap());
}

#[test]
fn test_wrong_password_stays_logged_out() {
    let (driver, _) = site();
    let config = SessionConfig::new(BASE)
        .with_user("developer", Credentials::new("dev@amo.test", "wrong"));
    let session = Session::new(driver, config);

    let home = DevHubHome::open(&session)
        .unwrap()
        .devhub_login("developer")
        .unwrap();
    assert!(!home.is_logged_in().unwrap());
}

#[test]
fn test_unknown_user_is_a_config_error() {
    let (_, session) = session();
    let err = DevHubHome::open(&session)
        .unwrap()
        .devhub_login("admin")
        .unwrap_err();
    assert!(matches!(err, ProbeError::Config { .. }));
}

#[test]
fn test_page_is_stale_after_leaving() {
    let (_, session) = session();
    let home = DevHubHome::open(&session).unwrap();
    let _ = home.click_page_logo().unwrap();

    match home.page_logo().unwrap_err() {
        ProbeError::NotFound { scope, .. } => assert!(scope.starts_with("stale page DevHubHome")),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_my_addons_header_link() {
    let (_, session) = session();
    let home = DevHubHome::open(&session)
        .unwrap()
        .devhub_login("developer")
        .unwrap();

    let manage: ManageAddons = home.click_my_addons_header_link().unwrap();
    assert!(manage.base().title().unwrap().contains("Manage My Submissions"));
}

// ============================================================================
// My Add-ons
// ============================================================================

#[test]
fn test_my_addons_list() {
    let (_, session) = session();
    let home = DevHubHome::open(&session)
        .unwrap()
        .devhub_login("developer")
        .unwrap();

    let addons = home.my_addons_list().unwrap();
    assert_eq!(addons.len(), 2);

    let first = &addons[0];
    assert_eq!(first.name().unwrap().text().unwrap(), "Dark Reader");
    assert_eq!(first.version_number().unwrap().text().unwrap(), "4.9.1");
    assert_eq!(first.version_status().unwrap().text().unwrap(), "Approved");
    assert!(first.is_listed_addon().unwrap());
    match first.rating().unwrap() {
        AddonRating::NotYetRated(text) => assert_eq!(text, "Not yet rated"),
        AddonRating::Stars(_) => panic!("first add-on has no ratings"),
    }

    let second = &addons[1];
    assert!(!second.is_listed_addon().unwrap());
    match second.rating().unwrap() {
        AddonRating::Stars(stars) => {
            assert_eq!(stars.attribute("title").unwrap().as_deref(), Some("4.5"));
        }
        AddonRating::NotYetRated(_) => panic!("second add-on is rated"),
    }
}

#[test]
fn test_my_addons_list_empty_when_logged_out() {
    let (_, session) = session();
    let home = DevHubHome::open(&session).unwrap();
    assert!(home.my_addons_list().unwrap().is_empty());
}

#[test]
fn test_addon_items_are_scoped() {
    let (_, session) = session();
    let home = DevHubHome::open(&session)
        .unwrap()
        .devhub_login("developer")
        .unwrap();
    let addons = home.my_addons_list().unwrap();

    assert_eq!(addons[1].name().unwrap().text().unwrap(), "Tab Stash");
    assert_eq!(addons[1].version_number().unwrap().text().unwrap(), "1.2");
}

#[test]
fn test_see_all_link() {
    let (_, session) = session();
    let home = DevHubHome::open(&session)
        .unwrap()
        .devhub_login("developer")
        .unwrap();
    let addons = home.my_addons_list().unwrap();

    let _manage = home.click_see_all_addons_link().unwrap();
    let err = addons[0].name().unwrap_err();
    assert!(err.is_absence());
}

// ============================================================================
// Connect and newsletter
// ============================================================================

/// Delivers the message after a number of empty polls
struct SlowMailbox {
    polls: AtomicUsize,
    deliver_after: usize,
}

impl Mailbox for SlowMailbox {
    fn latest_message(&self, address: &str) -> ProbeResult<Option<MailMessage>> {
        let seen = self.polls.fetch_add(1, Ordering::SeqCst);
        Ok((seen >= self.deliver_after).then(|| MailMessage {
            to: address.to_string(),
            subject: "Please confirm your subscription".to_string(),
            body: String::new(),
        }))
    }
}

#[test]
fn test_connect_links() {
    let (_, session) = session();
    let connect = DevHubHome::open(&session).unwrap().connect().unwrap();

    assert_eq!(connect.connect_footer_title().unwrap(), "Connect with us");
    assert_eq!(connect.connect_twitter_title().unwrap(), "Twitter");
    assert_eq!(connect.twitter_links().unwrap().len(), 2);
    assert_eq!(connect.more_connect_links().unwrap().len(), 2);
    assert_eq!(connect.newsletter_section_header().unwrap(), "Stay updated");
}

#[test]
fn test_newsletter_signup() {
    let (driver, _) = site();
    let clock = FakeClock::shared();
    let session = Session::with_clock(driver, config(), clock.clone());
    let connect = DevHubHome::open(&session).unwrap().connect().unwrap();

    connect.newsletter_email_input_field("someone@restmail.test").unwrap();
    connect.click_privacy_checkbox().unwrap();
    connect.sign_up_to_newsletter().unwrap();
    assert_eq!(connect.newsletter_signup_confirmation_header().unwrap(), "Thanks!");

    let mailbox = SlowMailbox {
        polls: AtomicUsize::new(0),
        deliver_after: 3,
    };
    let message = connect
        .check_newsletter_signup_email(&mailbox, "someone@restmail.test")
        .unwrap();
    assert_eq!(message.to, "someone@restmail.test");
    assert!(message.subject.contains("confirm"));
    assert_eq!(mailbox.polls.load(Ordering::SeqCst), 4);
    assert_eq!(clock.sleep_count(), 3);
}

#[test]
fn test_newsletter_mail_never_arrives() {
    let (driver, _) = site();
    let clock = FakeClock::shared();
    let session = Session::with_clock(driver, config(), clock.clone());
    let connect = DevHubHome::open(&session).unwrap().connect().unwrap();

    let mailbox = SlowMailbox {
        polls: AtomicUsize::new(0),
        deliver_after: usize::MAX,
    };
    let err = connect
        .check_newsletter_signup_email(&mailbox, "nobody@restmail.test")
        .unwrap_err();
    assert!(matches!(err, ProbeError::Timeout { .. }));
    assert!(clock.now_ms() >= 60_000);
}

// ============================================================================
// Footer
// ============================================================================

#[test]
fn test_footer_link_groups() {
    let (_, session) = session();
    let footer = DevHubHome::open(&session).unwrap().footer().unwrap();

    assert_eq!(footer.addon_links().unwrap().len(), 2);
    assert_eq!(footer.browsers_links().unwrap().len(), 1);
    assert_eq!(footer.products_links().unwrap().len(), 3);
    assert_eq!(footer.social_links().unwrap().len(), 1);
    assert_eq!(footer.legal_links().unwrap().len(), 2);
    assert!(footer.mozilla_link().is_ok());
}

#[test]
fn test_footer_language_picker() {
    let (_, session) = session();
    let home = DevHubHome::open(&session)
        .unwrap()
        .footer_language_picker("Deutsch")
        .unwrap();

    assert!(home.base().current_url().unwrap().contains("/de/developers"));
    assert!(home.page_logo().is_ok());
}

#[test]
fn test_footer_language_picker_unknown_language() {
    let (_, session) = session();
    let err = DevHubHome::open(&session)
        .unwrap()
        .footer_language_picker("Klingon")
        .unwrap_err();

    match err {
        ProbeError::AssertionFailed { message } => {
            assert!(message.contains("Klingon"));
            assert!(message.contains("Deutsch"));
        }
        other => panic!("expected AssertionFailed, got {other:?}"),
    }
}
