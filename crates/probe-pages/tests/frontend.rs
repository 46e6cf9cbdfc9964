//! Public site pages and the submissions list against the in-memory driver

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use amo_probe::{
    FakeClock, MockDriver, Node, Page, PageObject, ProbeError, Session, SessionConfig,
    WaitConfig,
};
use amo_probe_pages::developers::{EditAddon, ManageAddons, ManageVersions};
use amo_probe_pages::frontend::{Categories, Search, UserProfile};

const BASE: &str = "https://amo.test";

fn session_with(driver: &Arc<MockDriver>) -> (Arc<FakeClock>, Session) {
    let clock = FakeClock::shared();
    let config = SessionConfig::new(BASE)
        .with_wait(WaitConfig::new().with_timeout(2_000).with_poll_interval(250));
    let session = Session::with_clock(driver.clone(), config, clock.clone());
    (clock, session)
}

fn category(name: &str, slug: &str) -> Node {
    Node::new("a")
        .class("Categories-item")
        .attr("href", format!("/en-US/firefox/search/?category={slug}"))
        .child(Node::new("span").class("Categories-link").text(name))
}

fn search_results(header: &str, names: &[&str]) -> Node {
    let mut results = Node::new("ul").class("SearchResults");
    for name in names {
        results = results.child(
            Node::new("li")
                .class("SearchResult")
                .child(Node::new("a").class("SearchResult-link").text(*name)),
        );
    }
    Node::new("body").children([
        Node::new("div")
            .class("SearchContextCard")
            .child(Node::new("h1").class("SearchContextCard-header").text(header)),
        results,
    ])
}

fn public_site() -> Arc<MockDriver> {
    let driver = Arc::new(MockDriver::new(BASE));
    driver.route(
        "/en-US/firefox/",
        Node::new("body").child(Node::new("section").class("Categories").children([
            category("Alerts & Updates", "alerts-updates"),
            category("Appearance", "appearance"),
            category("Bookmarks", "bookmarks").hidden(),
        ])),
    );
    driver.route(
        "/en-US/firefox/search/",
        search_results("2 results found", &["Dark Reader", "Dark Background"]),
    );
    driver.route(
        "/en-US/firefox/user/42/",
        Node::new("body").child(Node::new("section").class("UserProfile").children([
            Node::new("h1").class("UserProfile-name").text("Ada Developer"),
            Node::new("div")
                .class("UserProfile-avatar")
                .child(Node::new("img").attr("src", "/avatar.png")),
            Node::new("div")
                .class("UserProfile-homepage")
                .child(Node::new("a").attr("href", "https://ada.example").text("Homepage")),
            Node::new("dl").class("UserProfile-number-of-addons").children([
                Node::new("dt").text("Add-ons"),
                Node::new("dd").text("3"),
            ]),
        ])),
    );
    driver.route(
        "/en-US/firefox/user/7/",
        Node::new("body").child(Node::new("section").class("UserProfile").children([
            Node::new("h1").class("UserProfile-name").text("Grace"),
            Node::new("a").class("UserProfile-edit-link").attr("href", "/edit"),
        ])),
    );
    driver
}

mod categories {
    use super::*;

    #[test]
    fn test_category_list_and_click() {
        let driver = public_site();
        let (_, session) = session_with(&driver);
        session.navigate("/en-US/firefox/").unwrap();
        let home = PageObject::new(&session, "Home");

        let categories = Categories::locate(&home)
            .unwrap()
            .wait_for_categories_to_load()
            .unwrap();
        let items = categories.category_list().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name().unwrap(), "Alerts & Updates");

        let search = items[1].click().unwrap();
        assert!(session.current_url().unwrap().ends_with("category=appearance"));
        assert_eq!(search.result_count().unwrap(), 2);

        // the list belongs to the page that was left
        assert!(matches!(
            items[0].click().unwrap_err(),
            ProbeError::NotFound { .. }
        ));
    }

    #[test]
    fn test_categories_missing_from_page() {
        let driver = public_site();
        let (_, session) = session_with(&driver);
        session.navigate("/en-US/firefox/user/7/").unwrap();
        let page = PageObject::new(&session, "Profile");
        assert!(matches!(
            Categories::locate(&page).unwrap_err(),
            ProbeError::NotFound { .. }
        ));
    }
}

mod search {
    use super::*;

    #[test]
    fn test_search_results() {
        let driver = public_site();
        let (_, session) = session_with(&driver);
        let search = Search::open_for(&session, "dark mode").unwrap();

        assert!(driver.was_called("navigate:https://amo.test/en-US/firefox/search/?q=dark+mode"));
        assert_eq!(search.context_header().unwrap(), "2 results found");
        assert_eq!(search.result_names().unwrap(), ["Dark Reader", "Dark Background"]);
        assert_eq!(search.no_results_message().unwrap(), None);
    }

    #[test]
    fn test_empty_search() {
        let driver = public_site();
        driver.route(
            "/en-US/firefox/search/",
            search_results("No results found", &[]).child(
                Node::new("p")
                    .class("SearchResults-message")
                    .text("No results were found."),
            ),
        );
        let (_, session) = session_with(&driver);
        let search = Search::open(&session).unwrap();

        assert_eq!(search.result_count().unwrap(), 0);
        assert!(search.result_names().unwrap().is_empty());
        assert_eq!(
            search.no_results_message().unwrap().as_deref(),
            Some("No results were found.")
        );
    }

    #[test]
    fn test_search_barrier_times_out() {
        let driver = public_site();
        driver.route("/en-US/firefox/search/", Node::new("body"));
        let (clock, session) = session_with(&driver);

        let err = Search::open_for(&session, "x").unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { ms: 2_000, .. }));
        assert_eq!(clock.now_ms(), 2_000);
    }
}

mod user_profile {
    use super::*;

    #[test]
    fn test_profile_details() {
        let driver = public_site();
        let (_, session) = session_with(&driver);
        let profile = UserProfile::open_for(&session, "42").unwrap();

        assert_eq!(profile.user_display_name().unwrap(), "Ada Developer");
        assert!(profile.has_avatar().unwrap());
        assert_eq!(
            profile.user_homepage().unwrap().as_deref(),
            Some("https://ada.example")
        );
        assert_eq!(profile.addons_count().unwrap(), "3");
        assert!(!profile.can_edit_profile().unwrap());
    }

    #[test]
    fn test_sparse_profile() {
        let driver = public_site();
        let (_, session) = session_with(&driver);
        let profile = UserProfile::open_for(&session, "7").unwrap();

        assert!(!profile.has_avatar().unwrap());
        assert_eq!(profile.user_homepage().unwrap(), None);
        assert!(profile.can_edit_profile().unwrap());
        assert!(matches!(
            profile.addons_count().unwrap_err(),
            ProbeError::NotFound { .. }
        ));
    }

    #[test]
    fn test_profile_has_no_fixed_path() {
        let driver = public_site();
        let (_, session) = session_with(&driver);
        assert!(matches!(
            UserProfile::open(&session).unwrap_err(),
            ProbeError::Config { .. }
        ));
    }
}

mod submissions_list {
    use super::*;

    fn addon_row(name: &str, slug: &str) -> Node {
        Node::new("div").class("item").class("addon").child(
            Node::new("div").class("info").child(
                Node::new("h3").child(
                    Node::new("a")
                        .attr("href", format!("/en-US/developers/addon/{slug}/edit"))
                        .text(name),
                ),
            ),
        )
    }

    fn developer_site() -> Arc<MockDriver> {
        let driver = Arc::new(MockDriver::new(BASE));
        driver.route(
            "/en-US/developers/addons",
            Node::new("html").children([
                Node::new("head").child(
                    Node::new("title").text("Manage My Submissions :: Developer Hub"),
                ),
                Node::new("body").children([
                    Node::new("div").class("section").child(
                        Node::new("header").child(Node::new("h2").text("My Add-ons")),
                    ),
                    addon_row("Tab Counter", "tab-counter"),
                    addon_row("Dark Reader", "dark-reader"),
                ]),
            ]),
        );
        driver.route(
            "/en-US/developers/addon/dark-reader/edit",
            Node::new("body").children([
                Node::new("nav").id("edit-addon-nav").child(
                    Node::new("a")
                        .attr("href", "/en-US/developers/addon/dark-reader/versions")
                        .text("Manage Status & Versions"),
                ),
                Node::new("div").class("section").child(
                    Node::new("header").child(Node::new("h2").text("Dark Reader")),
                ),
                Node::new("div")
                    .class("addon-status")
                    .child(Node::new("b").text("Approved")),
            ]),
        );
        driver.route(
            "/en-US/developers/addon/dark-reader/versions",
            Node::new("body").child(Node::new("div").id("version-list")),
        );
        driver
    }

    #[test]
    fn test_open_addon_then_versions() {
        let driver = developer_site();
        let (_, session) = session_with(&driver);
        let list = ManageAddons::open(&session).unwrap();

        assert_eq!(list.page_title().unwrap(), "My Add-ons");
        assert_eq!(list.addon_list_items().unwrap().len(), 2);
        assert_eq!(list.addon_names().unwrap(), ["Tab Counter", "Dark Reader"]);

        let edit: EditAddon = list.open_addon("Dark Reader").unwrap();
        assert_eq!(edit.name().unwrap(), "Dark Reader");
        assert_eq!(edit.addon_status().unwrap(), "Approved");

        let versions: ManageVersions = edit.click_manage_versions_link().unwrap();
        assert!(versions
            .base()
            .current_url()
            .unwrap()
            .ends_with("/addon/dark-reader/versions"));
        assert!(list.addon_names().is_err());
    }

    #[test]
    fn test_open_unknown_addon() {
        let driver = developer_site();
        let (_, session) = session_with(&driver);
        let list = ManageAddons::open(&session).unwrap();

        let err = list.open_addon("Nope").unwrap_err();
        assert!(matches!(err, ProbeError::AssertionFailed { .. }));
        assert!(err.to_string().contains("\"Nope\""));
        assert_eq!(driver.call_count("click"), 0);
    }

    #[test]
    fn test_list_barrier_needs_title() {
        let driver = developer_site();
        driver.route("/en-US/developers/addons", Node::new("body"));
        let (_, session) = session_with(&driver);

        match ManageAddons::open(&session).unwrap_err() {
            ProbeError::Timeout { waited_for, .. } => {
                assert!(waited_for.contains("Manage My Submissions"));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }
}
