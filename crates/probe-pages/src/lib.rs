//! amo-probe-pages: page objects for the Developer Hub and the public site
//!
//! Built on [`amo_probe`]. Every navigation method returns its destination
//! page only after that page's load barrier has passed.
//!
//! ```no_run
//! use amo_probe::{Page, Session};
//! use amo_probe_pages::developers::DevHubHome;
//!
//! fn check_header(session: &Session) -> amo_probe::ProbeResult<()> {
//!     let home = DevHubHome::open(session)?;
//!     let home = home.devhub_login("developer")?;
//!     assert!(home.is_logged_in()?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod developers;
pub mod fixtures;
pub mod frontend;
pub mod landing;
pub mod login;
pub mod mail;

pub use api::{verify_addon_response_details, RequestKind, ResponseComparison};
pub use fixtures::{make_addon, random_email, random_string};
pub use landing::{landed, DevHubPage};
pub use login::LoginPage;
pub use mail::{MailMessage, Mailbox};
