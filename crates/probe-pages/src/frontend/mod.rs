//! Public add-ons site pages and regions.

mod categories;
mod search;
mod user_profile;

pub use categories::{Categories, CategoryItem};
pub use search::Search;
pub use user_profile::UserProfile;
