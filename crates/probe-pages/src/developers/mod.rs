//! Developer Hub pages.

mod edit_addon;
mod home;
mod manage_addons;
mod manage_versions;
mod submit_addon;

pub use edit_addon::EditAddon;
pub use home::{AddonRating, Connect, DevHubHome, Footer, MyAddonItem};
pub use manage_addons::ManageAddons;
pub use manage_versions::{DeleteAddonModal, ManageVersions};
pub use submit_addon::{
    ListedAddonSubmissionForm, SubmissionConfirmationPage, SubmitAddon, UploadSource,
    ValidatedUpload,
};
