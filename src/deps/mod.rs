//! Vendored package file operations.
//!
//! - **Copy**: replace the destination with a fresh copy of the package
//! - **Commit**: stage the destination and commit it to the host repository
//!
//! Metadata stripping and revision detection live in [`crate::vcs`].

mod commit;
mod vendor;

pub use commit::{commit_message, commit_vendored};
pub use vendor::{copy_package, overlapping};
