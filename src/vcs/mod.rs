//! Version-control metadata, driven through the `git` command line.
//!
//! - [`Git`] runs the individual commands against `<docroot>/.git`
//! - [`HistoryExtractor`] answers history and diff requests
//! - [`pagination::window`] picks the page numbers shown under a history page
//! - [`remote::edit_host`] turns an `origin` URL into the wiki's edit base

mod error;
mod git;
mod history;
pub mod pagination;
pub mod remote;
#[cfg(test)]
pub(crate) mod testing;

pub use error::GitError;
pub use git::{CommitRecord, Git};
pub use history::HistoryExtractor;
