//! Collaborators outside the session compiler
//!
//! - `repository`: Root discovery and content resolution for one repository
//! - `root`: Host-specific translation of the root path
//! - `database`: Blob access through the `git` CLI
//! - `workspace`: Working tree file access
//! - `diff_query`: The `git diff --raw` process feeding the parser
//! - `editor`: The editor process that plays the session

pub(crate) mod database;
pub mod diff_query;
pub mod editor;
pub mod repository;
pub mod root;
pub(crate) mod workspace;
