//! Review `git diff` output as editor tabs, one per changed file, with each file's old and
//! new revision side by side in diff mode.
//!
//! - `areas`: Repository, git and editor processes
//! - `artifacts`: Change records, their parser and the session compiler
//! - `commands`: The review operation

pub mod areas;
pub mod artifacts;
pub mod commands;
