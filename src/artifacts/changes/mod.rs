//! File-level changes reported by `git diff --raw`
//!
//! - `change`: Tagged change records and their endpoints
//! - `raw_parser`: Streaming parser for the NUL-delimited raw format
//! - `filter`: Selection of change kinds
//! - `error`: Format errors with record/field context

pub mod change;
pub mod error;
pub mod filter;
pub mod raw_parser;
