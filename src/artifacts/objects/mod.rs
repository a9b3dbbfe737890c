//! Identifiers and modes attached to each side of a change
//!
//! - `object_id`: 40-hex content ids, including the all-zero working tree sentinel
//! - `file_mode`: Raw mode strings, including the submodule mode

pub mod file_mode;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated ids shown for submodule commits
pub const SHORT_OBJECT_ID_LENGTH: usize = 8;
