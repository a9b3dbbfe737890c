//! User-facing operations
//!
//! - `review`: Query the changes, compile the session and hand it to the editor

pub mod review;
