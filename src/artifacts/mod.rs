//! Data structures and algorithms
//!
//! - `objects`: Content ids and file modes
//! - `changes`: Change records and the raw diff parser
//! - `session`: Editor directives and the session compiler

pub mod changes;
pub mod objects;
pub mod session;
