//! Review session scripts
//!
//! - `command`: Editor directives and their ex-command rendering
//! - `script`: The ordered directive list handed to the editor
//! - `resolver`: Blob and working tree access used during compilation
//! - `compiler`: Turns parsed changes into a session script
//!
//! Compilation is all-or-nothing: a resolution failure for any pane discards the script.

pub mod command;
pub mod compiler;
pub mod error;
pub mod resolver;
pub mod script;
