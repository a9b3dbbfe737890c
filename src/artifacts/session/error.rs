use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

/// Content the session needs could not be produced
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("object {oid} is unknown to the object store: {reason}")]
    UnknownObject { oid: ObjectId, reason: String },

    #[error("failed to run `{command}`")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {} from the working tree", .path.display())]
    WorkingTree {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A session script could not be compiled
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Every script line is an ex command, so a line break would start a new one
    #[error("path {path:?} contains a line break and cannot be passed to the editor")]
    LineBreakInPath { path: PathBuf },
}
