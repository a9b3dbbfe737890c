use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::session::error::ResolutionError;
use bytes::Bytes;
use std::path::Path;
use std::process::Command;

/// Read access to the repository's object store through the `git` CLI
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Load the raw content of a blob, exactly as the editor's `git show` will see it
    pub fn load(&self, object_id: &ObjectId) -> Result<Bytes, ResolutionError> {
        let output = Command::new("git")
            .args(["--no-pager", "show", object_id.as_ref()])
            .current_dir(&self.path)
            .output()
            .map_err(|source| ResolutionError::Process {
                command: format!("git show {}", object_id),
                source,
            })?;

        if !output.status.success() {
            return Err(ResolutionError::UnknownObject {
                oid: object_id.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        log::debug!("loaded {} ({} bytes)", object_id.to_short_oid(), output.stdout.len());
        Ok(output.stdout.into())
    }
}
