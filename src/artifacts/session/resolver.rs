use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::session::error::ResolutionError;
use bytes::Bytes;
use std::path::Path;

/// Access to blob and working tree content needed while compiling a session
pub trait ContentResolver {
    fn fetch_blob(&self, oid: &ObjectId) -> Result<Bytes, ResolutionError>;

    /// Read a repository-relative path; `Ok(None)` when no regular file exists there
    fn read_working_tree_file(&self, path: &Path) -> Result<Option<Bytes>, ResolutionError>;
}
