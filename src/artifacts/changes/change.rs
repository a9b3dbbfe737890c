use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Status letters of the raw diff format mapped to change kinds
pub const STATUS_KINDS: phf::Map<&'static str, ChangeKind> = phf::phf_map! {
    "M" => ChangeKind::Modified,
    "C" => ChangeKind::Copied,
    "R" => ChangeKind::Renamed,
    "A" => ChangeKind::Added,
    "D" => ChangeKind::Deleted,
    "U" => ChangeKind::Unmerged,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Modified,
    Copied,
    Renamed,
    Added,
    Deleted,
    Unmerged,
}

impl ChangeKind {
    pub fn from_status_letter(letter: &str) -> Option<Self> {
        STATUS_KINDS.get(letter).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Modified => "modified",
            ChangeKind::Copied => "copied",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Added => "added",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Unmerged => "unmerged",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One side of a change whose path is shared with the other side
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Revision {
    pub mode: FileMode,
    pub oid: ObjectId,
}

/// One side of a change, with its own path
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Endpoint {
    pub mode: FileMode,
    pub oid: ObjectId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Modification {
    pub path: PathBuf,
    pub src: Revision,
    pub dst: Revision,
}

/// Payload shared by copies and renames
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Relocation {
    pub src: Endpoint,
    pub dst: Endpoint,
    pub score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Modified(Modification),
    Copied(Relocation),
    Renamed(Relocation),
    Added(Endpoint),
    Deleted(Endpoint),
    Unmerged { path: PathBuf },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Modified(_) => ChangeKind::Modified,
            Change::Copied(_) => ChangeKind::Copied,
            Change::Renamed(_) => ChangeKind::Renamed,
            Change::Added(_) => ChangeKind::Added,
            Change::Deleted(_) => ChangeKind::Deleted,
            Change::Unmerged { .. } => ChangeKind::Unmerged,
        }
    }

    /// The path a reviewer would recognise the change by (the destination for copies and renames)
    pub fn display_path(&self) -> &Path {
        match self {
            Change::Modified(modification) => &modification.path,
            Change::Copied(relocation) | Change::Renamed(relocation) => &relocation.dst.path,
            Change::Added(endpoint) | Change::Deleted(endpoint) => &endpoint.path,
            Change::Unmerged { path } => path,
        }
    }

    pub fn similarity_score(&self) -> Option<u8> {
        match self {
            Change::Copied(relocation) | Change::Renamed(relocation) => relocation.score,
            _ => None,
        }
    }
}
