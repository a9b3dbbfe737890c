//! File mode strings as reported by raw diff records
//!
//! Modes are kept verbatim since they are only ever displayed. Only `160000` carries meaning:
//! it marks a submodule (gitlink) whose content is a commit of another repository.

const SUBMODULE_MODE: &str = "160000";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FileMode(String);

impl FileMode {
    pub fn new(mode: impl Into<String>) -> Self {
        Self(mode.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The endpoint points at a commit of another repository, not at a blob
    pub fn is_submodule(&self) -> bool {
        self.0 == SUBMODULE_MODE
    }
}

impl From<&str> for FileMode {
    fn from(mode: &str) -> Self {
        Self::new(mode)
    }
}

impl std::fmt::Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
