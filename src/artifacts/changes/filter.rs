use crate::artifacts::changes::change::{Change, ChangeKind};
use bitflags::bitflags;

bitflags! {
    /// Selects which change kinds become review tabs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeFilter: u32 {
        const MODIFIED = 0b000001;
        const COPIED = 0b000010;
        const RENAMED = 0b000100;
        const ADDED = 0b001000;
        const DELETED = 0b010000;
        const UNMERGED = 0b100000;
    }
}

impl ChangeFilter {
    /// Parse git-style status letters, e.g. `MR` or `AD`
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'M' => filter |= Self::MODIFIED,
                'C' => filter |= Self::COPIED,
                'R' => filter |= Self::RENAMED,
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::DELETED,
                'U' => filter |= Self::UNMERGED,
                _ => return None,
            }
        }

        Some(filter)
    }

    pub fn matches(&self, change: &Change) -> bool {
        let flag = match change.kind() {
            ChangeKind::Modified => Self::MODIFIED,
            ChangeKind::Copied => Self::COPIED,
            ChangeKind::Renamed => Self::RENAMED,
            ChangeKind::Added => Self::ADDED,
            ChangeKind::Deleted => Self::DELETED,
            ChangeKind::Unmerged => Self::UNMERGED,
        };

        self.contains(flag)
    }
}

impl Default for ChangeFilter {
    fn default() -> Self {
        Self::all()
    }
}
