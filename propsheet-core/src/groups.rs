//! Capture group numbering
//!
//! Groups are numbered left to right by their opening parenthesis, starting
//! at 1, exactly as ECMAScript numbers them. Plain `(...)` groups and version
//! groups (which are rewritten into plain groups) take a number;
//! non-capturing and lookaround groups never do.

use tracing::trace;

/// What produced a numbered group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// A plain `(...)` group
    Plain,
    /// A `(?v ...)` group rewritten into a capturing group
    Version,
}

/// Information about a capture group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    /// The index of the group (1-based for compatibility with \1, \2, etc.)
    pub index: u32,
    /// What produced the group
    pub kind: CaptureKind,
}

/// Registry handing out capture group numbers in traversal order
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: Vec<GroupInfo>,
    next_index: u32,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        GroupRegistry {
            groups: Vec::new(),
            next_index: 1, // Groups are 1-indexed
        }
    }

    /// Register a new capture group and return the number it receives
    pub fn register_group(&mut self, kind: CaptureKind) -> u32 {
        let index = self.next_index;
        self.next_index += 1;
        trace!(index, ?kind, "capture group assigned");
        self.groups.push(GroupInfo { index, kind });
        index
    }

    /// Get the total number of capture groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Get all group infos
    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }
}
