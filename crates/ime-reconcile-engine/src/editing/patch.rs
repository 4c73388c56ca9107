use crate::model::Key;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Text node the command touched
    pub key: Key,
    /// Character range of the new text within that node
    pub changed: std::ops::Range<usize>,
    /// Characters removed from the node
    pub removed: usize,
    pub version: u64,
}
