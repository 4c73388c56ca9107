use crate::editing::commands::{marks_at, splice_runs};
use crate::editing::{Cmd, Patch};
use crate::host::{Block, DocumentModel, TextNode};
use crate::model::Key;

/// A flat list of blocks, each holding text nodes made of runs.
///
/// Edited only through `apply`, which bumps the version on every successful
/// command so callers can tell whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    blocks: Vec<Block>,
    version: u64,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks, version: 0 }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Plain text, one line per block
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Apply a command. Returns `None` (and leaves the document untouched)
    /// when the command names a text node that doesn't exist.
    pub fn apply(&mut self, cmd: &Cmd) -> Option<Patch> {
        let Some(node) = self.text_node_mut(cmd.key()) else {
            log::warn!("Ignoring {cmd:?}: no such text node");
            return None;
        };
        let len = node.len();

        // Out of range offsets are clamped to the node
        let clamp = |range: &std::ops::Range<usize>| {
            let start = range.start.min(len);
            start..range.end.min(len).max(start)
        };

        let (range, text, marks) = match cmd {
            Cmd::InsertText { at, text, marks } => {
                let at = at.offset.min(len);
                let marks = marks
                    .clone()
                    .unwrap_or_else(|| marks_at(node.leaves(), at));
                (at..at, text.as_str(), marks)
            }
            Cmd::RemoveText { range, .. } => {
                let range = clamp(range);
                let marks = marks_at(node.leaves(), range.start);
                (range, "", marks)
            }
            Cmd::ReplaceText {
                range, text, marks, ..
            } => (clamp(range), text.as_str(), marks.clone()),
        };

        node.leaves = splice_runs(node.leaves(), range.clone(), text, &marks);
        self.version += 1;

        let inserted = text.chars().count();
        Some(Patch {
            key: cmd.key().clone(),
            changed: range.start..range.start + inserted,
            removed: range.len(),
            version: self.version,
        })
    }

    fn text_node_mut(&mut self, key: &Key) -> Option<&mut TextNode> {
        self.blocks
            .iter_mut()
            .flat_map(|block| block.texts.iter_mut())
            .find(|text| &text.key == key)
    }
}

impl DocumentModel for Document {
    fn descendant(&self, key: &Key) -> Option<&TextNode> {
        self.blocks
            .iter()
            .flat_map(|block| block.texts.iter())
            .find(|text| &text.key == key)
    }

    fn closest_block(&self, key: &Key) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| &block.key == key || block.texts.iter().any(|text| &text.key == key))
    }
}
