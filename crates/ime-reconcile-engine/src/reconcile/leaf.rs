use crate::host::DocumentModel;
use crate::model::{Position, TextRun};
use crate::reconcile::ReconcileError;

/// Where a run sits inside its text node, in character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafSpan {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

/// Find the run containing `offset`.
///
/// Walks the runs accumulating offsets and stops at the first one whose end
/// reaches or passes `offset`, so a caret sitting on a boundary belongs to the
/// run before it. An offset past every run falls back to the last run.
/// Returns `None` only when there are no runs at all.
pub fn scan_leaves(leaves: &[TextRun], offset: usize) -> Option<LeafSpan> {
    let mut start = 0;
    let mut end = 0;

    for (index, leaf) in leaves.iter().enumerate() {
        start = end;
        end += leaf.len();
        if end >= offset {
            return Some(LeafSpan { index, start, end });
        }
    }

    // start/end now describe the last run
    leaves.len().checked_sub(1).map(|index| LeafSpan { index, start, end })
}

/// The run an input event landed in, plus what we need to know about its
/// place in the enclosing block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafContext<'a> {
    pub position: Position,
    pub leaf: &'a TextRun,
    pub span: LeafSpan,
    /// The run is the last one of its text node
    pub is_last_leaf: bool,
    /// The text node is the last one of its block
    pub is_last_text: bool,
}

impl<'a> LeafContext<'a> {
    pub fn locate<D: DocumentModel>(
        document: &'a D,
        position: &Position,
    ) -> Result<Self, ReconcileError> {
        let node = document
            .descendant(&position.key)
            .ok_or_else(|| ReconcileError::MissingText(position.key.clone()))?;
        let block = document
            .closest_block(&node.key)
            .ok_or_else(|| ReconcileError::MissingBlock(node.key.clone()))?;

        let leaves = node.leaves();
        let span = scan_leaves(leaves, position.offset)
            .ok_or_else(|| ReconcileError::NoLeaves(node.key.clone()))?;

        let is_last_text = block
            .last_text()
            .is_some_and(|last| last.key == node.key);

        Ok(Self {
            position: position.clone(),
            leaf: &leaves[span.index],
            span,
            is_last_leaf: span.index + 1 == leaves.len(),
            is_last_text,
        })
    }

    /// Undo the compensating newline the renderer appends to the final run
    /// of a block ending in a real newline, so browsers don't collapse it.
    pub fn normalize<'s>(&self, observed: &'s str) -> &'s str {
        if self.is_last_text && self.is_last_leaf {
            observed.strip_suffix('\n').unwrap_or(observed)
        } else {
            observed
        }
    }
}
