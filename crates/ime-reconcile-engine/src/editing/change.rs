use crate::editing::commands::marks_at;
use crate::editing::{Cmd, Document, Patch};
use crate::host::{DocumentModel, EditTransaction};
use crate::model::{MarkSet, Position, Selection};

/// An in-progress edit of a `Document` and its selection
#[derive(Debug, Clone)]
pub struct Change {
    document: Document,
    selection: Selection,
    patches: Vec<Patch>,
}

impl Change {
    pub fn new(document: Document, selection: Selection) -> Self {
        Self {
            document,
            selection,
            patches: Vec::new(),
        }
    }

    /// Every command applied so far, in order
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn into_parts(self) -> (Document, Selection) {
        (self.document, self.selection)
    }

    fn run(&mut self, cmd: Cmd) -> Option<Patch> {
        let patch = self.document.apply(&cmd)?;
        self.patches.push(patch.clone());
        Some(patch)
    }

    /// Both ends in one text node, or a warning and `false`
    fn single_node(&self, selection: &Selection, op: &str) -> bool {
        if selection.anchor.key == selection.focus.key {
            return true;
        }
        log::warn!("Ignoring {op} across text nodes: {selection}");
        false
    }
}

/// Where an offset lands after `patch` rewrote part of its node
fn shift_offset(offset: usize, patch: &Patch) -> usize {
    let removed_end = patch.changed.start + patch.removed;
    if offset >= removed_end {
        offset - patch.removed + patch.changed.len()
    } else if offset > patch.changed.start {
        patch.changed.end
    } else {
        offset
    }
}

fn shift_position(position: &Position, patch: &Patch) -> Position {
    if position.key == patch.key {
        Position::new(position.key.clone(), shift_offset(position.offset, patch))
    } else {
        position.clone()
    }
}

impl EditTransaction for Change {
    type Document = Document;

    fn document(&self) -> &Document {
        &self.document
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let selection = self.selection.clone();
        if !self.single_node(&selection, "insert_text") {
            return;
        }

        let start = selection.start().clone();
        let cmd = if selection.is_collapsed() {
            Cmd::InsertText {
                at: start.clone(),
                text: text.to_string(),
                marks: None,
            }
        } else {
            let marks = self
                .document
                .descendant(&start.key)
                .map(|node| marks_at(node.leaves(), start.offset))
                .unwrap_or_default();
            Cmd::ReplaceText {
                key: start.key.clone(),
                range: start.offset..selection.end().offset,
                text: text.to_string(),
                marks,
            }
        };

        if let Some(patch) = self.run(cmd) {
            self.selection = Selection::caret(Position::new(start.key, patch.changed.end));
        }
    }

    fn insert_text_at_range(&mut self, range: &Selection, text: &str, marks: &MarkSet) {
        if !self.single_node(range, "insert_text_at_range") {
            return;
        }

        let cmd = Cmd::ReplaceText {
            key: range.anchor.key.clone(),
            range: range.start().offset..range.end().offset,
            text: text.to_string(),
            marks: marks.clone(),
        };

        if let Some(patch) = self.run(cmd) {
            self.selection = Selection::new(
                shift_position(&self.selection.anchor, &patch),
                shift_position(&self.selection.focus, &patch),
            );
        }
    }

    fn delete_char_backward(&mut self) {
        let selection = self.selection.clone();
        if !self.single_node(&selection, "delete_char_backward") {
            return;
        }

        let key = selection.anchor.key.clone();
        let range = if selection.is_collapsed() {
            let offset = selection.anchor.offset;
            if offset == 0 {
                // Joining with the previous node is the host's business
                log::debug!("delete_char_backward at start of {key}, nothing to do");
                return;
            }
            offset - 1..offset
        } else {
            selection.start().offset..selection.end().offset
        };

        let start = range.start;
        if self.run(Cmd::RemoveText { key: key.clone(), range }).is_some() {
            self.selection = Selection::caret(Position::new(key, start));
        }
    }

    fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }
}
