use serde::{Deserialize, Serialize};

use crate::host::EditTransaction;
use crate::model::{MarkSet, Position, Selection};

/// The single edit recovered from one native event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EditIntent {
    /// Not a real edit (selection move, identical text)
    NoOp,
    /// Insert at the current selection
    InsertAtCaret { text: String },
    /// Put the caret at `at`, then delete `count` characters backward
    DeleteBackward { at: Position, count: usize },
    /// Replace `range` with `text` carrying `marks`, then select `caret`
    ReplaceRange {
        range: Selection,
        text: String,
        marks: MarkSet,
        caret: Selection,
    },
}

impl EditIntent {
    pub fn is_noop(&self) -> bool {
        matches!(self, EditIntent::NoOp)
    }

    /// Where the caret ends up, when the intent alone determines it
    pub fn resulting_caret(&self) -> Option<Position> {
        match self {
            EditIntent::DeleteBackward { at, count } => Some(at.moved_by(-(*count as isize))),
            EditIntent::ReplaceRange { caret, .. } => Some(caret.focus.clone()),
            EditIntent::NoOp | EditIntent::InsertAtCaret { .. } => None,
        }
    }

    /// Drive `tx` through this edit
    pub fn apply<T: EditTransaction>(&self, tx: &mut T) {
        match self {
            EditIntent::NoOp => {}
            EditIntent::InsertAtCaret { text } => tx.insert_text(text),
            EditIntent::DeleteBackward { at, count } => {
                tx.select(Selection::caret(at.clone()));
                for _ in 0..*count {
                    tx.delete_char_backward();
                }
            }
            EditIntent::ReplaceRange {
                range,
                text,
                marks,
                caret,
            } => {
                tx.insert_text_at_range(range, text, marks);
                tx.select(caret.clone());
            }
        }
    }
}
