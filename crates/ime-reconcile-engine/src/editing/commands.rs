use std::ops::Range;

use crate::model::{Key, MarkSet, Position, TextRun};
use crate::reconcile::leaf::scan_leaves;

/// An edit to a single text node. Ranges are character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Insert at a position; `marks: None` inherits the marks of the run
    /// the position falls in
    InsertText {
        at: Position,
        text: String,
        marks: Option<MarkSet>,
    },
    RemoveText {
        key: Key,
        range: Range<usize>,
    },
    ReplaceText {
        key: Key,
        range: Range<usize>,
        text: String,
        marks: MarkSet,
    },
}

impl Cmd {
    pub fn key(&self) -> &Key {
        match self {
            Cmd::InsertText { at, .. } => &at.key,
            Cmd::RemoveText { key, .. } | Cmd::ReplaceText { key, .. } => key,
        }
    }
}

/// Marks a character typed at `offset` picks up
pub(crate) fn marks_at(leaves: &[TextRun], offset: usize) -> MarkSet {
    scan_leaves(leaves, offset)
        .map(|span| leaves[span.index].marks.clone())
        .unwrap_or_default()
}

/// Replace `range` of the node made of `leaves` with one run of `text`.
///
/// The result is normalized: no empty runs (unless the node becomes empty)
/// and no two neighbouring runs with the same marks.
pub(crate) fn splice_runs(
    leaves: &[TextRun],
    range: Range<usize>,
    text: &str,
    marks: &MarkSet,
) -> Vec<TextRun> {
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut offset = 0;

    for leaf in leaves {
        let len = leaf.len();
        let (leaf_start, leaf_end) = (offset, offset + len);
        offset = leaf_end;

        if leaf_start < range.start {
            before.push(TextRun {
                text: char_slice(&leaf.text, 0, range.start.min(leaf_end) - leaf_start),
                marks: leaf.marks.clone(),
            });
        }
        if leaf_end > range.end {
            after.push(TextRun {
                text: char_slice(&leaf.text, range.end.max(leaf_start) - leaf_start, len),
                marks: leaf.marks.clone(),
            });
        }
    }

    let inserted = TextRun {
        text: text.to_string(),
        marks: marks.clone(),
    };

    let mut runs: Vec<TextRun> = Vec::with_capacity(before.len() + after.len() + 1);
    for run in before.into_iter().chain(Some(inserted)).chain(after) {
        if run.is_empty() {
            continue;
        }
        match runs.last_mut() {
            Some(last) if last.marks == run.marks => last.text.push_str(&run.text),
            _ => runs.push(run),
        }
    }

    if runs.is_empty() {
        runs.push(TextRun {
            text: String::new(),
            marks: marks.clone(),
        });
    }
    runs
}

fn char_slice(s: &str, from: usize, to: usize) -> String {
    s.chars().skip(from).take(to.saturating_sub(from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bold() -> MarkSet {
        TextRun::with_marks("", ["bold"]).marks
    }

    #[test]
    fn replace_inside_single_run() {
        let runs = splice_runs(&[TextRun::new("hello")], 1..4, "ipp", &MarkSet::new());
        assert_eq!(runs, vec![TextRun::new("hippo")]);
    }

    #[test]
    fn replace_whole_marked_run() {
        let leaves = vec![
            TextRun::new("a "),
            TextRun::with_marks("cat", ["bold"]),
            TextRun::new(" sat"),
        ];
        let runs = splice_runs(&leaves, 2..5, "cats", &bold());
        assert_eq!(
            runs,
            vec![
                TextRun::new("a "),
                TextRun::with_marks("cats", ["bold"]),
                TextRun::new(" sat"),
            ]
        );
    }

    #[test]
    fn removal_merges_neighbours_with_equal_marks() {
        let leaves = vec![
            TextRun::new("ab"),
            TextRun::with_marks("X", ["bold"]),
            TextRun::new("cd"),
        ];
        let runs = splice_runs(&leaves, 2..3, "", &bold());
        assert_eq!(runs, vec![TextRun::new("abcd")]);
    }

    #[test]
    fn removing_everything_keeps_one_empty_run() {
        let runs = splice_runs(&[TextRun::new("x")], 0..1, "", &MarkSet::new());
        assert_eq!(runs, vec![TextRun::new("")]);
    }

    #[test]
    fn multibyte_text_is_sliced_by_char() {
        let runs = splice_runs(&[TextRun::new("日本語")], 1..2, "", &MarkSet::new());
        assert_eq!(runs, vec![TextRun::new("日語")]);
    }

    #[test]
    fn typed_text_inherits_marks_of_run_before_caret() {
        let leaves = vec![TextRun::with_marks("bold", ["bold"]), TextRun::new("plain")];
        assert_eq!(marks_at(&leaves, 4), bold());
        assert_eq!(marks_at(&leaves, 5), MarkSet::new());
        assert_eq!(marks_at(&[], 0), MarkSet::new());
    }
}
