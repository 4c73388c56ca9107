use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::host::DocumentModel;
use crate::model::{Position, Selection};
use crate::reconcile::diff::{LeadingChange, diff_chars};
use crate::reconcile::{EditIntent, LeafContext, ReconcileError};

/// How an observed text change is turned into an edit.
///
/// Chosen once when the reconciler is built, from the platform or from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Autocorrecting soft keyboards (Android IMEs). Recognise a clean
    /// single-character backspace from the diff, fall back to a range
    /// replace for anything else.
    DiffGuardedBackwardDelete,
    /// Replace the whole run with the observed text.
    GenericRangeReplace,
}

impl Strategy {
    pub fn for_platform() -> Self {
        if cfg!(target_os = "android") {
            Strategy::DiffGuardedBackwardDelete
        } else {
            Strategy::GenericRangeReplace
        }
    }

    /// Keyboards that autocorrect and may commit text on composition end
    /// instead of through the input path
    pub fn is_autocorrect_prone(self) -> bool {
        matches!(self, Strategy::DiffGuardedBackwardDelete)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::DiffGuardedBackwardDelete => "diff-guarded-backward-delete",
            Strategy::GenericRangeReplace => "generic-range-replace",
        }
    }

    /// Work out what edit turns the document's run into `observed`.
    ///
    /// `selection` is the document's current selection and `position` the
    /// resolved native anchor.
    pub fn reconcile<D: DocumentModel>(
        self,
        document: &D,
        selection: &Selection,
        position: &Position,
        observed: &str,
    ) -> Result<EditIntent, ReconcileError> {
        let context = LeafContext::locate(document, position)?;
        Ok(self.synthesize(&context, selection, observed))
    }

    pub fn synthesize(
        self,
        context: &LeafContext<'_>,
        selection: &Selection,
        observed: &str,
    ) -> EditIntent {
        let observed = context.normalize(observed);
        let previous = context.leaf.text.as_str();

        if observed == previous {
            return EditIntent::NoOp;
        }

        match self {
            Strategy::DiffGuardedBackwardDelete => {
                guarded_backward_delete(context, selection, previous, observed)
            }
            Strategy::GenericRangeReplace => range_replace(context, selection, previous, observed),
        }
    }
}

fn guarded_backward_delete(
    context: &LeafContext<'_>,
    selection: &Selection,
    previous: &str,
    observed: &str,
) -> EditIntent {
    let spans = diff_chars(previous, observed);
    if spans.is_empty() {
        return EditIntent::NoOp;
    }

    let lead = LeadingChange::of(&spans);
    if lead.is_single_removal() {
        // Place the caret just after the removed character and delete back
        // over it, leaving the caret at the end of the unchanged prefix.
        let at = Position::new(
            context.position.key.clone(),
            context.span.start + lead.prefix + 1,
        );
        return EditIntent::DeleteBackward { at, count: 1 };
    }

    range_replace(context, selection, previous, observed)
}

fn range_replace(
    context: &LeafContext<'_>,
    selection: &Selection,
    previous: &str,
    observed: &str,
) -> EditIntent {
    let delta = observed.chars().count() as isize - previous.chars().count() as isize;
    let caret = selection.collapse_to_end().move_by(delta);

    let key = &context.position.key;
    let range = selection
        .move_anchor_to(key, context.span.start)
        .move_focus_to(key, context.span.end);

    EditIntent::ReplaceRange {
        range,
        text: observed.to_string(),
        marks: context.leaf.marks.clone(),
        caret,
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diff-guarded-backward-delete" => Ok(Strategy::DiffGuardedBackwardDelete),
            "generic-range-replace" => Ok(Strategy::GenericRangeReplace),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use crate::host::{Block, TextNode};
    use crate::model::{Mark, MarkSet, TextRun};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn single_run(text: &str) -> Document {
        Document::new(vec![Block::new(
            "b",
            vec![TextNode::new("t", vec![TextRun::new(text)])],
        )])
    }

    fn caret(offset: usize) -> Selection {
        Selection::caret(Position::new("t", offset))
    }

    #[rstest]
    #[case(Strategy::DiffGuardedBackwardDelete)]
    #[case(Strategy::GenericRangeReplace)]
    fn unchanged_text_is_noop(#[case] strategy: Strategy) {
        let doc = single_run("hello");
        let intent = strategy
            .reconcile(&doc, &caret(5), &Position::new("t", 5), "hello")
            .unwrap();
        assert_eq!(intent, EditIntent::NoOp);
    }

    #[test]
    fn single_char_removal_becomes_backward_delete() {
        let doc = single_run("hello");
        let intent = Strategy::DiffGuardedBackwardDelete
            .reconcile(&doc, &caret(5), &Position::new("t", 4), "hell")
            .unwrap();
        assert_eq!(
            intent,
            EditIntent::DeleteBackward {
                at: Position::new("t", 5),
                count: 1
            }
        );
        assert_eq!(intent.resulting_caret(), Some(Position::new("t", 4)));
    }

    #[test]
    fn removal_at_first_char_is_located_without_a_prefix() {
        let doc = single_run("xhello");
        let intent = Strategy::DiffGuardedBackwardDelete
            .reconcile(&doc, &caret(1), &Position::new("t", 0), "hello")
            .unwrap();
        assert_eq!(
            intent,
            EditIntent::DeleteBackward {
                at: Position::new("t", 1),
                count: 1
            }
        );
    }

    #[test]
    fn multi_char_removal_falls_back_to_replace() {
        let doc = single_run("hello world");
        let intent = Strategy::DiffGuardedBackwardDelete
            .reconcile(&doc, &caret(11), &Position::new("t", 5), "hello")
            .unwrap();
        match intent {
            EditIntent::ReplaceRange { range, text, .. } => {
                assert_eq!(range.anchor, Position::new("t", 0));
                assert_eq!(range.focus, Position::new("t", 11));
                assert_eq!(text, "hello");
            }
            other => panic!("expected replace, got {other:?}"),
        }
    }

    #[rstest]
    #[case::append("helo", "hello")]
    #[case::substitution("cat", "cut")]
    #[case::autocorrect("teh", "the")]
    fn anything_but_a_clean_backspace_replaces(#[case] previous: &str, #[case] observed: &str) {
        let doc = single_run(previous);
        let intent = Strategy::DiffGuardedBackwardDelete
            .reconcile(&doc, &caret(3), &Position::new("t", 3), observed)
            .unwrap();
        assert!(
            matches!(intent, EditIntent::ReplaceRange { ref text, .. } if text == observed),
            "{intent:?}"
        );
    }

    #[test]
    fn generic_replace_spans_run_and_shifts_caret_by_delta() {
        let doc = Document::new(vec![Block::new(
            "b",
            vec![TextNode::new(
                "t",
                vec![TextRun::new("the large "), TextRun::new("cat"), TextRun::new(" sat")],
            )],
        )]);

        let intent = Strategy::GenericRangeReplace
            .reconcile(&doc, &caret(13), &Position::new("t", 13), "cats")
            .unwrap();

        assert_eq!(
            intent,
            EditIntent::ReplaceRange {
                range: Selection::new(Position::new("t", 10), Position::new("t", 13)),
                text: "cats".to_string(),
                marks: MarkSet::new(),
                caret: Selection::caret(Position::new("t", 14)),
            }
        );
    }

    #[test]
    fn replace_carries_run_marks() {
        let doc = Document::new(vec![Block::new(
            "b",
            vec![TextNode::new(
                "t",
                vec![TextRun::new("a "), TextRun::with_marks("bold", ["bold", "italic"])],
            )],
        )]);
        let intent = Strategy::GenericRangeReplace
            .reconcile(&doc, &caret(6), &Position::new("t", 6), "bolder")
            .unwrap();
        let EditIntent::ReplaceRange { marks, .. } = intent else {
            panic!("expected replace");
        };
        assert_eq!(
            marks,
            [Mark::new("bold"), Mark::new("italic")].into_iter().collect()
        );
    }

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [
            Strategy::DiffGuardedBackwardDelete,
            Strategy::GenericRangeReplace,
        ] {
            assert_eq!(strategy.name().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!(
            "gboard".parse::<Strategy>(),
            Err(UnknownStrategy("gboard".to_string()))
        );
    }
}
