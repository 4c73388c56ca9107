use crate::host::{
    BeforeInputEvent, CompositionEvent, EditTransaction, InputEvent, Propagation, SelectionLocator,
};
use crate::reconcile::{
    CompletionCheck, CompositionTracker, EditIntent, FrameQueue, ReconcileError, Scheduler,
    Strategy,
};

/// Reconciles IME input with the document.
///
/// A host wires its native composition, before-input and input events to the
/// `on_*` hooks and runs due completion checks once per frame. Every hook
/// takes `&mut self`, so hooks and checks can never interleave.
///
/// ```rust
/// # use ime_reconcile_engine::editing::{Change, Document, LeafLocator, NativeLeaf};
/// # use ime_reconcile_engine::host::{Block, EditTransaction, InputEvent, Propagation, TextNode};
/// # use ime_reconcile_engine::model::{Position, Selection, TextRun};
/// # use ime_reconcile_engine::reconcile::{FrameQueue, ImeReconciler, Strategy};
/// let doc = Document::new(vec![Block::new(
///     "b",
///     vec![TextNode::new("t", vec![TextRun::new("cat")])],
/// )]);
/// let mut tx = Change::new(doc, Selection::caret(Position::new("t", 3)));
/// let mut ime = ImeReconciler::new(Strategy::GenericRangeReplace, LeafLocator, FrameQueue::new());
///
/// let event = InputEvent::new(NativeLeaf::new("t", 0), 4, "cats");
/// assert_eq!(ime.on_input(&event, &mut tx).unwrap(), Propagation::Stop);
/// assert_eq!(tx.document().text(), "cats");
/// ```
#[derive(Debug)]
pub struct ImeReconciler<L, S = FrameQueue> {
    strategy: Strategy,
    tracker: CompositionTracker,
    locator: L,
    scheduler: S,
}

impl<L, S: Scheduler> ImeReconciler<L, S> {
    pub fn new(strategy: Strategy, locator: L, scheduler: S) -> Self {
        Self {
            strategy,
            tracker: CompositionTracker::new(),
            locator,
            scheduler,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn tracker(&self) -> &CompositionTracker {
        &self.tracker
    }

    pub fn is_composing(&self) -> bool {
        self.tracker.is_composing()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn on_composition_start(&mut self, event: &CompositionEvent) -> Propagation {
        let generation = self.tracker.start();
        log::debug!("on_composition_start generation={generation} event={event:?}");
        Propagation::Continue
    }

    /// Schedule the completion check and, on autocorrecting keyboards, flush
    /// the committed text straight into the document.
    pub fn on_composition_end<T: EditTransaction>(
        &mut self,
        event: &CompositionEvent,
        tx: &mut T,
    ) -> Propagation {
        let check = self.tracker.end();
        self.scheduler.schedule(check);

        if self.strategy.is_autocorrect_prone()
            && self.tracker.is_composing()
            && !event.data.is_empty()
        {
            let intent = EditIntent::InsertAtCaret {
                text: event.data.clone(),
            };
            log::debug!("on_composition_end applying {intent:?}");
            intent.apply(tx);
        }

        log::debug!(
            "on_composition_end generation={} event={event:?}",
            check.generation()
        );
        Propagation::Continue
    }

    /// Insert the event's text ourselves instead of letting the host do it.
    pub fn on_before_input<T: EditTransaction>(
        &mut self,
        event: &BeforeInputEvent,
        tx: &mut T,
    ) -> Propagation {
        log::debug!("on_before_input event={event:?}");

        if !event.data.is_empty() {
            tx.insert_text(&event.data);
        }

        // Autocorrecting keyboards insert the corrected text here, which
        // means the composition is already over.
        if self.strategy.is_autocorrect_prone() {
            self.tracker.interrupt();
        }

        Propagation::Stop
    }

    /// Compare the native text node with the document and apply whatever edit
    /// explains the difference.
    ///
    /// Returns `Continue` without touching the document when the native anchor
    /// can't be resolved or nothing changed, `Stop` once an edit was applied.
    pub fn on_input<T>(
        &mut self,
        event: &InputEvent<L::Node>,
        tx: &mut T,
    ) -> Result<Propagation, ReconcileError>
    where
        T: EditTransaction,
        L: SelectionLocator<T::Document>,
    {
        let Some(position) =
            self.locator
                .resolve(&event.anchor_node, event.anchor_offset, tx.document())
        else {
            log::debug!("on_input: native anchor does not map to the document");
            return Ok(Propagation::Continue);
        };

        let intent = self
            .strategy
            .reconcile(tx.document(), tx.selection(), &position, &event.text_content)
            .inspect_err(|e| log::error!("on_input at {position}: {e}"))?;

        log::debug!("on_input at {position} -> {intent:?}");

        if intent.is_noop() {
            return Ok(Propagation::Continue);
        }

        intent.apply(tx);
        Ok(Propagation::Stop)
    }

    /// Run a check previously handed to the scheduler
    pub fn run_completion_check(&mut self, check: CompletionCheck) -> bool {
        let closed = self.tracker.complete(check);
        log::debug!(
            "completion check generation={} current={} closed={closed}",
            check.generation(),
            self.tracker.generation()
        );
        closed
    }
}

impl<L> ImeReconciler<L, FrameQueue> {
    /// Run every check queued since the last frame. Returns how many ran.
    pub fn run_frame(&mut self) -> usize {
        let due = self.scheduler.drain();
        let count = due.len();
        for check in due {
            self.run_completion_check(check);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Change, Document, LeafLocator, NativeLeaf};
    use crate::host::{Block, TextNode};
    use crate::model::{Position, Selection, TextRun};
    use pretty_assertions::assert_eq;

    fn reconciler(strategy: Strategy) -> ImeReconciler<LeafLocator> {
        ImeReconciler::new(strategy, LeafLocator, FrameQueue::new())
    }

    fn change(text: &str, caret: usize) -> Change {
        let doc = Document::new(vec![Block::new(
            "b",
            vec![TextNode::new("t", vec![TextRun::new(text)])],
        )]);
        Change::new(doc, Selection::caret(Position::new("t", caret)))
    }

    #[test]
    fn overlapping_compositions_are_generation_gated() {
        let mut ime = reconciler(Strategy::GenericRangeReplace);
        let mut tx = change("", 0);
        let empty = CompositionEvent::default();

        ime.on_composition_start(&empty);
        ime.on_composition_end(&empty, &mut tx);
        let stale = ime.scheduler_mut().drain();
        ime.on_composition_start(&empty);

        for check in stale {
            assert!(!ime.run_completion_check(check));
        }
        assert!(ime.is_composing());

        ime.on_composition_end(&empty, &mut tx);
        assert_eq!(ime.run_frame(), 1);
        assert!(!ime.is_composing());
    }

    #[test]
    fn composition_end_flushes_committed_text_on_autocorrect_keyboards() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("hi ", 3);

        ime.on_composition_start(&CompositionEvent::default());
        ime.on_composition_end(&CompositionEvent::new("there"), &mut tx);

        assert_eq!(tx.document().text(), "hi there");
        assert!(ime.is_composing());
        ime.run_frame();
        assert!(!ime.is_composing());
    }

    #[test]
    fn composition_end_with_empty_text_inserts_nothing() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("hi", 2);

        ime.on_composition_start(&CompositionEvent::default());
        ime.on_composition_end(&CompositionEvent::new(""), &mut tx);

        assert_eq!(tx.document().text(), "hi");
        assert!(tx.patches().is_empty());
    }

    #[test]
    fn composition_end_does_not_flush_on_generic_platforms() {
        let mut ime = reconciler(Strategy::GenericRangeReplace);
        let mut tx = change("hi", 2);

        ime.on_composition_start(&CompositionEvent::default());
        ime.on_composition_end(&CompositionEvent::new("!"), &mut tx);

        assert_eq!(tx.document().text(), "hi");
    }

    #[test]
    fn composition_end_without_open_composition_does_not_flush() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("hi", 2);

        ime.on_composition_end(&CompositionEvent::new("!"), &mut tx);

        assert_eq!(tx.document().text(), "hi");
    }

    #[test]
    fn before_input_inserts_and_closes_autocorrect_composition() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("teh", 3);

        ime.on_composition_start(&CompositionEvent::default());
        let outcome = ime.on_before_input(&BeforeInputEvent::new("!"), &mut tx);

        assert_eq!(outcome, Propagation::Stop);
        assert_eq!(tx.document().text(), "teh!");
        assert!(!ime.is_composing());
    }

    #[test]
    fn empty_before_input_still_stops_and_closes_composition() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("ab", 2);

        ime.on_composition_start(&CompositionEvent::default());
        let outcome = ime.on_before_input(&BeforeInputEvent::new(""), &mut tx);

        assert_eq!(outcome, Propagation::Stop);
        assert!(tx.patches().is_empty());
        assert_eq!(tx.document().text(), "ab");
        assert!(!ime.is_composing());
    }

    #[test]
    fn frame_skips_stale_checks_and_closes_on_the_live_one() {
        let mut ime = reconciler(Strategy::GenericRangeReplace);
        let mut tx = change("", 0);
        let empty = CompositionEvent::default();

        ime.on_composition_start(&empty);
        ime.on_composition_end(&empty, &mut tx);
        ime.on_composition_start(&empty);
        ime.on_composition_end(&empty, &mut tx);

        // check@1 is stale, check@2 closes
        assert_eq!(ime.run_frame(), 2);
        assert!(!ime.is_composing());
        assert!(ime.scheduler().is_empty());
    }

    #[test]
    fn before_input_keeps_composition_on_generic_platforms() {
        let mut ime = reconciler(Strategy::GenericRangeReplace);
        let mut tx = change("", 0);

        ime.on_composition_start(&CompositionEvent::default());
        ime.on_before_input(&BeforeInputEvent::new("a"), &mut tx);

        assert_eq!(tx.document().text(), "a");
        assert!(ime.is_composing());
    }

    #[test]
    fn input_with_unresolvable_anchor_allows_default() {
        let mut ime = reconciler(Strategy::GenericRangeReplace);
        let mut tx = change("hello", 5);

        let event = InputEvent::new(NativeLeaf::new("elsewhere", 0), 1, "x");
        assert_eq!(ime.on_input(&event, &mut tx), Ok(Propagation::Continue));
        assert_eq!(tx.document().text(), "hello");
    }

    #[test]
    fn unchanged_input_allows_default() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("hello", 5);

        let event = InputEvent::new(NativeLeaf::new("t", 0), 2, "hello");
        assert_eq!(ime.on_input(&event, &mut tx), Ok(Propagation::Continue));
        assert!(tx.patches().is_empty());
        assert_eq!(tx.selection(), &Selection::caret(Position::new("t", 5)));
    }

    #[test]
    fn applied_input_stops_default() {
        let mut ime = reconciler(Strategy::DiffGuardedBackwardDelete);
        let mut tx = change("hello", 5);

        let event = InputEvent::new(NativeLeaf::new("t", 0), 4, "hell");
        assert_eq!(ime.on_input(&event, &mut tx), Ok(Propagation::Stop));
        assert_eq!(tx.document().text(), "hell");
        assert_eq!(tx.selection(), &Selection::caret(Position::new("t", 4)));
        assert_eq!(tx.patches().len(), 1);
    }
}
