/*!
 * # Input Reconciliation
 *
 * Browsers do not tell us what an IME actually did to a text node. We get
 * `compositionstart`/`compositionend` pairs and a generic "input" notification
 * exposing only the node's final `textContent`. This module recovers a single
 * edit from that before/after pair and keeps track of whether a composition is
 * still open.
 *
 * ## Pieces
 *
 * - **`composition`**: `CompositionTracker`, the Idle/Composing state machine
 *   with a generation counter guarding deferred completion checks
 * - **`scheduler`**: how completion checks get deferred to the next frame
 * - **`leaf`**: locating the run under the caret and undoing the trailing
 *   newline the renderer adds to the last run of a block
 * - **`diff`**: character diff grouped into unchanged/removed/added spans
 * - **`strategy`**: the two ways of turning a diff into an `EditIntent`
 * - **`intent`**: the edit itself, and how it drives an `EditTransaction`
 * - **`reconciler`**: `ImeReconciler`, the hooks a host wires to its events
 *
 * ## Event flow
 *
 * ```text
 * input event ─► SelectionLocator ─► Position
 *             ─► DocumentModel    ─► LeafContext (run + offsets)
 *             ─► Strategy         ─► EditIntent ─► EditTransaction
 * ```
 *
 * At most one intent is applied per input event.
 */

pub mod composition;
pub mod diff;
pub mod intent;
pub mod leaf;
pub mod reconciler;
pub mod scheduler;
pub mod strategy;

pub use composition::{CompletionCheck, CompositionPhase, CompositionState, CompositionTracker};
pub use intent::EditIntent;
pub use leaf::{LeafContext, LeafSpan};
pub use reconciler::ImeReconciler;
pub use scheduler::{FrameQueue, Scheduler};
pub use strategy::{Strategy, UnknownStrategy};

use crate::model::Key;

/// The document disagrees with itself; no edit can be trusted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("No text node with key {0}")]
    MissingText(Key),
    #[error("Text node {0} has no enclosing block")]
    MissingBlock(Key),
    #[error("Text node {0} has no leaves")]
    NoLeaves(Key),
}
