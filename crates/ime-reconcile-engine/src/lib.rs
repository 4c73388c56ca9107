pub mod editing;
pub mod host;
pub mod model;
pub mod reconcile;

// Re-export key types for easier usage
pub use editing::{Change, Cmd, Document, LeafLocator, NativeLeaf, Patch};
pub use host::*;
pub use model::*;
pub use reconcile::{
    CompletionCheck, CompositionPhase, CompositionTracker, EditIntent, FrameQueue, ImeReconciler,
    ReconcileError, Scheduler, Strategy,
};
