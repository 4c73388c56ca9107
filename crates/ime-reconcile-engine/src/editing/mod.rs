/*!
 * # In-memory editing model
 *
 * Reference implementations of the three collaborators the reconciler talks
 * to, used by tests and by the replay CLI:
 *
 * - **`document`**: `Document`, a list of blocks implementing `DocumentModel`,
 *   edited only through `Cmd`s
 * - **`commands`**: the `Cmd` enum and how each command rewrites a text node's runs
 * - **`change`**: `Change`, an `EditTransaction` over a document and a selection
 * - **`locator`**: `LeafLocator`, resolving a native leaf node + offset
 * - **`patch`**: what a command changed
 *
 * Ranges never span text nodes here: a range whose ends sit in different
 * nodes is ignored with a warning.
 */

pub mod change;
pub mod commands;
pub mod document;
pub mod locator;
pub mod patch;

pub use change::Change;
pub use commands::Cmd;
pub use document::Document;
pub use locator::{LeafLocator, NativeLeaf};
pub use patch::Patch;
