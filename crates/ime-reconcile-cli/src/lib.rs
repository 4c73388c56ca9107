//! Replays recorded IME event sequences against the reconciliation engine.

pub mod replay;
pub mod scenario;

pub use replay::{Outcome, Replay, Step, replay, resolve_strategy};
pub use scenario::{Scenario, ScenarioError, ScenarioEvent};
