use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositionPhase {
    Idle,
    Composing,
}

impl fmt::Display for CompositionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompositionPhase::Idle => write!(f, "idle"),
            CompositionPhase::Composing => write!(f, "composing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompositionState {
    pub is_composing: bool,
    /// Bumped on every composition start
    pub generation: u64,
}

/// A deferred "has this composition really finished?" check.
///
/// Carries the generation current when the composition ended. It only closes
/// the composition if no newer one has started by the time it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCheck {
    generation: u64,
}

impl CompletionCheck {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Tracks whether an IME composition is open.
///
/// Completion is deferred because keyboards may start the next composition
/// before the previous one's end has been fully processed:
///
/// ```text
/// start₁ → end₁ (check@1) → start₂ (gen 2) → check@1: stale, no-op
///        → end₂ (check@2) → check@2: closes
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompositionTracker {
    state: CompositionState,
}

impl CompositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CompositionState {
        self.state
    }

    pub fn is_composing(&self) -> bool {
        self.state.is_composing
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn phase(&self) -> CompositionPhase {
        if self.state.is_composing {
            CompositionPhase::Composing
        } else {
            CompositionPhase::Idle
        }
    }

    /// Open a composition, returning its generation
    pub fn start(&mut self) -> u64 {
        self.state.is_composing = true;
        self.state.generation += 1;
        self.state.generation
    }

    /// The composition ended; the returned check must run later (next frame)
    pub fn end(&self) -> CompletionCheck {
        CompletionCheck {
            generation: self.state.generation,
        }
    }

    /// Run a deferred check against the generation as it is now.
    /// Returns true if it closed the composition.
    pub fn complete(&mut self, check: CompletionCheck) -> bool {
        if self.state.generation > check.generation {
            return false;
        }
        let was_composing = self.state.is_composing;
        self.state.is_composing = false;
        was_composing
    }

    /// Close immediately, without waiting for a check
    pub fn interrupt(&mut self) {
        self.state.is_composing = false;
    }
}
