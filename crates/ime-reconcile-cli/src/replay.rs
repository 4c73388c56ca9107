use std::fmt;

use ime_reconcile_config::Config;
use ime_reconcile_engine::{
    BeforeInputEvent, Change, CompositionEvent, CompositionPhase, Document, EditTransaction,
    FrameQueue, ImeReconciler, InputEvent, LeafLocator, NativeLeaf, Propagation, Selection,
    Strategy,
};

use crate::scenario::{Scenario, ScenarioEvent};

/// What a single replayed event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Stop,
    /// A frame ran this many deferred completion checks
    Checks(usize),
    /// The reconciler refused the event; the document is untouched
    Failed(String),
}

impl From<Propagation> for Outcome {
    fn from(propagation: Propagation) -> Self {
        match propagation {
            Propagation::Continue => Outcome::Continue,
            Propagation::Stop => Outcome::Stop,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Continue => write!(f, "continue"),
            Outcome::Stop => write!(f, "stop"),
            Outcome::Checks(n) => write!(f, "{n} check(s)"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub index: usize,
    pub event: String,
    pub outcome: Outcome,
    /// Document text after the event
    pub text: String,
    pub phase: CompositionPhase,
}

#[derive(Debug, Clone)]
pub struct Replay {
    pub strategy: Strategy,
    pub steps: Vec<Step>,
    pub document: Document,
    pub selection: Selection,
    pub phase: CompositionPhase,
}

impl Replay {
    /// Plain-text trace: one line per event, then each block's final text,
    /// the selection and the final composition phase
    pub fn render(&self) -> String {
        let mut out = format!("strategy: {}\n", self.strategy);
        for step in &self.steps {
            out.push_str(&format!(
                "#{} {} -> {} | {:?} [{}]\n",
                step.index, step.event, step.outcome, step.text, step.phase
            ));
        }
        for block in self.document.blocks() {
            out.push_str(&format!("{}: {:?}\n", block.key, block.text()));
        }
        out.push_str(&format!("selection: {}\n", self.selection));
        out.push_str(&format!("phase: {}", self.phase));
        out
    }
}

/// Feed every event of `scenario` through a reconciler running `strategy`.
///
/// Failed events are recorded and the replay carries on with the next one,
/// the way a host keeps receiving events after a bad one.
pub fn replay(scenario: &Scenario, strategy: Strategy) -> Replay {
    let mut ime: ImeReconciler<LeafLocator> =
        ImeReconciler::new(strategy, LeafLocator, FrameQueue::new());
    let mut tx = Change::new(scenario.document(), scenario.selection.clone());
    let mut steps = Vec::with_capacity(scenario.events.len());

    for (i, event) in scenario.events.iter().enumerate() {
        let outcome = match event {
            ScenarioEvent::CompositionStart => {
                ime.on_composition_start(&CompositionEvent::default()).into()
            }
            ScenarioEvent::CompositionEnd { data } => ime
                .on_composition_end(&CompositionEvent::new(data.as_str()), &mut tx)
                .into(),
            ScenarioEvent::BeforeInput { data } => ime
                .on_before_input(&BeforeInputEvent::new(data.as_str()), &mut tx)
                .into(),
            ScenarioEvent::Input {
                key,
                leaf,
                offset,
                text,
            } => {
                let input = InputEvent::new(NativeLeaf::new(key.clone(), *leaf), *offset, text);
                match ime.on_input(&input, &mut tx) {
                    Ok(propagation) => propagation.into(),
                    Err(e) => Outcome::Failed(e.to_string()),
                }
            }
            ScenarioEvent::Frame => Outcome::Checks(ime.run_frame()),
        };

        let step = Step {
            index: i + 1,
            event: event.to_string(),
            outcome,
            text: tx.document().text(),
            phase: ime.tracker().phase(),
        };
        log::info!("#{} {} -> {}", step.index, step.event, step.outcome);
        steps.push(step);
    }

    let phase = ime.tracker().phase();
    let (document, selection) = tx.into_parts();
    Replay {
        strategy,
        steps,
        document,
        selection,
        phase,
    }
}

/// Pick the strategy for a replay: the command-line flag wins, then the
/// scenario file, then the config file, then the platform default.
pub fn resolve_strategy(
    flag: Option<Strategy>,
    scenario: Option<Strategy>,
    config: &Config,
) -> Strategy {
    flag.or(scenario)
        .unwrap_or_else(|| config.resolved_strategy())
}
