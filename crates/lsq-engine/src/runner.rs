//! Scenario runner: walks one scenario's steps in order.
//!
//! Runs are ephemeral practice. Nothing here is persisted, no XP is awarded,
//! and misses are not queued for review.

use std::time::Duration;

use lsq_core::{Catalog, Scenario, Step};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::scheduler::{Scheduler, TaskId};

/// Prompt shown after a wrong step answer.
pub const RETRY_PROMPT: &str = "❌ Not quite. Re-read the instruction and try again.";

/// Where the runner is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No scenario chosen.
    Picker,
    /// Working through a scenario.
    Active {
        /// Scenario index in the catalog.
        scenario: usize,
        /// Current step index.
        step: usize,
    },
    /// Every step of the scenario answered.
    Complete {
        /// Scenario index in the catalog.
        scenario: usize,
    },
}

impl RunState {
    /// The scenario being run or just finished.
    pub fn scenario(self) -> Option<usize> {
        match self {
            Self::Picker => None,
            Self::Active { scenario, .. } | Self::Complete { scenario } => Some(scenario),
        }
    }
}

/// What a submitted step answer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Empty selection or no active step; nothing changed.
    Ignored,
    /// A correct answer is still waiting to advance; nothing changed.
    Busy,
    /// The answer was right; the runner advances after the step delay.
    Correct {
        /// The step's explanation.
        explanation: String,
        /// Whether this was the final step.
        last_step: bool,
    },
    /// The answer was wrong; the runner stays on the step.
    Incorrect,
}

impl StepOutcome {
    /// Short feedback line for display, if the outcome has one.
    pub fn feedback(&self) -> Option<String> {
        match self {
            Self::Ignored | Self::Busy => None,
            Self::Correct { explanation, .. } => Some(format!("✅ {explanation}")),
            Self::Incorrect => Some(RETRY_PROMPT.to_string()),
        }
    }
}

/// Something that happened when a deferred step advance came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioEvent {
    /// Moved on to the next step.
    StepAdvanced {
        /// Scenario index.
        scenario: usize,
        /// New step index.
        step: usize,
    },
    /// The final step was answered.
    Completed {
        /// Scenario index.
        scenario: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: RunState,
    to: RunState,
}

/// The scenario state machine.
#[derive(Debug)]
pub struct ScenarioRunner {
    step_delay: Duration,
    state: RunState,
    scheduler: Scheduler<Transition>,
    pending: Option<TaskId>,
}

impl ScenarioRunner {
    /// Create a runner at the picker.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            step_delay: config.step_delay,
            state: RunState::Picker,
            scheduler: Scheduler::new(),
            pending: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whether a correct answer is waiting to advance.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// The scenario being run or just finished.
    pub fn current_scenario<'c>(&self, catalog: &'c Catalog) -> Option<&'c Scenario> {
        self.state.scenario().and_then(|i| catalog.scenario(i))
    }

    /// The step awaiting an answer.
    pub fn current_step<'c>(&self, catalog: &'c Catalog) -> Option<&'c Step> {
        match self.state {
            RunState::Active { scenario, step } => {
                catalog.scenario(scenario).and_then(|s| s.step(step))
            }
            _ => None,
        }
    }

    /// Start scenario `index` from its first step, discarding any current run.
    pub fn choose_scenario(&mut self, catalog: &Catalog, index: usize) -> EngineResult<RunState> {
        let count = catalog.scenarios().len();
        if index >= count {
            return Err(EngineError::ScenarioOutOfRange { index, count });
        }
        self.cancel_pending();
        self.state = RunState::Active {
            scenario: index,
            step: 0,
        };
        debug!(scenario = index, "scenario chosen");
        Ok(self.state)
    }

    /// Check an answer against the current step.
    pub fn submit_step(&mut self, catalog: &Catalog, selected: &str) -> StepOutcome {
        if selected.is_empty() {
            return StepOutcome::Ignored;
        }
        let RunState::Active { scenario, step } = self.state else {
            return StepOutcome::Ignored;
        };
        let Some(current) = catalog.scenario(scenario) else {
            return StepOutcome::Ignored;
        };
        let Some(checkpoint) = current.step(step) else {
            return StepOutcome::Ignored;
        };
        if self.pending.is_some() {
            return StepOutcome::Busy;
        }
        if !checkpoint.is_correct(selected) {
            debug!(scenario, step, "incorrect step answer");
            return StepOutcome::Incorrect;
        }

        let last_step = step + 1 >= current.len();
        let to = if last_step {
            RunState::Complete { scenario }
        } else {
            RunState::Active {
                scenario,
                step: step + 1,
            }
        };
        self.pending = Some(self.scheduler.schedule(
            self.step_delay,
            Transition {
                from: self.state,
                to,
            },
        ));
        debug!(scenario, step, last_step, "correct step answer");
        StepOutcome::Correct {
            explanation: checkpoint.explanation.clone(),
            last_step,
        }
    }

    /// Run the same scenario again from its first step. No-op at the picker.
    pub fn restart(&mut self) -> RunState {
        if let Some(scenario) = self.state.scenario() {
            self.cancel_pending();
            self.state = RunState::Active { scenario, step: 0 };
            debug!(scenario, "scenario restarted");
        }
        self.state
    }

    /// Abandon the current run and go back to the picker.
    pub fn exit_to_picker(&mut self) -> RunState {
        self.cancel_pending();
        self.state = RunState::Picker;
        self.state
    }

    /// Let `elapsed` pass and apply whatever came due.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<ScenarioEvent> {
        let mut events = Vec::new();
        for Transition { from, to } in self.scheduler.advance(elapsed) {
            self.pending = None;
            if self.state != from {
                continue;
            }
            self.state = to;
            match to {
                RunState::Active { scenario, step } => {
                    events.push(ScenarioEvent::StepAdvanced { scenario, step });
                }
                RunState::Complete { scenario } => {
                    info!(scenario, "scenario complete");
                    events.push(ScenarioEvent::Completed { scenario });
                }
                RunState::Picker => {}
            }
        }
        events
    }

    /// Time until the pending step advance.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Drop any deferred work without applying it.
    pub fn shutdown(&mut self) {
        self.cancel_pending();
    }

    fn cancel_pending(&mut self) {
        self.scheduler.cancel_all();
        self.pending = None;
    }
}
