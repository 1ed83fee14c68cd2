use serde::{Deserialize, Serialize};

use crate::distro::Distro;

/// One checkpoint inside a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// What the learner is asked to do.
    pub instruction: String,
    /// The command that performs the step.
    pub command: String,
    /// The checkpoint question.
    pub question: String,
    /// Candidate answers, unique by position.
    pub options: Vec<String>,
    /// The correct answer; equal to one element of `options`.
    pub answer: String,
    /// Shown only after a correct answer.
    pub explanation: String,
}

impl Step {
    /// Whether `selected` is the correct answer.
    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }

    /// Resolve a 1-based option number to its text.
    pub fn option(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// A linear sequence of steps simulating an operational incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Stable unique identifier (e.g. `s1`).
    pub id: String,
    /// Short title.
    pub title: String,
    /// The incident narrative.
    pub story: String,
    /// The family the scenario is set on.
    pub distro: Distro,
    /// Ordered steps; never empty in a validated catalog.
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the scenario has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get a step by index.
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }
}
