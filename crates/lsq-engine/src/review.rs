//! Review drill: retry missed missions until they stick.
//!
//! The drill walks the mistake queue in first-miss order, starting at any
//! queued mission. It awards no XP, never moves the mission pointer, and
//! leaves the queue as it is; clearing it is the learner's call.

use lsq_core::{Catalog, Mission};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::mistakes::MistakeQueue;

/// What a review answer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Empty selection or no drill running; nothing changed.
    Ignored,
    /// The answer was right; the drill moved on.
    Correct {
        /// The mission answered.
        mission_id: String,
        /// Whether that was the last queued mission.
        finished: bool,
    },
    /// The answer was wrong; the drill stays on the mission.
    Incorrect {
        /// The mission answered.
        mission_id: String,
    },
}

impl ReviewOutcome {
    /// Short feedback line for display, if the outcome has one.
    pub fn feedback(&self) -> Option<String> {
        match self {
            Self::Ignored => None,
            Self::Correct { .. } => Some("✅ Nailed it. No XP in review, just practice.".to_string()),
            Self::Incorrect { .. } => {
                Some("❌ Not quite. Read the hint and try again.".to_string())
            }
        }
    }
}

/// Position of a running review drill, if any.
#[derive(Debug, Clone, Default)]
pub struct ReviewDrill {
    position: Option<usize>,
}

/// Queued missions that still exist in the catalog, in queue order.
pub fn review_items<'c>(catalog: &'c Catalog, mistakes: &MistakeQueue) -> Vec<&'c Mission> {
    mistakes
        .ids()
        .iter()
        .filter_map(|id| catalog.mission_by_id(id))
        .collect()
}

impl ReviewDrill {
    /// Create an idle drill.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drill is running.
    pub fn is_active(&self) -> bool {
        self.position.is_some()
    }

    /// Index of the mission being drilled among the review items.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Start drilling at review item `index`.
    pub fn start(
        &mut self,
        catalog: &Catalog,
        mistakes: &MistakeQueue,
        index: usize,
    ) -> EngineResult<()> {
        let count = review_items(catalog, mistakes).len();
        if index >= count {
            return Err(EngineError::ReviewOutOfRange { index, count });
        }
        self.position = Some(index);
        debug!(index, count, "review started");
        Ok(())
    }

    /// The mission being drilled.
    pub fn current<'c>(&self, catalog: &'c Catalog, mistakes: &MistakeQueue) -> Option<&'c Mission> {
        let index = self.position?;
        review_items(catalog, mistakes).get(index).copied()
    }

    /// Check an answer against the mission being drilled.
    pub fn submit(
        &mut self,
        catalog: &Catalog,
        mistakes: &MistakeQueue,
        selected: &str,
    ) -> ReviewOutcome {
        if selected.is_empty() {
            return ReviewOutcome::Ignored;
        }
        let (Some(index), Some(mission)) = (self.position, self.current(catalog, mistakes)) else {
            return ReviewOutcome::Ignored;
        };
        let mission_id = mission.id.clone();
        if !mission.is_correct(selected) {
            return ReviewOutcome::Incorrect { mission_id };
        }
        let finished = index + 1 >= review_items(catalog, mistakes).len();
        self.position = if finished { None } else { Some(index + 1) };
        debug!(mission = %mission_id, finished, "review answer correct");
        ReviewOutcome::Correct {
            mission_id,
            finished,
        }
    }

    /// Leave the drill.
    pub fn stop(&mut self) {
        self.position = None;
    }
}
