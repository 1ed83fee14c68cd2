//! Progression and mastery engine for Linux Service Quest.
//!
//! Tracks which mission the learner is on, awards XP and derives levels,
//! records missed questions in a persisted mistake queue, and walks
//! multi-step scenarios. All durable state goes through an injected
//! [`Store`]; all delayed transitions go through an owned, cancellable
//! [`Scheduler`] driven by [`Session::tick`].

pub mod config;
pub mod error;
pub mod mistakes;
pub mod progress;
pub mod review;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod store;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult, StoreError, StoreResult};
pub use mistakes::MistakeQueue;
pub use progress::{AnswerOutcome, ProgressController, ProgressEvent, ProgressSnapshot, level_for};
pub use review::{ReviewDrill, ReviewOutcome};
pub use runner::{RunState, ScenarioEvent, ScenarioRunner, StepOutcome};
pub use scheduler::{Scheduler, TaskId};
pub use session::{Session, SessionEvent};
pub use store::{FileStore, MemoryStore, Store};
