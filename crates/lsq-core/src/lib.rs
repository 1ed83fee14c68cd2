//! Content catalog for Linux Service Quest.
//!
//! This crate defines the read-only content the progression engine walks
//! through: missions, scenarios with their steps, and the distribution
//! families they target. A [`Catalog`] is validated once when it is built and
//! never mutated afterwards.

/// The validated, immutable collection of missions and scenarios.
pub mod catalog;
/// Linux distribution families.
pub mod distro;
/// Error types used throughout the crate.
pub mod error;
/// Terms unlocked by passed missions.
pub mod glossary;
/// Mission records.
pub mod mission;
/// Scenario and step records.
pub mod scenario;
/// Catalog consistency checks.
pub mod validate;

/// Re-export catalog types.
pub use catalog::Catalog;
/// Re-export the distro enumeration.
pub use distro::Distro;
/// Re-export error types.
pub use error::{CatalogError, CatalogResult};
/// Re-export glossary types.
pub use glossary::{Glossary, GlossaryEntry};
/// Re-export mission types.
pub use mission::{DistroCommand, Mission, Term};
/// Re-export scenario types.
pub use scenario::{Scenario, Step};
/// Re-export validation types.
pub use validate::ValidationIssue;
