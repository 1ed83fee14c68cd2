use serde::{Deserialize, Serialize};

use crate::distro::Distro;

/// A vocabulary term taught by a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// The word or phrase.
    pub word: String,
    /// Its plain-English meaning.
    pub meaning: String,
}

/// The same operation expressed for one distribution family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistroCommand {
    /// The family this command applies to.
    pub distro: Distro,
    /// The shell command.
    pub command: String,
    /// Optional remark about family-specific differences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A single quiz unit: a task, a term, a reference command, and one
/// multiple-choice checkpoint question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Stable unique identifier (e.g. `m1`).
    pub id: String,
    /// Short title.
    pub title: String,
    /// The task narrative.
    pub description: String,
    /// The family the mission focuses on.
    pub distro: Distro,
    /// The term added to the glossary once the mission is passed.
    pub term: Term,
    /// Reference shell command shown as a hint.
    pub command: String,
    /// The checkpoint question.
    pub question: String,
    /// Candidate answers, unique by position.
    pub options: Vec<String>,
    /// The correct answer; equal to exactly one element of `options`.
    pub answer: String,
    /// The operation across distribution families.
    #[serde(default)]
    pub distro_commands: Vec<DistroCommand>,
}

impl Mission {
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

    /// The command recorded for a given family, if any.
    pub fn command_for(&self, distro: Distro) -> Option<&DistroCommand> {
        self.distro_commands.iter().find(|c| c.distro == distro)
    }
}
