//! Consistency checks for catalog content.
//!
//! Every checkpoint question must list its answer among the options, ids
//! must be unique, and scenarios must have at least one step. Repeated option
//! text is legal (options are unique by position) but worth a warning.

use std::collections::HashSet;
use std::fmt;

use crate::mission::Mission;
use crate::scenario::Scenario;

/// A warning or error found while validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What the issue is about, e.g. `mission 'm1'` or `scenario 's1' step 2`.
    pub subject: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Validate missions and scenarios, returning every issue found.
pub fn validate_content(missions: &[Mission], scenarios: &[Scenario]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let mut mission_ids = HashSet::new();
    for mission in missions {
        let subject = format!("mission '{}'", mission.id);
        if !mission_ids.insert(mission.id.as_str()) {
            issues.push(ValidationIssue::error(&subject, "duplicate mission id"));
        }
        check_question(&subject, &mission.options, &mission.answer, &mut issues);
    }

    let mut scenario_ids = HashSet::new();
    for scenario in scenarios {
        let subject = format!("scenario '{}'", scenario.id);
        if !scenario_ids.insert(scenario.id.as_str()) {
            issues.push(ValidationIssue::error(&subject, "duplicate scenario id"));
        }
        if scenario.steps.is_empty() {
            issues.push(ValidationIssue::error(&subject, "scenario has no steps"));
        }
        for (i, step) in scenario.steps.iter().enumerate() {
            let step_subject = format!("{subject} step {}", i + 1);
            check_question(&step_subject, &step.options, &step.answer, &mut issues);
        }
    }

    issues
}

fn check_question(
    subject: &str,
    options: &[String],
    answer: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if options.is_empty() {
        issues.push(ValidationIssue::error(subject, "no answer options"));
        return;
    }
    if !options.iter().any(|o| o == answer) {
        issues.push(ValidationIssue::error(
            subject,
            format!("answer '{answer}' is not among the options"),
        ));
    }
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            issues.push(ValidationIssue::warning(
                subject,
                format!("option '{option}' appears more than once"),
            ));
        }
    }
}
