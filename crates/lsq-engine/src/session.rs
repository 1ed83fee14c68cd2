//! A learning session: the catalog, its store, and every controller.
//!
//! `Session` is what a front end talks to. It routes commands to the
//! progression controller, mistake queue, and scenario runner, drives their
//! schedulers from one [`Session::tick`], and offers a line-oriented command
//! interpreter for terminal play.

use std::fmt::Write as _;
use std::time::Duration;

use lsq_core::{Catalog, Distro, Glossary, GlossaryEntry, Mission, Scenario, Step};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::mistakes::MistakeQueue;
use crate::progress::{AnswerOutcome, ProgressController, ProgressEvent, ProgressSnapshot};
use crate::review::{ReviewDrill, ReviewOutcome, review_items};
use crate::runner::{RunState, ScenarioEvent, ScenarioRunner, StepOutcome};
use crate::store::Store;

/// Something deferred that came due during a [`Session::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// From the progression controller.
    Progress(ProgressEvent),
    /// From the scenario runner.
    Scenario(ScenarioEvent),
}

/// An interactive learning session over one catalog and one store.
pub struct Session<S: Store> {
    catalog: Catalog,
    store: S,
    progress: ProgressController,
    mistakes: MistakeQueue,
    runner: ScenarioRunner,
    review: ReviewDrill,
}

impl<S: Store> Session<S> {
    /// Open a session, restoring progress and mistakes from `store`.
    pub fn new(catalog: Catalog, store: S, config: EngineConfig) -> Self {
        let mistakes = MistakeQueue::load(&store);
        let runner = ScenarioRunner::new(&config);
        let progress = ProgressController::load(config, &catalog, &store);
        debug!(
            missions = catalog.mission_count(),
            scenarios = catalog.scenarios().len(),
            mistakes = mistakes.len(),
            "session opened"
        );
        Self {
            catalog,
            store,
            progress,
            mistakes,
            runner,
            review: ReviewDrill::new(),
        }
    }

    /// The content being played.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ---- Commands ----

    /// Answer the current mission.
    pub fn submit_answer(&mut self, selected: &str) -> AnswerOutcome {
        self.progress
            .submit_answer(&self.catalog, &mut self.store, &mut self.mistakes, selected)
    }

    /// Wipe progress, XP, and the mistake queue.
    pub fn reset(&mut self) {
        self.review.stop();
        self.progress.reset(&mut self.store, &mut self.mistakes);
    }

    /// Queue a mission for review. Returns true if it was not queued yet.
    pub fn add_mistake(&mut self, id: &str) -> bool {
        self.mistakes.add(&mut self.store, id)
    }

    /// Queued mission ids in first-miss order.
    pub fn mistakes(&self) -> &[String] {
        self.mistakes.ids()
    }

    /// Empty the mistake queue.
    pub fn clear_mistakes(&mut self) {
        self.review.stop();
        self.mistakes.clear(&mut self.store);
    }

    /// Start drilling the queued missions at review item `index`, leaving
    /// any scenario run.
    pub fn start_review(&mut self, index: usize) -> EngineResult<()> {
        self.review.start(&self.catalog, &self.mistakes, index)?;
        self.runner.exit_to_picker();
        Ok(())
    }

    /// Answer the mission being drilled. XP and the pointer are untouched.
    pub fn submit_review(&mut self, selected: &str) -> ReviewOutcome {
        self.review.submit(&self.catalog, &self.mistakes, selected)
    }

    /// Leave the review drill.
    pub fn exit_review(&mut self) {
        self.review.stop();
    }

    /// Start a scenario by index, leaving any review drill.
    pub fn choose_scenario(&mut self, index: usize) -> EngineResult<RunState> {
        let state = self.runner.choose_scenario(&self.catalog, index)?;
        self.review.stop();
        Ok(state)
    }

    /// Answer the current scenario step.
    pub fn submit_step(&mut self, selected: &str) -> StepOutcome {
        self.runner.submit_step(&self.catalog, selected)
    }

    /// Run the current scenario again from the top.
    pub fn restart_scenario(&mut self) -> RunState {
        self.runner.restart()
    }

    /// Leave the current scenario or review drill.
    pub fn exit_to_picker(&mut self) -> RunState {
        self.review.stop();
        self.runner.exit_to_picker()
    }

    // ---- Time ----

    /// Let `elapsed` pass on both controllers and report what fired.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events: Vec<SessionEvent> = self
            .progress
            .tick(&mut self.store, elapsed)
            .into_iter()
            .map(SessionEvent::Progress)
            .collect();
        events.extend(
            self.runner
                .tick(elapsed)
                .into_iter()
                .map(SessionEvent::Scenario),
        );
        events
    }

    /// Time until the next deferred transition on either controller.
    pub fn next_due(&self) -> Option<Duration> {
        match (self.progress.next_due(), self.runner.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fast-forward until nothing is pending and return everything that fired.
    pub fn settle(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Some(due) = self.next_due() {
            events.extend(self.tick(due));
        }
        events
    }

    /// Whether a correct answer on either controller is waiting to advance.
    pub fn is_busy(&self) -> bool {
        self.progress.advance_pending() || self.runner.is_busy()
    }

    /// Cancel all deferred work without applying it.
    pub fn shutdown(&mut self) {
        self.progress.shutdown();
        self.runner.shutdown();
    }

    // ---- Queries ----

    /// Read-only view of progression.
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Where the scenario runner is.
    pub fn scenario_state(&self) -> RunState {
        self.runner.state()
    }

    /// The mission under the pointer, if any remain.
    pub fn current_mission(&self) -> Option<&Mission> {
        self.progress.current_mission(&self.catalog)
    }

    /// The scenario being run or just finished.
    pub fn current_scenario(&self) -> Option<&Scenario> {
        self.runner.current_scenario(&self.catalog)
    }

    /// The scenario step awaiting an answer.
    pub fn current_step(&self) -> Option<&Step> {
        self.runner.current_step(&self.catalog)
    }

    /// Unlocked terms matching `query`; an empty query returns all of them.
    pub fn glossary(&self, query: &str) -> Vec<GlossaryEntry> {
        let unlocked = Glossary::unlocked(&self.catalog, self.progress.state().current_mission);
        unlocked.filter(query).into_iter().cloned().collect()
    }

    /// Queued missions resolved against the catalog. Unknown ids are skipped.
    pub fn review_items(&self) -> Vec<&Mission> {
        review_items(&self.catalog, &self.mistakes)
    }

    /// The mission being drilled, if a review is running.
    pub fn current_review(&self) -> Option<&Mission> {
        self.review.current(&self.catalog, &self.mistakes)
    }

    /// Whether any recent write to the store failed.
    pub fn unsaved(&self) -> bool {
        self.progress.snapshot().unsaved || self.mistakes.unsaved()
    }

    // ---- Text interface ----

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> EngineResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }

        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        if let Ok(number) = cmd.parse::<usize>() {
            return self.do_answer(number);
        }

        match cmd.as_str() {
            "help" | "h" | "?" => Ok(HELP.to_string()),
            "status" => Ok(self.render_status()),
            "show" | "look" => Ok(self.prompt()),
            "scenarios" => Ok(self.render_scenarios()),
            "scenario" => self.do_scenario(rest),
            "restart" => Ok(self.do_restart()),
            "back" => {
                self.exit_to_picker();
                Ok(format!("Back to missions.\n\n{}", self.prompt()))
            }
            "glossary" => Ok(self.render_glossary(rest)),
            "review" if rest.is_empty() => Ok(self.render_review()),
            "review" => self.do_review(rest),
            "distro" => self.do_distro(rest),
            "reset" => {
                self.reset();
                Ok(format!("Progress reset.\n\n{}", self.prompt()))
            }
            "quit" | "q" | "exit" => Ok("Goodbye!".to_string()),
            _ => Err(EngineError::UnknownCommand(trimmed.to_string())),
        }
    }

    /// What the learner should be looking at right now.
    pub fn prompt(&self) -> String {
        if self.review.is_active() {
            return self.render_review_prompt();
        }
        match self.runner.state() {
            RunState::Active { .. } => self.render_step_prompt(),
            RunState::Complete { .. } => self.render_scenario_complete(),
            RunState::Picker => self.render_mission_prompt(),
        }
    }

    /// Describe a fired event, if it needs describing.
    pub fn render_event(&self, event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::Progress(ProgressEvent::Advanced { .. }) => {
                if self.progress.is_complete()
                    || self.review.is_active()
                    || self.runner.state() != RunState::Picker
                {
                    None
                } else {
                    Some(self.render_mission_prompt())
                }
            }
            SessionEvent::Progress(ProgressEvent::Completed) => {
                let snap = self.progress.snapshot();
                Some(format!(
                    "🎉 All missions complete! Final XP: {}, level {}.",
                    snap.xp, snap.level
                ))
            }
            SessionEvent::Progress(ProgressEvent::BannerExpired { .. }) => None,
            SessionEvent::Scenario(ScenarioEvent::StepAdvanced { .. }) => {
                Some(self.render_step_prompt())
            }
            SessionEvent::Scenario(ScenarioEvent::Completed { .. }) => {
                Some(self.render_scenario_complete())
            }
        }
    }

    fn do_answer(&mut self, number: usize) -> EngineResult<String> {
        if self.review.is_active() {
            return self.do_review_answer(number);
        }
        match self.runner.state() {
            RunState::Active { .. } => {
                let Some(step) = self.current_step() else {
                    return Ok(NOTHING_TO_ANSWER.to_string());
                };
                let selected = step
                    .option(number)
                    .ok_or_else(|| out_of_range(number, step.options.len()))?
                    .to_string();
                Ok(match self.submit_step(&selected) {
                    StepOutcome::Busy => BUSY.to_string(),
                    outcome => outcome
                        .feedback()
                        .unwrap_or_else(|| NOTHING_TO_ANSWER.to_string()),
                })
            }
            RunState::Complete { .. } => Ok(self.render_scenario_complete()),
            RunState::Picker => {
                let Some(mission) = self.current_mission() else {
                    return Ok(ALL_DONE.to_string());
                };
                let selected = mission
                    .option(number)
                    .ok_or_else(|| out_of_range(number, mission.options.len()))?
                    .to_string();
                let outcome = self.submit_answer(&selected);
                Ok(match &outcome {
                    AnswerOutcome::Busy => BUSY.to_string(),
                    AnswerOutcome::Correct {
                        level,
                        leveled_up: true,
                        ..
                    } => format!(
                        "{}\n⭐ Level up! You reached level {level}.",
                        outcome.feedback().unwrap_or_default()
                    ),
                    AnswerOutcome::Incorrect { .. } => {
                        let hint = self
                            .current_mission()
                            .map(|m| format!("\nHint: {}", m.command))
                            .unwrap_or_default();
                        format!("{}{hint}", outcome.feedback().unwrap_or_default())
                    }
                    other => other
                        .feedback()
                        .unwrap_or_else(|| NOTHING_TO_ANSWER.to_string()),
                })
            }
        }
    }

    fn do_scenario(&mut self, rest: &str) -> EngineResult<String> {
        let number: usize = rest
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| EngineError::InvalidChoice("usage: scenario <number>".to_string()))?;
        self.choose_scenario(number - 1)?;
        let mut out = String::new();
        if let Some(scenario) = self.current_scenario() {
            let _ = writeln!(out, "📖 {} [{}]", scenario.title, scenario.distro);
            let _ = writeln!(out, "{}\n", scenario.story);
        }
        out.push_str(&self.render_step_prompt());
        Ok(out)
    }

    fn do_review(&mut self, rest: &str) -> EngineResult<String> {
        let number: usize = rest
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| EngineError::InvalidChoice("usage: review [number]".to_string()))?;
        self.start_review(number - 1)?;
        Ok(self.render_review_prompt())
    }

    fn do_review_answer(&mut self, number: usize) -> EngineResult<String> {
        let Some(mission) = self.current_review() else {
            return Ok(NOTHING_TO_ANSWER.to_string());
        };
        let hint = mission.command.clone();
        let selected = mission
            .option(number)
            .ok_or_else(|| out_of_range(number, mission.options.len()))?
            .to_string();
        let outcome = self.submit_review(&selected);
        let feedback = outcome.feedback().unwrap_or_default();
        Ok(match outcome {
            ReviewOutcome::Correct { finished: true, .. } => format!(
                "{feedback}\n🏁 Review finished. The queue stays until you clear it.\n\n{}",
                self.prompt()
            ),
            ReviewOutcome::Correct { .. } => format!("{feedback}\n\n{}", self.render_review_prompt()),
            ReviewOutcome::Incorrect { .. } => format!("{feedback}\nHint: {hint}"),
            ReviewOutcome::Ignored => NOTHING_TO_ANSWER.to_string(),
        })
    }

    fn do_restart(&mut self) -> String {
        match self.restart_scenario() {
            RunState::Picker => "No scenario to restart. Type `scenarios` to pick one.".to_string(),
            _ => self.render_step_prompt(),
        }
    }

    fn do_distro(&self, rest: &str) -> EngineResult<String> {
        let distro = Distro::parse(rest).ok_or_else(|| {
            EngineError::InvalidChoice(format!(
                "unknown distro '{rest}' (try ubuntu, fedora, arch, opensuse)"
            ))
        })?;
        let Some(mission) = self.current_mission() else {
            return Ok(ALL_DONE.to_string());
        };
        Ok(match mission.command_for(distro) {
            Some(cmd) => {
                let mut out = format!("{distro} ({}): {}", distro.package_manager(), cmd.command);
                if let Some(note) = &cmd.note {
                    let _ = write!(out, "\n  Note: {note}");
                }
                out
            }
            None => format!("No {distro} variant recorded for this mission."),
        })
    }

    fn render_status(&self) -> String {
        let snap = self.progress.snapshot();
        let mut out = format!(
            "Level {} · {} XP · {}/{} missions ({}%)\n",
            snap.level, snap.xp, snap.current_mission, snap.mission_count, snap.progress_percent
        );
        if let Some(level) = snap.level_up {
            let _ = writeln!(out, "⭐ Level up! You reached level {level}.");
        }
        let _ = writeln!(out, "Mistakes to review: {}", self.mistakes.len());
        match self.runner.state() {
            RunState::Picker => out.push_str("No scenario running."),
            RunState::Active { step, .. } => {
                let (title, len) = self
                    .current_scenario()
                    .map(|s| (s.title.as_str(), s.len()))
                    .unwrap_or_default();
                let _ = write!(out, "Scenario: {title} (step {}/{len})", step + 1);
            }
            RunState::Complete { .. } => {
                let title = self.current_scenario().map(|s| s.title.as_str()).unwrap_or("");
                let _ = write!(out, "Scenario: {title} (complete)");
            }
        }
        if self.unsaved() {
            out.push_str("\n⚠ Progress not saved.");
        }
        out
    }

    fn render_mission_prompt(&self) -> String {
        let snap = self.progress.snapshot();
        let Some(mission) = self.current_mission() else {
            return ALL_DONE.to_string();
        };
        let mut out = format!(
            "Mission {}/{}: {} [{}]\n",
            snap.current_mission + 1,
            snap.mission_count,
            mission.title,
            mission.distro
        );
        let _ = writeln!(out, "{}", mission.description);
        let _ = writeln!(out, "Term: {}: {}", mission.term.word, mission.term.meaning);
        let _ = writeln!(out, "Command: {}", mission.command);
        let _ = writeln!(out, "\n{}", mission.question);
        push_options(&mut out, &mission.options);
        out
    }

    fn render_step_prompt(&self) -> String {
        let (Some(scenario), Some(step), RunState::Active { step: index, .. }) = (
            self.current_scenario(),
            self.current_step(),
            self.runner.state(),
        ) else {
            return NOTHING_TO_ANSWER.to_string();
        };
        let mut out = format!("{} · step {}/{}\n", scenario.title, index + 1, scenario.len());
        let _ = writeln!(out, "{}", step.instruction);
        let _ = writeln!(out, "\n{}", step.question);
        push_options(&mut out, &step.options);
        out
    }

    fn render_review_prompt(&self) -> String {
        let (Some(index), Some(mission)) = (self.review.position(), self.current_review()) else {
            return NOTHING_TO_ANSWER.to_string();
        };
        let mut out = format!(
            "Review {}/{}: {} [{}]\n",
            index + 1,
            self.review_items().len(),
            mission.title,
            mission.distro
        );
        let _ = writeln!(out, "{}", mission.description);
        let _ = writeln!(out, "\n{}", mission.question);
        push_options(&mut out, &mission.options);
        out
    }

    fn render_scenario_complete(&self) -> String {
        let title = self.current_scenario().map(|s| s.title.as_str()).unwrap_or("");
        format!(
            "🏁 Scenario complete: {title}. Type `restart` to run it again or `back` for missions."
        )
    }

    fn render_scenarios(&self) -> String {
        let mut out = String::from("Scenarios:\n");
        for (i, s) in self.catalog.scenarios().iter().enumerate() {
            let _ = writeln!(out, "  {}) {} [{}], {} steps", i + 1, s.title, s.distro, s.len());
        }
        out.push_str("Type `scenario <number>` to start one.");
        out
    }

    fn render_glossary(&self, query: &str) -> String {
        let entries = self.glossary(query);
        if entries.is_empty() {
            return if query.is_empty() {
                "No terms unlocked yet. Pass a mission to learn one.".to_string()
            } else {
                format!("No unlocked terms match '{query}'.")
            };
        }
        let mut out = String::from("Glossary:");
        for e in &entries {
            let _ = write!(out, "\n  {}: {} ({})", e.word, e.meaning, e.mission);
        }
        out
    }

    fn render_review(&self) -> String {
        let items = self.review_items();
        if items.is_empty() {
            return "No mistakes to review.".to_string();
        }
        let mut out = String::from("Review queue:");
        for (i, m) in items.iter().enumerate() {
            let _ = write!(
                out,
                "\n  {}) {}: {}\n    {}\n    Answer: {}",
                i + 1,
                m.id,
                m.title,
                m.question,
                m.answer
            );
        }
        out.push_str("\nType `review <number>` to retry them.");
        out
    }
}

const HELP: &str = "\
Commands:
  <number>            Answer the current question
  show                Show the current question
  status              Show level, XP and progress
  scenarios           List scenarios
  scenario <number>   Start a scenario
  restart             Restart the current scenario
  back                Leave the scenario and return to missions
  distro <name>       Show this mission's command on another distro
  glossary [query]    Show unlocked terms
  review              Show missed missions
  review <number>     Retry missed missions from that one on (no XP)
  reset               Wipe all progress
  quit                Exit";

const BUSY: &str = "Hold on, moving to the next question...";
const NOTHING_TO_ANSWER: &str = "Nothing to answer right now.";
const ALL_DONE: &str = "🎉 All missions complete! Type `scenarios` to keep practising or `reset` to start over.";

fn out_of_range(number: usize, count: usize) -> EngineError {
    EngineError::InvalidChoice(format!("option {number} does not exist (choose 1-{count})"))
}

fn push_options(out: &mut String, options: &[String]) {
    for (i, option) in options.iter().enumerate() {
        let _ = writeln!(out, "  {}) {option}", i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mistakes::MISTAKES_KEY;
    use crate::progress::{PROGRESS_KEY, XP_KEY};
    use crate::store::MemoryStore;

    fn test_session() -> Session<MemoryStore> {
        Session::new(
            Catalog::builtin().unwrap(),
            MemoryStore::new(),
            EngineConfig::default(),
        )
    }

    fn answer_number(options: &[String], answer: &str) -> usize {
        options.iter().position(|o| o == answer).unwrap() + 1
    }

    #[test]
    fn create_session() {
        let s = test_session();
        assert_eq!(s.progress().current_mission, 0);
        assert_eq!(s.scenario_state(), RunState::Picker);
        assert_eq!(s.current_mission().unwrap().id, "m1");
        assert!(s.mistakes().is_empty());
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn tick_routes_both_controllers() {
        let mut s = test_session();
        s.submit_answer("sudo systemctl status nginx");
        s.choose_scenario(1).unwrap();
        s.submit_step("sudo journalctl -u sshd --since today");
        assert_eq!(s.next_due(), Some(Duration::from_millis(900)));

        let events = s.tick(Duration::from_millis(1400));
        assert_eq!(
            events,
            vec![
                SessionEvent::Progress(ProgressEvent::Advanced { from: 0, to: 1 }),
                SessionEvent::Scenario(ScenarioEvent::StepAdvanced { scenario: 1, step: 1 }),
            ]
        );
    }

    #[test]
    fn settle_drains_everything() {
        let mut s = test_session();
        s.submit_answer("sudo systemctl status nginx");
        let events = s.settle();
        assert_eq!(
            events,
            vec![SessionEvent::Progress(ProgressEvent::Advanced { from: 0, to: 1 })]
        );
        assert_eq!(s.next_due(), None);
    }

    #[test]
    fn scenario_answers_never_touch_progress() {
        let mut s = test_session();
        s.choose_scenario(0).unwrap();
        s.submit_step("sudo apt install nginx");
        let answer = s.current_step().unwrap().answer.clone();
        s.submit_step(&answer);
        s.settle();
        assert_eq!(s.progress().xp, 0);
        assert!(s.mistakes().is_empty());
    }

    #[test]
    fn mistakes_resolve_for_review() {
        let mut s = test_session();
        assert!(s.add_mistake("m3"));
        assert!(s.add_mistake("gone"));
        assert!(!s.add_mistake("m3"));
        let titles: Vec<&str> = s.review_items().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Investigate Failure"]);
        s.clear_mistakes();
        assert!(s.mistakes().is_empty());
        assert!(s.store().get(MISTAKES_KEY).is_none());
    }

    #[test]
    fn glossary_follows_pointer() {
        let mut s = test_session();
        assert!(s.glossary("").is_empty());
        s.submit_answer("sudo systemctl status nginx");
        s.settle();
        let entries = s.glossary("");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "daemon");
        assert!(s.glossary("journal").is_empty());
    }

    #[test]
    fn process_numbered_answer() {
        let mut s = test_session();
        let out = s.process("1").unwrap();
        assert_eq!(out, "✅ Correct! Mission cleared. +100 XP");
        assert_eq!(s.process("1").unwrap(), BUSY);
        s.settle();
        assert_eq!(s.progress().current_mission, 1);
    }

    #[test]
    fn process_wrong_answer_shows_hint() {
        let mut s = test_session();
        let out = s.process("2").unwrap();
        assert!(out.starts_with("❌ Not quite."));
        assert!(out.contains("Hint: sudo systemctl start nginx"));
        assert_eq!(s.mistakes(), ["m1"]);
    }

    #[test]
    fn process_option_out_of_range() {
        let mut s = test_session();
        let err = s.process("7").unwrap_err();
        assert!(matches!(err, EngineError::InvalidChoice(_)));
        assert!(err.to_string().contains("choose 1-3"));
    }

    #[test]
    fn process_level_up_message() {
        let store = MemoryStore::new().with(XP_KEY, "250");
        let mut s = Session::new(Catalog::builtin().unwrap(), store, EngineConfig::default());
        let out = s.process("1").unwrap();
        assert!(out.contains("Level up! You reached level 2."));
    }

    #[test]
    fn process_scenario_flow() {
        let mut s = test_session();
        let out = s.process("scenario 2").unwrap();
        assert!(out.contains("The Rogue SSH Daemon"));
        assert!(out.contains("step 1/4"));

        let out = s.process("3").unwrap();
        assert!(out.starts_with("❌"));

        for _ in 0..4 {
            let step = s.current_step().unwrap();
            let n = answer_number(&step.options, &step.answer);
            assert!(s.process(&n.to_string()).unwrap().starts_with("✅"));
            s.settle();
        }
        assert_eq!(s.scenario_state(), RunState::Complete { scenario: 1 });
        assert!(s.process("1").unwrap().contains("Scenario complete"));

        assert!(s.process("restart").unwrap().contains("step 1/4"));
        assert!(s.process("back").unwrap().contains("Mission 1/4"));
        assert_eq!(s.scenario_state(), RunState::Picker);
    }

    #[test]
    fn process_scenario_bad_index() {
        let mut s = test_session();
        assert!(matches!(
            s.process("scenario 9").unwrap_err(),
            EngineError::ScenarioOutOfRange { index: 8, count: 2 }
        ));
        assert!(matches!(
            s.process("scenario zero").unwrap_err(),
            EngineError::InvalidChoice(_)
        ));
    }

    #[test]
    fn process_restart_without_scenario() {
        let mut s = test_session();
        assert!(s.process("restart").unwrap().starts_with("No scenario to restart"));
    }

    #[test]
    fn process_status() {
        let store = MemoryStore::new()
            .with(PROGRESS_KEY, "2")
            .with(XP_KEY, "350");
        let mut s = Session::new(Catalog::builtin().unwrap(), store, EngineConfig::default());
        let out = s.process("status").unwrap();
        assert!(out.contains("Level 2 · 350 XP · 2/4 missions (50%)"));
        assert!(out.contains("Mistakes to review: 0"));
    }

    #[test]
    fn process_glossary_and_review() {
        let mut s = test_session();
        assert!(s.process("glossary").unwrap().starts_with("No terms unlocked"));
        s.process("2").unwrap();
        s.process("1").unwrap();
        s.settle();
        assert!(s.process("glossary daemon").unwrap().contains("daemon: A background"));
        assert!(s.process("glossary zzz").unwrap().contains("No unlocked terms match"));
        let review = s.process("review").unwrap();
        assert!(review.contains("m1: Wake the Web Service"));
        assert!(review.contains("Answer: sudo systemctl status nginx"));
    }

    #[test]
    fn review_drill_leaves_progress_alone() {
        let mut s = test_session();
        s.process("2").unwrap();
        s.process("1").unwrap();
        s.settle();
        assert_eq!(s.progress().xp, 50);

        assert!(matches!(
            s.process("review 0").unwrap_err(),
            EngineError::InvalidChoice(_)
        ));
        assert!(matches!(
            s.process("review 3").unwrap_err(),
            EngineError::ReviewOutOfRange { index: 2, count: 1 }
        ));

        let out = s.process("review 1").unwrap();
        assert!(out.starts_with("Review 1/1: Wake the Web Service"));
        assert!(s.prompt().starts_with("Review 1/1"));

        let out = s.process("2").unwrap();
        assert!(out.contains("Not quite"));
        assert!(out.contains("Hint: sudo systemctl start nginx"));
        assert!(s.current_review().is_some());

        let out = s.process("1").unwrap();
        assert!(out.contains("Nailed it"));
        assert!(out.contains("Review finished"));
        assert!(out.contains("Mission 2/4"));
        assert!(s.current_review().is_none());

        assert!(s.settle().is_empty());
        assert_eq!(s.progress().xp, 50);
        assert_eq!(s.progress().current_mission, 1);
        assert_eq!(s.mistakes(), ["m1"]);
    }

    #[test]
    fn review_drill_yields_to_scenarios_and_back() {
        let mut s = test_session();
        s.process("3").unwrap();
        s.settle();
        s.process("review 1").unwrap();
        s.process("scenario 1").unwrap();
        assert!(s.current_review().is_none());
        assert!(s.current_step().is_some());
        assert!(s.prompt().contains("step 1/5"));

        s.process("review 1").unwrap();
        assert!(s.current_scenario().is_none());
        s.process("back").unwrap();
        assert!(s.current_review().is_none());
        assert!(s.prompt().starts_with("Mission 1/4"));
    }

    #[test]
    fn process_distro_variant() {
        let mut s = test_session();
        let out = s.process("distro suse").unwrap();
        assert!(out.starts_with("openSUSE (zypper): sudo systemctl start nginx"));
        assert!(out.contains("Note: Install first"));
        assert!(s.process("distro beos").is_err());
    }

    #[test]
    fn process_reset() {
        let mut s = test_session();
        s.process("2").unwrap();
        s.process("1").unwrap();
        let out = s.process("reset").unwrap();
        assert!(out.starts_with("Progress reset."));
        assert!(s.settle().is_empty());
        assert_eq!(s.progress().xp, 0);
        assert!(s.mistakes().is_empty());
    }

    #[test]
    fn process_misc_commands() {
        let mut s = test_session();
        assert_eq!(s.process("   ").unwrap(), "");
        assert!(s.process("help").unwrap().contains("scenario <number>"));
        assert!(s.process("scenarios").unwrap().contains("1) The Broken Web Server"));
        assert!(s.process("show").unwrap().contains("Which command checks if nginx"));
        assert_eq!(s.process("quit").unwrap(), "Goodbye!");
        assert!(matches!(
            s.process("dance").unwrap_err(),
            EngineError::UnknownCommand(_)
        ));
    }

    #[test]
    fn completion_is_announced() {
        let mut s = test_session();
        // The first option is the answer for every built-in mission.
        for _ in 0..4 {
            assert!(s.process("1").unwrap().starts_with("✅"));
            s.settle();
        }
        assert!(s.progress().complete);
        let done = s.render_event(&SessionEvent::Progress(ProgressEvent::Completed));
        assert!(done.unwrap().contains("All missions complete"));
        assert_eq!(s.process("1").unwrap(), ALL_DONE);
    }

    #[test]
    fn shutdown_cancels_both() {
        let mut s = test_session();
        s.submit_answer("sudo systemctl status nginx");
        s.choose_scenario(0).unwrap();
        s.submit_step("sudo systemctl status nginx");
        s.shutdown();
        assert_eq!(s.next_due(), None);
        assert!(s.tick(Duration::from_secs(5)).is_empty());
        assert_eq!(s.progress().current_mission, 0);
        assert_eq!(s.scenario_state(), RunState::Active { scenario: 0, step: 0 });
    }
}
