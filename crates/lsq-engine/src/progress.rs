//! Mission progression: the mission pointer, XP, and levels.
//!
//! A correct answer commits its XP immediately but moves the pointer only
//! after the advance delay, so feedback can be shown first. A wrong answer
//! taints the current attempt (later correct answers score the retry award)
//! and queues the mission for review. The taint clears whenever the pointer
//! moves.

use std::collections::BTreeSet;
use std::time::Duration;

use lsq_core::{Catalog, Mission};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::StoreResult;
use crate::mistakes::MistakeQueue;
use crate::scheduler::{Scheduler, TaskId};
use crate::store::{Store, read_count};

/// Store key for the mission pointer.
pub const PROGRESS_KEY: &str = "linux-service-quest-progress-v1";
/// Store key for the XP total.
pub const XP_KEY: &str = "linux-service-quest-xp-v1";

/// Level reached with `xp` points: `xp / xp_per_level + 1`.
pub fn level_for(xp: u64, xp_per_level: u64) -> u64 {
    xp / xp_per_level.max(1) + 1
}

/// The persisted part of progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// Index of the mission being played; equal to the mission count once
    /// everything is done.
    pub current_mission: usize,
    /// Total XP earned.
    pub xp: u64,
}

/// What a submitted answer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Empty selection or no mission left; nothing changed.
    Ignored,
    /// A correct answer is still waiting to advance; nothing changed.
    Busy,
    /// The answer was right.
    Correct {
        /// The mission answered.
        mission_id: String,
        /// XP added by this answer.
        xp_awarded: u64,
        /// XP total after the award.
        xp: u64,
        /// Level after the award.
        level: u64,
        /// Whether the attempt had no earlier miss.
        first_try: bool,
        /// Whether the award crossed a level boundary.
        leveled_up: bool,
    },
    /// The answer was wrong.
    Incorrect {
        /// The mission answered.
        mission_id: String,
        /// Whether this miss added the mission to the review queue.
        newly_queued: bool,
    },
}

impl AnswerOutcome {
    /// Short feedback line for display, if the outcome has one.
    pub fn feedback(&self) -> Option<String> {
        match self {
            Self::Ignored | Self::Busy => None,
            Self::Correct { xp_awarded, .. } => {
                Some(format!("✅ Correct! Mission cleared. +{xp_awarded} XP"))
            }
            Self::Incorrect { .. } => {
                Some("❌ Not quite. Read the hint and try again.".to_string())
            }
        }
    }
}

/// Something that happened when deferred work came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The pointer moved to the next mission.
    Advanced {
        /// Previous pointer.
        from: usize,
        /// New pointer.
        to: usize,
    },
    /// The last mission was passed.
    Completed,
    /// The level-up banner timed out.
    BannerExpired {
        /// The level it announced.
        level: u64,
    },
}

/// Read-only view of progression for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Current mission pointer.
    pub current_mission: usize,
    /// Number of missions in the catalog.
    pub mission_count: usize,
    /// Total XP.
    pub xp: u64,
    /// Current level.
    pub level: u64,
    /// Share of missions passed, rounded, 0-100.
    pub progress_percent: u64,
    /// Whether the current attempt already had a miss.
    pub tainted: bool,
    /// Whether a correct answer is waiting to advance.
    pub advance_pending: bool,
    /// Level announced by a visible level-up banner.
    pub level_up: Option<u64>,
    /// Whether every mission is passed.
    pub complete: bool,
    /// Whether the last write to the store failed.
    pub unsaved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgressTask {
    Advance { from: usize },
    ExpireBanner { level: u64 },
}

/// Owns the mission pointer, XP total, and per-attempt taint.
#[derive(Debug)]
pub struct ProgressController {
    config: EngineConfig,
    mission_count: usize,
    state: ProgressState,
    tainted: bool,
    scheduler: Scheduler<ProgressTask>,
    pending_advance: Option<TaskId>,
    banner: Option<(u64, TaskId)>,
    unsaved: BTreeSet<&'static str>,
}

impl ProgressController {
    /// Restore progression from a store, clamping the pointer to the catalog.
    pub fn load(config: EngineConfig, catalog: &Catalog, store: &dyn Store) -> Self {
        let mission_count = catalog.mission_count();
        let stored = read_count(store, PROGRESS_KEY);
        let current_mission = usize::try_from(stored)
            .unwrap_or(usize::MAX)
            .min(mission_count);
        if stored > current_mission as u64 {
            warn!(stored, clamped = current_mission, "mission pointer past catalog end");
        }
        let state = ProgressState {
            current_mission,
            xp: read_count(store, XP_KEY),
        };
        debug!(mission = state.current_mission, xp = state.xp, "progress loaded");
        Self {
            config,
            mission_count,
            state,
            tainted: false,
            scheduler: Scheduler::new(),
            pending_advance: None,
            banner: None,
            unsaved: BTreeSet::new(),
        }
    }

    /// The persisted state.
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Current level.
    pub fn level(&self) -> u64 {
        level_for(self.state.xp, self.config.xp_per_level)
    }

    /// Whether every mission is passed.
    pub fn is_complete(&self) -> bool {
        self.state.current_mission >= self.mission_count
    }

    /// Whether the current attempt already had a miss.
    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Whether a correct answer is waiting to advance.
    pub fn advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// Level announced by a visible level-up banner.
    pub fn level_up_banner(&self) -> Option<u64> {
        self.banner.map(|(level, _)| level)
    }

    /// The mission under the pointer.
    pub fn current_mission<'c>(&self, catalog: &'c Catalog) -> Option<&'c Mission> {
        catalog.mission(self.state.current_mission)
    }

    /// Read-only view for display.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let progress_percent = if self.mission_count == 0 {
            0
        } else {
            let done = self.state.current_mission as u64 * 100;
            let total = self.mission_count as u64;
            (done + total / 2) / total
        };
        ProgressSnapshot {
            current_mission: self.state.current_mission,
            mission_count: self.mission_count,
            xp: self.state.xp,
            level: self.level(),
            progress_percent,
            tainted: self.tainted,
            advance_pending: self.advance_pending(),
            level_up: self.level_up_banner(),
            complete: self.is_complete(),
            unsaved: !self.unsaved.is_empty(),
        }
    }

    /// Check an answer against the current mission.
    pub fn submit_answer(
        &mut self,
        catalog: &Catalog,
        store: &mut dyn Store,
        mistakes: &mut MistakeQueue,
        selected: &str,
    ) -> AnswerOutcome {
        if selected.is_empty() {
            return AnswerOutcome::Ignored;
        }
        let Some(mission) = self.current_mission(catalog) else {
            return AnswerOutcome::Ignored;
        };
        if self.pending_advance.is_some() {
            debug!(mission = %mission.id, "answer ignored while advance is pending");
            return AnswerOutcome::Busy;
        }

        if !mission.is_correct(selected) {
            self.tainted = true;
            let newly_queued = mistakes.add(store, &mission.id);
            debug!(mission = %mission.id, newly_queued, "incorrect answer");
            return AnswerOutcome::Incorrect {
                mission_id: mission.id.clone(),
                newly_queued,
            };
        }

        let first_try = !self.tainted;
        let xp_awarded = if first_try {
            self.config.first_try_xp
        } else {
            self.config.retry_xp
        };
        let old_level = self.level();
        self.state.xp = self.state.xp.saturating_add(xp_awarded);
        let level = self.level();
        let leveled_up = level > old_level;
        let xp = self.state.xp;
        let saved = store.set(XP_KEY, &xp.to_string());
        self.record_save(XP_KEY, saved);

        if leveled_up {
            info!(level, xp, "level up");
            if let Some((_, old)) = self.banner.take() {
                self.scheduler.cancel(old);
            }
            let id = self
                .scheduler
                .schedule(self.config.level_up_banner, ProgressTask::ExpireBanner { level });
            self.banner = Some((level, id));
        }

        let from = self.state.current_mission;
        self.pending_advance = Some(
            self.scheduler
                .schedule(self.config.advance_delay, ProgressTask::Advance { from }),
        );
        debug!(mission = %mission.id, xp_awarded, xp, first_try, "correct answer");

        AnswerOutcome::Correct {
            mission_id: mission.id.clone(),
            xp_awarded,
            xp,
            level,
            first_try,
            leveled_up,
        }
    }

    /// Let `elapsed` pass and apply whatever came due.
    pub fn tick(&mut self, store: &mut dyn Store, elapsed: Duration) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        for task in self.scheduler.advance(elapsed) {
            match task {
                ProgressTask::Advance { from } => {
                    self.pending_advance = None;
                    if self.state.current_mission != from || from >= self.mission_count {
                        debug!(from, current = self.state.current_mission, "stale advance skipped");
                        continue;
                    }
                    let to = from + 1;
                    self.state.current_mission = to;
                    self.tainted = false;
                    let saved = store.set(PROGRESS_KEY, &to.to_string());
                    self.record_save(PROGRESS_KEY, saved);
                    events.push(ProgressEvent::Advanced { from, to });
                    if to == self.mission_count {
                        info!(xp = self.state.xp, "all missions complete");
                        events.push(ProgressEvent::Completed);
                    }
                }
                ProgressTask::ExpireBanner { level } => {
                    if self.level_up_banner() == Some(level) {
                        self.banner = None;
                        events.push(ProgressEvent::BannerExpired { level });
                    }
                }
            }
        }
        events
    }

    /// Time until the next deferred transition.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    /// Start over: pointer 0, no XP, no taint, empty mistake queue.
    pub fn reset(&mut self, store: &mut dyn Store, mistakes: &mut MistakeQueue) {
        self.shutdown();
        self.state = ProgressState::default();
        self.tainted = false;
        for key in [PROGRESS_KEY, XP_KEY] {
            let removed = store.remove(key);
            self.record_save(key, removed);
        }
        mistakes.clear(store);
        info!("progress reset");
    }

    /// Drop all deferred work without applying it.
    pub fn shutdown(&mut self) {
        let dropped = self.scheduler.cancel_all();
        if dropped > 0 {
            debug!(dropped, "cancelled pending progress tasks");
        }
        self.pending_advance = None;
        self.banner = None;
    }

    /// Each key is rewritten in full, so only a later success on the same
    /// key clears its failure.
    fn record_save(&mut self, key: &'static str, result: StoreResult<()>) {
        match result {
            Ok(()) => {
                self.unsaved.remove(key);
            }
            Err(e) => {
                warn!(key, error = %e, "progress not saved");
                self.unsaved.insert(key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    const ADVANCE: Duration = Duration::from_millis(900);

    struct Fixture {
        catalog: Catalog,
        store: MemoryStore,
        mistakes: MistakeQueue,
        progress: ProgressController,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_store(MemoryStore::new())
        }

        fn with_store(store: MemoryStore) -> Self {
            let catalog = Catalog::builtin().unwrap();
            let mistakes = MistakeQueue::load(&store);
            let progress = ProgressController::load(EngineConfig::default(), &catalog, &store);
            Self {
                catalog,
                store,
                mistakes,
                progress,
            }
        }

        fn submit(&mut self, selected: &str) -> AnswerOutcome {
            self.progress
                .submit_answer(&self.catalog, &mut self.store, &mut self.mistakes, selected)
        }

        fn answer(&self) -> String {
            self.progress.current_mission(&self.catalog).unwrap().answer.clone()
        }

        fn wrong(&self) -> String {
            let m = self.progress.current_mission(&self.catalog).unwrap();
            m.options.iter().find(|o| **o != m.answer).unwrap().clone()
        }

        fn tick(&mut self, elapsed: Duration) -> Vec<ProgressEvent> {
            self.progress.tick(&mut self.store, elapsed)
        }
    }

    #[test]
    fn fresh_state() {
        let f = Fixture::new();
        let snap = f.progress.snapshot();
        assert_eq!(snap.current_mission, 0);
        assert_eq!(snap.xp, 0);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.mission_count, 4);
        assert!(!snap.complete);
    }

    #[test]
    fn level_formula() {
        assert_eq!(level_for(0, 300), 1);
        assert_eq!(level_for(299, 300), 1);
        assert_eq!(level_for(300, 300), 2);
        assert_eq!(level_for(950, 300), 4);
        assert_eq!(level_for(5, 0), 6);
    }

    #[test]
    fn wrong_then_right_scores_retry_award() {
        let mut f = Fixture::new();

        let out = f.submit("sudo apt install nginx");
        assert_eq!(
            out,
            AnswerOutcome::Incorrect {
                mission_id: "m1".to_string(),
                newly_queued: true
            }
        );
        assert_eq!(f.progress.state(), ProgressState::default());
        assert_eq!(f.mistakes.ids(), ["m1"]);

        let out = f.submit("sudo systemctl status nginx");
        match out {
            AnswerOutcome::Correct {
                xp_awarded,
                first_try,
                ..
            } => {
                assert_eq!(xp_awarded, 50);
                assert!(!first_try);
            }
            other => panic!("expected correct, got {other:?}"),
        }
        assert_eq!(out.feedback().unwrap(), "✅ Correct! Mission cleared. +50 XP");

        // XP is committed at once, the pointer only after the delay.
        assert_eq!(f.progress.state().xp, 50);
        assert_eq!(f.store.get(XP_KEY).as_deref(), Some("50"));
        assert_eq!(f.progress.state().current_mission, 0);
        assert!(f.store.get(PROGRESS_KEY).is_none());

        let events = f.tick(ADVANCE);
        assert_eq!(events, vec![ProgressEvent::Advanced { from: 0, to: 1 }]);
        assert_eq!(f.progress.state().current_mission, 1);
        assert_eq!(f.store.get(PROGRESS_KEY).as_deref(), Some("1"));
        assert!(!f.progress.is_tainted());
    }

    #[test]
    fn three_first_try_answers_level_up_once() {
        let mut f = Fixture::new();
        let mut level_ups = 0;
        for expected_xp in [100, 200, 300] {
            let answer = f.answer();
            if let AnswerOutcome::Correct { xp, leveled_up, .. } = f.submit(&answer) {
                assert_eq!(xp, expected_xp);
                if leveled_up {
                    level_ups += 1;
                }
            } else {
                panic!("expected a correct outcome");
            }
            f.tick(ADVANCE);
        }
        assert_eq!(level_ups, 1);
        assert_eq!(f.progress.level(), 2);
        assert_eq!(f.progress.level_up_banner(), Some(2));
    }

    #[test]
    fn banner_expires_after_window() {
        let mut f = Fixture::new().with_xp(250);
        let answer = f.answer();
        f.submit(&answer);
        assert_eq!(f.progress.level_up_banner(), Some(2));

        f.tick(ADVANCE);
        assert_eq!(f.progress.level_up_banner(), Some(2));
        let events = f.tick(Duration::from_millis(1100));
        assert_eq!(events, vec![ProgressEvent::BannerExpired { level: 2 }]);
        assert_eq!(f.progress.level_up_banner(), None);
    }

    #[test]
    fn repeated_misses_queue_once() {
        let mut f = Fixture::new();
        let wrong = f.wrong();
        f.submit(&wrong);
        let out = f.submit(&wrong);
        assert_eq!(
            out,
            AnswerOutcome::Incorrect {
                mission_id: "m1".to_string(),
                newly_queued: false
            }
        );
        assert_eq!(f.mistakes.len(), 1);
        assert_eq!(f.progress.state().xp, 0);
    }

    #[test]
    fn submission_blocked_during_advance_window() {
        let mut f = Fixture::new();
        let answer = f.answer();
        f.submit(&answer);
        assert_eq!(f.submit(&answer), AnswerOutcome::Busy);
        assert_eq!(f.progress.state().xp, 100);
        f.tick(ADVANCE);
        assert_eq!(f.progress.state().current_mission, 1);
    }

    #[test]
    fn empty_selection_is_ignored() {
        let mut f = Fixture::new();
        assert_eq!(f.submit(""), AnswerOutcome::Ignored);
        assert_eq!(AnswerOutcome::Ignored.feedback(), None);
    }

    #[test]
    fn completing_the_catalog() {
        let mut f = Fixture::new();
        for _ in 0..3 {
            let answer = f.answer();
            f.submit(&answer);
            f.tick(ADVANCE);
        }
        let answer = f.answer();
        f.submit(&answer);
        assert_eq!(
            f.tick(ADVANCE),
            vec![
                ProgressEvent::Advanced { from: 3, to: 4 },
                ProgressEvent::Completed
            ]
        );
        assert!(f.progress.is_complete());
        assert_eq!(f.progress.snapshot().progress_percent, 100);
        assert_eq!(f.submit("anything"), AnswerOutcome::Ignored);
    }

    #[test]
    fn progress_percent_rounds() {
        let store = MemoryStore::new().with(PROGRESS_KEY, "1");
        let f = Fixture::with_store(store);
        assert_eq!(f.progress.snapshot().progress_percent, 25);
    }

    #[test]
    fn reset_clears_everything() {
        let mut f = Fixture::new();
        let wrong = f.wrong();
        f.submit(&wrong);
        let answer = f.answer();
        f.submit(&answer);
        f.progress.reset(&mut f.store, &mut f.mistakes);

        // The pending advance must not fire after the reset.
        assert!(f.tick(Duration::from_secs(10)).is_empty());
        assert_eq!(f.progress.state(), ProgressState::default());
        assert!(f.mistakes.is_empty());
        assert!(f.store.is_empty());
        assert!(!f.progress.is_tainted());
    }

    #[test]
    fn shutdown_cancels_pending_advance() {
        let mut f = Fixture::new();
        let answer = f.answer();
        f.submit(&answer);
        f.progress.shutdown();
        assert!(f.tick(ADVANCE).is_empty());
        assert_eq!(f.progress.state().current_mission, 0);
        assert_eq!(f.progress.next_due(), None);
    }

    #[test]
    fn restart_mid_window_keeps_xp_but_not_advance() {
        let mut f = Fixture::new();
        let answer = f.answer();
        f.submit(&answer);
        // Simulated process exit before the advance fires.
        let restored = Fixture::with_store(f.store.clone());
        assert_eq!(restored.progress.state().xp, 100);
        assert_eq!(restored.progress.state().current_mission, 0);
    }

    #[test]
    fn corrupt_values_read_as_fresh_start() {
        let store = MemoryStore::new()
            .with(PROGRESS_KEY, "banana")
            .with(XP_KEY, "-40");
        let f = Fixture::with_store(store);
        assert_eq!(f.progress.state(), ProgressState::default());
    }

    #[test]
    fn pointer_clamped_to_catalog() {
        let store = MemoryStore::new().with(PROGRESS_KEY, "99");
        let f = Fixture::with_store(store);
        assert_eq!(f.progress.state().current_mission, 4);
        assert!(f.progress.is_complete());
    }

    struct FailingStore;

    impl Store for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io {
                path: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn remove(&mut self, _key: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_is_not_fatal() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = FailingStore;
        let mut mistakes = MistakeQueue::new();
        let mut progress = ProgressController::load(EngineConfig::default(), &catalog, &store);
        let answer = catalog.mission(0).unwrap().answer.clone();

        let out = progress.submit_answer(&catalog, &mut store, &mut mistakes, &answer);
        assert!(matches!(out, AnswerOutcome::Correct { xp: 100, .. }));
        assert!(progress.snapshot().unsaved);
        progress.tick(&mut store, ADVANCE);
        assert_eq!(progress.state().current_mission, 1);
    }

    /// A memory store that rejects writes or deletes for one key.
    struct FlakyStore {
        inner: MemoryStore,
        fail_set: Option<&'static str>,
        fail_remove: Option<&'static str>,
    }

    impl FlakyStore {
        fn new(inner: MemoryStore) -> Self {
            Self {
                inner,
                fail_set: None,
                fail_remove: None,
            }
        }

        fn refuse(key: &str) -> StoreResult<()> {
            Err(StoreError::Io {
                path: key.to_string(),
                source: std::io::Error::other("read-only"),
            })
        }
    }

    impl Store for FlakyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
            if self.fail_set == Some(key) {
                return Self::refuse(key);
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> StoreResult<()> {
            if self.fail_remove == Some(key) {
                return Self::refuse(key);
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn reset_removes_xp_even_if_pointer_removal_fails() {
        let catalog = Catalog::builtin().unwrap();
        let seeded = MemoryStore::new()
            .with(PROGRESS_KEY, "2")
            .with(XP_KEY, "700");
        let mut store = FlakyStore::new(seeded);
        store.fail_remove = Some(PROGRESS_KEY);
        let mut mistakes = MistakeQueue::new();
        let mut progress = ProgressController::load(EngineConfig::default(), &catalog, &store);

        progress.reset(&mut store, &mut mistakes);
        assert_eq!(progress.state(), ProgressState::default());
        assert!(store.get(XP_KEY).is_none());
        assert!(progress.snapshot().unsaved);

        let reloaded = ProgressController::load(EngineConfig::default(), &catalog, &store);
        assert_eq!(reloaded.state().xp, 0);
    }

    #[test]
    fn lost_xp_write_stays_unsaved_after_pointer_write() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = FlakyStore::new(MemoryStore::new());
        store.fail_set = Some(XP_KEY);
        let mut mistakes = MistakeQueue::new();
        let mut progress = ProgressController::load(EngineConfig::default(), &catalog, &store);
        let answer = catalog.mission(0).unwrap().answer.clone();

        progress.submit_answer(&catalog, &mut store, &mut mistakes, &answer);
        assert!(progress.snapshot().unsaved);
        progress.tick(&mut store, ADVANCE);
        assert_eq!(store.get(PROGRESS_KEY).as_deref(), Some("1"));
        assert!(store.get(XP_KEY).is_none());
        assert!(progress.snapshot().unsaved);

        // The next successful XP write carries the whole total.
        store.fail_set = None;
        let answer = catalog.mission(1).unwrap().answer.clone();
        progress.submit_answer(&catalog, &mut store, &mut mistakes, &answer);
        assert_eq!(store.get(XP_KEY).as_deref(), Some("200"));
        assert!(!progress.snapshot().unsaved);
    }

    impl Fixture {
        fn with_xp(self, xp: u64) -> Self {
            Self::with_store(self.store.with(XP_KEY, &xp.to_string()))
        }
    }
}
