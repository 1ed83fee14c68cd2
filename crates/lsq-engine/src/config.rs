//! Tuning knobs for scoring and feedback pacing.

use std::time::Duration;

/// Configuration for a learning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// XP needed per level (never 0).
    pub xp_per_level: u64,
    /// XP for a correct answer with no earlier miss on the same mission.
    pub first_try_xp: u64,
    /// XP for a correct answer after at least one miss.
    pub retry_xp: u64,
    /// Delay between a correct mission answer and the pointer advance.
    pub advance_delay: Duration,
    /// Delay between a correct scenario step and the next step.
    pub step_delay: Duration,
    /// How long a level-up banner stays up.
    pub level_up_banner: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            xp_per_level: 300,
            first_try_xp: 100,
            retry_xp: 50,
            advance_delay: Duration::from_millis(900),
            step_delay: Duration::from_millis(1400),
            level_up_banner: Duration::from_millis(2000),
        }
    }
}

impl EngineConfig {
    /// Set the XP per level (clamped to at least 1).
    pub fn with_xp_per_level(mut self, xp: u64) -> Self {
        self.xp_per_level = xp.max(1);
        self
    }

    /// Set the first-try and retry awards.
    pub fn with_awards(mut self, first_try: u64, retry: u64) -> Self {
        self.first_try_xp = first_try;
        self.retry_xp = retry;
        self
    }

    /// Set the mission advance delay.
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    /// Set the scenario step delay.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Set how long the level-up banner is shown.
    pub fn with_level_up_banner(mut self, duration: Duration) -> Self {
        self.level_up_banner = duration;
        self
    }

    /// Zero every delay. Deferred transitions still wait for the next tick.
    pub fn instant(self) -> Self {
        self.with_advance_delay(Duration::ZERO)
            .with_step_delay(Duration::ZERO)
            .with_level_up_banner(Duration::ZERO)
    }
}
