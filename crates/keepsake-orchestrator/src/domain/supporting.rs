//! The closing stages: final message, motivation countdown and outro.

use std::time::Duration;

use keepsake_core::clock::{Clock, Deadline};
use serde::{Deserialize, Serialize};

/// The closing letter. Completes when the guest continues.
#[derive(Debug, Clone, Default)]
pub struct FinalMessage {
    continued: bool,
}

impl FinalMessage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue button.
    pub fn continue_clicked(&mut self) -> bool {
        !std::mem::replace(&mut self.continued, true)
    }

    /// Whether the guest has continued.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.continued
    }
}

/// Motivation scene timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotivationConfig {
    /// Transition screen hold plus fade.
    pub transition_ms: u64,
    /// Countdown length in whole seconds.
    pub countdown_secs: u32,
}

impl Default for MotivationConfig {
    fn default() -> Self {
        Self {
            transition_ms: 3_000,
            countdown_secs: 35,
        }
    }
}

/// Where the motivation scene is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotivationPhase {
    /// Transition screen.
    Transition {
        /// When the content shows.
        until: Deadline,
    },
    /// Content with a visible countdown.
    Counting {
        /// Seconds shown.
        seconds_left: u32,
        /// When the next second ticks off.
        next: Deadline,
    },
    /// Finished, by countdown or skip.
    Done,
}

/// The motivation scene.
#[derive(Debug, Clone)]
pub struct Motivation {
    config: MotivationConfig,
    phase: MotivationPhase,
}

impl Motivation {
    /// Starts the transition screen.
    #[must_use]
    pub fn start(config: MotivationConfig, clock: &dyn Clock) -> Self {
        let until = Deadline::after(clock.now(), Duration::from_millis(config.transition_ms));
        Self {
            config,
            phase: MotivationPhase::Transition { until },
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> MotivationPhase {
        self.phase
    }

    /// Seconds on the countdown, once it shows.
    #[must_use]
    pub fn seconds_left(&self) -> Option<u32> {
        match self.phase {
            MotivationPhase::Counting { seconds_left, .. } => Some(seconds_left),
            _ => None,
        }
    }

    /// Skip button.
    pub fn skip(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.phase = MotivationPhase::Done;
        true
    }

    /// Whether the scene is over.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, MotivationPhase::Done)
    }

    /// Fires due timers. Returns whether the scene is over.
    pub fn tick(&mut self, clock: &dyn Clock) -> bool {
        let now = clock.now();
        loop {
            match self.phase {
                MotivationPhase::Transition { until } if until.is_due(now) => {
                    self.phase = self.count_from(self.config.countdown_secs, until.due_at());
                }
                MotivationPhase::Counting { seconds_left, next } if next.is_due(now) => {
                    self.phase = self.count_from(seconds_left.saturating_sub(1), next.due_at());
                }
                _ => return self.is_complete(),
            }
        }
    }

    fn count_from(&self, seconds_left: u32, at: Duration) -> MotivationPhase {
        if seconds_left == 0 {
            return MotivationPhase::Done;
        }
        MotivationPhase::Counting {
            seconds_left,
            next: Deadline::after(at, Duration::from_secs(1)),
        }
    }
}

/// The credits. Never completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Outro;

#[cfg(test)]
mod tests {
    use keepsake_test_support::ManualClock;

    use super::*;

    #[test]
    fn test_final_message_completes_once() {
        let mut stage = FinalMessage::new();

        assert!(stage.continue_clicked());
        assert!(!stage.continue_clicked());
        assert!(stage.is_complete());
    }

    #[test]
    fn test_motivation_runs_transition_then_countdown() {
        // Arrange
        let clock = ManualClock::new();
        let mut stage = Motivation::start(MotivationConfig::default(), &clock);

        // Act / Assert
        clock.advance_ms(2_999);
        assert!(!stage.tick(&clock));
        assert_eq!(stage.seconds_left(), None);

        clock.advance_ms(1);
        stage.tick(&clock);
        assert_eq!(stage.seconds_left(), Some(35));

        clock.advance_ms(10_000);
        stage.tick(&clock);
        assert_eq!(stage.seconds_left(), Some(25));

        clock.advance_ms(24_999);
        assert!(!stage.tick(&clock));
        assert_eq!(stage.seconds_left(), Some(1));

        clock.advance_ms(1);
        assert!(stage.tick(&clock));
    }

    #[test]
    fn test_motivation_skip_completes_immediately() {
        let clock = ManualClock::new();
        let mut stage = Motivation::start(MotivationConfig::default(), &clock);

        assert!(stage.skip());
        assert!(!stage.skip());
        assert!(stage.tick(&clock));
    }
}
