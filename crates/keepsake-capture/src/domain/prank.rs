//! The checkout prank that closes the photo booth.
//!
//! Once a strip exists, a session countdown runs. When it runs out the
//! guest is asked whether they are done; saying yes opens a fake payment
//! sheet, and picking the bank plays a short caption sequence before the
//! reveal.

use std::time::Duration;

use keepsake_core::clock::Deadline;
use serde::{Deserialize, Serialize};

/// One caption of the reveal timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealCue {
    /// Text shown.
    pub caption: String,
    /// How long it is shown.
    pub hold_ms: u64,
}

impl RevealCue {
    fn new(caption: &str, hold_ms: u64) -> Self {
        Self {
            caption: caption.to_owned(),
            hold_ms,
        }
    }
}

/// Prank tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrankConfig {
    /// Session countdown before the idle prompt.
    pub session_secs: u64,
    /// Captions played after the bank is chosen.
    pub timeline: Vec<RevealCue>,
    /// Time the reveal stays up before the stage completes.
    pub reveal_hold_ms: u64,
}

impl Default for PrankConfig {
    fn default() -> Self {
        Self {
            session_secs: 60,
            timeline: vec![
                RevealCue::new("Siap siap ya...", 2_000),
                RevealCue::new("3", 1_000),
                RevealCue::new("2", 1_000),
                RevealCue::new("1", 1_000),
                RevealCue::new("ALL", 300),
            ],
            reveal_hold_ms: 5_000,
        }
    }
}

/// Where the prank is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrankPhase {
    /// Session countdown running.
    Counting {
        /// When the idle prompt appears.
        expires: Deadline,
    },
    /// "Are you done?" prompt.
    IdlePrompt,
    /// Fake payment sheet.
    PaymentSheet,
    /// Playing caption `cue`.
    Countdown {
        /// Index into the timeline.
        cue: usize,
        /// When the next caption (or the reveal) shows.
        next: Deadline,
    },
    /// The joke is out.
    Reveal {
        /// When the stage completes on its own.
        completes: Deadline,
    },
    /// Finished.
    Completed,
}

/// A visible change produced by the prank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrankSignal {
    /// The idle prompt appeared.
    IdlePrompt,
    /// The payment sheet opened.
    PaymentSheet,
    /// A caption is showing.
    Caption(String),
    /// The reveal is showing.
    Revealed,
    /// The photo booth may complete.
    Completed,
}

/// Checkout prank state machine.
#[derive(Debug, Clone)]
pub struct CheckoutPrank {
    config: PrankConfig,
    phase: PrankPhase,
}

impl CheckoutPrank {
    /// Starts the session countdown at `now`.
    #[must_use]
    pub fn start(config: PrankConfig, now: Duration) -> Self {
        let expires = Deadline::after(now, Duration::from_secs(config.session_secs));
        Self {
            config,
            phase: PrankPhase::Counting { expires },
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> PrankPhase {
        self.phase
    }

    /// Whole seconds left on the session countdown, if it is running.
    #[must_use]
    pub fn seconds_left(&self, now: Duration) -> Option<u64> {
        match self.phase {
            PrankPhase::Counting { expires } => {
                let remaining = expires.remaining(now);
                Some(remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0))
            }
            _ => None,
        }
    }

    /// The caption currently showing, if any.
    #[must_use]
    pub fn caption(&self) -> Option<&str> {
        match self.phase {
            PrankPhase::Countdown { cue, .. } => {
                self.config.timeline.get(cue).map(|c| c.caption.as_str())
            }
            _ => None,
        }
    }

    /// Whether the prank has finished.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, PrankPhase::Completed)
    }

    /// Fires every timer due at `now`.
    pub fn advance(&mut self, now: Duration) -> Vec<PrankSignal> {
        let mut signals = Vec::new();
        loop {
            match self.phase {
                PrankPhase::Counting { expires } if expires.is_due(now) => {
                    self.phase = PrankPhase::IdlePrompt;
                    signals.push(PrankSignal::IdlePrompt);
                }
                PrankPhase::Countdown { cue, next } if next.is_due(now) => {
                    signals.push(self.show_cue(cue + 1, next.due_at()));
                }
                PrankPhase::Reveal { completes } if completes.is_due(now) => {
                    self.phase = PrankPhase::Completed;
                    signals.push(PrankSignal::Completed);
                }
                _ => return signals,
            }
        }
    }

    /// "Not yet" on the idle prompt: restart the session countdown.
    pub fn not_yet(&mut self, now: Duration) -> bool {
        if self.phase != PrankPhase::IdlePrompt {
            return false;
        }
        self.phase = PrankPhase::Counting {
            expires: Deadline::after(now, Duration::from_secs(self.config.session_secs)),
        };
        true
    }

    /// "Done" on the idle prompt: open the payment sheet.
    pub fn done(&mut self) -> Option<PrankSignal> {
        if self.phase != PrankPhase::IdlePrompt {
            return None;
        }
        self.phase = PrankPhase::PaymentSheet;
        Some(PrankSignal::PaymentSheet)
    }

    /// Bank picked on the payment sheet: start the caption timeline.
    pub fn choose_bank(&mut self, now: Duration) -> Option<PrankSignal> {
        if self.phase != PrankPhase::PaymentSheet {
            return None;
        }
        Some(self.show_cue(0, now))
    }

    /// Explicit continue on the reveal.
    pub fn continue_after_reveal(&mut self) -> Option<PrankSignal> {
        if !matches!(self.phase, PrankPhase::Reveal { .. }) {
            return None;
        }
        self.phase = PrankPhase::Completed;
        Some(PrankSignal::Completed)
    }

    fn show_cue(&mut self, cue: usize, at: Duration) -> PrankSignal {
        match self.config.timeline.get(cue) {
            Some(step) => {
                self.phase = PrankPhase::Countdown {
                    cue,
                    next: Deadline::after(at, Duration::from_millis(step.hold_ms)),
                };
                PrankSignal::Caption(step.caption.clone())
            }
            None => {
                self.phase = PrankPhase::Reveal {
                    completes: Deadline::after(
                        at,
                        Duration::from_millis(self.config.reveal_hold_ms),
                    ),
                };
                PrankSignal::Revealed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_idle_prompt_after_sixty_seconds() {
        let mut prank = CheckoutPrank::start(PrankConfig::default(), ms(0));

        assert_eq!(prank.seconds_left(ms(500)), Some(60));
        assert!(prank.advance(ms(59_999)).is_empty());
        assert_eq!(prank.advance(ms(60_000)), vec![PrankSignal::IdlePrompt]);
        assert_eq!(prank.seconds_left(ms(60_000)), None);
    }

    #[test]
    fn test_not_yet_restarts_countdown() {
        let mut prank = CheckoutPrank::start(PrankConfig::default(), ms(0));
        prank.advance(ms(60_000));

        assert!(prank.not_yet(ms(61_000)));

        assert!(prank.advance(ms(120_999)).is_empty());
        assert_eq!(prank.advance(ms(121_000)), vec![PrankSignal::IdlePrompt]);
    }

    #[test]
    fn test_reveal_timeline_timing() {
        // Arrange
        let mut prank = CheckoutPrank::start(PrankConfig::default(), ms(0));
        prank.advance(ms(60_000));
        prank.done();

        // Act
        let first = prank.choose_bank(ms(100_000));

        // Assert
        assert_eq!(first, Some(PrankSignal::Caption("Siap siap ya...".into())));
        assert!(prank.advance(ms(101_999)).is_empty());
        assert_eq!(prank.advance(ms(102_000)), vec![PrankSignal::Caption("3".into())]);
        assert_eq!(prank.advance(ms(103_000)), vec![PrankSignal::Caption("2".into())]);
        assert_eq!(prank.advance(ms(104_000)), vec![PrankSignal::Caption("1".into())]);
        assert_eq!(prank.advance(ms(105_000)), vec![PrankSignal::Caption("ALL".into())]);
        assert_eq!(prank.caption(), Some("ALL"));
        assert!(prank.advance(ms(105_299)).is_empty());
        assert_eq!(prank.advance(ms(105_300)), vec![PrankSignal::Revealed]);
        assert!(prank.advance(ms(110_299)).is_empty());
        assert_eq!(prank.advance(ms(110_300)), vec![PrankSignal::Completed]);
        assert!(prank.is_complete());
    }

    #[test]
    fn test_continue_skips_reveal_hold() {
        let mut prank = CheckoutPrank::start(PrankConfig::default(), ms(0));
        prank.advance(ms(60_000));
        prank.done();
        prank.choose_bank(ms(60_000));
        prank.advance(ms(65_300));

        assert_eq!(prank.continue_after_reveal(), Some(PrankSignal::Completed));
        assert!(prank.is_complete());
    }

    #[test]
    fn test_out_of_order_choices_are_ignored() {
        let mut prank = CheckoutPrank::start(PrankConfig::default(), ms(0));

        assert!(prank.done().is_none());
        assert!(prank.choose_bank(ms(0)).is_none());
        assert!(!prank.not_yet(ms(0)));
        assert!(prank.continue_after_reveal().is_none());
    }
}
