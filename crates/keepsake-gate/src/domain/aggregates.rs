//! Aggregate root for the Access Gate.

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::clock::Clock;
use keepsake_core::error::DomainError;
use keepsake_core::event::EventMetadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::events::{GateEvent, GateEventKind, GateUnlocked, HintAdvanced, PasscodeRejected};

/// Number of digit slots.
pub const SLOT_COUNT: usize = 6;

/// Gate tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// The six-digit code.
    pub access_code: String,
    /// Last hint stage.
    pub max_hint_stage: u8,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            access_code: "010507".to_owned(),
            max_hint_stage: 4,
        }
    }
}

impl GateConfig {
    /// Checks the code shape.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` unless the code is exactly six
    /// ASCII digits.
    pub fn validate(&self) -> Result<(), DomainError> {
        let digits = self.access_code.chars().filter(char::is_ascii_digit).count();
        if digits != SLOT_COUNT || self.access_code.len() != SLOT_COUNT {
            return Err(DomainError::Configuration(format!(
                "access code must be {SLOT_COUNT} digits"
            )));
        }
        Ok(())
    }
}

/// Which screen the gate shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateView {
    /// Listening recommendation; any tap continues.
    Recommendation,
    /// Six digit slots.
    Passcode,
}

/// Result of typing into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitOutcome {
    /// Not a digit, bad slot, wrong view, or already unlocked.
    Rejected,
    /// Stored; more slots to fill.
    Accepted,
    /// The full code was wrong (or the hint was never opened); slots cleared.
    Failed,
    /// The gate opened.
    Unlocked,
}

/// The aggregate root for the passcode gate.
#[derive(Debug)]
pub struct AccessGate {
    /// Aggregate identifier.
    pub id: Uuid,
    config: GateConfig,
    view: GateView,
    slots: [Option<char>; SLOT_COUNT],
    failed_attempts: u32,
    hint_stage: u8,
    unlocked: bool,
    version: i64,
    uncommitted_events: Vec<GateEvent>,
}

impl AccessGate {
    /// Creates a locked gate on the recommendation view.
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            view: GateView::Recommendation,
            slots: [None; SLOT_COUNT],
            failed_attempts: 0,
            hint_stage: 0,
            unlocked: false,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> GateView {
        self.view
    }

    /// Digit slots, left to right.
    #[must_use]
    pub fn slots(&self) -> &[Option<char>; SLOT_COUNT] {
        &self.slots
    }

    /// The slot that should take focus next.
    #[must_use]
    pub fn next_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Rejected full codes so far.
    #[must_use]
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// Whether the hint button is shown.
    #[must_use]
    pub fn hint_available(&self) -> bool {
        self.failed_attempts > 0
    }

    /// Current hint stage; zero until first opened.
    #[must_use]
    pub fn hint_stage(&self) -> u8 {
        self.hint_stage
    }

    /// Whether the gate has opened.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Leaves the recommendation view.
    pub fn continue_to_passcode(&mut self) -> bool {
        if self.view != GateView::Recommendation {
            return false;
        }
        self.view = GateView::Passcode;
        true
    }

    /// Types `input` into `slot`.
    ///
    /// Input holding anything but digits is rejected whole; otherwise only the
    /// last character is kept. Empty input clears the slot. Filling the last empty slot checks the code.
    pub fn enter(&mut self, slot: usize, input: &str, clock: &dyn Clock) -> DigitOutcome {
        if self.unlocked || self.view != GateView::Passcode || slot >= SLOT_COUNT {
            return DigitOutcome::Rejected;
        }
        if !input.chars().all(|c| c.is_ascii_digit()) {
            return DigitOutcome::Rejected;
        }
        let Some(last) = input.chars().last() else {
            self.slots[slot] = None;
            return DigitOutcome::Accepted;
        };
        self.slots[slot] = Some(last);

        if self.next_empty_slot().is_some() {
            return DigitOutcome::Accepted;
        }
        self.check(clock)
    }

    /// Taps the hint. Available after the first failure; stops at the last
    /// stage.
    pub fn advance_hint(&mut self, clock: &dyn Clock) -> bool {
        if !self.hint_available() || self.unlocked {
            return false;
        }
        if self.hint_stage < self.config.max_hint_stage {
            self.hint_stage += 1;
            tracing::debug!(gate_id = %self.id, stage = self.hint_stage, "hint advanced");
            self.record(
                GateEventKind::HintAdvanced(HintAdvanced {
                    stage: self.hint_stage,
                }),
                clock,
            );
        }
        true
    }

    fn check(&mut self, clock: &dyn Clock) -> DigitOutcome {
        let entered: String = self.slots.iter().flatten().collect();
        if entered == self.config.access_code && self.hint_stage > 0 {
            self.unlocked = true;
            tracing::info!(gate_id = %self.id, failed_attempts = self.failed_attempts, "gate unlocked");
            self.record(
                GateEventKind::GateUnlocked(GateUnlocked {
                    failed_attempts: self.failed_attempts,
                }),
                clock,
            );
            return DigitOutcome::Unlocked;
        }

        self.failed_attempts += 1;
        self.slots = [None; SLOT_COUNT];
        tracing::debug!(gate_id = %self.id, failed_attempts = self.failed_attempts, "passcode rejected");
        self.record(
            GateEventKind::PasscodeRejected(PasscodeRejected {
                failed_attempts: self.failed_attempts,
            }),
            clock,
        );
        DigitOutcome::Failed
    }

    fn record(&mut self, kind: GateEventKind, clock: &dyn Clock) {
        self.version += 1;
        let metadata =
            EventMetadata::new(kind.event_type(), self.id, self.version, clock.now());
        self.uncommitted_events.push(GateEvent { metadata, kind });
    }
}

impl AggregateRoot for AccessGate {
    type Event = GateEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

#[cfg(test)]
mod tests {
    use keepsake_core::event::DomainEvent;
    use keepsake_test_support::ManualClock;

    use super::*;

    fn type_code(gate: &mut AccessGate, code: &str, clock: &ManualClock) -> DigitOutcome {
        let mut outcome = DigitOutcome::Rejected;
        for (i, c) in code.chars().enumerate() {
            outcome = gate.enter(i, &c.to_string(), clock);
        }
        outcome
    }

    fn passcode_gate() -> AccessGate {
        let mut gate = AccessGate::new(GateConfig::default());
        assert!(gate.continue_to_passcode());
        gate
    }

    #[test]
    fn test_digits_rejected_on_recommendation_view() {
        let clock = ManualClock::new();
        let mut gate = AccessGate::new(GateConfig::default());

        assert_eq!(gate.enter(0, "1", &clock), DigitOutcome::Rejected);
        assert_eq!(gate.view(), GateView::Recommendation);
    }

    #[test]
    fn test_correct_code_without_hint_fails() {
        // Arrange
        let clock = ManualClock::new();
        let mut gate = passcode_gate();

        // Act
        let outcome = type_code(&mut gate, "010507", &clock);

        // Assert
        assert_eq!(outcome, DigitOutcome::Failed);
        assert!(!gate.is_unlocked());
        assert_eq!(gate.failed_attempts(), 1);
        assert!(gate.slots().iter().all(Option::is_none));
        assert!(gate.hint_available());
    }

    #[test]
    fn test_correct_code_after_hint_unlocks() {
        // Arrange
        let clock = ManualClock::new();
        let mut gate = passcode_gate();
        type_code(&mut gate, "123456", &clock);

        // Act
        assert!(gate.advance_hint(&clock));
        let outcome = type_code(&mut gate, "010507", &clock);

        // Assert
        assert_eq!(outcome, DigitOutcome::Unlocked);
        assert!(gate.is_unlocked());
        let types: Vec<&str> = gate
            .take_uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect();
        assert_eq!(
            types,
            vec!["gate.passcode_rejected", "gate.hint_advanced", "gate.unlocked"]
        );
    }

    #[test]
    fn test_non_digits_rejected_and_last_character_kept() {
        let clock = ManualClock::new();
        let mut gate = passcode_gate();

        assert_eq!(gate.enter(0, "a", &clock), DigitOutcome::Rejected);
        assert_eq!(gate.enter(0, "47", &clock), DigitOutcome::Accepted);
        assert_eq!(gate.slots()[0], Some('7'));
        assert_eq!(gate.enter(0, "a3", &clock), DigitOutcome::Rejected);
        assert_eq!(gate.enter(0, "3a", &clock), DigitOutcome::Rejected);
        assert_eq!(gate.slots()[0], Some('7'));
        assert_eq!(gate.next_empty_slot(), Some(1));
        assert_eq!(gate.enter(0, "", &clock), DigitOutcome::Accepted);
        assert_eq!(gate.slots()[0], None);
        assert_eq!(gate.enter(SLOT_COUNT, "1", &clock), DigitOutcome::Rejected);
    }

    #[test]
    fn test_hint_unavailable_before_failure_and_capped() {
        let clock = ManualClock::new();
        let mut gate = passcode_gate();
        assert!(!gate.advance_hint(&clock));

        type_code(&mut gate, "999999", &clock);
        for _ in 0..10 {
            gate.advance_hint(&clock);
        }

        assert_eq!(gate.hint_stage(), 4);
    }

    #[test]
    fn test_config_rejects_non_digit_code() {
        let config = GateConfig {
            access_code: "01a507".to_owned(),
            ..GateConfig::default()
        };

        assert!(config.validate().is_err());
        assert!(GateConfig::default().validate().is_ok());
    }
}
