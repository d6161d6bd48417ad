//! Domain events for the Access Gate.

use keepsake_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// A full code was entered and rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasscodeRejected {
    /// Failed attempts so far, this one included.
    pub failed_attempts: u32,
}

/// The hint was tapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintAdvanced {
    /// Hint stage now showing.
    pub stage: u8,
}

/// The gate opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateUnlocked {
    /// Failed attempts before success.
    pub failed_attempts: u32,
}

/// Event type identifier for [`PasscodeRejected`].
pub const PASSCODE_REJECTED_EVENT_TYPE: &str = "gate.passcode_rejected";

/// Event type identifier for [`HintAdvanced`].
pub const HINT_ADVANCED_EVENT_TYPE: &str = "gate.hint_advanced";

/// Event type identifier for [`GateUnlocked`].
pub const GATE_UNLOCKED_EVENT_TYPE: &str = "gate.unlocked";

/// Event payload variants for the Access Gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GateEventKind {
    /// A code was rejected.
    PasscodeRejected(PasscodeRejected),
    /// The hint moved on.
    HintAdvanced(HintAdvanced),
    /// The gate opened.
    GateUnlocked(GateUnlocked),
}

impl GateEventKind {
    /// The type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PasscodeRejected(_) => PASSCODE_REJECTED_EVENT_TYPE,
            Self::HintAdvanced(_) => HINT_ADVANCED_EVENT_TYPE,
            Self::GateUnlocked(_) => GATE_UNLOCKED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Access Gate.
#[derive(Debug, Clone)]
pub struct GateEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GateEventKind,
}

impl DomainEvent for GateEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).expect("GateEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
