//! Domain events for the Collection Hunt.

use keepsake_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// A winning collectible was tapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCollected {
    /// The collectible that was taken.
    pub collectible_id: u32,
    /// Winning collectibles taken so far, this one included.
    pub collected_count: u32,
}

/// A decoy was tapped. Feedback only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrongPick {
    /// The decoy that was tapped.
    pub collectible_id: u32,
}

/// The last winning collectible was taken; confetti starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrationStarted {
    /// Winning collectibles taken.
    pub collected_count: u32,
}

/// The transition screen is shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStarted;

/// The hunt handed control back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntCompleted {
    /// Winning collectibles taken.
    pub collected_count: u32,
}

/// Event type identifier for [`ItemCollected`].
pub const ITEM_COLLECTED_EVENT_TYPE: &str = "hunt.item_collected";

/// Event type identifier for [`WrongPick`].
pub const WRONG_PICK_EVENT_TYPE: &str = "hunt.wrong_pick";

/// Event type identifier for [`CelebrationStarted`].
pub const CELEBRATION_STARTED_EVENT_TYPE: &str = "hunt.celebration_started";

/// Event type identifier for [`TransitionStarted`].
pub const TRANSITION_STARTED_EVENT_TYPE: &str = "hunt.transition_started";

/// Event type identifier for [`HuntCompleted`].
pub const HUNT_COMPLETED_EVENT_TYPE: &str = "hunt.completed";

/// Event payload variants for the Collection Hunt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HuntEventKind {
    /// A winning collectible was taken.
    ItemCollected(ItemCollected),
    /// A decoy was tapped.
    WrongPick(WrongPick),
    /// Confetti started.
    CelebrationStarted(CelebrationStarted),
    /// The transition screen is shown.
    TransitionStarted(TransitionStarted),
    /// The hunt completed.
    HuntCompleted(HuntCompleted),
}

impl HuntEventKind {
    /// The type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ItemCollected(_) => ITEM_COLLECTED_EVENT_TYPE,
            Self::WrongPick(_) => WRONG_PICK_EVENT_TYPE,
            Self::CelebrationStarted(_) => CELEBRATION_STARTED_EVENT_TYPE,
            Self::TransitionStarted(_) => TRANSITION_STARTED_EVENT_TYPE,
            Self::HuntCompleted(_) => HUNT_COMPLETED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Collection Hunt.
#[derive(Debug, Clone)]
pub struct HuntEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event payload.
    pub kind: HuntEventKind,
}

impl DomainEvent for HuntEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).expect("HuntEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
