//! Domain events for the experience orchestrator.

use keepsake_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::stage::Stage;

/// A stage was mounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageEntered {
    /// The stage now showing.
    pub stage: Stage,
}

/// A stage reported completion and was unmounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageCompleted {
    /// The stage that finished.
    pub stage: Stage,
}

/// A track was picked and started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackSelected {
    /// Song title.
    pub title: String,
    /// Audio source.
    pub src: String,
}

/// Event type identifier for [`StageEntered`].
pub const STAGE_ENTERED_EVENT_TYPE: &str = "experience.stage_entered";

/// Event type identifier for [`StageCompleted`].
pub const STAGE_COMPLETED_EVENT_TYPE: &str = "experience.stage_completed";

/// Event type identifier for [`TrackSelected`].
pub const TRACK_SELECTED_EVENT_TYPE: &str = "experience.track_selected";

/// Event payload variants for the experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExperienceEventKind {
    /// A stage was mounted.
    StageEntered(StageEntered),
    /// A stage finished.
    StageCompleted(StageCompleted),
    /// A track was picked.
    TrackSelected(TrackSelected),
}

impl ExperienceEventKind {
    /// The type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StageEntered(_) => STAGE_ENTERED_EVENT_TYPE,
            Self::StageCompleted(_) => STAGE_COMPLETED_EVENT_TYPE,
            Self::TrackSelected(_) => TRACK_SELECTED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the experience.
#[derive(Debug, Clone)]
pub struct ExperienceEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ExperienceEventKind,
}

impl DomainEvent for ExperienceEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).expect("ExperienceEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
