//! Domain events for the photo booth.

use keepsake_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// A countdown number is showing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownShown {
    /// The number shown.
    pub remaining: u8,
}

/// The shutter fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotCaptured {
    /// Index of the new shot.
    pub index: usize,
}

/// The last shot of the session was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFinished {
    /// Shots taken.
    pub shot_count: usize,
}

/// The strip was recomposited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeReady {
    /// Shots in the strip.
    pub shot_count: usize,
    /// Whether the decorative frame was applied.
    pub framed: bool,
    /// SHA-256 of the strip pixels.
    pub fingerprint: String,
}

/// The strip was handed to the download sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeDownloaded {
    /// File name used.
    pub file_name: String,
    /// SHA-256 of the saved strip.
    pub fingerprint: String,
}

/// Shots and strip were discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReset;

/// The checkout prank moved on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrankAdvanced {
    /// What is showing now: `idle_prompt`, `payment_sheet`, a caption, or
    /// `reveal`.
    pub showing: String,
}

/// The photo booth handed control back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoBoothCompleted {
    /// Fingerprint of the last strip, if one was made.
    pub fingerprint: Option<String>,
}

/// Event type identifier for [`CountdownShown`].
pub const COUNTDOWN_SHOWN_EVENT_TYPE: &str = "capture.countdown_shown";

/// Event type identifier for [`ShotCaptured`].
pub const SHOT_CAPTURED_EVENT_TYPE: &str = "capture.shot_captured";

/// Event type identifier for [`SessionFinished`].
pub const SESSION_FINISHED_EVENT_TYPE: &str = "capture.session_finished";

/// Event type identifier for [`CompositeReady`].
pub const COMPOSITE_READY_EVENT_TYPE: &str = "capture.composite_ready";

/// Event type identifier for [`CompositeDownloaded`].
pub const COMPOSITE_DOWNLOADED_EVENT_TYPE: &str = "capture.composite_downloaded";

/// Event type identifier for [`SessionReset`].
pub const SESSION_RESET_EVENT_TYPE: &str = "capture.session_reset";

/// Event type identifier for [`PrankAdvanced`].
pub const PRANK_ADVANCED_EVENT_TYPE: &str = "capture.prank_advanced";

/// Event type identifier for [`PhotoBoothCompleted`].
pub const PHOTO_BOOTH_COMPLETED_EVENT_TYPE: &str = "capture.completed";

/// Event payload variants for the photo booth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaptureEventKind {
    /// A countdown number is showing.
    CountdownShown(CountdownShown),
    /// The shutter fired.
    ShotCaptured(ShotCaptured),
    /// The last shot was taken.
    SessionFinished(SessionFinished),
    /// The strip was recomposited.
    CompositeReady(CompositeReady),
    /// The strip was saved.
    CompositeDownloaded(CompositeDownloaded),
    /// Shots were discarded.
    SessionReset(SessionReset),
    /// The checkout prank moved on.
    PrankAdvanced(PrankAdvanced),
    /// The photo booth completed.
    PhotoBoothCompleted(PhotoBoothCompleted),
}

impl CaptureEventKind {
    /// The type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CountdownShown(_) => COUNTDOWN_SHOWN_EVENT_TYPE,
            Self::ShotCaptured(_) => SHOT_CAPTURED_EVENT_TYPE,
            Self::SessionFinished(_) => SESSION_FINISHED_EVENT_TYPE,
            Self::CompositeReady(_) => COMPOSITE_READY_EVENT_TYPE,
            Self::CompositeDownloaded(_) => COMPOSITE_DOWNLOADED_EVENT_TYPE,
            Self::SessionReset(_) => SESSION_RESET_EVENT_TYPE,
            Self::PrankAdvanced(_) => PRANK_ADVANCED_EVENT_TYPE,
            Self::PhotoBoothCompleted(_) => PHOTO_BOOTH_COMPLETED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the photo booth.
#[derive(Debug, Clone)]
pub struct CaptureEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CaptureEventKind,
}

impl DomainEvent for CaptureEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).expect("CaptureEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
