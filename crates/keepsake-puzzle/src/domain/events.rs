//! Domain events for the Ordering Puzzle.

use keepsake_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::layout::TileAnimationIntent;

/// Emitted on every drag release, after the arrangement is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrangementEvaluated {
    /// Symbols read left to right.
    pub formed_word: String,
    /// Whether the formed word matched the target.
    pub solved: bool,
}

/// Emitted once when the target word is formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleSolved {
    /// Where every tile should animate to, in reading order.
    pub intents: Vec<TileAnimationIntent>,
}

/// Emitted once the settle delay after solving has elapsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleCompleted {
    /// The word that was formed.
    pub word: String,
}

/// Event type identifier for [`ArrangementEvaluated`].
pub const ARRANGEMENT_EVALUATED_EVENT_TYPE: &str = "puzzle.arrangement_evaluated";

/// Event type identifier for [`PuzzleSolved`].
pub const PUZZLE_SOLVED_EVENT_TYPE: &str = "puzzle.solved";

/// Event type identifier for [`PuzzleCompleted`].
pub const PUZZLE_COMPLETED_EVENT_TYPE: &str = "puzzle.completed";

/// Event payload variants for the Ordering Puzzle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PuzzleEventKind {
    /// An arrangement was read after a drag release.
    ArrangementEvaluated(ArrangementEvaluated),
    /// The target word was formed.
    PuzzleSolved(PuzzleSolved),
    /// The puzzle handed control back to the orchestrator.
    PuzzleCompleted(PuzzleCompleted),
}

impl PuzzleEventKind {
    /// The type name of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ArrangementEvaluated(_) => ARRANGEMENT_EVALUATED_EVENT_TYPE,
            Self::PuzzleSolved(_) => PUZZLE_SOLVED_EVENT_TYPE,
            Self::PuzzleCompleted(_) => PUZZLE_COMPLETED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for the Ordering Puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PuzzleEventKind,
}

impl DomainEvent for PuzzleEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("PuzzleEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
