//! Pointer-capture gesture tracking.

use keepsake_core::geometry::Point;
use serde::{Deserialize, Serialize};

/// Displacement, in viewport units, beyond which a gesture is a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;

/// Identifier of a pointer (mouse, pen, or touch contact).
pub type PointerId = i64;

/// Classification of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    /// The pointer stayed within the threshold; the entity is activated.
    Tap,
    /// The pointer left the threshold at some point; no activation.
    Drag,
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    pointer_id: PointerId,
    origin: Point,
    element_origin: Point,
    exceeded: bool,
}

/// Tracks one gesture at a time for one entity.
///
/// A pointer-down claims the entity for that pointer until the matching
/// pointer-up; events from any other pointer are ignored meanwhile.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    threshold: f64,
    active: Option<ActiveGesture>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    /// Creates a classifier with the standard [`DRAG_THRESHOLD`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }

    /// Creates a classifier with a custom threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            active: None,
        }
    }

    /// Whether a pointer currently holds capture.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.active.is_some()
    }

    /// Starts a gesture at `at` for an element currently at
    /// `element_position`.
    ///
    /// Returns `false` if another pointer already holds capture.
    pub fn pointer_down(
        &mut self,
        pointer_id: PointerId,
        at: Point,
        element_position: Point,
    ) -> bool {
        if let Some(active) = self.active {
            tracing::trace!(
                held_by = active.pointer_id,
                pointer_id,
                "ignoring secondary pointer"
            );
            return false;
        }
        self.active = Some(ActiveGesture {
            pointer_id,
            origin: at,
            element_origin: element_position,
            exceeded: false,
        });
        true
    }

    /// Feeds a move event and returns the element's new live position.
    ///
    /// The position follows the raw pointer delta with no smoothing. Returns
    /// `None` when `pointer_id` does not hold capture.
    pub fn pointer_move(&mut self, pointer_id: PointerId, at: Point) -> Option<Point> {
        let threshold = self.threshold;
        let active = self
            .active
            .as_mut()
            .filter(|active| active.pointer_id == pointer_id)?;

        if at.distance_to(active.origin) > threshold {
            active.exceeded = true;
        }
        Some(
            active
                .element_origin
                .offset(at.x - active.origin.x, at.y - active.origin.y),
        )
    }

    /// Ends the gesture and releases capture.
    ///
    /// A [`GestureKind::Tap`] is the caller's cue to activate the entity.
    /// Returns `None` when `pointer_id` does not hold capture.
    pub fn pointer_up(&mut self, pointer_id: PointerId, at: Point) -> Option<GestureKind> {
        let active = self
            .active
            .filter(|active| active.pointer_id == pointer_id)?;
        self.active = None;

        let exceeded = active.exceeded || at.distance_to(active.origin) > self.threshold;
        Some(if exceeded {
            GestureKind::Drag
        } else {
            GestureKind::Tap
        })
    }

    /// Drops any gesture in flight without classifying it.
    ///
    /// Returns whether a gesture was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }
}
