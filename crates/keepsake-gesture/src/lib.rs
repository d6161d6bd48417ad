//! Keepsake — Gesture Classifier.
//!
//! Separates taps from drags on a single draggable entity so that
//! repositioning never triggers activation.

mod classifier;

pub use classifier::{DRAG_THRESHOLD, GestureClassifier, GestureKind, PointerId};
