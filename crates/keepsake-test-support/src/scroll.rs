//! Test scroll observer with settable signals.

use std::sync::atomic::{AtomicBool, Ordering};

use keepsake_core::ports::ScrollObserver;

/// A scroll observer whose signals are flipped by the test.
#[derive(Debug, Default)]
pub struct ScriptedScroll {
    near_bottom: AtomicBool,
    past_hint_threshold: AtomicBool,
}

impl ScriptedScroll {
    /// Creates an observer reporting the top of the page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the "near bottom" signal.
    pub fn set_near_bottom(&self, value: bool) {
        self.near_bottom.store(value, Ordering::SeqCst);
    }

    /// Sets the "past hint threshold" signal.
    pub fn set_past_hint_threshold(&self, value: bool) {
        self.past_hint_threshold.store(value, Ordering::SeqCst);
    }
}

impl ScrollObserver for ScriptedScroll {
    fn near_bottom(&self) -> bool {
        self.near_bottom.load(Ordering::SeqCst)
    }

    fn past_hint_threshold(&self) -> bool {
        self.past_hint_threshold.load(Ordering::SeqCst)
    }
}
