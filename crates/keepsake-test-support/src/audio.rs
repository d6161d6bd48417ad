//! Test audio output — records playback calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use keepsake_core::error::DomainError;
use keepsake_core::ports::AudioOutput;

#[derive(Debug, Default)]
struct AudioState {
    looping: Vec<String>,
    playing: bool,
    position: Duration,
}

/// An audio output that records every source it was asked to loop. Clones
/// share the same recording, so a test can keep a handle after injecting one.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    state: Arc<Mutex<AudioState>>,
    duration: Option<Duration>,
}

impl RecordingAudio {
    /// Creates an output reporting `duration` for every track.
    #[must_use]
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            state: Arc::default(),
            duration: Some(duration),
        }
    }

    /// Returns every source passed to `play_looping`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn looped_sources(&self) -> Vec<String> {
        self.state.lock().unwrap().looping.clone()
    }

    /// Whether playback is currently running.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }
}

impl AudioOutput for RecordingAudio {
    fn play_looping(&mut self, src: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.looping.push(src.to_owned());
        state.playing = true;
        state.position = Duration::ZERO;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.lock().unwrap().playing = false;
    }

    fn resume(&mut self) -> Result<(), DomainError> {
        self.state.lock().unwrap().playing = true;
        Ok(())
    }

    fn seek(&mut self, position: Duration) {
        self.state.lock().unwrap().position = position;
    }

    fn position(&self) -> Duration {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}
