//! The persistent music player overlay.

use std::time::Duration;

use keepsake_core::error::DomainError;
use keepsake_core::ports::AudioOutput;

use super::tracks::Track;

/// Formats a playback position as `m:ss`.
#[must_use]
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Play/pause and seek over the shared audio output.
pub struct MusicPlayer {
    track: Track,
    audio: Box<dyn AudioOutput>,
    playing: bool,
}

impl std::fmt::Debug for MusicPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicPlayer")
            .field("track", &self.track.title)
            .field("playing", &self.playing)
            .finish_non_exhaustive()
    }
}

impl MusicPlayer {
    /// Loads `track` and starts it looping.
    ///
    /// If playback cannot start the failure is logged and the player comes
    /// up paused.
    #[must_use]
    pub fn start(track: Track, mut audio: Box<dyn AudioOutput>) -> Self {
        let playing = match audio.play_looping(&track.src) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(src = %track.src, error = %e, "audio playback failed");
                false
            }
        };
        Self {
            track,
            audio,
            playing,
        }
    }

    /// The track loaded.
    #[must_use]
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Whether audio is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Pauses when playing, resumes otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceUnavailable` if playback cannot resume;
    /// the player stays paused.
    pub fn toggle(&mut self) -> Result<bool, DomainError> {
        if self.playing {
            self.audio.pause();
            self.playing = false;
        } else {
            self.audio.resume()?;
            self.playing = true;
        }
        Ok(self.playing)
    }

    /// Seeks to `fraction` of the track. Ignored until the length is known.
    pub fn seek_fraction(&mut self, fraction: f64) -> bool {
        let Some(duration) = self.audio.duration() else {
            return false;
        };
        self.audio.seek(duration.mul_f64(fraction.clamp(0.0, 1.0)));
        true
    }

    /// Played share of the track in `[0, 1]`; zero while the length is
    /// unknown.
    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.audio.duration() {
            Some(duration) if !duration.is_zero() => {
                (self.audio.position().as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Position and length labels, length `0:00` while unknown.
    #[must_use]
    pub fn time_labels(&self) -> (String, String) {
        (
            format_time(self.audio.position()),
            format_time(self.audio.duration().unwrap_or_default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use keepsake_test_support::RecordingAudio;

    use super::*;
    use crate::domain::tracks::catalogue;

    #[test]
    fn test_format_time_pads_seconds() {
        assert_eq!(format_time(Duration::from_secs(0)), "0:00");
        assert_eq!(format_time(Duration::from_secs(9)), "0:09");
        assert_eq!(format_time(Duration::from_millis(181_900)), "3:01");
    }

    #[test]
    fn test_start_loops_track_and_toggle_pauses() {
        // Arrange
        let audio = RecordingAudio::with_duration(Duration::from_secs(180));
        let track = catalogue().remove(0);

        // Act
        let mut player = MusicPlayer::start(track.clone(), Box::new(audio.clone()));
        let after_toggle = player.toggle().unwrap();

        // Assert
        assert_eq!(audio.looped_sources(), vec![track.src]);
        assert!(!after_toggle);
        assert!(!audio.is_playing());
        assert!(player.toggle().unwrap());
        assert!(audio.is_playing());
    }

    #[test]
    fn test_seek_fraction_sets_position() {
        let audio = RecordingAudio::with_duration(Duration::from_secs(200));
        let mut player = MusicPlayer::start(catalogue().remove(1), Box::new(audio));

        assert!(player.seek_fraction(0.25));

        assert!((player.progress() - 0.25).abs() < 1e-9);
        assert_eq!(player.time_labels(), ("0:50".to_owned(), "3:20".to_owned()));
    }

    #[test]
    fn test_seek_ignored_without_duration() {
        let mut player = MusicPlayer::start(catalogue().remove(1), Box::new(RecordingAudio::default()));

        assert!(!player.seek_fraction(0.5));
        assert!(player.progress().abs() < f64::EPSILON);
    }
}
