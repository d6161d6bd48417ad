//! Countdown and shutter state machine.

use std::time::Duration;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use keepsake_core::clock::Deadline;
use keepsake_core::ports::VideoStream;
use serde::{Deserialize, Serialize};

/// Session timing and frame size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Shots per session.
    pub shot_count: usize,
    /// First countdown number.
    pub countdown_from: u8,
    /// Time each countdown number is shown.
    pub countdown_step_ms: u64,
    /// Pause between a shutter and the next countdown.
    pub between_shots_ms: u64,
    /// Captured frame width.
    pub frame_width: u32,
    /// Captured frame height.
    pub frame_height: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shot_count: 3,
            countdown_from: 3,
            countdown_step_ms: 1_000,
            between_shots_ms: 1_000,
            frame_width: 1280,
            frame_height: 720,
        }
    }
}

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Waiting for a start, or pausing between shots.
    Idle,
    /// Showing a countdown number.
    CountingDown(u8),
    /// Grabbing a frame.
    Capturing,
    /// Every shot has been taken.
    Done,
}

/// Something that happened while advancing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// A countdown number is now showing.
    Countdown(u8),
    /// A shot was appended at this index.
    ShotTaken(usize),
    /// The last shot was taken.
    Finished,
}

/// One capture session.
#[derive(Debug)]
pub struct CaptureSession {
    config: SessionConfig,
    phase: CapturePhase,
    shots: Vec<RgbaImage>,
    next: Option<Deadline>,
}

impl CaptureSession {
    /// Creates an idle session with no shots.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: CapturePhase::Idle,
            shots: Vec::new(),
            next: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    /// Shots taken, in cycle order.
    #[must_use]
    pub fn shots(&self) -> &[RgbaImage] {
        &self.shots
    }

    /// Whether a countdown, shutter or between-shot pause is pending.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.next.is_some()
    }

    /// Starts a session at `now`.
    ///
    /// Only valid while idle, with shots remaining and no sequence pending.
    /// Clears previous shots and shows the first countdown number.
    pub fn start(&mut self, now: Duration) -> Option<SessionStep> {
        if self.phase != CapturePhase::Idle
            || self.in_flight()
            || self.shots.len() >= self.config.shot_count
        {
            return None;
        }
        self.shots.clear();
        Some(self.begin_countdown(now))
    }

    /// Returns the session to idle with no shots, disarming any timer.
    pub fn reset(&mut self) {
        self.phase = CapturePhase::Idle;
        self.shots.clear();
        self.next = None;
    }

    /// Fires every timer that is due at `now`, in order.
    ///
    /// Each follow-up timer is armed from the previous due time, so a late
    /// tick catches up without drifting.
    pub fn advance(&mut self, now: Duration, stream: Option<&dyn VideoStream>) -> Vec<SessionStep> {
        let mut steps = Vec::new();
        while let Some(deadline) = self.next.filter(|d| d.is_due(now)) {
            let at = deadline.due_at();
            match self.phase {
                CapturePhase::CountingDown(n) if n > 1 => {
                    self.phase = CapturePhase::CountingDown(n - 1);
                    self.next = Some(self.step_deadline(at));
                    steps.push(SessionStep::Countdown(n - 1));
                }
                CapturePhase::CountingDown(_) => steps.extend(self.shutter(at, stream)),
                CapturePhase::Idle => steps.push(self.begin_countdown(at)),
                CapturePhase::Capturing | CapturePhase::Done => self.next = None,
            }
        }
        steps
    }

    fn begin_countdown(&mut self, at: Duration) -> SessionStep {
        let n = self.config.countdown_from.max(1);
        self.phase = CapturePhase::CountingDown(n);
        self.next = Some(self.step_deadline(at));
        SessionStep::Countdown(n)
    }

    fn step_deadline(&self, at: Duration) -> Deadline {
        Deadline::after(at, Duration::from_millis(self.config.countdown_step_ms))
    }

    fn shutter(&mut self, at: Duration, stream: Option<&dyn VideoStream>) -> Vec<SessionStep> {
        self.phase = CapturePhase::Capturing;
        let frame = self.grab_frame(stream);
        self.shots.push(frame);
        let index = self.shots.len() - 1;

        if self.shots.len() < self.config.shot_count {
            self.phase = CapturePhase::Idle;
            self.next = Some(Deadline::after(
                at,
                Duration::from_millis(self.config.between_shots_ms),
            ));
            vec![SessionStep::ShotTaken(index)]
        } else {
            self.phase = CapturePhase::Done;
            self.next = None;
            vec![SessionStep::ShotTaken(index), SessionStep::Finished]
        }
    }

    /// Grabs the live frame at capture size, mirrored. Blank without a camera.
    fn grab_frame(&self, stream: Option<&dyn VideoStream>) -> RgbaImage {
        let (width, height) = (self.config.frame_width, self.config.frame_height);
        let Some(frame) = stream.and_then(|s| s.current_frame()) else {
            tracing::warn!("no live frame available, capturing a blank shot");
            return RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        };
        let frame = if frame.dimensions() == (width, height) {
            frame
        } else {
            imageops::resize(&frame, width, height, FilterType::Triangle)
        };
        imageops::flip_horizontal(&frame)
    }
}

#[cfg(test)]
mod tests {
    use keepsake_test_support::solid_frame;

    use super::*;

    #[derive(Debug)]
    struct HalfAndHalf;

    impl VideoStream for HalfAndHalf {
        fn current_frame(&self) -> Option<RgbaImage> {
            // Left half red, right half blue.
            Some(RgbaImage::from_fn(1280, 720, |x, _| {
                if x < 640 {
                    Rgba([255, 0, 0, 255])
                } else {
                    Rgba([0, 0, 255, 255])
                }
            }))
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_full_session_counts_down_three_times_and_finishes() {
        use SessionStep::{Countdown, Finished, ShotTaken};

        // Arrange
        let mut session = CaptureSession::new(SessionConfig::default());
        let mut steps = vec![session.start(ms(0)).unwrap()];

        // Act
        for t in (1..=12).map(|s| ms(s * 1_000)) {
            steps.extend(session.advance(t, None));
        }

        // Assert
        assert_eq!(
            steps,
            vec![
                Countdown(3),
                Countdown(2),
                Countdown(1),
                ShotTaken(0),
                Countdown(3),
                Countdown(2),
                Countdown(1),
                ShotTaken(1),
                Countdown(3),
                Countdown(2),
                Countdown(1),
                ShotTaken(2),
                Finished,
            ]
        );
        assert_eq!(session.phase(), CapturePhase::Done);
        assert_eq!(session.shots().len(), 3);
    }

    #[test]
    fn test_late_tick_catches_up() {
        let mut session = CaptureSession::new(SessionConfig::default());
        session.start(ms(0));

        let steps = session.advance(ms(60_000), None);

        assert_eq!(steps.last(), Some(&SessionStep::Finished));
        assert_eq!(session.shots().len(), 3);
    }

    #[test]
    fn test_start_rejected_while_in_flight_or_done() {
        let mut session = CaptureSession::new(SessionConfig::default());
        assert!(session.start(ms(0)).is_some());
        assert!(session.start(ms(10)).is_none());

        session.advance(ms(3_000), None);
        assert_eq!(session.phase(), CapturePhase::Idle);
        assert!(session.start(ms(3_100)).is_none());

        session.advance(ms(11_000), None);
        assert!(session.start(ms(12_000)).is_none());

        session.reset();
        assert!(session.start(ms(13_000)).is_some());
        assert!(session.shots().is_empty());
    }

    #[test]
    fn test_shot_is_mirrored() {
        let mut session = CaptureSession::new(SessionConfig::default());
        session.start(ms(0));

        session.advance(ms(3_000), Some(&HalfAndHalf));

        let shot = &session.shots()[0];
        assert_eq!(shot.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(shot.get_pixel(1279, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_frames_are_normalised_to_capture_size() {
        #[derive(Debug)]
        struct Small;
        impl VideoStream for Small {
            fn current_frame(&self) -> Option<RgbaImage> {
                Some(solid_frame(64, 48, [10, 20, 30, 255]))
            }
        }
        let mut session = CaptureSession::new(SessionConfig::default());
        session.start(ms(0));

        session.advance(ms(3_000), Some(&Small));

        assert_eq!(session.shots()[0].dimensions(), (1280, 720));
    }

    #[test]
    fn test_missing_camera_captures_blank_frame() {
        let mut session = CaptureSession::new(SessionConfig::default());
        session.start(ms(0));

        session.advance(ms(3_000), None);

        assert_eq!(session.shots()[0].get_pixel(5, 5), &Rgba([0, 0, 0, 255]));
    }
}
