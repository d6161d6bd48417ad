//! Boundary contracts for the collaborators the engine calls into.
//!
//! Implementations live in the presentation layer (or in
//! `keepsake-test-support` for tests); the engine only consumes them.

use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::DomainError;
use crate::geometry::Size;

/// Provides the current viewport dimensions.
pub trait ViewportMetrics: Send + Sync {
    /// Current viewport width and height.
    fn viewport(&self) -> Size;
}

/// Polled scroll position signals for the current stage.
pub trait ScrollObserver: Send + Sync {
    /// Whether the user has scrolled near the bottom of the stage.
    fn near_bottom(&self) -> bool;

    /// Whether the user has scrolled past the small hint threshold.
    fn past_hint_threshold(&self) -> bool;
}

/// A live camera stream.
pub trait VideoStream: Send + Sync {
    /// Grabs the frame currently shown in the preview, if one is available.
    fn current_frame(&self) -> Option<RgbaImage>;
}

/// Acquires and releases the camera.
#[async_trait]
pub trait MediaCaptureProvider: Send + Sync {
    /// Requests a live video stream.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceUnavailable` if the camera is denied or
    /// absent.
    async fn acquire(&self) -> Result<Box<dyn VideoStream>, DomainError>;

    /// Stops every track of a previously acquired stream.
    fn release(&self, stream: Box<dyn VideoStream>);
}

/// Loads and decodes images by URL.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Fetches and decodes the image at `url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceUnavailable` if the image cannot be
    /// fetched or decoded.
    async fn load(&self, url: &str) -> Result<RgbaImage, DomainError>;
}

/// Client-side save action for finished images. Fire-and-forget.
pub trait DownloadSink: Send + Sync {
    /// Saves `image` under `file_name`.
    fn save(&self, file_name: &str, image: &RgbaImage);
}

/// The single audio element shared by every stage once a track is picked.
pub trait AudioOutput: Send + Sync {
    /// Loads `src` and starts looping playback.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceUnavailable` if playback cannot start.
    fn play_looping(&mut self, src: &str) -> Result<(), DomainError>;

    /// Pauses playback.
    fn pause(&mut self);

    /// Resumes playback.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ResourceUnavailable` if playback cannot resume.
    fn resume(&mut self) -> Result<(), DomainError>;

    /// Seeks to an absolute position.
    fn seek(&mut self, position: Duration);

    /// Current playback position.
    fn position(&self) -> Duration;

    /// Duration of the loaded track, if known.
    fn duration(&self) -> Option<Duration>;
}

/// A viewport of fixed dimensions.
#[derive(Debug, Clone, Copy)]
pub struct FixedViewport(pub Size);

impl ViewportMetrics for FixedViewport {
    fn viewport(&self) -> Size {
        self.0
    }
}
