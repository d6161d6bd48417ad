//! Test media providers — camera, image loader and download sink doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use keepsake_core::error::DomainError;
use keepsake_core::ports::{DownloadSink, ImageLoader, MediaCaptureProvider, VideoStream};

/// Builds a frame filled with a single colour.
#[must_use]
pub fn solid_frame(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

#[derive(Debug)]
struct StubStream {
    frame: RgbaImage,
}

impl VideoStream for StubStream {
    fn current_frame(&self) -> Option<RgbaImage> {
        Some(self.frame.clone())
    }
}

/// A camera that always yields the same frame and counts acquisitions and
/// releases. Clones share the counters.
#[derive(Debug, Clone)]
pub struct StubCamera {
    frame: RgbaImage,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl StubCamera {
    /// Creates a camera streaming `frame`.
    #[must_use]
    pub fn new(frame: RgbaImage) -> Self {
        Self {
            frame,
            acquired: Arc::default(),
            released: Arc::default(),
        }
    }

    /// Number of successful `acquire` calls.
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of `release` calls.
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaCaptureProvider for StubCamera {
    async fn acquire(&self) -> Result<Box<dyn VideoStream>, DomainError> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(StubStream {
            frame: self.frame.clone(),
        }))
    }

    fn release(&self, _stream: Box<dyn VideoStream>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// A camera whose permission is always denied.
#[derive(Debug)]
pub struct FailingCamera;

#[async_trait]
impl MediaCaptureProvider for FailingCamera {
    async fn acquire(&self) -> Result<Box<dyn VideoStream>, DomainError> {
        Err(DomainError::ResourceUnavailable("camera access denied".into()))
    }

    fn release(&self, _stream: Box<dyn VideoStream>) {}
}

/// An image loader serving a fixed map of URLs.
#[derive(Debug, Default)]
pub struct StaticImageLoader {
    images: HashMap<String, RgbaImage>,
}

impl StaticImageLoader {
    /// Creates a loader with no images.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `image` under `url`.
    #[must_use]
    pub fn with_image(mut self, url: &str, image: RgbaImage) -> Self {
        self.images.insert(url.to_owned(), image);
        self
    }
}

#[async_trait]
impl ImageLoader for StaticImageLoader {
    async fn load(&self, url: &str) -> Result<RgbaImage, DomainError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| DomainError::ResourceUnavailable(format!("no image at {url}")))
    }
}

/// An image loader that always fails.
#[derive(Debug)]
pub struct FailingImageLoader;

#[async_trait]
impl ImageLoader for FailingImageLoader {
    async fn load(&self, url: &str) -> Result<RgbaImage, DomainError> {
        Err(DomainError::ResourceUnavailable(format!(
            "failed to decode {url}"
        )))
    }
}

/// A download sink that records every saved image. Clones share the
/// recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingDownloadSink {
    saved: Arc<Mutex<Vec<(String, RgbaImage)>>>,
}

impl RecordingDownloadSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all saved images.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn saved(&self) -> Vec<(String, RgbaImage)> {
        self.saved.lock().unwrap().clone()
    }
}

impl DownloadSink for RecordingDownloadSink {
    fn save(&self, file_name: &str, image: &RgbaImage) {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_owned(), image.clone()));
    }
}
