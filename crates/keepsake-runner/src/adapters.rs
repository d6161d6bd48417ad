//! Headless implementations of the engine's ports.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use keepsake_core::error::DomainError;
use keepsake_core::ports::{
    AudioOutput, DownloadSink, ImageLoader, MediaCaptureProvider, ScrollObserver, VideoStream,
};

/// Frame size the synthetic camera produces.
const PATTERN_WIDTH: u32 = 1280;
const PATTERN_HEIGHT: u32 = 720;

#[derive(Debug)]
struct TestPattern(RgbaImage);

impl VideoStream for TestPattern {
    fn current_frame(&self) -> Option<RgbaImage> {
        Some(self.0.clone())
    }
}

/// A camera that streams a fixed colour-bar pattern.
#[derive(Debug, Default)]
pub struct TestPatternCamera;

impl TestPatternCamera {
    /// Renders the pattern: seven vertical bars over a grey ramp.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn frame() -> RgbaImage {
        const BARS: [[u8; 3]; 7] = [
            [192, 192, 192],
            [192, 192, 0],
            [0, 192, 192],
            [0, 192, 0],
            [192, 0, 192],
            [192, 0, 0],
            [0, 0, 192],
        ];
        RgbaImage::from_fn(PATTERN_WIDTH, PATTERN_HEIGHT, |x, y| {
            if y < PATTERN_HEIGHT * 3 / 4 {
                let [r, g, b] = BARS[(x * 7 / PATTERN_WIDTH) as usize];
                Rgba([r, g, b, 255])
            } else {
                let v = (x * 255 / PATTERN_WIDTH) as u8;
                Rgba([v, v, v, 255])
            }
        })
    }
}

#[async_trait]
impl MediaCaptureProvider for TestPatternCamera {
    async fn acquire(&self) -> Result<Box<dyn VideoStream>, DomainError> {
        tracing::debug!("test pattern camera acquired");
        Ok(Box::new(TestPattern(Self::frame())))
    }

    fn release(&self, _stream: Box<dyn VideoStream>) {
        tracing::debug!("test pattern camera released");
    }
}

/// Resolves asset URLs against a local directory.
#[derive(Debug, Clone)]
pub struct FileImageLoader {
    root: PathBuf,
}

impl FileImageLoader {
    /// Creates a loader rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        self.root.join(url.trim_start_matches('/'))
    }
}

#[async_trait]
impl ImageLoader for FileImageLoader {
    async fn load(&self, url: &str) -> Result<RgbaImage, DomainError> {
        let path = self.resolve(url);
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            DomainError::ResourceUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let image = image::load_from_memory(&bytes).map_err(|e| {
            DomainError::ResourceUnavailable(format!("cannot decode {}: {e}", path.display()))
        })?;
        Ok(image.to_rgba8())
    }
}

/// Writes downloads as PNG files into a directory.
#[derive(Debug, Clone)]
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    // Blocking write on the caller's thread; the file is complete when `save` returns.
    fn write(dir: &Path, file_name: &str, image: &RgbaImage) -> Result<PathBuf, DomainError> {
        std::fs::create_dir_all(dir)
            .map_err(|e| DomainError::Infrastructure(format!("cannot create output dir: {e}")))?;
        let path = dir.join(file_name);
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| DomainError::Infrastructure(format!("cannot encode strip: {e}")))?;
        Ok(path)
    }
}

impl DownloadSink for FileDownloadSink {
    fn save(&self, file_name: &str, image: &RgbaImage) {
        match Self::write(&self.dir, file_name, image) {
            Ok(path) => tracing::info!(path = %path.display(), "download written"),
            Err(e) => tracing::warn!(error = %e, "download failed"),
        }
    }
}

/// An audio output with no device behind it; logs what it is told.
#[derive(Debug, Default)]
pub struct LoggingAudio {
    src: Option<String>,
    playing: bool,
    position: Duration,
}

impl AudioOutput for LoggingAudio {
    fn play_looping(&mut self, src: &str) -> Result<(), DomainError> {
        tracing::info!(%src, "audio looping");
        self.src = Some(src.to_owned());
        self.playing = true;
        self.position = Duration::ZERO;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        tracing::debug!("audio paused");
    }

    fn resume(&mut self) -> Result<(), DomainError> {
        if self.src.is_none() {
            return Err(DomainError::ResourceUnavailable(
                "nothing loaded to resume".to_owned(),
            ));
        }
        self.playing = true;
        tracing::debug!("audio resumed");
        Ok(())
    }

    fn seek(&mut self, position: Duration) {
        self.position = position;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        None
    }
}

/// Scroll signals flipped by the autopilot.
#[derive(Debug, Default)]
pub struct AutoScroll {
    at_bottom: AtomicBool,
}

impl AutoScroll {
    /// Jumps to the bottom of the page.
    pub fn scroll_to_bottom(&self) {
        self.at_bottom.store(true, Ordering::SeqCst);
    }
}

impl ScrollObserver for AutoScroll {
    fn near_bottom(&self) -> bool {
        self.at_bottom.load(Ordering::SeqCst)
    }

    fn past_hint_threshold(&self) -> bool {
        self.at_bottom.load(Ordering::SeqCst)
    }
}
