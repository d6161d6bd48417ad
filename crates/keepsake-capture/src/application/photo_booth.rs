//! The photo booth stage: camera lifetime, session driving, compositing,
//! download and checkout.

use std::sync::Arc;

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::clock::Clock;
use keepsake_core::error::DomainError;
use keepsake_core::event::EventMetadata;
use keepsake_core::ports::{DownloadSink, ImageLoader, MediaCaptureProvider, VideoStream};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::compositor::{Composite, StripLayout, compose_strip};
use crate::domain::events::{
    CaptureEvent, CaptureEventKind, CompositeDownloaded, CompositeReady, CountdownShown,
    PhotoBoothCompleted, PrankAdvanced, SessionFinished, SessionReset, ShotCaptured,
};
use crate::domain::prank::{CheckoutPrank, PrankConfig, PrankSignal};
use crate::domain::session::{CapturePhase, CaptureSession, SessionConfig, SessionStep};

/// Photo booth configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Countdown and frame settings.
    pub session: SessionConfig,
    /// Strip canvas and slots.
    pub layout: StripLayout,
    /// Decorative frame laid over the strip.
    pub overlay_url: String,
    /// File name handed to the download sink.
    pub download_name: String,
    /// Checkout prank settings.
    pub prank: PrankConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            layout: StripLayout::default(),
            overlay_url: "/frame.png".to_owned(),
            download_name: "clover-photobooth.png".to_owned(),
            prank: PrankConfig::default(),
        }
    }
}

impl CaptureConfig {
    /// Checks the layout against the session.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the layout is invalid, there
    /// are fewer slots than shots, or the countdown or frame size is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        self.layout.validate()?;
        let session = &self.session;
        if session.shot_count == 0 || session.shot_count > self.layout.slots.len() {
            return Err(DomainError::Configuration(format!(
                "{} shots do not fit {} slots",
                session.shot_count,
                self.layout.slots.len()
            )));
        }
        if session.countdown_from == 0 || session.frame_width == 0 || session.frame_height == 0 {
            return Err(DomainError::Configuration(
                "countdown and frame size must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }
}

/// The mounted photo booth.
///
/// Owns the camera stream from mount until [`PhotoBooth::unmount`] or drop.
pub struct PhotoBooth {
    /// Aggregate identifier.
    pub id: Uuid,
    config: CaptureConfig,
    camera: Arc<dyn MediaCaptureProvider>,
    stream: Option<Box<dyn VideoStream>>,
    images: Arc<dyn ImageLoader>,
    downloads: Arc<dyn DownloadSink>,
    session: CaptureSession,
    composite: Option<Composite>,
    prank: Option<CheckoutPrank>,
    completed: bool,
    version: i64,
    uncommitted_events: Vec<CaptureEvent>,
}

impl std::fmt::Debug for PhotoBooth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoBooth")
            .field("id", &self.id)
            .field("camera_live", &self.stream.is_some())
            .field("phase", &self.session.phase())
            .field("shots", &self.session.shots().len())
            .field("completed", &self.completed)
            .finish_non_exhaustive()
    }
}

impl PhotoBooth {
    /// Mounts the booth and asks for the camera.
    ///
    /// A denied or missing camera is logged; the booth still works and
    /// captures blank frames.
    pub async fn mount(
        config: CaptureConfig,
        camera: Arc<dyn MediaCaptureProvider>,
        images: Arc<dyn ImageLoader>,
        downloads: Arc<dyn DownloadSink>,
    ) -> Self {
        let id = Uuid::new_v4();
        let stream = match camera.acquire().await {
            Ok(stream) => {
                tracing::debug!(booth_id = %id, "camera acquired");
                Some(stream)
            }
            Err(e) => {
                tracing::warn!(booth_id = %id, error = %e, "camera unavailable, preview stays blank");
                None
            }
        };
        let session = CaptureSession::new(config.session.clone());

        Self {
            id,
            config,
            camera,
            stream,
            images,
            downloads,
            session,
            composite: None,
            prank: None,
            completed: false,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Whether a live stream is held.
    #[must_use]
    pub fn camera_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(&self) -> CapturePhase {
        self.session.phase()
    }

    /// Shots taken so far.
    #[must_use]
    pub fn shot_count(&self) -> usize {
        self.session.shots().len()
    }

    /// The current strip, if any shots exist.
    #[must_use]
    pub fn composite(&self) -> Option<&Composite> {
        self.composite.as_ref()
    }

    /// The checkout prank, once a strip exists.
    #[must_use]
    pub fn prank(&self) -> Option<&CheckoutPrank> {
        self.prank.as_ref()
    }

    /// Whether the booth has handed control back.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Starts a three-shot session.
    ///
    /// Returns `false` if a session is running, finished, or the booth has
    /// completed.
    pub fn start_session(&mut self, clock: &dyn Clock) -> bool {
        if self.completed {
            return false;
        }
        let Some(step) = self.session.start(clock.now()) else {
            return false;
        };
        tracing::info!(booth_id = %self.id, "capture session started");
        self.composite = None;
        self.record_step(step, clock);
        true
    }

    /// Advances the countdown and the prank, recompositing after each shot.
    ///
    /// Returns whether the booth is complete.
    pub async fn tick(&mut self, clock: &dyn Clock) -> bool {
        let now = clock.now();
        let steps = self.session.advance(now, self.stream.as_deref());
        let shots_changed = steps
            .iter()
            .any(|step| matches!(step, SessionStep::ShotTaken(_)));
        for step in steps {
            self.record_step(step, clock);
        }
        if shots_changed {
            self.recompose(clock).await;
        }

        if let Some(prank) = self.prank.as_mut() {
            let signals = prank.advance(now);
            for signal in signals {
                self.record_prank(&signal, clock);
            }
        }
        self.completed
    }

    /// Rebuilds the strip from the current shots.
    ///
    /// The frame overlay is fetched each time; if it fails the strip is
    /// finished without it.
    pub async fn recompose(&mut self, clock: &dyn Clock) {
        let shots = self.session.shots();
        if shots.is_empty() {
            self.composite = None;
            return;
        }

        let overlay = match self.images.load(&self.config.overlay_url).await {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!(booth_id = %self.id, error = %e, "frame overlay unavailable, compositing without it");
                None
            }
        };
        let composite = compose_strip(shots, overlay.as_ref(), &self.config.layout);
        let payload = CompositeReady {
            shot_count: shots.len(),
            framed: overlay.is_some(),
            fingerprint: composite.fingerprint.clone(),
        };
        tracing::debug!(booth_id = %self.id, shots = payload.shot_count, framed = payload.framed, "strip composited");
        self.composite = Some(composite);
        self.record(CaptureEventKind::CompositeReady(payload), clock);

        if self.prank.is_none() {
            self.prank = Some(CheckoutPrank::start(self.config.prank.clone(), clock.now()));
        }
    }

    /// Saves the strip through the download sink. No-op without a strip.
    pub fn download(&mut self, clock: &dyn Clock) -> bool {
        let Some(composite) = self.composite.as_ref() else {
            return false;
        };
        self.downloads
            .save(&self.config.download_name, &composite.image);
        let payload = CompositeDownloaded {
            file_name: self.config.download_name.clone(),
            fingerprint: composite.fingerprint.clone(),
        };
        tracing::info!(booth_id = %self.id, file_name = %payload.file_name, "strip downloaded");
        self.record(CaptureEventKind::CompositeDownloaded(payload), clock);
        true
    }

    /// Discards shots and strip and returns to idle.
    pub fn reset(&mut self, clock: &dyn Clock) {
        self.session.reset();
        self.composite = None;
        self.prank = None;
        self.record(CaptureEventKind::SessionReset(SessionReset), clock);
    }

    /// "Not yet" on the idle prompt.
    pub fn prank_not_yet(&mut self, clock: &dyn Clock) -> bool {
        self.prank
            .as_mut()
            .is_some_and(|prank| prank.not_yet(clock.now()))
    }

    /// "Done" on the idle prompt.
    pub fn prank_done(&mut self, clock: &dyn Clock) -> bool {
        let signal = self.prank.as_mut().and_then(CheckoutPrank::done);
        self.apply_prank_signal(signal, clock)
    }

    /// Bank picked on the payment sheet.
    pub fn prank_choose_bank(&mut self, clock: &dyn Clock) -> bool {
        let now = clock.now();
        let signal = self
            .prank
            .as_mut()
            .and_then(|prank| prank.choose_bank(now));
        self.apply_prank_signal(signal, clock)
    }

    /// Continue on the reveal.
    pub fn prank_continue(&mut self, clock: &dyn Clock) -> bool {
        let signal = self
            .prank
            .as_mut()
            .and_then(CheckoutPrank::continue_after_reveal);
        self.apply_prank_signal(signal, clock)
    }

    /// Releases the camera. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.camera.release(stream);
            tracing::debug!(booth_id = %self.id, "camera released");
        }
    }

    fn apply_prank_signal(&mut self, signal: Option<PrankSignal>, clock: &dyn Clock) -> bool {
        match signal {
            Some(signal) => {
                self.record_prank(&signal, clock);
                true
            }
            None => false,
        }
    }

    fn record_step(&mut self, step: SessionStep, clock: &dyn Clock) {
        let kind = match step {
            SessionStep::Countdown(remaining) => {
                tracing::trace!(booth_id = %self.id, remaining, "countdown");
                CaptureEventKind::CountdownShown(CountdownShown { remaining })
            }
            SessionStep::ShotTaken(index) => {
                tracing::debug!(booth_id = %self.id, index, "shot captured");
                CaptureEventKind::ShotCaptured(ShotCaptured { index })
            }
            SessionStep::Finished => {
                tracing::info!(booth_id = %self.id, "capture session finished");
                CaptureEventKind::SessionFinished(SessionFinished {
                    shot_count: self.session.shots().len(),
                })
            }
        };
        self.record(kind, clock);
    }

    fn record_prank(&mut self, signal: &PrankSignal, clock: &dyn Clock) {
        let showing = match signal {
            PrankSignal::IdlePrompt => "idle_prompt".to_owned(),
            PrankSignal::PaymentSheet => "payment_sheet".to_owned(),
            PrankSignal::Caption(caption) => caption.clone(),
            PrankSignal::Revealed => "reveal".to_owned(),
            PrankSignal::Completed => {
                self.complete(clock);
                return;
            }
        };
        tracing::debug!(booth_id = %self.id, %showing, "checkout prank advanced");
        self.record(CaptureEventKind::PrankAdvanced(PrankAdvanced { showing }), clock);
    }

    fn complete(&mut self, clock: &dyn Clock) {
        if self.completed {
            return;
        }
        self.completed = true;
        tracing::info!(booth_id = %self.id, "photo booth completed");
        let fingerprint = self.composite.as_ref().map(|c| c.fingerprint.clone());
        self.record(
            CaptureEventKind::PhotoBoothCompleted(PhotoBoothCompleted { fingerprint }),
            clock,
        );
    }

    fn record(&mut self, kind: CaptureEventKind, clock: &dyn Clock) {
        self.version += 1;
        let metadata =
            EventMetadata::new(kind.event_type(), self.id, self.version, clock.now());
        self.uncommitted_events.push(CaptureEvent { metadata, kind });
    }
}

impl Drop for PhotoBooth {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl AggregateRoot for PhotoBooth {
    type Event = CaptureEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn take_uncommitted_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.uncommitted_events)
    }
}
