//! The experience state machine.
//!
//! One stage is mounted at a time. `tick` advances the mounted stage's
//! timers, drains and logs its events, and when the stage reports completion
//! unmounts it and mounts the next one. There is no way back.

use std::sync::Arc;

use keepsake_capture::application::photo_booth::PhotoBooth;
use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::clock::Clock;
use keepsake_core::error::DomainError;
use keepsake_core::event::{DomainEvent, EventMetadata};
use keepsake_core::ports::{
    AudioOutput, DownloadSink, ImageLoader, MediaCaptureProvider, ScrollObserver, ViewportMetrics,
};
use keepsake_core::rng::DeterministicRng;
use keepsake_gate::domain::aggregates::AccessGate;
use keepsake_hunt::domain::aggregates::CollectionHunt;
use keepsake_puzzle::domain::aggregates::OrderingPuzzle;
use uuid::Uuid;

use crate::config::ExperienceConfig;
use crate::domain::events::{
    ExperienceEvent, ExperienceEventKind, StageCompleted, StageEntered, TrackSelected,
};
use crate::domain::player::MusicPlayer;
use crate::domain::stage::Stage;
use crate::domain::supporting::{FinalMessage, Motivation, Outro};
use crate::domain::tracks::{Track, TrackSelection};

/// Everything the engine reaches outside itself for.
pub struct Providers {
    /// Viewport size, read when a spatial stage mounts.
    pub viewport: Arc<dyn ViewportMetrics>,
    /// Scroll signals for the main page.
    pub scroll: Arc<dyn ScrollObserver>,
    /// Camera for the photo booth.
    pub camera: Arc<dyn MediaCaptureProvider>,
    /// Image loader for the strip frame.
    pub images: Arc<dyn ImageLoader>,
    /// Where finished strips are saved.
    pub downloads: Arc<dyn DownloadSink>,
    /// The shared audio element, handed to the player once a track is picked.
    pub audio: Box<dyn AudioOutput>,
}

/// The component behind the current stage.
#[derive(Debug)]
pub enum MountedStage {
    /// Passcode gate.
    Locked(AccessGate),
    /// Track picker.
    SelectingMusic(TrackSelection),
    /// Letter puzzle.
    Intro(OrderingPuzzle),
    /// Collectible hunt.
    Main(CollectionHunt),
    /// Photo booth.
    PhotoBooth(Box<PhotoBooth>),
    /// Closing letter.
    FinalMessage(FinalMessage),
    /// Motivation countdown.
    Motivation(Motivation),
    /// Credits.
    Outro(Outro),
}

impl MountedStage {
    /// The stage this component implements.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Locked(_) => Stage::Locked,
            Self::SelectingMusic(_) => Stage::SelectingMusic,
            Self::Intro(_) => Stage::Intro,
            Self::Main(_) => Stage::Main,
            Self::PhotoBooth(_) => Stage::PhotoBooth,
            Self::FinalMessage(_) => Stage::FinalMessage,
            Self::Motivation(_) => Stage::Motivation,
            Self::Outro(_) => Stage::Outro,
        }
    }

    fn unmount(&mut self) {
        match self {
            Self::Intro(puzzle) => puzzle.unmount(),
            Self::Main(hunt) => hunt.unmount(),
            Self::PhotoBooth(booth) => booth.unmount(),
            _ => {}
        }
    }
}

/// The experience orchestrator.
pub struct Experience {
    /// Aggregate identifier.
    pub id: Uuid,
    config: ExperienceConfig,
    viewport: Arc<dyn ViewportMetrics>,
    scroll: Arc<dyn ScrollObserver>,
    camera: Arc<dyn MediaCaptureProvider>,
    images: Arc<dyn ImageLoader>,
    downloads: Arc<dyn DownloadSink>,
    audio: Option<Box<dyn AudioOutput>>,
    rng: Box<dyn DeterministicRng>,
    mounted: MountedStage,
    unlocked: bool,
    player: Option<MusicPlayer>,
    version: i64,
    uncommitted_events: Vec<ExperienceEvent>,
}

impl std::fmt::Debug for Experience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Experience")
            .field("id", &self.id)
            .field("stage", &self.stage())
            .field("unlocked", &self.unlocked)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

impl Experience {
    /// Starts a fresh run at [`Stage::Locked`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if `config` is invalid.
    pub fn new(
        config: ExperienceConfig,
        providers: Providers,
        rng: Box<dyn DeterministicRng>,
        clock: &dyn Clock,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let gate = AccessGate::new(config.gate.clone());
        let mut experience = Self {
            id: Uuid::new_v4(),
            config,
            viewport: providers.viewport,
            scroll: providers.scroll,
            camera: providers.camera,
            images: providers.images,
            downloads: providers.downloads,
            audio: Some(providers.audio),
            rng,
            mounted: MountedStage::Locked(gate),
            unlocked: false,
            player: None,
            version: 0,
            uncommitted_events: Vec::new(),
        };
        tracing::info!(experience_id = %experience.id, stage = ?Stage::Locked, "experience started");
        experience.record(
            ExperienceEventKind::StageEntered(StageEntered {
                stage: Stage::Locked,
            }),
            clock,
        );
        Ok(experience)
    }

    /// The active stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.mounted.stage()
    }

    /// The mounted component, for feeding input.
    pub fn mounted_mut(&mut self) -> &mut MountedStage {
        &mut self.mounted
    }

    /// The mounted component.
    #[must_use]
    pub fn mounted(&self) -> &MountedStage {
        &self.mounted
    }

    /// Whether the gate has been passed.
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// The picked track, once there is one.
    #[must_use]
    pub fn selected_track(&self) -> Option<&Track> {
        self.player.as_ref().map(MusicPlayer::track)
    }

    /// The music player overlay. Present on every stage after the pick.
    pub fn player_mut(&mut self) -> Option<&mut MusicPlayer> {
        self.player.as_mut()
    }

    /// Advances the mounted stage and moves on if it completed.
    ///
    /// At most one transition happens per tick.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if the next stage cannot be built
    /// from the configuration.
    pub async fn tick(&mut self, clock: &dyn Clock) -> Result<Stage, DomainError> {
        if self.poll_mounted(clock).await {
            self.advance(clock).await?;
        }
        Ok(self.stage())
    }

    /// Runs the mounted stage's timers and reports whether it completed.
    ///
    /// Completion is read from the stage's state; its events are only logged.
    async fn poll_mounted(&mut self, clock: &dyn Clock) -> bool {
        match &mut self.mounted {
            MountedStage::Locked(gate) => {
                log_events(Stage::Locked, &gate.take_uncommitted_events());
                if gate.is_unlocked() {
                    self.unlocked = true;
                }
                gate.is_unlocked()
            }
            MountedStage::SelectingMusic(picker) => match picker.selected().cloned() {
                Some(track) => {
                    self.start_player(track, clock);
                    true
                }
                None => false,
            },
            MountedStage::Intro(puzzle) => {
                let done = puzzle.tick(clock);
                log_events(Stage::Intro, &puzzle.take_uncommitted_events());
                done
            }
            MountedStage::Main(hunt) => {
                hunt.observe_scroll(self.scroll.as_ref());
                let done = hunt.tick(clock);
                log_events(Stage::Main, &hunt.take_uncommitted_events());
                done
            }
            MountedStage::PhotoBooth(booth) => {
                let done = booth.tick(clock).await;
                log_events(Stage::PhotoBooth, &booth.take_uncommitted_events());
                done
            }
            MountedStage::FinalMessage(message) => message.is_complete(),
            MountedStage::Motivation(motivation) => motivation.tick(clock),
            MountedStage::Outro(_) => false,
        }
    }

    async fn advance(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        let finished = self.stage();
        let Some(next) = finished.next() else {
            return Ok(());
        };

        let mounted = self.mount(next, clock).await?;
        self.mounted.unmount();
        self.record(
            ExperienceEventKind::StageCompleted(StageCompleted { stage: finished }),
            clock,
        );
        // Replacing drops the finished component, disarming its timers.
        self.mounted = mounted;
        tracing::info!(experience_id = %self.id, from = ?finished, to = ?next, "stage changed");
        self.record(
            ExperienceEventKind::StageEntered(StageEntered { stage: next }),
            clock,
        );
        Ok(())
    }

    async fn mount(&mut self, stage: Stage, clock: &dyn Clock) -> Result<MountedStage, DomainError> {
        let viewport = self.viewport.viewport();
        Ok(match stage {
            Stage::Locked => MountedStage::Locked(AccessGate::new(self.config.gate.clone())),
            Stage::SelectingMusic => MountedStage::SelectingMusic(TrackSelection::new()),
            Stage::Intro => MountedStage::Intro(OrderingPuzzle::scatter(
                self.config.puzzle.clone(),
                viewport,
                self.rng.as_mut(),
            )?),
            Stage::Main => MountedStage::Main(CollectionHunt::new(
                self.config.hunt.clone(),
                viewport,
                self.rng.as_mut(),
            )?),
            Stage::PhotoBooth => MountedStage::PhotoBooth(Box::new(
                PhotoBooth::mount(
                    self.config.capture.clone(),
                    Arc::clone(&self.camera),
                    Arc::clone(&self.images),
                    Arc::clone(&self.downloads),
                )
                .await,
            )),
            Stage::FinalMessage => MountedStage::FinalMessage(FinalMessage::new()),
            Stage::Motivation => {
                MountedStage::Motivation(Motivation::start(self.config.motivation.clone(), clock))
            }
            Stage::Outro => MountedStage::Outro(Outro),
        })
    }

    fn start_player(&mut self, track: Track, clock: &dyn Clock) {
        let Some(audio) = self.audio.take() else {
            return;
        };
        tracing::info!(experience_id = %self.id, title = %track.title, "track selected");
        self.record(
            ExperienceEventKind::TrackSelected(TrackSelected {
                title: track.title.clone(),
                src: track.src.clone(),
            }),
            clock,
        );
        self.player = Some(MusicPlayer::start(track, audio));
    }

    fn record(&mut self, kind: ExperienceEventKind, clock: &dyn Clock) {
        self.version += 1;
        let metadata =
            EventMetadata::new(kind.event_type(), self.id, self.version, clock.now());
        self.uncommitted_events.push(ExperienceEvent { metadata, kind });
    }
}

fn log_events<E: DomainEvent>(stage: Stage, events: &[E]) {
    for event in events {
        tracing::debug!(
            ?stage,
            event_type = event.event_type(),
            sequence = event.metadata().sequence_number,
            payload = %event.to_payload(),
            "stage event"
        );
    }
}

impl AggregateRoot for Experience {
    type Event = ExperienceEvent;

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
