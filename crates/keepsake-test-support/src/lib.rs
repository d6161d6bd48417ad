//! Shared test mocks and utilities for the Keepsake experience engine.

mod audio;
mod clock;
mod media;
mod rng;
mod scroll;

pub use audio::RecordingAudio;
pub use clock::ManualClock;
pub use media::{
    FailingCamera, FailingImageLoader, RecordingDownloadSink, StaticImageLoader, StubCamera,
    solid_frame,
};
pub use rng::{MockRng, SequenceRng};
pub use scroll::ScriptedScroll;
