//! Keepsake runner entry point.
//!
//! Drives the experience headlessly on a fixed tick, with a synthetic camera
//! and an autopilot playing the guest.

use std::sync::Arc;
use std::time::Duration;

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::clock::SystemClock;
use keepsake_core::event::DomainEvent;
use keepsake_core::geometry::Size;
use keepsake_core::ports::FixedViewport;
use keepsake_core::rng::{DeterministicRng, SeededRng};
use keepsake_orchestrator::application::experience::{Experience, Providers};
use keepsake_orchestrator::domain::stage::Stage;
use tracing_subscriber::EnvFilter;

mod adapters;
mod autopilot;
mod error;
mod settings;

use adapters::{AutoScroll, FileDownloadSink, FileImageLoader, LoggingAudio, TestPatternCamera};
use autopilot::Autopilot;
use error::AppError;
use settings::Settings;

/// Viewport the headless run pretends to have.
const VIEWPORT: Size = Size::new(1440.0, 900.0);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Keepsake runner");

    let settings = Settings::from_env().await?;
    let runner = settings.experience.runner.clone();
    let clock = SystemClock::scaled(runner.time_scale);
    let rng: Box<dyn DeterministicRng> = match runner.seed {
        Some(seed) => Box::new(SeededRng::from_seed(seed)),
        None => Box::new(SeededRng::from_os()),
    };

    let scroll = Arc::new(AutoScroll::default());
    let providers = Providers {
        viewport: Arc::new(FixedViewport(VIEWPORT)),
        scroll: scroll.clone(),
        camera: Arc::new(TestPatternCamera),
        images: Arc::new(FileImageLoader::new(&settings.asset_dir)),
        downloads: Arc::new(FileDownloadSink::new(&settings.output_dir)),
        audio: Box::new(LoggingAudio::default()),
    };
    let mut autopilot = Autopilot::new(settings.experience.gate.access_code.clone(), 0, scroll);
    let mut experience = Experience::new(settings.experience, providers, rng, &clock)?;

    let mut interval = tokio::time::interval(Duration::from_millis(runner.tick_interval_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(stage = ?experience.stage(), "interrupted");
                return Ok(());
            }
        }

        autopilot.act(experience.mounted_mut(), &clock);
        let stage = experience.tick(&clock).await?;
        for event in experience.take_uncommitted_events() {
            tracing::info!(
                event_type = event.event_type(),
                payload = %event.to_payload(),
                "experience event"
            );
        }
        if stage == Stage::Outro {
            break;
        }
    }

    tracing::info!("Reached the outro; run complete");
    Ok(())
}
