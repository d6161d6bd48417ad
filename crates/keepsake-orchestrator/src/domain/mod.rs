//! Domain layer for the orchestrator.

pub mod events;
pub mod player;
pub mod stage;
pub mod supporting;
pub mod tracks;
