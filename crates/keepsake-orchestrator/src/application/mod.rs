//! Application layer for the orchestrator.

pub mod experience;
