//! Domain layer for the Access Gate.

pub mod aggregates;
pub mod events;
