//! Domain layer for the Collection Hunt.

pub mod aggregates;
pub mod events;
