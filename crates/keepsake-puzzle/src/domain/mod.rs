//! Ordering puzzle domain model.

pub mod aggregates;
pub mod events;
pub mod layout;
