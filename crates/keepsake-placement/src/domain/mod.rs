//! Placement domain: zone layouts and the placement result type.

pub mod zones;
