//! Placement application services.

pub mod placement_service;
