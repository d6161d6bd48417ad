//! Keepsake — Spatial Placement Service.
//!
//! Generates entity positions inside a viewport that avoid a set of
//! rectangular exclusion zones, falling back to a safe band when sampling
//! keeps failing.

pub mod application;
pub mod domain;
