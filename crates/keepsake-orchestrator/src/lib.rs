//! Keepsake — Stage sequencing for the experience.
//!
//! The [`application::experience::Experience`] mounts one stage at a time,
//! drives its timers from a single `tick`, and moves forward when the stage
//! reports completion.

pub mod application;
pub mod config;
pub mod domain;
