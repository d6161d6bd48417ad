//! Keepsake Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that every stage
//! component depends on. It contains no presentation or provider code.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod event;
pub mod geometry;
pub mod ports;
pub mod rng;
