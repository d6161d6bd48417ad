//! Keepsake — Passcode gate in front of the experience.
//!
//! The code is a fixed literal and the gate is part of the story, not a
//! security boundary: the guest must fail once and open the hint before the
//! right code is accepted.

pub mod domain;
