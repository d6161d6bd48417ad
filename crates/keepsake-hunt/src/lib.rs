//! Keepsake — Collectible hunt minigame.
//!
//! Twelve clovers are scattered around the page; seven are lucky. Tapping
//! all seven lucky ones runs a short celebration before handing control
//! back.

pub mod domain;
