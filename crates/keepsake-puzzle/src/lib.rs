//! Keepsake — Ordering Puzzle.
//!
//! Scattered letter tiles are dragged freely; the puzzle is solved when
//! reading the tiles left to right spells the target word.

pub mod domain;
