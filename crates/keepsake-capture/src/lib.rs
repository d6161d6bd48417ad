//! Keepsake — Photo booth capture, compositing and checkout.
//!
//! A session takes three mirrored shots on a 3-2-1 countdown, composites them
//! into a vertical strip under a decorative frame, and then runs the checkout
//! prank that ends the photo booth stage.

pub mod application;
pub mod domain;
