//! Domain layer for the photo booth.

pub mod compositor;
pub mod events;
pub mod prank;
pub mod session;
