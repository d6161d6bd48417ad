//! Application layer for the photo booth.

pub mod photo_booth;
