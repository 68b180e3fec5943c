//! Core types for the tilemask label pipeline: tile coordinates, bounding
//! boxes, tile covers and progress reporting.

pub mod progress;
mod types;

pub use types::*;
