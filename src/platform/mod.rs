//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Pointer position sampling
//! - Recentring (warping) the pointer while the view is locked

pub mod input;

pub use input::{PointerSampler, PointerSource};
