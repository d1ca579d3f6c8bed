//! Rendering module
//!
//! Produces a surface-agnostic draw list each tick; the host paints it.

pub mod frame;

pub use frame::{Marker, MarkerKind, RenderFrame, TargetSprite, TrailSprite, build_frame};
