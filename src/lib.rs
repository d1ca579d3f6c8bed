//! Aim Warmup - an FPS aim trainer with movement analysis
//!
//! Core modules:
//! - `sim`: Camera, target field, path analysis and the per-tick session loop
//! - `sensitivity`: DPI + cm/360 conversion into counts per degree
//! - `settings`: Runtime-adjustable configuration and presets
//! - `platform`: Pointer sampling and recentring
//! - `renderer`: Draw list and HUD text for the host surface
//! - `audio`: Named sound cues routed to an optional backend
//! - `session`: Host-facing glue tying the pieces together

pub mod audio;
pub mod platform;
pub mod renderer;
pub mod sensitivity;
pub mod session;
pub mod settings;
pub mod sim;

pub use sensitivity::SensitivityModel;
pub use session::GameSession;
pub use settings::{Settings, TargetPreset};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Host tick interval (the UI timer reschedules roughly every millisecond)
    pub const TICK_DT: f32 = 0.001;

    /// Horizontal field of view in degrees
    pub const DEFAULT_FOV: f32 = 90.0;
    /// Free-look pitch limit in degrees
    pub const MAX_PITCH: f32 = 89.0;

    /// `percent * cm_per_360` is roughly this constant for the percentage convention
    pub const PERCENT_CM360_PRODUCT: f32 = 164.6;
    /// Fallback sensitivity percentage for unparseable input
    pub const DEFAULT_SENSITIVITY_PCT: f32 = 5.3;
    pub const MIN_SENSITIVITY_PCT: f32 = 1.0;
    pub const MAX_SENSITIVITY_PCT: f32 = 20.0;
    pub const CM_PER_INCH: f32 = 2.54;
    pub const DEFAULT_DPI: f32 = 800.0;

    /// Path sampling interval while locked (seconds)
    pub const PATH_SAMPLE_INTERVAL: f32 = 0.010;
    /// How long a trail point stays visible (seconds)
    pub const TRAIL_DURATION: f32 = 0.5;
    /// Maximum number of trail points to store
    pub const TRAIL_LENGTH: usize = 64;
}

/// Normalize a yaw difference into (-180, 180]
///
/// Yaw wraps, so every comparison between two yaw values must go through
/// this to take the short way around.
#[inline]
pub fn normalize_yaw_delta(delta: f32) -> f32 {
    let mut d = delta.rem_euclid(360.0);
    if d > 180.0 {
        d -= 360.0;
    }
    d
}

/// Wrap an absolute yaw into [0, 360)
#[inline]
pub fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = yaw.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Angular delta `to - from` as (yaw, pitch), yaw taking the short way around
#[inline]
pub fn angular_delta(from: Vec2, to: Vec2) -> Vec2 {
    Vec2::new(normalize_yaw_delta(to.x - from.x), to.y - from.y)
}

/// Angular distance in degrees between two (yaw, pitch) positions
#[inline]
pub fn angular_distance(a: Vec2, b: Vec2) -> f32 {
    angular_delta(a, b).length()
}
