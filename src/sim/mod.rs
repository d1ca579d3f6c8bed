//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (targets kept in spawn order)
//! - No rendering, audio or platform dependencies

pub mod analysis;
pub mod camera;
pub mod field;
pub mod path;
pub mod shapes;
pub mod state;
pub mod stats;
pub mod target;
pub mod tick;

pub use analysis::{
    ApproachAnalysis, AxisVerdict, Diagnosis, ShotClass, analyze_final_approach, diagnose,
    hit_precision,
};
pub use camera::{Camera, CameraState, Projection};
pub use field::{FieldEvent, GameMode, HitInfo, ShotOutcome, TargetField, TargetMode};
pub use path::{AxisEfficiency, PathPhase, PathTracker, axis_efficiency, path_efficiency};
pub use shapes::ShapeKind;
pub use state::{FinishReason, GameEvent, GamePhase, LastShot, SessionState, TrailPoint};
pub use stats::{SessionStats, SessionSummary};
pub use target::{TargetStyle, TargetView};
pub use tick::{FocusChange, TickInput, tick};
