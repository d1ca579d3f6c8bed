//! Virtual FPS camera
//!
//! Integrates raw pointer deltas into yaw/pitch and projects angular
//! positions onto the flat canvas with a fixed-FOV pinhole approximation.
//! Positions are `Vec2(yaw, pitch)` in degrees throughout the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_PITCH;
use crate::sensitivity::SensitivityModel;
use crate::settings::{ViewMode, ViewSettings};
use crate::{angular_delta, wrap_yaw};

/// Camera orientation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraState {
    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.yaw, self.pitch)
    }
}

/// Screen geometry for the angular projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub width: f32,
    pub height: f32,
    /// Horizontal field of view (degrees)
    pub fov: f32,
}

impl Projection {
    pub fn from_settings(view: &ViewSettings) -> Self {
        Self {
            width: view.screen_width,
            height: view.screen_height,
            fov: view.fov,
        }
    }

    #[inline]
    pub fn pixels_per_degree(&self) -> f32 {
        self.width / self.fov
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Half of the visible angular extent (yaw, pitch)
    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.width, self.height) / self.pixels_per_degree() / 2.0
    }
}

/// The player's camera
#[derive(Debug, Clone)]
pub struct Camera {
    pub state: CameraState,
    sensitivity: SensitivityModel,
    projection: Projection,
    view_mode: ViewMode,
}

impl Camera {
    pub fn new(sensitivity: SensitivityModel, view: &ViewSettings) -> Self {
        Self {
            state: CameraState::default(),
            sensitivity,
            projection: Projection::from_settings(view),
            view_mode: view.view_mode,
        }
    }

    /// Adopt new screen geometry, FOV or view mode, keeping the orientation
    /// inside the new limits
    pub fn set_view(&mut self, view: &ViewSettings) {
        self.projection = Projection::from_settings(view);
        self.view_mode = view.view_mode;
        self.constrain();
    }

    /// Swap in recomputed sensitivity (settings changed mid-session)
    pub fn set_sensitivity(&mut self, sensitivity: SensitivityModel) {
        self.sensitivity = sensitivity;
    }

    #[inline]
    pub fn sensitivity(&self) -> &SensitivityModel {
        &self.sensitivity
    }

    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    #[inline]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Current (yaw, pitch)
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.state.as_vec2()
    }

    /// Re-centre the view
    pub fn reset(&mut self) {
        self.state = CameraState::default();
    }

    /// Pitch limit for the current view mode
    pub fn pitch_limit(&self) -> f32 {
        match self.view_mode {
            ViewMode::FreeLook => MAX_PITCH,
            ViewMode::Room => self.projection.half_extent().y.min(MAX_PITCH),
        }
    }

    /// Integrate a raw pointer delta (device counts)
    ///
    /// Positive screen Y is downward while pitch-up is positive, hence the
    /// subtraction.
    pub fn update(&mut self, dx: f32, dy: f32) {
        let (yaw_change, pitch_change) = self.sensitivity.degrees_for_counts(dx, dy);
        self.state.yaw += yaw_change;
        self.state.pitch -= pitch_change;
        self.constrain();
    }

    /// Clamp pitch and wrap or clamp yaw for the current view mode
    fn constrain(&mut self) {
        let max_pitch = self.pitch_limit();
        self.state.pitch = self.state.pitch.clamp(-max_pitch, max_pitch);
        self.state.yaw = match self.view_mode {
            ViewMode::FreeLook => wrap_yaw(self.state.yaw),
            ViewMode::Room => {
                let max_yaw = self.projection.half_extent().x;
                self.state.yaw.clamp(-max_yaw, max_yaw)
            }
        };
    }

    /// Angular offset from the crosshair to `target` (yaw normalized)
    #[inline]
    pub fn delta_to(&self, target: Vec2) -> Vec2 {
        angular_delta(self.position(), target)
    }

    /// Angular distance from the crosshair to `target`
    #[inline]
    pub fn distance_to(&self, target: Vec2) -> f32 {
        self.delta_to(target).length()
    }

    /// World (yaw, pitch) to screen pixels
    pub fn project(&self, target: Vec2) -> Vec2 {
        let delta = self.delta_to(target);
        let ppd = self.projection.pixels_per_degree();
        let center = self.projection.center();
        Vec2::new(center.x + delta.x * ppd, center.y - delta.y * ppd)
    }

    /// Screen pixels to world (yaw, pitch), inverse of [`Camera::project`]
    pub fn unproject(&self, screen: Vec2) -> Vec2 {
        let ppd = self.projection.pixels_per_degree();
        let center = self.projection.center();
        let yaw = self.state.yaw + (screen.x - center.x) / ppd;
        let pitch = self.state.pitch - (screen.y - center.y) / ppd;
        Vec2::new(self.normalize_world_yaw(yaw), pitch)
    }

    /// Bring a world yaw into the camera's yaw convention
    #[inline]
    pub fn normalize_world_yaw(&self, yaw: f32) -> f32 {
        match self.view_mode {
            ViewMode::FreeLook => wrap_yaw(yaw),
            ViewMode::Room => yaw,
        }
    }

    /// Centre of the region new targets spawn around
    pub fn spawn_center(&self) -> Vec2 {
        match self.view_mode {
            ViewMode::FreeLook => self.position(),
            ViewMode::Room => Vec2::ZERO,
        }
    }
}
