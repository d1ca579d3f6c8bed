//! Game settings and presets
//!
//! Every tunable the session reads at runtime lives here. Settings load from a
//! JSON file for the native binary; a missing or broken file falls back to
//! defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sensitivity::SensitivitySettings;

/// Settings file failures (recovered by [`Settings::load_or_default`])
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Whether the camera spins freely or is confined to the visible "room"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Yaw wraps mod 360, pitch clamped to ±89°
    #[default]
    FreeLook,
    /// Yaw and pitch clamped to the screen-derived half-ranges
    Room,
}

/// Hitbox used for hit testing and precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitboxShape {
    /// Angular distance ≤ half-size
    #[default]
    Circle,
    /// Per-axis |delta| ≤ half-size
    Square,
}

/// Random-mode variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetPreset {
    /// Three shrinking round targets
    #[default]
    Classic,
    /// Five small shrinking square targets
    Precision,
    /// Three targets that grow with age
    Growing,
}

impl TargetPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetPreset::Classic => "Classic",
            TargetPreset::Precision => "Precision",
            TargetPreset::Growing => "Growing",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(TargetPreset::Classic),
            "precision" | "prec" => Some(TargetPreset::Precision),
            "growing" | "grow" => Some(TargetPreset::Growing),
            _ => None,
        }
    }

    /// Random-mode settings for this preset
    pub fn random_settings(&self) -> RandomSettings {
        match self {
            TargetPreset::Classic => RandomSettings::default(),
            TargetPreset::Precision => RandomSettings {
                concurrent_targets: 5,
                start_size: 2.0,
                end_size: 0.6,
                hitbox: HitboxShape::Square,
                ..RandomSettings::default()
            },
            TargetPreset::Growing => RandomSettings {
                start_size: 0.8,
                end_size: 2.5,
                ..RandomSettings::default()
            },
        }
    }
}

/// Screen and camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Horizontal field of view (degrees)
    pub fov: f32,
    pub view_mode: ViewMode,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            fov: DEFAULT_FOV,
            view_mode: ViewMode::FreeLook,
        }
    }
}

/// Random-mode targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSettings {
    pub concurrent_targets: usize,
    /// Seconds before an unhit target expires as a miss
    pub lifetime: f32,
    /// Angular half-size at spawn (degrees)
    pub start_size: f32,
    /// Angular half-size at expiry (degrees)
    pub end_size: f32,
    pub hitbox: HitboxShape,
    /// Fraction of the visible region new targets may spawn in
    pub safe_fraction: f32,
}

impl Default for RandomSettings {
    fn default() -> Self {
        Self {
            concurrent_targets: 3,
            lifetime: 3.0,
            start_size: 2.5,
            end_size: 0.8,
            hitbox: HitboxShape::Circle,
            safe_fraction: 0.8,
        }
    }
}

/// Tracking-mode targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSettings {
    /// Round length (seconds)
    pub duration: f32,
    pub target_count: usize,
    /// Angular half-size (degrees)
    pub target_size: f32,
    pub max_health: f32,
    /// Health drained per second on target
    pub drain_rate: f32,
    /// Speed band (degrees per second)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Max angular offset from the view before a target bounces (yaw, pitch)
    pub bounds: Vec2,
    /// Expected spontaneous direction changes per second
    pub direction_change_rate: f32,
    pub safe_fraction: f32,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            duration: 60.0,
            target_count: 1,
            target_size: 2.0,
            max_health: 100.0,
            drain_rate: 50.0,
            min_speed: 8.0,
            max_speed: 20.0,
            bounds: Vec2::new(30.0, 15.0),
            direction_change_rate: 0.5,
            safe_fraction: 0.5,
        }
    }
}

/// Shape-mode targets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    /// Shapes per session
    pub shape_count: usize,
    /// Vertex target half-size (degrees)
    pub target_size: f32,
    /// Shape radius range on screen (pixels)
    pub min_scale_px: f32,
    pub max_scale_px: f32,
    pub hitbox: HitboxShape,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            shape_count: 5,
            target_size: 1.5,
            min_scale_px: 120.0,
            max_scale_px: 300.0,
            hitbox: HitboxShape::Circle,
        }
    }
}

/// Debug-mode target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub target_size: f32,
    pub hitbox: HitboxShape,
    pub safe_fraction: f32,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            target_size: 1.5,
            hitbox: HitboxShape::Square,
            safe_fraction: 0.8,
        }
    }
}

/// Path analysis tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Trailing fraction of the path examined for pulses and reversals
    pub approach_window: f32,
    /// Seconds between path samples
    pub sample_interval: f32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            approach_window: 0.3,
            sample_interval: PATH_SAMPLE_INTERVAL,
        }
    }
}

/// Audio preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            muted: false,
        }
    }
}

/// Spawn-region fraction in [0.05, 1], `default` when not a number
fn sanitize_fraction(name: &str, value: f32, default: f32) -> f32 {
    if value.is_nan() {
        log::warn!("{name} is NaN, using {default}");
        return default;
    }
    let clamped = value.clamp(0.05, 1.0);
    if clamped != value {
        log::warn!("{name} {value} out of range, using {clamped}");
    }
    clamped
}

/// Finite non-negative value, `default` otherwise
fn non_negative(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{name} {value} invalid, using {default}");
        default
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sensitivity: SensitivitySettings,
    pub view: ViewSettings,
    pub preset: TargetPreset,
    pub random: RandomSettings,
    pub tracking: TrackingSettings,
    pub shapes: ShapeSettings,
    pub debug: DebugSettings,
    pub analysis: AnalysisSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Create settings from a target preset
    pub fn from_preset(preset: TargetPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a target preset (replaces the random-mode settings)
    pub fn apply_preset(&mut self, preset: TargetPreset) {
        self.preset = preset;
        self.random = preset.random_settings();
    }

    /// Clamp out-of-range values back into something playable
    pub fn sanitize(&mut self) {
        if !(self.analysis.approach_window > 0.0 && self.analysis.approach_window <= 1.0) {
            log::warn!(
                "approach_window {} out of range, using 0.3",
                self.analysis.approach_window
            );
            self.analysis.approach_window = 0.3;
        }
        if !(self.analysis.sample_interval > 0.0) {
            self.analysis.sample_interval = PATH_SAMPLE_INTERVAL;
        }
        if !(self.view.fov > 1.0 && self.view.fov < 180.0) {
            log::warn!("fov {} out of range, using {DEFAULT_FOV}", self.view.fov);
            self.view.fov = DEFAULT_FOV;
        }
        if !(self.view.screen_width > 0.0 && self.view.screen_height > 0.0) {
            let defaults = ViewSettings::default();
            self.view.screen_width = defaults.screen_width;
            self.view.screen_height = defaults.screen_height;
        }
        self.random.concurrent_targets = self.random.concurrent_targets.max(1);
        if !(self.random.lifetime > 0.0) {
            self.random.lifetime = RandomSettings::default().lifetime;
        }
        self.random.safe_fraction = sanitize_fraction(
            "random.safe_fraction",
            self.random.safe_fraction,
            RandomSettings::default().safe_fraction,
        );
        self.tracking.safe_fraction = sanitize_fraction(
            "tracking.safe_fraction",
            self.tracking.safe_fraction,
            TrackingSettings::default().safe_fraction,
        );
        self.debug.safe_fraction = sanitize_fraction(
            "debug.safe_fraction",
            self.debug.safe_fraction,
            DebugSettings::default().safe_fraction,
        );

        self.tracking.target_count = self.tracking.target_count.max(1);
        let tracking_defaults = TrackingSettings::default();
        self.tracking.min_speed = non_negative(
            "tracking.min_speed",
            self.tracking.min_speed,
            tracking_defaults.min_speed,
        );
        self.tracking.max_speed = non_negative(
            "tracking.max_speed",
            self.tracking.max_speed,
            tracking_defaults.max_speed,
        );
        if self.tracking.max_speed < self.tracking.min_speed {
            std::mem::swap(&mut self.tracking.min_speed, &mut self.tracking.max_speed);
        }

        self.shapes.shape_count = self.shapes.shape_count.max(1);
        let shape_defaults = ShapeSettings::default();
        if !(self.shapes.min_scale_px.is_finite() && self.shapes.min_scale_px > 0.0) {
            log::warn!(
                "shapes.min_scale_px {} invalid, using {}",
                self.shapes.min_scale_px,
                shape_defaults.min_scale_px
            );
            self.shapes.min_scale_px = shape_defaults.min_scale_px;
        }
        if !(self.shapes.max_scale_px.is_finite() && self.shapes.max_scale_px > 0.0) {
            log::warn!(
                "shapes.max_scale_px {} invalid, using {}",
                self.shapes.max_scale_px,
                shape_defaults.max_scale_px
            );
            self.shapes.max_scale_px = shape_defaults.max_scale_px;
        }
        if self.shapes.max_scale_px < self.shapes.min_scale_px {
            std::mem::swap(&mut self.shapes.min_scale_px, &mut self.shapes.max_scale_px);
        }
        self.audio.master_volume = self.audio.master_volume.clamp(0.0, 1.0);
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
