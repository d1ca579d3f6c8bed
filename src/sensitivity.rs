//! Mouse sensitivity model
//!
//! Converts device DPI plus a "cm per 360°" figure (or the percentage
//! convention where `percent * cm_per_360 ≈ 164.6`) into the number of
//! pointer counts needed to turn the camera one degree. Horizontal and
//! vertical axes are independent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a user-supplied sensitivity value was rejected
#[derive(Debug, Error, PartialEq)]
pub enum SensitivityError {
    #[error("could not parse sensitivity value {0:?}")]
    Unparseable(String),
    #[error("sensitivity must be finite and positive, got {0}")]
    OutOfRange(f32),
}

/// Named percentage presets offered by the settings menu
pub const SENSITIVITY_PRESETS: &[(&str, f32)] = &[
    ("Very Low", 3.0),
    ("Low", 4.2),
    ("Default", DEFAULT_SENSITIVITY_PCT),
    ("High", 7.0),
    ("Very High", 9.0),
];

/// A sensitivity figure in one of the two supported conventions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SensitivityValue {
    /// Percentage convention, clamped to [1, 20]
    Percent(f32),
    /// Centimetres of mouse travel for a full turn
    CmPer360(f32),
}

impl SensitivityValue {
    /// Resolve to cm per 360°
    pub fn cm_per_360(&self) -> f32 {
        match *self {
            SensitivityValue::Percent(pct) => cm_per_360_from_percent(pct),
            SensitivityValue::CmPer360(cm) if cm.is_finite() && cm > 0.0 => cm,
            SensitivityValue::CmPer360(cm) => {
                log::warn!("Invalid cm/360 {cm}, using default sensitivity");
                cm_per_360_from_percent(DEFAULT_SENSITIVITY_PCT)
            }
        }
    }

    /// Resolve to the percentage convention
    pub fn percent(&self) -> f32 {
        match *self {
            SensitivityValue::Percent(pct) => clamp_percent(pct),
            SensitivityValue::CmPer360(_) => percent_from_cm_per_360(self.cm_per_360()),
        }
    }
}

/// How the vertical axis derives its sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VerticalSensitivity {
    /// Mirror the horizontal figure
    SameAsHorizontal,
    /// Horizontal percentage plus this offset (percentage points)
    Offset(f32),
    /// Explicit value
    Explicit(SensitivityValue),
}

/// User-facing sensitivity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivitySettings {
    pub h_dpi: f32,
    pub v_dpi: f32,
    pub horizontal: SensitivityValue,
    pub vertical: VerticalSensitivity,
}

impl Default for SensitivitySettings {
    fn default() -> Self {
        Self {
            h_dpi: 1000.0,
            v_dpi: 1250.0,
            horizontal: SensitivityValue::CmPer360(29.39),
            vertical: VerticalSensitivity::Explicit(SensitivityValue::CmPer360(18.81)),
        }
    }
}

impl SensitivitySettings {
    /// Select a named percentage preset for the horizontal axis
    ///
    /// Returns false (settings untouched) for an unknown name.
    pub fn select_preset(&mut self, name: &str) -> bool {
        match SENSITIVITY_PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        {
            Some(&(_, pct)) => {
                self.horizontal = SensitivityValue::Percent(pct);
                true
            }
            None => false,
        }
    }

    /// Apply a typed-in horizontal percentage, falling back to the default
    ///
    /// Returns the value actually applied so the UI can show the corrected text.
    pub fn set_custom_percent(&mut self, text: &str) -> f32 {
        let pct = parse_percent_or_default(text);
        self.horizontal = SensitivityValue::Percent(pct);
        pct
    }

    /// Toggle the linked vertical offset on or off
    pub fn set_vertical_offset(&mut self, offset: Option<f32>) {
        self.vertical = match offset {
            Some(offset) if offset.is_finite() => VerticalSensitivity::Offset(offset),
            _ => VerticalSensitivity::SameAsHorizontal,
        };
    }

    /// Effective horizontal cm per 360°
    pub fn horizontal_cm_per_360(&self) -> f32 {
        self.horizontal.cm_per_360()
    }

    /// Effective vertical cm per 360°
    pub fn vertical_cm_per_360(&self) -> f32 {
        match self.vertical {
            VerticalSensitivity::SameAsHorizontal => self.horizontal.cm_per_360(),
            VerticalSensitivity::Offset(offset) => {
                cm_per_360_from_percent(self.horizontal.percent() + offset)
            }
            VerticalSensitivity::Explicit(value) => value.cm_per_360(),
        }
    }
}

/// Clamp a percentage into the supported [1, 20] range
#[inline]
pub fn clamp_percent(pct: f32) -> f32 {
    if !pct.is_finite() {
        return DEFAULT_SENSITIVITY_PCT;
    }
    pct.clamp(MIN_SENSITIVITY_PCT, MAX_SENSITIVITY_PCT)
}

/// cm per 360° for a sensitivity percentage
#[inline]
pub fn cm_per_360_from_percent(pct: f32) -> f32 {
    PERCENT_CM360_PRODUCT / clamp_percent(pct)
}

/// Percentage for a cm per 360° figure
#[inline]
pub fn percent_from_cm_per_360(cm: f32) -> f32 {
    clamp_percent(PERCENT_CM360_PRODUCT / cm)
}

/// Pointer counts required to rotate the camera one degree
#[inline]
pub fn counts_per_degree(dpi: f32, cm_per_360: f32) -> f32 {
    (cm_per_360 / CM_PER_INCH * dpi) / 360.0
}

/// Parse a sensitivity percentage typed by the user
pub fn parse_percent(text: &str) -> Result<f32, SensitivityError> {
    let trimmed = text.trim().trim_end_matches('%').trim();
    let value: f32 = trimmed
        .parse()
        .map_err(|_| SensitivityError::Unparseable(text.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(SensitivityError::OutOfRange(value));
    }
    Ok(clamp_percent(value))
}

/// Parse a percentage, falling back to the default on bad input
pub fn parse_percent_or_default(text: &str) -> f32 {
    match parse_percent(text) {
        Ok(pct) => pct,
        Err(err) => {
            log::warn!("{err}; using {DEFAULT_SENSITIVITY_PCT}%");
            DEFAULT_SENSITIVITY_PCT
        }
    }
}

fn sanitize_dpi(dpi: f32) -> f32 {
    if dpi.is_finite() && dpi > 0.0 {
        dpi
    } else {
        log::warn!("Invalid DPI {dpi}, using {DEFAULT_DPI}");
        DEFAULT_DPI
    }
}

/// Derived per-axis conversion factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityModel {
    h_counts_per_degree: f32,
    v_counts_per_degree: f32,
}

impl Default for SensitivityModel {
    fn default() -> Self {
        Self::from_settings(&SensitivitySettings::default())
    }
}

impl SensitivityModel {
    pub fn from_settings(settings: &SensitivitySettings) -> Self {
        let mut model = Self {
            h_counts_per_degree: 1.0,
            v_counts_per_degree: 1.0,
        };
        model.recompute(settings);
        model
    }

    /// Recompute both factors from the current settings
    pub fn recompute(&mut self, settings: &SensitivitySettings) {
        self.h_counts_per_degree = counts_per_degree(
            sanitize_dpi(settings.h_dpi),
            settings.horizontal_cm_per_360(),
        );
        self.v_counts_per_degree = counts_per_degree(
            sanitize_dpi(settings.v_dpi),
            settings.vertical_cm_per_360(),
        );
    }

    #[inline]
    pub fn h_counts_per_degree(&self) -> f32 {
        self.h_counts_per_degree
    }

    #[inline]
    pub fn v_counts_per_degree(&self) -> f32 {
        self.v_counts_per_degree
    }

    /// Degrees of rotation produced by a pointer delta
    #[inline]
    pub fn degrees_for_counts(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx / self.h_counts_per_degree, dy / self.v_counts_per_degree)
    }
}
