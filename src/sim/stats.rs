//! Running session statistics
//!
//! Hit/miss counting and reaction times sit next to the analysis-derived
//! collections so a reset clears everything together.

use serde::Serialize;

use super::analysis::{ApproachAnalysis, Diagnosis, ShotClass, diagnose};
use super::path::AxisEfficiency;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub hits: u32,
    pub misses: u32,
    /// Seconds from target appearance to hit
    pub reaction_times: Vec<f32>,
    pub path_efficiencies: Vec<f32>,
    pub x_efficiencies: Vec<f32>,
    pub y_efficiencies: Vec<f32>,
    pub hit_precisions: Vec<f32>,
    pub x_reversals: Vec<u32>,
    pub y_reversals: Vec<u32>,
    pub x_micro_adjustments: Vec<u32>,
    pub y_micro_adjustments: Vec<u32>,
    pub x_overshoots: Vec<f32>,
    pub y_overshoots: Vec<f32>,
    pub shot_classes: Vec<ShotClass>,
    /// Tracking targets drained to zero
    pub targets_destroyed: u32,
    /// Seconds the crosshair spent on tracking targets
    pub time_on_target: f32,
}

/// Averages for the HUD and the end-of-session log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub hits: u32,
    pub misses: u32,
    pub accuracy: Option<f32>,
    pub avg_reaction_ms: Option<f32>,
    pub avg_efficiency: Option<f32>,
    pub avg_x_efficiency: Option<f32>,
    pub avg_y_efficiency: Option<f32>,
    pub avg_precision: Option<f32>,
    pub targets_destroyed: u32,
    pub time_on_target: f32,
    pub diagnosis: Diagnosis,
}

/// Mean of a collection, `None` when empty
pub fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

impl SessionStats {
    /// Clear everything; calling twice is the same as once
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_hit(&mut self, reaction_time: f32) {
        self.hits += 1;
        self.reaction_times.push(reaction_time);
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_efficiency(&mut self, overall: Option<f32>, axes: AxisEfficiency) {
        if let Some(eff) = overall {
            self.path_efficiencies.push(eff);
        }
        if let Some(x) = axes.x {
            self.x_efficiencies.push(x);
        }
        if let Some(y) = axes.y {
            self.y_efficiencies.push(y);
        }
    }

    pub fn record_approach(&mut self, analysis: &ApproachAnalysis) {
        self.x_reversals.push(analysis.x_reversals);
        self.y_reversals.push(analysis.y_reversals);
        self.x_micro_adjustments.push(analysis.x_micro_adjustments);
        self.y_micro_adjustments.push(analysis.y_micro_adjustments);
        self.x_overshoots.push(analysis.x_max_overshoot);
        self.y_overshoots.push(analysis.y_max_overshoot);
        self.shot_classes.push(analysis.classify());
    }

    /// Hits over shots, as a percentage
    pub fn accuracy(&self) -> Option<f32> {
        let shots = self.hits + self.misses;
        (shots > 0).then(|| self.hits as f32 / shots as f32 * 100.0)
    }

    pub fn diagnosis(&self) -> Diagnosis {
        diagnose(
            &self.x_reversals,
            &self.y_reversals,
            &self.x_micro_adjustments,
            &self.y_micro_adjustments,
        )
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            hits: self.hits,
            misses: self.misses,
            accuracy: self.accuracy(),
            avg_reaction_ms: mean(&self.reaction_times).map(|secs| secs * 1000.0),
            avg_efficiency: mean(&self.path_efficiencies),
            avg_x_efficiency: mean(&self.x_efficiencies),
            avg_y_efficiency: mean(&self.y_efficiencies),
            avg_precision: mean(&self.hit_precisions),
            targets_destroyed: self.targets_destroyed,
            time_on_target: self.time_on_target,
            diagnosis: self.diagnosis(),
        }
    }
}
