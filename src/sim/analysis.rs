//! Final-approach analysis and sensitivity diagnosis
//!
//! Overshoot is scanned over the whole path because it can happen early or
//! late. Pulses and reversals only matter near arrival, so they are counted
//! inside the trailing `approach_window` of the path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_yaw_delta;
use crate::settings::HitboxShape;

/// Paths shorter than this have no approach to analyze
pub const MIN_APPROACH_POINTS: usize = 5;
/// Per-sample movement (degrees) below which an axis counts as paused
pub const PAUSE_THRESHOLD: f32 = 0.01;
/// Per-sample movement (degrees) above which an axis counts as moving again
pub const MOVE_THRESHOLD: f32 = 0.02;
/// Smallest per-sample delta that carries a direction for reversal counting
pub const NONZERO_STEP: f32 = 1e-5;
/// Average reversals per shot above this means overshooting
pub const REVERSAL_THRESHOLD: f32 = 0.5;
/// Average micro-adjustments per shot above this means undershooting
pub const MICRO_ADJUSTMENT_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    fn component(&self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Signed offset `to - from` along this axis
    fn offset(&self, from: Vec2, to: Vec2) -> f32 {
        match self {
            Axis::X => normalize_yaw_delta(to.x - from.x),
            Axis::Y => to.y - from.y,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "horizontal",
            Axis::Y => "vertical",
        }
    }
}

/// Per-axis result of the approach scan
#[derive(Debug, Clone, Default, PartialEq)]
struct AxisApproach {
    reversals: u32,
    pulses: u32,
    max_overshoot: f32,
    overshoot_point: Option<Vec2>,
    reversal_points: Vec<Vec2>,
    pause_points: Vec<Vec2>,
}

/// Final-approach metrics for one shot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApproachAnalysis {
    pub x_reversals: u32,
    pub y_reversals: u32,
    pub x_micro_adjustments: u32,
    pub y_micro_adjustments: u32,
    /// Degrees past the far edge
    pub x_max_overshoot: f32,
    pub y_max_overshoot: f32,
    pub x_overshoot_point: Option<Vec2>,
    pub y_overshoot_point: Option<Vec2>,
    /// Where direction flipped inside the window
    pub reversal_points: Vec<Vec2>,
    /// Where motion stopped before arrival inside the window
    pub pause_points: Vec<Vec2>,
}

impl ApproachAnalysis {
    pub fn classify(&self) -> ShotClass {
        ShotClass::from_counts(
            self.x_reversals.max(self.y_reversals) as f32,
            self.x_micro_adjustments.max(self.y_micro_adjustments) as f32,
        )
    }
}

fn scan_axis(
    points: &[Vec2],
    target: Vec2,
    half_size: f32,
    window_start: usize,
    axis: Axis,
) -> AxisApproach {
    let mut result = AxisApproach::default();
    // Offsets of every point from the target centre along this axis
    let rel: Vec<f32> = points.iter().map(|&p| axis.offset(target, p)).collect();

    // Direction of travel from the first point toward the target
    let dir = if rel[0] > 0.0 {
        -1.0
    } else if rel[0] < 0.0 {
        1.0
    } else {
        0.0
    };

    // Overshoot past the far edge, anywhere along the path
    if dir != 0.0 {
        for (i, &r) in rel.iter().enumerate() {
            let past = dir * r - half_size;
            if past > result.max_overshoot {
                result.max_overshoot = past;
                result.overshoot_point = Some(points[i]);
            }
        }
    }

    // Near edge reached: within or beyond the target's extent on this axis
    let reached = |r: f32| dir == 0.0 || dir * r + half_size >= 0.0;
    let mut arrived = rel[..=window_start].iter().any(|&r| reached(r));
    let mut moving = false;
    let mut last_sign: Option<f32> = None;

    for i in (window_start + 1)..points.len() {
        let step = axis.offset(points[i - 1], points[i]);
        let speed = step.abs();

        if moving && speed < PAUSE_THRESHOLD {
            moving = false;
            if !arrived {
                result.pause_points.push(points[i - 1]);
            }
        } else if !moving && speed > MOVE_THRESHOLD {
            moving = true;
            if !arrived {
                result.pulses += 1;
            }
        }

        if speed > NONZERO_STEP {
            let sign = step.signum();
            if last_sign.is_some_and(|last| last != sign) {
                result.reversals += 1;
                result.reversal_points.push(points[i - 1]);
            }
            last_sign = Some(sign);
        }

        if reached(rel[i]) {
            arrived = true;
        }
    }

    log::trace!(
        "{} approach: dir={dir} pulses={} reversals={} overshoot={:.3} (target {:.2})",
        axis.as_str(),
        result.pulses,
        result.reversals,
        result.max_overshoot,
        axis.component(target)
    );
    result
}

/// Analyze the final approach of `points` onto a target
///
/// Returns `None` without a reference hit or with fewer than
/// [`MIN_APPROACH_POINTS`] samples; callers skip recording in that case.
pub fn analyze_final_approach(
    points: &[Vec2],
    reference: Option<Vec2>,
    target: Vec2,
    half_size: f32,
    approach_window: f32,
) -> Option<ApproachAnalysis> {
    reference?;
    if points.len() < MIN_APPROACH_POINTS {
        return None;
    }

    let n = points.len();
    let window = approach_window.clamp(0.0, 1.0);
    let window_start = ((n as f32 * (1.0 - window)).floor() as usize).min(n - 2);

    let x = scan_axis(points, target, half_size, window_start, Axis::X);
    let y = scan_axis(points, target, half_size, window_start, Axis::Y);

    let mut reversal_points = x.reversal_points;
    reversal_points.extend(y.reversal_points);
    let mut pause_points = x.pause_points;
    pause_points.extend(y.pause_points);

    Some(ApproachAnalysis {
        x_reversals: x.reversals,
        y_reversals: y.reversals,
        // The initial approach is one expected pulse
        x_micro_adjustments: x.pulses.saturating_sub(1),
        y_micro_adjustments: y.pulses.saturating_sub(1),
        x_max_overshoot: x.max_overshoot,
        y_max_overshoot: y.max_overshoot,
        x_overshoot_point: x.overshoot_point,
        y_overshoot_point: y.overshoot_point,
        reversal_points,
        pause_points,
    })
}

/// Where inside the hitbox the shot landed: 100 at the centre, 0 on the edge
pub fn hit_precision(hitbox: HitboxShape, delta: Vec2, half_size: f32) -> f32 {
    ((1.0 - hitbox.distance_ratio(delta, half_size)) * 100.0).clamp(0.0, 100.0)
}

/// Per-shot label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotClass {
    Good,
    Over,
    Under,
    Both,
}

impl ShotClass {
    pub fn from_counts(reversals: f32, micro_adjustments: f32) -> Self {
        match (
            reversals > REVERSAL_THRESHOLD,
            micro_adjustments > MICRO_ADJUSTMENT_THRESHOLD,
        ) {
            (true, true) => ShotClass::Both,
            (true, false) => ShotClass::Over,
            (false, true) => ShotClass::Under,
            (false, false) => ShotClass::Good,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShotClass::Good => "good",
            ShotClass::Over => "OVER",
            ShotClass::Under => "UNDER",
            ShotClass::Both => "BOTH",
        }
    }
}

/// Session-level verdict for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisVerdict {
    NoData,
    Good,
    /// Corrections after passing the target: sensitivity too high
    Overshooting,
    /// Stop-and-go before arriving: sensitivity too low
    Undershooting,
    Inconsistent,
}

impl AxisVerdict {
    pub fn from_averages(avg_reversals: f32, avg_micro_adjustments: f32) -> Self {
        match ShotClass::from_counts(avg_reversals, avg_micro_adjustments) {
            ShotClass::Good => AxisVerdict::Good,
            ShotClass::Over => AxisVerdict::Overshooting,
            ShotClass::Under => AxisVerdict::Undershooting,
            ShotClass::Both => AxisVerdict::Inconsistent,
        }
    }

    /// One-line suggestion for the HUD
    pub fn advice(&self, axis: Axis) -> String {
        let name = axis.as_str();
        match self {
            AxisVerdict::NoData => format!("{name}: not enough data"),
            AxisVerdict::Good => format!("{name}: sensitivity looks right"),
            AxisVerdict::Overshooting => format!("{name}: overshooting, lower {name} sensitivity"),
            AxisVerdict::Undershooting => format!("{name}: undershooting, raise {name} sensitivity"),
            AxisVerdict::Inconsistent => {
                format!("{name}: inconsistent, work on control before changing {name} sensitivity")
            }
        }
    }
}

/// Session-level sensitivity diagnosis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnosis {
    pub shots: usize,
    pub x_avg_reversals: f32,
    pub y_avg_reversals: f32,
    pub x_avg_micro_adjustments: f32,
    pub y_avg_micro_adjustments: f32,
    pub x: AxisVerdict,
    pub y: AxisVerdict,
}

fn average(values: &[u32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| v as f32).sum::<f32>() / values.len() as f32
    }
}

/// Diagnose from the per-shot counts collected over a session
pub fn diagnose(
    x_reversals: &[u32],
    y_reversals: &[u32],
    x_micro_adjustments: &[u32],
    y_micro_adjustments: &[u32],
) -> Diagnosis {
    let shots = x_reversals.len();
    let x_avg_reversals = average(x_reversals);
    let y_avg_reversals = average(y_reversals);
    let x_avg_micro_adjustments = average(x_micro_adjustments);
    let y_avg_micro_adjustments = average(y_micro_adjustments);
    let verdict = |reversals, micro| {
        if shots == 0 {
            AxisVerdict::NoData
        } else {
            AxisVerdict::from_averages(reversals, micro)
        }
    };
    Diagnosis {
        shots,
        x_avg_reversals,
        y_avg_reversals,
        x_avg_micro_adjustments,
        y_avg_micro_adjustments,
        x: verdict(x_avg_reversals, x_avg_micro_adjustments),
        y: verdict(y_avg_reversals, y_avg_micro_adjustments),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(from: f32, to: f32, steps: usize) -> Vec<f32> {
        (0..=steps)
            .map(|i| from + (to - from) * i as f32 / steps as f32)
            .collect()
    }

    #[test]
    fn test_no_data_without_reference_or_points() {
        let points = vec![Vec2::ZERO; 10];
        assert!(analyze_final_approach(&points, None, Vec2::ONE, 1.0, 0.3).is_none());
        let short = vec![Vec2::ZERO; 4];
        assert!(analyze_final_approach(&short, Some(Vec2::ZERO), Vec2::ONE, 1.0, 0.3).is_none());
    }

    #[test]
    fn test_overshoot_on_moving_axis_only() {
        // Approach a target at yaw 0 (half-size 1) from the left, run 0.5 past
        // the far edge, then come back
        let mut yaws = line(-10.0, 1.5, 23);
        yaws.extend(line(1.5, 0.0, 6).into_iter().skip(1));
        let points: Vec<Vec2> = yaws.iter().map(|&x| Vec2::new(x, 0.0)).collect();

        let analysis =
            analyze_final_approach(&points, Some(points[0]), Vec2::ZERO, 1.0, 0.3).expect("data");
        assert!((analysis.x_max_overshoot - 0.5).abs() < 1e-4);
        assert_eq!(analysis.y_max_overshoot, 0.0);
        assert_eq!(analysis.x_overshoot_point, Some(Vec2::new(1.5, 0.0)));
        assert!(analysis.x_reversals >= 1);
        assert_eq!(analysis.y_reversals, 0);
        assert_eq!(analysis.classify(), ShotClass::Over);
    }

    #[test]
    fn test_overshoot_across_yaw_seam() {
        // Target at yaw 0.5, approached from 350 going right through 360
        let points: Vec<Vec2> = [350.0, 354.0, 358.0, 0.0, 1.0, 2.0, 1.0, 0.5]
            .iter()
            .map(|&x| Vec2::new(x, 0.0))
            .collect();
        let analysis =
            analyze_final_approach(&points, Some(points[0]), Vec2::new(0.5, 0.0), 1.0, 0.3)
                .expect("data");
        assert!((analysis.x_max_overshoot - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_stop_and_go_counts_micro_adjustment() {
        // Move, stop short, move again, arrive
        let mut yaws = line(-10.0, -4.0, 6);
        yaws.extend(std::iter::repeat_n(-4.0, 3));
        yaws.extend(line(-4.0, -3.0, 4).into_iter().skip(1));
        yaws.extend(std::iter::repeat_n(-3.0, 3));
        yaws.extend(line(-3.0, 0.0, 3).into_iter().skip(1));
        let points: Vec<Vec2> = yaws.iter().map(|&x| Vec2::new(x, 0.0)).collect();

        let analysis =
            analyze_final_approach(&points, Some(points[0]), Vec2::ZERO, 1.0, 0.6).expect("data");
        assert!(analysis.x_micro_adjustments >= 1);
        assert!(!analysis.pause_points.is_empty());
        assert_eq!(analysis.x_reversals, 0);
        assert_eq!(analysis.x_max_overshoot, 0.0);
    }

    #[test]
    fn test_clean_approach_is_good() {
        let points: Vec<Vec2> = line(-10.0, 0.0, 20)
            .iter()
            .map(|&x| Vec2::new(x, x * 0.5))
            .collect();
        let analysis =
            analyze_final_approach(&points, Some(points[0]), Vec2::ZERO, 1.0, 0.3).expect("data");
        assert_eq!(analysis.x_micro_adjustments, 0);
        assert_eq!(analysis.y_micro_adjustments, 0);
        assert_eq!(analysis.x_reversals, 0);
        assert_eq!(analysis.classify(), ShotClass::Good);
    }

    #[test]
    fn test_hit_precision() {
        assert_eq!(hit_precision(HitboxShape::Circle, Vec2::ZERO, 2.0), 100.0);
        assert!((hit_precision(HitboxShape::Circle, Vec2::new(1.0, 0.0), 2.0) - 50.0).abs() < 1e-4);
        assert!(
            (hit_precision(HitboxShape::Square, Vec2::new(0.5, 1.5), 2.0) - 25.0).abs() < 1e-4
        );
        assert_eq!(hit_precision(HitboxShape::Circle, Vec2::new(3.0, 0.0), 2.0), 0.0);
    }

    #[test]
    fn test_diagnosis_thresholds() {
        let d = diagnose(&[1, 1, 0], &[0, 0, 0], &[0, 0, 0], &[1, 1, 1]);
        assert_eq!(d.shots, 3);
        assert_eq!(d.x, AxisVerdict::Overshooting);
        assert_eq!(d.y, AxisVerdict::Undershooting);

        let d = diagnose(&[1], &[0], &[1], &[0]);
        assert_eq!(d.x, AxisVerdict::Inconsistent);
        assert_eq!(d.y, AxisVerdict::Good);

        let d = diagnose(&[], &[], &[], &[]);
        assert_eq!(d.x, AxisVerdict::NoData);
        assert!(d.x.advice(Axis::X).contains("not enough"));
    }

    #[test]
    fn test_shot_class() {
        assert_eq!(ShotClass::from_counts(1.0, 0.0), ShotClass::Over);
        assert_eq!(ShotClass::from_counts(0.0, 1.0), ShotClass::Under);
        assert_eq!(ShotClass::from_counts(2.0, 2.0), ShotClass::Both);
        assert_eq!(ShotClass::from_counts(0.5, 0.8), ShotClass::Good);
    }
}
