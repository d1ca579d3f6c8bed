//! Camera path recording between hits
//!
//! The tracker is idle until the first hit gives it a reference position.
//! From then on it samples the camera every `sample_interval` seconds while
//! the pointer is locked. A hit analyzes the path and restarts it from the
//! hit position; a miss restarts the path but keeps the reference.

use glam::Vec2;

use crate::{angular_delta, angular_distance, normalize_yaw_delta};

/// Shortest direct distance (degrees) worth scoring for efficiency
pub const MIN_DIRECT_DISTANCE: f32 = 0.1;
/// Shortest per-axis displacement (degrees) worth scoring for axis efficiency
pub const MIN_AXIS_MOVEMENT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPhase {
    /// No reference hit yet
    Idle,
    /// Recording since the reference hit
    Accumulating,
}

#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    reference: Option<Vec2>,
    points: Vec<Vec2>,
    last_sample: f32,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PathPhase {
        if self.reference.is_some() {
            PathPhase::Accumulating
        } else {
            PathPhase::Idle
        }
    }

    /// Camera position at the last hit
    #[inline]
    pub fn reference(&self) -> Option<Vec2> {
        self.reference
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Append `pos` if a reference exists and the sample interval has passed
    pub fn sample(&mut self, now: f32, pos: Vec2, interval: f32) -> bool {
        if self.reference.is_none() || now - self.last_sample < interval {
            return false;
        }
        self.points.push(pos);
        self.last_sample = now;
        true
    }

    /// Append the exact shot position so the path ends where the click landed
    pub fn push_final(&mut self, pos: Vec2) {
        if self.reference.is_some() && self.points.last() != Some(&pos) {
            self.points.push(pos);
        }
    }

    /// Start a new interval from a hit
    pub fn on_hit(&mut self, pos: Vec2, now: f32) {
        self.reference = Some(pos);
        self.points.clear();
        self.points.push(pos);
        self.last_sample = now;
    }

    /// Restart the path from the current position, keeping the reference
    pub fn on_miss(&mut self, pos: Vec2, now: f32) {
        self.points.clear();
        if self.reference.is_some() {
            self.points.push(pos);
        }
        self.last_sample = now;
    }

    /// Back to idle (new session)
    pub fn reset(&mut self) {
        self.reference = None;
        self.points.clear();
        self.last_sample = 0.0;
    }
}

/// Summed angular length of the path, yaw taking the short way each segment
pub fn path_length(points: &[Vec2]) -> f32 {
    points
        .windows(2)
        .map(|pair| angular_distance(pair[0], pair[1]))
        .sum()
}

/// Direct distance over travelled distance, as a percentage capped at 100
///
/// `None` with fewer than two points, a direct distance under
/// [`MIN_DIRECT_DISTANCE`], or no movement at all.
pub fn path_efficiency(reference: Vec2, points: &[Vec2], target: Vec2) -> Option<f32> {
    if points.len() < 2 {
        return None;
    }
    let direct = angular_distance(reference, target);
    if direct < MIN_DIRECT_DISTANCE {
        return None;
    }
    let actual = path_length(points);
    if actual <= 0.0 {
        return None;
    }
    Some((direct / actual * 100.0).min(100.0))
}

/// Per-axis efficiencies, `None` where the axis barely moved
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisEfficiency {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

fn axis_ratio(direct: f32, actual: f32) -> Option<f32> {
    if direct <= MIN_AXIS_MOVEMENT || actual <= 0.0 {
        return None;
    }
    Some((direct / actual * 100.0).min(100.0))
}

pub fn axis_efficiency(reference: Vec2, points: &[Vec2], target: Vec2) -> AxisEfficiency {
    if points.len() < 2 {
        return AxisEfficiency::default();
    }
    let direct = angular_delta(reference, target).abs();
    let (actual_x, actual_y) = points.windows(2).fold((0.0, 0.0), |(x, y), pair| {
        (
            x + normalize_yaw_delta(pair[1].x - pair[0].x).abs(),
            y + (pair[1].y - pair[0].y).abs(),
        )
    });
    AxisEfficiency {
        x: axis_ratio(direct.x, actual_x),
        y: axis_ratio(direct.y, actual_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tracker_lifecycle() {
        let mut tracker = PathTracker::new();
        assert_eq!(tracker.phase(), PathPhase::Idle);
        assert!(!tracker.sample(1.0, Vec2::ZERO, 0.01));

        tracker.on_hit(Vec2::new(5.0, 0.0), 1.0);
        assert_eq!(tracker.phase(), PathPhase::Accumulating);
        assert!(!tracker.sample(1.005, Vec2::new(5.1, 0.0), 0.01));
        assert!(tracker.sample(1.011, Vec2::new(5.2, 0.0), 0.01));
        assert_eq!(tracker.points().len(), 2);

        tracker.on_miss(Vec2::new(6.0, 0.0), 1.2);
        assert_eq!(tracker.points(), &[Vec2::new(6.0, 0.0)]);
        assert_eq!(tracker.reference(), Some(Vec2::new(5.0, 0.0)));

        tracker.reset();
        assert_eq!(tracker.phase(), PathPhase::Idle);
        assert!(tracker.points().is_empty());
    }

    #[test]
    fn test_straight_path_is_perfect() {
        let start = Vec2::new(10.0, 2.0);
        let target = Vec2::new(20.0, -3.0);
        assert_eq!(path_efficiency(start, &[start, target], target), Some(100.0));
    }

    #[test]
    fn test_doubling_back_is_worse() {
        let start = Vec2::ZERO;
        let target = Vec2::new(10.0, 0.0);
        let path = [start, Vec2::new(14.0, 0.0), target];
        let eff = path_efficiency(start, &path, target).expect("scored");
        assert!(eff < 100.0);
        assert!((eff - 10.0 / 18.0 * 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_efficiency_undefined_cases() {
        let p = Vec2::new(1.0, 1.0);
        assert_eq!(path_efficiency(p, &[p], Vec2::new(5.0, 5.0)), None);
        assert_eq!(path_efficiency(p, &[p, p], Vec2::new(1.05, 1.0)), None);
    }

    #[test]
    fn test_efficiency_across_yaw_seam() {
        let start = Vec2::new(355.0, 0.0);
        let target = Vec2::new(5.0, 0.0);
        let path = [start, Vec2::new(359.0, 0.0), Vec2::new(1.0, 0.0), target];
        let eff = path_efficiency(start, &path, target).expect("scored");
        assert!((eff - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_axis_efficiency_thresholds() {
        let start = Vec2::ZERO;
        let target = Vec2::new(10.0, 0.3);
        let path = [start, Vec2::new(12.0, 0.3), target];
        let axes = axis_efficiency(start, &path, target);
        let x = axes.x.expect("x moved enough");
        assert!((x - 10.0 / 14.0 * 100.0).abs() < 1e-3);
        assert_eq!(axes.y, None);
    }

    proptest! {
        #[test]
        fn prop_efficiency_bounded(
            steps in proptest::collection::vec((-5.0f32..5.0, -5.0f32..5.0), 1..20),
            tx in -20.0f32..20.0,
            ty in -20.0f32..20.0,
        ) {
            let start = Vec2::ZERO;
            let mut path = vec![start];
            let mut pos = start;
            for (dx, dy) in steps {
                pos += Vec2::new(dx, dy);
                path.push(pos);
            }
            let target = Vec2::new(tx, ty);
            if let Some(eff) = path_efficiency(start, &path, target) {
                prop_assert!(eff > 0.0 && eff <= 100.0);
            }
        }
    }
}
