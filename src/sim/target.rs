//! Target entities and hit testing
//!
//! All sizes are angular half-sizes in degrees: the radius of a round
//! hitbox or half the side of a square one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::{HitboxShape, RandomSettings};

impl HitboxShape {
    /// Is a crosshair offset `delta` (crosshair → target) inside the hitbox?
    #[inline]
    pub fn contains(&self, delta: Vec2, half_size: f32) -> bool {
        match self {
            HitboxShape::Circle => delta.length() <= half_size,
            HitboxShape::Square => delta.x.abs() <= half_size && delta.y.abs() <= half_size,
        }
    }

    /// 0 at the exact centre, 1 on the edge
    ///
    /// The square form takes the larger of the per-axis ratios.
    #[inline]
    pub fn distance_ratio(&self, delta: Vec2, half_size: f32) -> f32 {
        if half_size <= 0.0 {
            return 1.0;
        }
        match self {
            HitboxShape::Circle => delta.length() / half_size,
            HitboxShape::Square => (delta.x.abs() / half_size).max(delta.y.abs() / half_size),
        }
    }
}

/// A shrinking (or growing) target in Random mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomTarget {
    pub id: u32,
    pub pos: Vec2,
    /// Session time (seconds) the target appeared
    pub spawn_time: f32,
}

impl RandomTarget {
    #[inline]
    pub fn age(&self, now: f32) -> f32 {
        (now - self.spawn_time).max(0.0)
    }

    /// Age as a fraction of the lifetime, clamped to [0, 1]
    #[inline]
    pub fn age_ratio(&self, now: f32, lifetime: f32) -> f32 {
        (self.age(now) / lifetime).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn is_expired(&self, now: f32, lifetime: f32) -> bool {
        now - self.spawn_time >= lifetime
    }

    /// Current half-size: linear from `start_size` to `end_size` over the lifetime
    pub fn size(&self, now: f32, settings: &RandomSettings) -> f32 {
        let t = self.age_ratio(now, settings.lifetime);
        settings.start_size + (settings.end_size - settings.start_size) * t
    }
}

/// A moving target in Tracking mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingTarget {
    pub id: u32,
    pub pos: Vec2,
    /// Degrees per second (yaw, pitch)
    pub vel: Vec2,
    pub health: f32,
    pub size: f32,
    /// Seconds the crosshair has spent on this target
    pub time_on_target: f32,
}

impl TrackingTarget {
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Pick a new heading, keeping the current speed
    pub fn set_heading(&mut self, angle: f32) {
        let speed = self.vel.length();
        self.vel = Vec2::from_angle(angle) * speed;
    }
}

/// The single manually-respawned target in Debug mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugTarget {
    pub pos: Vec2,
    pub spawn_time: f32,
}

/// How a target should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetStyle {
    /// Random target, `age` in [0, 1]
    Aging { age: f32 },
    /// Tracking target, `health` in [0, 1]
    Health { health: f32, on_target: bool },
    /// The shape vertex to hit next
    ShapeLive,
    /// A shape vertex still waiting its turn
    ShapePending,
    /// A shape vertex already hit
    ShapeDone,
    Debug,
}

/// Read-only snapshot of a target for drawing and for scripted input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub pos: Vec2,
    pub half_size: f32,
    pub hitbox: HitboxShape,
    pub style: TargetStyle,
}

impl TargetView {
    /// Can this target be shot right now?
    pub fn is_shootable(&self) -> bool {
        !matches!(
            self.style,
            TargetStyle::ShapePending | TargetStyle::ShapeDone | TargetStyle::Health { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_vs_square() {
        let corner = Vec2::new(0.9, 0.9);
        assert!(!HitboxShape::Circle.contains(corner, 1.0));
        assert!(HitboxShape::Square.contains(corner, 1.0));
        assert!(HitboxShape::Circle.contains(Vec2::new(0.6, 0.0), 1.0));
    }

    #[test]
    fn test_distance_ratio() {
        let delta = Vec2::new(0.3, 0.4);
        assert!((HitboxShape::Circle.distance_ratio(delta, 1.0) - 0.5).abs() < 1e-6);
        assert!((HitboxShape::Square.distance_ratio(delta, 1.0) - 0.4).abs() < 1e-6);
        assert_eq!(HitboxShape::Circle.distance_ratio(delta, 0.0), 1.0);
    }

    #[test]
    fn test_random_target_size_curve() {
        let settings = RandomSettings {
            lifetime: 2.0,
            start_size: 3.0,
            end_size: 1.0,
            ..RandomSettings::default()
        };
        let target = RandomTarget {
            id: 1,
            pos: Vec2::ZERO,
            spawn_time: 10.0,
        };
        assert!((target.size(10.0, &settings) - 3.0).abs() < 1e-6);
        assert!((target.size(11.0, &settings) - 2.0).abs() < 1e-6);
        assert!((target.size(15.0, &settings) - 1.0).abs() < 1e-6);
        assert!(!target.is_expired(11.99, 2.0));
        assert!(target.is_expired(12.0, 2.0));
    }

    #[test]
    fn test_set_heading_keeps_speed() {
        let mut target = TrackingTarget {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::new(3.0, 4.0),
            health: 100.0,
            size: 2.0,
            time_on_target: 0.0,
        };
        target.set_heading(1.0);
        assert!((target.vel.length() - 5.0).abs() < 1e-4);
    }
}
