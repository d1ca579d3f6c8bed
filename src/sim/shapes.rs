//! Polygon outlines for Shapes mode
//!
//! Vertices are generated in screen pixels (y down), clockwise starting from
//! the top, and converted to angular positions by the caller.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Points used to approximate a circle
const CIRCLE_POINTS: usize = 8;
/// Horizontal squash that tells a diamond apart from a tilted square
const DIAMOND_WIDTH: f32 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Square,
    Triangle,
    Circle,
    Diamond,
    Pentagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Circle,
        ShapeKind::Diamond,
        ShapeKind::Pentagon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Square => "Square",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Pentagon => "Pentagon",
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            ShapeKind::Square | ShapeKind::Diamond => 4,
            ShapeKind::Triangle => 3,
            ShapeKind::Circle => CIRCLE_POINTS,
            ShapeKind::Pentagon => 5,
        }
    }
}

/// Evenly spaced points on a circle, clockwise on screen from `start_angle`
fn ring(center: Vec2, radius: f32, count: usize, start_angle: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = start_angle + i as f32 * TAU / count as f32;
            center + Vec2::from_angle(angle) * radius
        })
        .collect()
}

/// Screen-space vertices of `kind` centred on `center` with radius `scale`
pub fn vertices(kind: ShapeKind, center: Vec2, scale: f32) -> Vec<Vec2> {
    // Screen y grows downward, so -π/2 is straight up and increasing angle
    // runs clockwise.
    let top = -FRAC_PI_2;
    match kind {
        ShapeKind::Square => ring(center, scale, 4, top + FRAC_PI_4),
        ShapeKind::Triangle => ring(center, scale, 3, top),
        ShapeKind::Circle => ring(center, scale, CIRCLE_POINTS, top),
        ShapeKind::Diamond => ring(center, scale, 4, top)
            .into_iter()
            .map(|p| Vec2::new(center.x + (p.x - center.x) * DIAMOND_WIDTH, p.y))
            .collect(),
        ShapeKind::Pentagon => ring(center, scale, 5, top),
    }
}
