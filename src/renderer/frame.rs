//! Per-tick draw list
//!
//! The host surface draws whatever is in a [`RenderFrame`]: target sprites
//! in screen pixels, the fading trail, HUD lines and debug markers.

use glam::Vec2;

use crate::sim::analysis::{ApproachAnalysis, Axis};
use crate::sim::field::{GameMode, TargetField};
use crate::sim::stats::SessionSummary;
use crate::sim::target::TargetStyle;
use crate::sim::{GamePhase, SessionState};

/// A target ready to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSprite {
    pub screen_pos: Vec2,
    /// Half size in pixels
    pub radius_px: f32,
    pub color: [f32; 4],
    pub style: TargetStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSprite {
    pub screen_pos: Vec2,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Reversal,
    Pause,
    Overshoot,
}

/// Debug overlay point from the last approach analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub screen_pos: Vec2,
    pub kind: MarkerKind,
}

impl MarkerKind {
    pub fn color(&self) -> [f32; 4] {
        match self {
            MarkerKind::Reversal => [1.0, 0.3, 0.3, 1.0],
            MarkerKind::Pause => [0.3, 0.6, 1.0, 1.0],
            MarkerKind::Overshoot => [1.0, 0.8, 0.2, 1.0],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub targets: Vec<TargetSprite>,
    /// Newest first
    pub trail: Vec<TrailSprite>,
    /// Outline of the current shape (shapes mode)
    pub outline: Vec<Vec2>,
    pub hud: Vec<String>,
    pub markers: Vec<Marker>,
    pub crosshair: Vec2,
}

/// Interpolate colour from fresh (t = 0) to urgent (t = 1)
///
/// green -> yellow -> orange -> red
fn urgency_color(t: f32, alpha: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    let (r, g, b) = if t < 0.5 {
        // Green to yellow
        let u = t / 0.5;
        (0.2 + 0.8 * u, 0.85, 0.3 - 0.1 * u)
    } else if t < 0.75 {
        // Yellow to orange
        let u = (t - 0.5) / 0.25;
        (1.0, 0.85 - 0.35 * u, 0.2)
    } else {
        // Orange to red
        let u = (t - 0.75) / 0.25;
        (1.0, 0.5 - 0.3 * u, 0.2)
    };
    [r, g, b, alpha]
}

pub fn target_color(style: TargetStyle) -> [f32; 4] {
    match style {
        TargetStyle::Aging { age } => urgency_color(age, 1.0),
        TargetStyle::Health { health, on_target } => {
            let alpha = if on_target { 1.0 } else { 0.8 };
            urgency_color(1.0 - health, alpha)
        }
        TargetStyle::ShapeLive => [1.0, 0.9, 0.2, 1.0],
        TargetStyle::ShapePending => [0.6, 0.6, 0.6, 0.6],
        TargetStyle::ShapeDone => [0.3, 0.8, 0.4, 0.4],
        TargetStyle::Debug => [0.7, 0.4, 1.0, 1.0],
    }
}

fn fmt_opt(value: Option<f32>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => "-".to_string(),
    }
}

/// HUD lines for the current state
pub fn hud_lines(state: &SessionState) -> Vec<String> {
    let summary: SessionSummary = state.stats.summary();
    let mut lines = Vec::new();

    if state.phase == GamePhase::Menu {
        lines.push("Select a mode to start".to_string());
        return lines;
    }

    lines.push(format!("Mode: {}", state.mode().as_str()));
    match state.mode() {
        GameMode::Tracking => {
            lines.push(format!(
                "Time on target: {:.1}s  Destroyed: {}",
                summary.time_on_target, summary.targets_destroyed
            ));
            if let Some(left) = state.time_remaining() {
                lines.push(format!("Time left: {left:.1}s"));
            }
        }
        _ => {
            lines.push(format!(
                "Hits: {}  Misses: {}  Accuracy: {}",
                summary.hits,
                summary.misses,
                fmt_opt(summary.accuracy, "%")
            ));
            lines.push(format!(
                "Reaction: {}",
                fmt_opt(summary.avg_reaction_ms, "ms")
            ));
            lines.push(format!(
                "Efficiency: {}  X: {}  Y: {}",
                fmt_opt(summary.avg_efficiency, "%"),
                fmt_opt(summary.avg_x_efficiency, "%"),
                fmt_opt(summary.avg_y_efficiency, "%")
            ));
        }
    }

    if let TargetField::Shapes(field) = &state.field {
        let kind = field.kind().map(|k| k.as_str()).unwrap_or("-");
        lines.push(format!(
            "Shape: {kind}  Done: {}/{}",
            field.shapes_done(),
            field.settings.shape_count
        ));
    }

    if let Some(shot) = &state.last_shot {
        let line = if shot.hit {
            let class = shot.class.map(|c| c.as_str()).unwrap_or("-");
            format!(
                "Last: hit  precision {}  efficiency {}  [{class}]",
                fmt_opt(shot.precision, "%"),
                fmt_opt(shot.efficiency, "%")
            )
        } else {
            "Last: miss".to_string()
        };
        lines.push(line);
    }

    if summary.diagnosis.shots > 0 {
        lines.push(summary.diagnosis.x.advice(Axis::X));
        lines.push(summary.diagnosis.y.advice(Axis::Y));
    }

    if !state.locked && state.phase == GamePhase::Running {
        lines.push("Click to resume".to_string());
    }
    if let Some(reason) = state.finish_reason {
        lines.push(format!("Finished: {reason:?}"));
    }
    lines
}

fn analysis_markers(state: &SessionState, analysis: &ApproachAnalysis) -> Vec<Marker> {
    let camera = &state.camera;
    let reversals = analysis.reversal_points.iter().map(|&p| Marker {
        screen_pos: camera.project(p),
        kind: MarkerKind::Reversal,
    });
    let pauses = analysis.pause_points.iter().map(|&p| Marker {
        screen_pos: camera.project(p),
        kind: MarkerKind::Pause,
    });
    let overshoots = [analysis.x_overshoot_point, analysis.y_overshoot_point]
        .into_iter()
        .flatten()
        .map(|p| Marker {
            screen_pos: camera.project(p),
            kind: MarkerKind::Overshoot,
        });
    reversals.chain(pauses).chain(overshoots).collect()
}

/// Build the draw list for the current state
pub fn build_frame(state: &SessionState) -> RenderFrame {
    let camera = &state.camera;
    let ppd = camera.projection().pixels_per_degree();
    let now = state.elapsed;

    let targets = state
        .target_views()
        .into_iter()
        .map(|view| TargetSprite {
            screen_pos: camera.project(view.pos),
            radius_px: view.half_size * ppd,
            color: target_color(view.style),
            style: view.style,
        })
        .collect();

    let trail = state
        .trail
        .iter()
        .map(|point| TrailSprite {
            screen_pos: camera.project(point.pos),
            opacity: point.opacity(now),
        })
        .filter(|sprite| sprite.opacity > 0.0)
        .collect();

    let outline = match &state.field {
        TargetField::Shapes(field) => field
            .vertices()
            .iter()
            .map(|&v| camera.project(v))
            .collect(),
        _ => Vec::new(),
    };

    let markers = match (&state.last_analysis, state.mode()) {
        (Some(analysis), GameMode::Debug) => analysis_markers(state, analysis),
        _ => Vec::new(),
    };

    RenderFrame {
        targets,
        trail,
        outline,
        hud: hud_lines(state),
        markers,
        crosshair: camera.projection().center(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::field::TargetField;
    use crate::sim::target::DebugTarget;

    #[test]
    fn test_urgency_gradient_endpoints() {
        let fresh = urgency_color(0.0, 1.0);
        let old = urgency_color(1.0, 1.0);
        assert!(fresh[1] > fresh[0]);
        assert!(old[0] > old[1]);
    }

    #[test]
    fn test_target_under_crosshair_drawn_at_center() {
        let mut state = SessionState::new(Settings::default(), 3);
        state.start(GameMode::Debug);
        if let TargetField::Debug(field) = &mut state.field {
            field.target = Some(DebugTarget {
                pos: state.camera.position(),
                spawn_time: 0.0,
            });
        }
        let frame = build_frame(&state);
        assert_eq!(frame.targets.len(), 1);
        let sprite = frame.targets[0];
        assert!((sprite.screen_pos - frame.crosshair).length() < 1e-3);
        let ppd = state.camera.projection().pixels_per_degree();
        assert!((sprite.radius_px - state.settings.debug.target_size * ppd).abs() < 1e-3);
    }

    #[test]
    fn test_markers_only_in_debug_mode() {
        let analysis = ApproachAnalysis {
            reversal_points: vec![Vec2::new(1.0, 0.0)],
            pause_points: vec![Vec2::new(2.0, 0.0)],
            x_overshoot_point: Some(Vec2::new(3.0, 0.0)),
            ..ApproachAnalysis::default()
        };

        let mut state = SessionState::new(Settings::default(), 3);
        state.start(GameMode::Debug);
        state.last_analysis = Some(analysis.clone());
        let kinds: Vec<_> = build_frame(&state).markers.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MarkerKind::Reversal, MarkerKind::Pause, MarkerKind::Overshoot]
        );

        state.start(GameMode::Random);
        state.last_analysis = Some(analysis);
        assert!(build_frame(&state).markers.is_empty());
    }

    #[test]
    fn test_hud_shows_counts_and_resume_hint() {
        let mut state = SessionState::new(Settings::default(), 3);
        assert_eq!(hud_lines(&state), vec!["Select a mode to start".to_string()]);

        state.start(GameMode::Random);
        state.stats.record_hit(0.25);
        state.stats.record_miss();
        state.locked = false;
        let hud = hud_lines(&state);
        assert!(hud.iter().any(|l| l.contains("Hits: 1  Misses: 1  Accuracy: 50.0%")));
        assert!(hud.iter().any(|l| l.contains("Reaction: 250.0ms")));
        assert!(hud.iter().any(|l| l == "Click to resume"));
    }

    #[test]
    fn test_shapes_frame_has_outline() {
        let mut state = SessionState::new(Settings::default(), 3);
        state.start(GameMode::Shapes);
        let frame = build_frame(&state);
        assert!(frame.outline.len() >= 3);
        assert_eq!(frame.outline.len(), frame.targets.len());
    }
}
