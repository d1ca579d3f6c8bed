//! Per-tick session update
//!
//! Order within a tick: focus handling, camera update, path and trail
//! sampling, target update, click resolution with analysis and scoring,
//! then the round timer.

use glam::Vec2;

use super::analysis::{analyze_final_approach, hit_precision};
use super::field::{FieldContext, FieldEvent, GameMode, HitInfo, ShotOutcome};
use super::path::{axis_efficiency, path_efficiency};
use super::state::{FinishReason, GameEvent, GamePhase, LastShot, SessionState};

/// Window focus edge reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChange {
    Gained,
    Lost,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw pointer delta in device counts since the last tick
    pub pointer_delta: Vec2,
    /// Primary click
    pub shoot: bool,
    /// Debug mode: place a fresh target
    pub spawn_next: bool,
    /// Focus edge, if one happened since the last tick
    pub focus: Option<FocusChange>,
    /// Escape / quit
    pub quit: bool,
}

/// Advance the session by `dt` seconds
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    match input.focus {
        Some(FocusChange::Lost) if state.locked => {
            state.locked = false;
            state.was_locked = true;
            log::info!("Focus lost, pointer released");
            state.events.push(GameEvent::FocusLost);
        }
        // Regaining focus never relocks on its own; the next click does
        Some(FocusChange::Gained) => log::debug!("Focus regained"),
        _ => {}
    }

    if state.phase != GamePhase::Running {
        return;
    }

    if input.quit {
        state.finish(FinishReason::Quit);
        return;
    }

    state.advance_clock(dt);
    let now = state.elapsed;

    if state.locked {
        state
            .camera
            .update(input.pointer_delta.x, input.pointer_delta.y);
        let pos = state.camera.position();
        let interval = state.settings.analysis.sample_interval;
        state.path.sample(now, pos, interval);
        state.record_trail();
    }

    let mut field_events = Vec::new();
    {
        let mut ctx = FieldContext {
            camera: &state.camera,
            now,
            dt,
            rng: &mut state.rng,
        };
        if input.spawn_next && state.field.mode() == GameMode::Debug {
            state.field.on_spawn(&mut ctx);
        }
        state.field.on_tick(&mut ctx, &mut field_events);
    }
    handle_field_events(state, field_events);

    if input.shoot && state.phase == GamePhase::Running {
        if state.locked {
            shoot(state);
        } else {
            // First click after refocus only recaptures the pointer
            state.locked = true;
            state.was_locked = false;
            log::info!("Pointer relocked");
            state.events.push(GameEvent::Relocked);
        }
    }

    if state.mode() == GameMode::Tracking && state.elapsed >= state.settings.tracking.duration {
        state.finish(FinishReason::TimeUp);
    }
}

fn handle_field_events(state: &mut SessionState, events: Vec<FieldEvent>) {
    for event in events {
        match event {
            FieldEvent::Expired { pos } => {
                state.stats.record_miss();
                state.events.push(GameEvent::Expired { pos });
            }
            FieldEvent::Destroyed { pos, time_on_target } => {
                state.stats.targets_destroyed += 1;
                log::debug!("Tracking target destroyed after {time_on_target:.2}s on target");
                state.events.push(GameEvent::Destroyed { pos });
            }
            FieldEvent::OnTarget { dt } => {
                state.stats.time_on_target += dt;
            }
            FieldEvent::ShapeCompleted { kind, shapes_done } => {
                log::info!("{} complete ({shapes_done} done)", kind.as_str());
                state
                    .events
                    .push(GameEvent::ShapeCompleted { kind, shapes_done });
            }
            FieldEvent::AllShapesCompleted => state.finish(FinishReason::ShapesComplete),
        }
    }
}

fn shoot(state: &mut SessionState) {
    state.events.push(GameEvent::Fired);

    let mut field_events = Vec::new();
    let outcome = {
        let mut ctx = FieldContext {
            camera: &state.camera,
            now: state.elapsed,
            dt: 0.0,
            rng: &mut state.rng,
        };
        state.field.on_shoot(&mut ctx, &mut field_events)
    };

    match outcome {
        ShotOutcome::Hit(hit) => record_hit(state, hit),
        ShotOutcome::Miss => {
            state.stats.record_miss();
            let pos = state.camera.position();
            state.path.on_miss(pos, state.elapsed);
            state.last_shot = Some(LastShot::default());
            state.events.push(GameEvent::Missed);
        }
        ShotOutcome::Ignored => {}
    }

    handle_field_events(state, field_events);
}

/// Analyze the path that led to a hit, score it and restart the path
fn record_hit(state: &mut SessionState, hit: HitInfo) {
    let pos = state.camera.position();
    let now = state.elapsed;
    state.path.push_final(pos);

    let mut efficiency = None;
    let mut class = None;
    if let Some(reference) = state.path.reference() {
        let points = state.path.points();
        efficiency = path_efficiency(reference, points, hit.target_pos);
        let axes = axis_efficiency(reference, points, hit.target_pos);
        state.stats.record_efficiency(efficiency, axes);

        let analysis = analyze_final_approach(
            points,
            Some(reference),
            hit.target_pos,
            hit.half_size,
            state.settings.analysis.approach_window,
        );
        if let Some(analysis) = analysis {
            log::debug!(
                "Approach: reversals {}/{} micro {}/{} overshoot {:.2}/{:.2}",
                analysis.x_reversals,
                analysis.y_reversals,
                analysis.x_micro_adjustments,
                analysis.y_micro_adjustments,
                analysis.x_max_overshoot,
                analysis.y_max_overshoot
            );
            class = Some(analysis.classify());
            state.stats.record_approach(&analysis);
            state.last_analysis = Some(analysis);
        }
    }

    let precision = hit_precision(hit.hitbox, hit.delta, hit.half_size);
    state.stats.hit_precisions.push(precision);
    state.stats.record_hit(hit.reaction_time);
    state.path.on_hit(pos, now);

    state.last_shot = Some(LastShot {
        hit: true,
        precision: Some(precision),
        efficiency,
        reaction_time: Some(hit.reaction_time),
        class,
    });
    state.events.push(GameEvent::Hit {
        pos: hit.target_pos,
        precision,
        reaction_time: hit.reaction_time,
        class,
    });
}
