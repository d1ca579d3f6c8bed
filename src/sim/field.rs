//! Target field: the live targets of the active game mode
//!
//! Each mode owns its own field type implementing [`TargetMode`]. The
//! session holds one [`TargetField`] chosen at start and replaced wholesale
//! on mode change or restart.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::camera::Camera;
use super::shapes::{self, ShapeKind};
use super::target::{DebugTarget, RandomTarget, TargetStyle, TargetView, TrackingTarget};
use crate::settings::{
    DebugSettings, HitboxShape, RandomSettings, Settings, ShapeSettings, TrackingSettings,
};

/// Game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Several shrinking targets that expire
    #[default]
    Random,
    /// Moving targets with health, time-boxed round
    Tracking,
    /// Polygon vertices hit in order
    Shapes,
    /// One persistent target for inspecting the path analysis
    Debug,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Random => "Random",
            GameMode::Tracking => "Tracking",
            GameMode::Shapes => "Shapes",
            GameMode::Debug => "Debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" => Some(GameMode::Random),
            "tracking" | "track" => Some(GameMode::Tracking),
            "shapes" | "shape" => Some(GameMode::Shapes),
            "debug" => Some(GameMode::Debug),
            _ => None,
        }
    }
}

/// Per-call context handed to the mode hooks
pub struct FieldContext<'a> {
    pub camera: &'a Camera,
    /// Session time (seconds)
    pub now: f32,
    pub dt: f32,
    pub rng: &'a mut Pcg32,
}

/// Things that happened inside the field during a hook
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// A random target aged out (counts as a miss)
    Expired { pos: Vec2 },
    /// A tracking target ran out of health
    Destroyed { pos: Vec2, time_on_target: f32 },
    /// Crosshair spent `dt` seconds on a tracking target
    OnTarget { dt: f32 },
    /// A shape's last vertex was hit
    ShapeCompleted { kind: ShapeKind, shapes_done: usize },
    /// Every shape of the session is done
    AllShapesCompleted,
}

/// A successful shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    pub target_pos: Vec2,
    pub half_size: f32,
    pub hitbox: HitboxShape,
    /// Crosshair → target offset at the moment of the shot
    pub delta: Vec2,
    /// Seconds since the target became hittable
    pub reaction_time: f32,
}

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    Hit(HitInfo),
    Miss,
    /// Mode does not use clicks (tracking) or nothing is left to shoot
    Ignored,
}

/// Per-mode behaviour
pub trait TargetMode {
    /// Populate (or, in debug mode, replace) targets
    fn on_spawn(&mut self, ctx: &mut FieldContext);
    /// Advance targets by `ctx.dt`
    fn on_tick(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>);
    /// Resolve a click at the crosshair
    fn on_shoot(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>) -> ShotOutcome;
    /// Snapshot of the targets for drawing
    fn targets(&self, camera: &Camera, now: f32) -> Vec<TargetView>;
}

/// Random position within `safe_fraction` of the visible region
fn random_position(ctx: &mut FieldContext, safe_fraction: f32) -> Vec2 {
    let center = ctx.camera.spawn_center();
    let half = ctx.camera.projection().half_extent() * safe_fraction;
    let offset = Vec2::new(
        ctx.rng.random_range(-half.x..=half.x),
        ctx.rng.random_range(-half.y..=half.y),
    );
    let pitch_limit = ctx.camera.pitch_limit();
    Vec2::new(
        ctx.camera.normalize_world_yaw(center.x + offset.x),
        (center.y + offset.y).clamp(-pitch_limit, pitch_limit),
    )
}

/// Random mode: N concurrent aging targets
#[derive(Debug, Clone)]
pub struct RandomField {
    pub settings: RandomSettings,
    pub targets: Vec<RandomTarget>,
    next_id: u32,
}

impl RandomField {
    pub fn new(settings: RandomSettings) -> Self {
        Self {
            settings,
            targets: Vec::new(),
            next_id: 1,
        }
    }

    fn spawn_one(&mut self, ctx: &mut FieldContext) {
        let pos = random_position(ctx, self.settings.safe_fraction);
        let id = self.next_id;
        self.next_id += 1;
        self.targets.push(RandomTarget {
            id,
            pos,
            spawn_time: ctx.now,
        });
    }
}

impl TargetMode for RandomField {
    fn on_spawn(&mut self, ctx: &mut FieldContext) {
        while self.targets.len() < self.settings.concurrent_targets {
            self.spawn_one(ctx);
        }
    }

    fn on_tick(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>) {
        let now = ctx.now;
        let lifetime = self.settings.lifetime;
        self.targets.retain(|target| {
            if target.is_expired(now, lifetime) {
                events.push(FieldEvent::Expired { pos: target.pos });
                false
            } else {
                true
            }
        });
        self.on_spawn(ctx);
    }

    fn on_shoot(&mut self, ctx: &mut FieldContext, _events: &mut Vec<FieldEvent>) -> ShotOutcome {
        let now = ctx.now;
        let hitbox = self.settings.hitbox;
        let closest = self
            .targets
            .iter()
            .enumerate()
            .filter_map(|(i, target)| {
                let delta = ctx.camera.delta_to(target.pos);
                let half_size = target.size(now, &self.settings);
                hitbox
                    .contains(delta, half_size)
                    .then_some((i, delta, half_size))
            })
            .min_by(|a, b| {
                a.1.length()
                    .partial_cmp(&b.1.length())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some((index, delta, half_size)) = closest else {
            return ShotOutcome::Miss;
        };

        let target = self.targets.remove(index);
        self.spawn_one(ctx);
        ShotOutcome::Hit(HitInfo {
            target_pos: target.pos,
            half_size,
            hitbox,
            delta,
            reaction_time: target.age(now),
        })
    }

    fn targets(&self, _camera: &Camera, now: f32) -> Vec<TargetView> {
        self.targets
            .iter()
            .map(|target| TargetView {
                pos: target.pos,
                half_size: target.size(now, &self.settings),
                hitbox: self.settings.hitbox,
                style: TargetStyle::Aging {
                    age: target.age_ratio(now, self.settings.lifetime),
                },
            })
            .collect()
    }
}

/// Tracking mode: moving targets drained by holding the crosshair on them
#[derive(Debug, Clone)]
pub struct TrackingField {
    pub settings: TrackingSettings,
    pub targets: Vec<TrackingTarget>,
    next_id: u32,
}

impl TrackingField {
    pub fn new(settings: TrackingSettings) -> Self {
        Self {
            settings,
            targets: Vec::new(),
            next_id: 1,
        }
    }

    fn spawn_one(&mut self, ctx: &mut FieldContext) {
        let pos = random_position(ctx, self.settings.safe_fraction);
        let speed = ctx
            .rng
            .random_range(self.settings.min_speed..=self.settings.max_speed);
        let heading = ctx.rng.random_range(0.0..TAU);
        let id = self.next_id;
        self.next_id += 1;
        self.targets.push(TrackingTarget {
            id,
            pos,
            vel: Vec2::from_angle(heading) * speed,
            health: self.settings.max_health,
            size: self.settings.target_size,
            time_on_target: 0.0,
        });
    }
}

impl TargetMode for TrackingField {
    fn on_spawn(&mut self, ctx: &mut FieldContext) {
        while self.targets.len() < self.settings.target_count {
            self.spawn_one(ctx);
        }
    }

    fn on_tick(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>) {
        let dt = ctx.dt;
        let camera = ctx.camera;
        let pitch_limit = camera.pitch_limit();
        let bounds = self.settings.bounds;
        let change_chance = self.settings.direction_change_rate * dt;

        for target in &mut self.targets {
            // Evasive jink
            if ctx.rng.random::<f32>() < change_chance {
                let heading = ctx.rng.random_range(0.0..TAU);
                target.set_heading(heading);
            }

            target.pos += target.vel * dt;

            // Bounce off the box around the current view, only while still
            // heading outward so a target never sticks to the edge
            let offset = camera.delta_to(target.pos);
            if offset.x.abs() > bounds.x && offset.x * target.vel.x > 0.0 {
                target.vel.x = -target.vel.x;
            }
            if offset.y.abs() > bounds.y && offset.y * target.vel.y > 0.0 {
                target.vel.y = -target.vel.y;
            }

            target.pos.x = camera.normalize_world_yaw(target.pos.x);
            if target.pos.y.abs() > pitch_limit {
                target.pos.y = target.pos.y.clamp(-pitch_limit, pitch_limit);
                target.vel.y = -target.vel.y;
            }

            if camera.distance_to(target.pos) <= target.size {
                target.health -= self.settings.drain_rate * dt;
                target.time_on_target += dt;
                events.push(FieldEvent::OnTarget { dt });
            }
        }

        let mut destroyed = 0;
        self.targets.retain(|target| {
            if target.is_destroyed() {
                events.push(FieldEvent::Destroyed {
                    pos: target.pos,
                    time_on_target: target.time_on_target,
                });
                destroyed += 1;
                false
            } else {
                true
            }
        });
        if destroyed > 0 {
            self.on_spawn(ctx);
        }
    }

    fn on_shoot(&mut self, _ctx: &mut FieldContext, _events: &mut Vec<FieldEvent>) -> ShotOutcome {
        ShotOutcome::Ignored
    }

    fn targets(&self, camera: &Camera, _now: f32) -> Vec<TargetView> {
        self.targets
            .iter()
            .map(|target| TargetView {
                pos: target.pos,
                half_size: target.size,
                hitbox: HitboxShape::Circle,
                style: TargetStyle::Health {
                    health: (target.health / self.settings.max_health).clamp(0.0, 1.0),
                    on_target: camera.distance_to(target.pos) <= target.size,
                },
            })
            .collect()
    }
}

/// Shapes mode: polygon vertices hit strictly in order
#[derive(Debug, Clone)]
pub struct ShapeField {
    pub settings: ShapeSettings,
    kind: Option<ShapeKind>,
    vertices: Vec<Vec2>,
    current: usize,
    shapes_done: usize,
    live_since: f32,
}

impl ShapeField {
    pub fn new(settings: ShapeSettings) -> Self {
        Self {
            settings,
            kind: None,
            vertices: Vec::new(),
            current: 0,
            shapes_done: 0,
            live_since: 0.0,
        }
    }

    /// Index of the live vertex within the current shape
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn shapes_done(&self) -> usize {
        self.shapes_done
    }

    #[inline]
    pub fn kind(&self) -> Option<ShapeKind> {
        self.kind
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.shapes_done >= self.settings.shape_count
    }

    /// Position of the vertex that can be hit right now
    pub fn live_vertex(&self) -> Option<Vec2> {
        if self.is_finished() {
            return None;
        }
        self.vertices.get(self.current).copied()
    }

    fn generate(&mut self, ctx: &mut FieldContext) {
        let projection = *ctx.camera.projection();
        let kind = ShapeKind::ALL[ctx.rng.random_range(0..ShapeKind::ALL.len())];

        // Keep the whole outline on screen
        let max_fit = (projection.width.min(projection.height) / 2.0 - 1.0).max(1.0);
        let max_scale = self.settings.max_scale_px.min(max_fit);
        let min_scale = self.settings.min_scale_px.min(max_scale);
        let scale = ctx.rng.random_range(min_scale..=max_scale);
        let center = Vec2::new(
            ctx.rng.random_range(scale..=(projection.width - scale).max(scale)),
            ctx.rng.random_range(scale..=(projection.height - scale).max(scale)),
        );

        let pitch_limit = ctx.camera.pitch_limit();
        self.vertices = shapes::vertices(kind, center, scale)
            .into_iter()
            .map(|screen| {
                let world = ctx.camera.unproject(screen);
                Vec2::new(world.x, world.y.clamp(-pitch_limit, pitch_limit))
            })
            .collect();
        self.kind = Some(kind);
        self.current = 0;
        self.live_since = ctx.now;
        log::debug!(
            "Shape {} of {}: {} ({} vertices)",
            self.shapes_done + 1,
            self.settings.shape_count,
            kind.as_str(),
            self.vertices.len()
        );
    }
}

impl TargetMode for ShapeField {
    fn on_spawn(&mut self, ctx: &mut FieldContext) {
        if !self.is_finished() && self.current >= self.vertices.len() {
            self.generate(ctx);
        }
    }

    fn on_tick(&mut self, _ctx: &mut FieldContext, _events: &mut Vec<FieldEvent>) {}

    fn on_shoot(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>) -> ShotOutcome {
        let Some(live) = self.live_vertex() else {
            return ShotOutcome::Ignored;
        };

        // Only the live vertex counts; pending ones are never hit early
        let delta = ctx.camera.delta_to(live);
        let half_size = self.settings.target_size;
        if !self.settings.hitbox.contains(delta, half_size) {
            return ShotOutcome::Miss;
        }

        let reaction_time = (ctx.now - self.live_since).max(0.0);
        self.current += 1;
        self.live_since = ctx.now;

        if self.current >= self.vertices.len() {
            self.shapes_done += 1;
            if let Some(kind) = self.kind {
                events.push(FieldEvent::ShapeCompleted {
                    kind,
                    shapes_done: self.shapes_done,
                });
            }
            if self.is_finished() {
                events.push(FieldEvent::AllShapesCompleted);
            } else {
                self.generate(ctx);
            }
        }

        ShotOutcome::Hit(HitInfo {
            target_pos: live,
            half_size,
            hitbox: self.settings.hitbox,
            delta,
            reaction_time,
        })
    }

    fn targets(&self, _camera: &Camera, _now: f32) -> Vec<TargetView> {
        let finished = self.is_finished();
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, &pos)| TargetView {
                pos,
                half_size: self.settings.target_size,
                hitbox: self.settings.hitbox,
                style: if finished || i < self.current {
                    TargetStyle::ShapeDone
                } else if i == self.current {
                    TargetStyle::ShapeLive
                } else {
                    TargetStyle::ShapePending
                },
            })
            .collect()
    }
}

/// Debug mode: one target that waits to be shot or respawned by hand
#[derive(Debug, Clone)]
pub struct DebugField {
    pub settings: DebugSettings,
    pub target: Option<DebugTarget>,
}

impl DebugField {
    pub fn new(settings: DebugSettings) -> Self {
        Self {
            settings,
            target: None,
        }
    }
}

impl TargetMode for DebugField {
    fn on_spawn(&mut self, ctx: &mut FieldContext) {
        let pos = random_position(ctx, self.settings.safe_fraction);
        self.target = Some(DebugTarget {
            pos,
            spawn_time: ctx.now,
        });
    }

    fn on_tick(&mut self, _ctx: &mut FieldContext, _events: &mut Vec<FieldEvent>) {}

    fn on_shoot(&mut self, ctx: &mut FieldContext, _events: &mut Vec<FieldEvent>) -> ShotOutcome {
        let Some(target) = &self.target else {
            return ShotOutcome::Miss;
        };
        let delta = ctx.camera.delta_to(target.pos);
        let half_size = self.settings.target_size;
        if !self.settings.hitbox.contains(delta, half_size) {
            return ShotOutcome::Miss;
        }
        let hit = HitInfo {
            target_pos: target.pos,
            half_size,
            hitbox: self.settings.hitbox,
            delta,
            reaction_time: (ctx.now - target.spawn_time).max(0.0),
        };
        self.target = None;
        ShotOutcome::Hit(hit)
    }

    fn targets(&self, _camera: &Camera, _now: f32) -> Vec<TargetView> {
        self.target
            .iter()
            .map(|target| TargetView {
                pos: target.pos,
                half_size: self.settings.target_size,
                hitbox: self.settings.hitbox,
                style: TargetStyle::Debug,
            })
            .collect()
    }
}

/// The active mode's targets
#[derive(Debug, Clone)]
pub enum TargetField {
    Random(RandomField),
    Tracking(TrackingField),
    Shapes(ShapeField),
    Debug(DebugField),
}

impl TargetField {
    pub fn new(mode: GameMode, settings: &Settings) -> Self {
        match mode {
            GameMode::Random => TargetField::Random(RandomField::new(settings.random.clone())),
            GameMode::Tracking => {
                TargetField::Tracking(TrackingField::new(settings.tracking.clone()))
            }
            GameMode::Shapes => TargetField::Shapes(ShapeField::new(settings.shapes.clone())),
            GameMode::Debug => TargetField::Debug(DebugField::new(settings.debug.clone())),
        }
    }

    pub fn mode(&self) -> GameMode {
        match self {
            TargetField::Random(_) => GameMode::Random,
            TargetField::Tracking(_) => GameMode::Tracking,
            TargetField::Shapes(_) => GameMode::Shapes,
            TargetField::Debug(_) => GameMode::Debug,
        }
    }

    fn behavior(&self) -> &dyn TargetMode {
        match self {
            TargetField::Random(field) => field,
            TargetField::Tracking(field) => field,
            TargetField::Shapes(field) => field,
            TargetField::Debug(field) => field,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn TargetMode {
        match self {
            TargetField::Random(field) => field,
            TargetField::Tracking(field) => field,
            TargetField::Shapes(field) => field,
            TargetField::Debug(field) => field,
        }
    }

    pub fn on_spawn(&mut self, ctx: &mut FieldContext) {
        self.behavior_mut().on_spawn(ctx);
    }

    pub fn on_tick(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>) {
        self.behavior_mut().on_tick(ctx, events);
    }

    pub fn on_shoot(&mut self, ctx: &mut FieldContext, events: &mut Vec<FieldEvent>) -> ShotOutcome {
        self.behavior_mut().on_shoot(ctx, events)
    }

    pub fn targets(&self, camera: &Camera, now: f32) -> Vec<TargetView> {
        self.behavior().targets(camera, now)
    }
}
