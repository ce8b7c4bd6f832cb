//! Particle effects: explosion fire, impact sparks, fracture dust, and smoke.
//!
//! ## Design
//!
//! Particles are plain structs owned by the [`ParticleField`] resource, not
//! ECS entities: bursts of dozens appear and vanish within a second, and a
//! flat `Vec` with in-place retention is cheaper than entity churn at that
//! rate.  A two-system pipeline handles them:
//!
//! | System                   | Schedule | Purpose                              |
//! |--------------------------|----------|--------------------------------------|
//! | `particle_step_system`   | Update   | Advance every particle one tick      |
//! | `particle_render_system` | Update   | Draw each particle as a gizmo circle |
//!
//! Velocities are in units per tick: one `step` call per frame applies them
//! directly, preserving the emission tuning exactly.  Alpha fades linearly
//! with remaining life (`alpha = remaining / max`).
//!
//! Emission helpers take any `rand::Rng` so tests can drive them with a
//! seeded generator; live systems pass the shared [`crate::rng::FractureRng`].

use bevy::prelude::*;
use bevy_rapier2d::prelude::RapierConfiguration;
use rand::Rng;

// ── Emission tuning ───────────────────────────────────────────────────────────

/// Horizontal drag multiplier applied to every particle each tick.
const HORIZONTAL_DRAG: f32 = 0.98;

/// Fire burst: the orange core of an explosion.
const FIRE_COUNT: u32 = 40;
const FIRE_SPEED_PER_RADIUS: f32 = 0.08;
const FIRE_LIFE: u32 = 30;
const FIRE_SIZE: f32 = 5.0;
const FIRE_GRAVITY: f32 = 0.02;

/// Spark burst: fast gold flecks thrown past the fireball.
const SPARK_COUNT: u32 = 20;
const SPARK_SPEED_PER_RADIUS: f32 = 0.12;
const SPARK_LIFE: u32 = 20;
const SPARK_SIZE: f32 = 2.0;
const SPARK_GRAVITY: f32 = 0.01;

/// Smoke burst: slow grey puffs that rise (negative gravity).
const SMOKE_COUNT: u32 = 15;
const SMOKE_SPEED_PER_RADIUS: f32 = 0.03;
const SMOKE_LIFE: u32 = 80;
const SMOKE_SIZE: f32 = 8.0;
const SMOKE_GRAVITY: f32 = -0.01;

/// Fracture dust burst.
const DEBRIS_SPEED: f32 = 4.0;
const DEBRIS_LIFE: u32 = 40;
const DEBRIS_SIZE: f32 = 4.0;
const DEBRIS_GRAVITY: f32 = 0.08;

/// Minor-impact spark burst: brief gold flecks for hits too soft to fracture.
const MINOR_SPARK_COUNT: u32 = 6;
const MINOR_SPARK_SPEED: f32 = 5.0;
const MINOR_SPARK_LIFE: u32 = 15;
const MINOR_SPARK_SIZE: f32 = 1.5;
const MINOR_SPARK_GRAVITY: f32 = 0.05;

fn fire_color() -> Color {
    Color::srgb_u8(0xFF, 0x6B, 0x35)
}

fn spark_color() -> Color {
    Color::srgb_u8(0xFF, 0xD7, 0x00)
}

fn smoke_color() -> Color {
    Color::srgb_u8(0x55, 0x55, 0x55)
}

// ── Data ──────────────────────────────────────────────────────────────────────

/// One ephemeral visual particle.
#[derive(Debug, Clone)]
pub struct Particle {
    /// World-space position.
    pub position: Vec2,
    /// Velocity in units per tick.
    pub velocity: Vec2,
    /// Ticks left; removed when this reaches zero.
    pub remaining_life: u32,
    /// Lifetime at emission, for the fade ratio.
    pub max_life: u32,
    /// Draw radius (u).
    pub size: f32,
    /// Base colour; rendering multiplies its alpha by [`Particle::alpha`].
    pub color: Color,
    /// Per-tick vertical velocity decrement.  Positive sinks, negative rises.
    pub gravity: f32,
}

impl Particle {
    /// Fade factor in `[0, 1]`: full at emission, zero at expiry.
    pub fn alpha(&self) -> f32 {
        self.remaining_life as f32 / self.max_life.max(1) as f32
    }
}

/// One emission request: everything but the origin and the RNG.
///
/// `..Default::default()` gives the generic burst (speed 3, full-circle
/// spread, 60-tick life, size 3, sinking gravity).
#[derive(Debug, Clone, Copy)]
pub struct BurstParams {
    pub count: u32,
    pub color: Color,
    /// Base speed (units per tick); actual speed is uniform in `[0.5, 1.0] ×` this.
    pub speed: f32,
    /// Direction spread in radians, centred on straight up.
    pub spread: f32,
    /// Lifetime in ticks.
    pub life: u32,
    /// Base size; actual size is uniform in `[0.5, 1.5] ×` this.
    pub size: f32,
    pub gravity: f32,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            count: 10,
            color: Color::WHITE,
            speed: 3.0,
            spread: std::f32::consts::TAU,
            life: 60,
            size: 3.0,
            gravity: 0.05,
        }
    }
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// The owned set of live particles.
///
/// Written by the destruction systems and tools; stepped once per frame;
/// read-only for rendering.
#[derive(Resource)]
pub struct ParticleField {
    particles: Vec<Particle>,
    cap: usize,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::with_cap(crate::constants::PARTICLE_CAP)
    }
}

impl ParticleField {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            cap,
        }
    }

    /// Emit `params.count` particles at `origin`.
    ///
    /// Directions are sampled uniformly within `params.spread` radians centred
    /// on straight up, so wide spreads still bias the cloud upward.
    pub fn emit(&mut self, origin: Vec2, params: BurstParams, rng: &mut impl Rng) {
        let base_angle = std::f32::consts::FRAC_PI_2;
        for _ in 0..params.count {
            let angle = base_angle + (rng.gen::<f32>() - 0.5) * params.spread;
            let speed = params.speed * (0.5 + rng.gen::<f32>() * 0.5);
            let size = params.size * (0.5 + rng.gen::<f32>());
            self.particles.push(Particle {
                position: origin,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                remaining_life: params.life,
                max_life: params.life,
                size,
                color: params.color,
                gravity: params.gravity,
            });
        }
        // Cap enforcement: drop the oldest first.
        if self.particles.len() > self.cap {
            let excess = self.particles.len() - self.cap;
            self.particles.drain(0..excess);
        }
    }

    /// Three composed bursts for an explosion of the given blast radius:
    /// fire core, fast sparks, rising smoke.  Larger radii throw the fire and
    /// sparks proportionally farther.
    pub fn emit_explosion(&mut self, origin: Vec2, radius: f32, rng: &mut impl Rng) {
        self.emit(
            origin,
            BurstParams {
                count: FIRE_COUNT,
                color: fire_color(),
                speed: radius * FIRE_SPEED_PER_RADIUS,
                life: FIRE_LIFE,
                size: FIRE_SIZE,
                gravity: FIRE_GRAVITY,
                ..Default::default()
            },
            rng,
        );
        self.emit(
            origin,
            BurstParams {
                count: SPARK_COUNT,
                color: spark_color(),
                speed: radius * SPARK_SPEED_PER_RADIUS,
                life: SPARK_LIFE,
                size: SPARK_SIZE,
                gravity: SPARK_GRAVITY,
                ..Default::default()
            },
            rng,
        );
        self.emit(
            origin,
            BurstParams {
                count: SMOKE_COUNT,
                color: smoke_color(),
                speed: radius * SMOKE_SPEED_PER_RADIUS,
                life: SMOKE_LIFE,
                size: SMOKE_SIZE,
                gravity: SMOKE_GRAVITY,
                ..Default::default()
            },
            rng,
        );
    }

    /// Dust burst at a fracture site, tinted with the broken material's
    /// debris colour.
    pub fn emit_debris(&mut self, origin: Vec2, color: Color, count: u32, rng: &mut impl Rng) {
        self.emit(
            origin,
            BurstParams {
                count,
                color,
                speed: DEBRIS_SPEED,
                life: DEBRIS_LIFE,
                size: DEBRIS_SIZE,
                gravity: DEBRIS_GRAVITY,
                ..Default::default()
            },
            rng,
        );
    }

    /// Small gold burst for impacts too soft to fracture anything.
    pub fn emit_sparks(&mut self, origin: Vec2, rng: &mut impl Rng) {
        self.emit(
            origin,
            BurstParams {
                count: MINOR_SPARK_COUNT,
                color: spark_color(),
                speed: MINOR_SPARK_SPEED,
                life: MINOR_SPARK_LIFE,
                size: MINOR_SPARK_SIZE,
                gravity: MINOR_SPARK_GRAVITY,
                ..Default::default()
            },
            rng,
        );
    }

    /// Advance every particle one tick and drop the expired.
    ///
    /// Per tick: position += velocity; gravity pulls the vertical component;
    /// horizontal drag damps sideways motion; life decrements.  Retention is
    /// in-place so no survivor is skipped or double-stepped.
    pub fn step(&mut self) {
        self.particles.retain_mut(|p| {
            p.position += p.velocity;
            p.velocity.y -= p.gravity;
            p.velocity.x *= HORIZONTAL_DRAG;
            p.remaining_life = p.remaining_life.saturating_sub(1);
            p.remaining_life > 0
        });
    }

    /// Drop every live particle (arena reset).
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Live particle count, for the HUD diagnostic line.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only view for rendering.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParticleField>().add_systems(
            Update,
            (particle_step_system, particle_render_system).chain(),
        );
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Advance the particle field once per frame.
///
/// Frozen while the physics pipeline is paused so effects hang in the air
/// alongside the frozen bodies.
pub fn particle_step_system(
    mut field: ResMut<ParticleField>,
    rapier_config: Query<&RapierConfiguration>,
) {
    let paused = rapier_config
        .single()
        .map(|cfg| !cfg.physics_pipeline_active)
        .unwrap_or(false);
    if paused {
        return;
    }
    field.step();
}

/// Draw each particle as a gizmo circle faded by its remaining life.
pub fn particle_render_system(field: Res<ParticleField>, mut gizmos: Gizmos) {
    for p in field.iter() {
        let base = p.color.to_srgba();
        let color = Color::srgba(base.red, base.green, base.blue, base.alpha * p.alpha());
        gizmos.circle_2d(p.position, p.size, color);
    }
}
