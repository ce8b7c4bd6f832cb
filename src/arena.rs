//! World management: the ground slab, reset, pause, and the gravity dial.

use crate::block::{Block, Debris, Paint, Projectile, Vertices};
use crate::config::SandboxConfig;
use crate::constants::*;
use crate::particles::ParticleField;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Marker for the static ground slab.
#[derive(Component)]
pub struct Ground;

/// Multiplier applied to base gravity, stepped with Up/Down.
#[derive(Resource)]
pub struct GravitySetting {
    pub scale: f32,
}

impl Default for GravitySetting {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

/// Spawn the one static body everything lands on.
pub fn setup_ground(mut commands: Commands) {
    let hw = GROUND_WIDTH / 2.0;
    let hh = GROUND_HEIGHT / 2.0;
    commands.spawn((
        Transform::from_xyz(0.0, GROUND_Y, 0.0),
        GlobalTransform::default(),
        Ground,
        Vertices(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]),
        Paint {
            fill: Color::srgb_u8(0x2D, 0x34, 0x36),
            stroke: Color::srgb_u8(0x1E, 0x23, 0x24),
        },
        RigidBody::Fixed,
        Collider::cuboid(hw, hh),
        Friction::coefficient(GROUND_FRICTION),
    ));
    eprintln!("[SETUP] Ground spawned");
}

/// Point Rapier's gravity down at the configured strength.
///
/// Also seeds the runtime gravity scale from the config file, so a tuned
/// `gravity_scale` takes effect before the Up/Down keys ever move it.
pub fn setup_gravity(
    config: Res<SandboxConfig>,
    mut setting: ResMut<GravitySetting>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    setting.scale = config.gravity_scale;
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity_accel * setting.scale);
    }
}

/// Space toggles the physics pipeline; frozen bodies keep their velocities.
pub fn pause_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for mut cfg in rapier_config.iter_mut() {
        cfg.physics_pipeline_active = !cfg.physics_pipeline_active;
        info!(
            "Physics {}",
            if cfg.physics_pipeline_active {
                "resumed"
            } else {
                "paused"
            }
        );
    }
}

/// Up/Down steps the gravity multiplier through 0–3 and reapplies it.
pub fn gravity_control_system(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<SandboxConfig>,
    mut setting: ResMut<GravitySetting>,
    mut rapier_config: Query<&mut RapierConfiguration>,
) {
    let step = if keys.just_pressed(KeyCode::ArrowUp) {
        GRAVITY_SCALE_STEP
    } else if keys.just_pressed(KeyCode::ArrowDown) {
        -GRAVITY_SCALE_STEP
    } else {
        return;
    };

    setting.scale = (setting.scale + step).clamp(GRAVITY_SCALE_MIN, GRAVITY_SCALE_MAX);
    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity_accel * setting.scale);
    }
    info!("Gravity scale {:.1}", setting.scale);
}

/// R clears every placed, shattered, or launched body plus all particles.
///
/// The ground is not despawned, so the arena is immediately buildable again.
pub fn reset_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    bodies: Query<Entity, Or<(With<Block>, With<Debris>, With<Projectile>)>>,
    mut field: ResMut<ParticleField>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    let mut cleared = 0;
    for entity in bodies.iter() {
        commands.entity(entity).despawn();
        cleared += 1;
    }
    field.clear();
    info!("Reset: cleared {cleared} bodies");
}

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        // setup_ground and setup_gravity run from main's Startup chain, after
        // the config file has been applied.
        app.init_resource::<GravitySetting>().add_systems(
            Update,
            (pause_system, gravity_control_system, reset_system),
        );
    }
}
