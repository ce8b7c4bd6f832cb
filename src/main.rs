use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use std::env;

mod arena;
mod block;
mod block_rendering;
mod config;
mod constants;
mod destruction;
mod error;
mod explosion;
mod graphics;
mod laser;
mod material;
mod particles;
mod rendering;
mod rng;
mod tools;

use block::Preset;
use config::SandboxConfig;
use particles::ParticleField;
use rng::FractureRng;

/// Replace the entropy-seeded fracture RNG when the config file pins a seed.
fn seed_fracture_rng(config: Res<SandboxConfig>, mut rng: ResMut<FractureRng>) {
    if let Some(seed) = config.rng_seed {
        *rng = FractureRng::seeded(seed);
        eprintln!("[SETUP] Fracture RNG pinned to seed {seed}");
    }
}

/// Rebuild the (still empty) particle field with the configured cap.
fn apply_particle_cap(config: Res<SandboxConfig>, mut field: ResMut<ParticleField>) {
    *field = ParticleField::with_cap(config.particle_cap);
}

fn spawn_scene_tower(mut commands: Commands) {
    block::build_preset(&mut commands, Preset::Tower, 0.0);
}

fn spawn_scene_wall(mut commands: Commands) {
    block::build_preset(&mut commands, Preset::Wall, 0.0);
}

fn spawn_scene_bridge(mut commands: Commands) {
    block::build_preset(&mut commands, Preset::Bridge, 0.0);
}

fn main() {
    // Check for a preset scene request
    let scene = env::var("RUBBLE_SCENE").ok();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Rubble".into(),
            resolution: WindowResolution::new(1280, 720),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb_u8(0x16, 0x21, 0x3e)))
    // Insert SandboxConfig with compiled defaults; load_sandbox_config will
    // overwrite it from assets/sandbox.toml (if present) in the Startup schedule.
    .insert_resource(SandboxConfig::default())
    .insert_resource(FractureRng::from_entropy())
    // pixels_per_meter(1.0) keeps world units identical to screen pixels.
    // Setting this to any larger value shrinks collider mass in physics-space
    // quadratically and causes ExternalImpulse to produce runaway acceleration
    // at the same numeric values.
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .add_plugins((
        particles::ParticlesPlugin,
        destruction::DestructionPlugin,
        laser::LaserPlugin,
        tools::ToolsPlugin,
        arena::ArenaPlugin,
        graphics::GraphicsPlugin,
        block_rendering::BlockRenderingPlugin,
        rendering::HudPlugin,
    ))
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_sandbox_config,
            seed_fracture_rng.after(config::load_sandbox_config),
            apply_particle_cap.after(config::load_sandbox_config),
            graphics::setup_camera.after(config::load_sandbox_config),
            arena::setup_ground.after(config::load_sandbox_config),
            arena::setup_gravity.after(config::load_sandbox_config),
            rendering::setup_hud
                .after(graphics::setup_camera)
                .after(config::load_sandbox_config),
        ),
    );

    // Spawn the requested preset once the ground exists
    if let Some(scene_name) = scene {
        match scene_name.as_str() {
            "tower" => {
                app.add_systems(Startup, spawn_scene_tower.after(arena::setup_ground));
                println!("Starting scene: {}", scene_name);
            }
            "wall" => {
                app.add_systems(Startup, spawn_scene_wall.after(arena::setup_ground));
                println!("Starting scene: {}", scene_name);
            }
            "bridge" => {
                app.add_systems(Startup, spawn_scene_bridge.after(arena::setup_ground));
                println!("Starting scene: {}", scene_name);
            }
            other => {
                eprintln!("Unknown scene '{other}'; starting with an empty arena");
            }
        }
    }

    app.run();
}
