//! Headless scenario tests for the destruction pipeline.
//!
//! These tests build on [`MinimalPlugins`] (no window, no Rapier stepping)
//! and drive the logic systems directly: contacts arrive as synthetic
//! [`CollisionEvent`] messages, cuts are resolved from a preset gesture, and
//! input is injected through [`ButtonInput`].
//!
//! Covered scenarios:
//! 1. A fast falling block shatters on ground contact into fragments + dust.
//! 2. A freshly built tower survives zero-speed settling contacts.
//! 3. Debris inherits the fractured material's debris tint.
//! 4. Explosion impulses fall off with distance and skip static bodies.
//! 5. A laser release severs exactly the bodies the beam crossed.
//! 6. The reset key clears blocks, debris, and particles but not the ground.
//! 7. Pausing freezes the particle field; resuming thaws it.
//! 8. Gravity-scale keys rewrite the Rapier gravity vector.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

use rubble::arena::{self, GravitySetting, Ground};
use rubble::block::{spawn_block, Block, BlockShape, Debris, Paint};
use rubble::config::SandboxConfig;
use rubble::constants::{
    BOMB_FORCE, BOMB_RADIUS, EXPLOSION_IMPULSE_SCALE, FRACTURE_BURST_COUNT, GRAVITY_SCALE_STEP,
    TICK_RATE,
};
use rubble::destruction;
use rubble::explosion::apply_explosion;
use rubble::laser::{self, CutState};
use rubble::material::Material;
use rubble::particles::{self, BurstParams, ParticleField};
use rubble::rng::FractureRng;
use rubble::tools::{GameMode, ToolState, Weapon};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a headless app wired like the real game, minus every render system.
///
/// The update set mirrors the production plugin order: contact fractures are
/// applied before cut resolution so the two never fight over an entity.
fn sandbox_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_message::<CollisionEvent>();
    app.init_resource::<ButtonInput<KeyCode>>();
    app.init_resource::<ButtonInput<MouseButton>>();
    app.init_resource::<GravitySetting>();
    app.init_resource::<CutState>();
    app.insert_resource(SandboxConfig::default());
    app.insert_resource(ParticleField::default());
    app.insert_resource(FractureRng::seeded(99));
    app.insert_resource(ToolState::default());
    app.add_systems(Startup, arena::setup_ground);
    app.add_systems(
        Update,
        (
            destruction::collision_monitor_system,
            laser::cut_gesture_system.after(destruction::collision_monitor_system),
            particles::particle_step_system,
            arena::pause_system,
            arena::gravity_control_system,
            arena::reset_system,
        ),
    );
    app
}

/// Spawn a default-size rect block of `material` through the public spawn path.
fn spawn_rect_block(app: &mut App, position: Vec2, material: Material) -> Entity {
    app.world_mut()
        .run_system_once(move |mut commands: Commands| {
            spawn_block(&mut commands, position, BlockShape::default_rect(), material)
        })
        .expect("spawn system runs")
}

/// Inject a synthetic contact between two colliders.
fn send_contact(app: &mut App, a: Entity, b: Entity) {
    app.world_mut()
        .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
}

/// Press a key for exactly one frame.
///
/// `reset` wipes the pressed and just-pressed state afterwards; nothing else
/// clears it in a headless app, and a lingering just-press would re-trigger
/// the toggle systems on every later update.
fn press_key(app: &mut App, key: KeyCode) {
    {
        let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        input.clear();
        input.press(key);
    }
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .reset(key);
}

fn ground_entity(app: &mut App) -> Entity {
    let mut query = app.world_mut().query_filtered::<Entity, With<Ground>>();
    query.single(app.world()).unwrap()
}

fn block_count(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, With<Block>>();
    query.iter(app.world()).count()
}

fn debris_count(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, With<Debris>>();
    query.iter(app.world()).count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// A wood block hitting the ground at speed 2 u/tick carries impact
/// 2 × 9.6 = 19.2, well past wood's threshold of 5: it must be replaced by
/// four fragments (80×30 → area rule) plus a debris dust burst.
#[test]
fn falling_block_shatters_on_the_ground() {
    let mut app = sandbox_app();
    let block = spawn_rect_block(&mut app, Vec2::new(0.0, 60.0), Material::Wood);
    app.update(); // ground spawns, block settles into the world

    app.world_mut()
        .get_mut::<Velocity>(block)
        .expect("block has a velocity")
        .linvel = Vec2::new(0.0, -2.0 * TICK_RATE);
    let ground = ground_entity(&mut app);
    send_contact(&mut app, block, ground);
    app.update();

    assert!(
        app.world().get_entity(block).is_err(),
        "the shattered block must be despawned"
    );
    assert_eq!(debris_count(&mut app), 4, "80x30 fractures into 4 fragments");
    assert_eq!(
        app.world().resource::<ParticleField>().len(),
        FRACTURE_BURST_COUNT as usize,
        "fracture emits one dust burst"
    );
}

/// Settling contacts carry zero speed, so a freshly built tower must survive
/// them untouched, with no fragments and no sparks.
#[test]
fn resting_tower_survives_settling_contacts() {
    let mut app = sandbox_app();
    app.world_mut()
        .run_system_once(|mut commands: Commands| {
            rubble::block::build_preset(&mut commands, rubble::block::Preset::Tower, 0.0);
        })
        .expect("preset system runs");
    app.update();
    assert_eq!(block_count(&mut app), 16, "tower preset is 8 rows of 2");

    let bricks: Vec<Entity> = {
        let mut query = app.world_mut().query_filtered::<Entity, With<Block>>();
        query.iter(app.world()).take(2).collect()
    };
    let ground = ground_entity(&mut app);
    send_contact(&mut app, bricks[0], bricks[1]);
    send_contact(&mut app, bricks[0], ground);
    app.update();

    assert_eq!(block_count(&mut app), 16, "no brick may break while at rest");
    assert_eq!(debris_count(&mut app), 0);
    assert!(
        app.world().resource::<ParticleField>().is_empty(),
        "zero-speed contacts are below the spark floor"
    );
}

/// Fragments of a stone block must be painted in stone's debris color, not
/// the generic gray.
#[test]
fn debris_inherits_the_material_tint() {
    let mut app = sandbox_app();
    let block = spawn_rect_block(&mut app, Vec2::new(0.0, 60.0), Material::Stone);
    app.update();

    app.world_mut()
        .get_mut::<Velocity>(block)
        .expect("block has a velocity")
        .linvel = Vec2::new(0.0, -4.0 * TICK_RATE);
    let ground = ground_entity(&mut app);
    send_contact(&mut app, block, ground);
    app.update();

    let expected = Material::Stone.def().debris;
    let mut fragments = app
        .world_mut()
        .query_filtered::<&Paint, With<Debris>>();
    let mut seen = 0;
    for paint in fragments.iter(app.world()) {
        assert_eq!(paint.fill, expected, "fragment fill must match stone debris");
        seen += 1;
    }
    assert!(seen > 0, "the impact must produce fragments");
}

/// Closer bodies receive the stronger impulse, statics receive none, and the
/// blast leaves a particle plume behind.
#[test]
fn explosion_falloff_orders_impulses_and_skips_statics() {
    let mut app = sandbox_app();
    let near = spawn_rect_block(&mut app, Vec2::new(-60.0, 0.0), Material::Wood);
    let far = spawn_rect_block(&mut app, Vec2::new(110.0, 0.0), Material::Wood);
    let slab = app
        .world_mut()
        .spawn((
            RigidBody::Fixed,
            Transform::from_xyz(30.0, 0.0, 0.0),
            ExternalImpulse::default(),
        ))
        .id();
    app.update();

    app.world_mut()
        .run_system_once(
            |mut field: ResMut<ParticleField>,
             mut rng: ResMut<FractureRng>,
             mut bodies: Query<(&RigidBody, &Transform, &mut ExternalImpulse)>| {
                apply_explosion(
                    Vec2::ZERO,
                    BOMB_RADIUS,
                    BOMB_FORCE,
                    EXPLOSION_IMPULSE_SCALE,
                    bodies.iter_mut(),
                    &mut field,
                    &mut rng.0,
                );
            },
        )
        .expect("detonation system runs");

    let impulse = |app: &App, e: Entity| app.world().get::<ExternalImpulse>(e).unwrap().impulse;
    let near_impulse = impulse(&app, near);
    let far_impulse = impulse(&app, far);
    assert!(
        near_impulse.length() > far_impulse.length(),
        "impulse must fall off with distance: {} vs {}",
        near_impulse.length(),
        far_impulse.length()
    );
    assert!(far_impulse.length() > 0.0, "inside the radius means pushed");
    assert!(near_impulse.x < 0.0, "the push points away from the origin");
    assert_eq!(
        impulse(&app, slab),
        Vec2::ZERO,
        "static bodies must be unaffected"
    );
    assert!(
        !app.world().resource::<ParticleField>().is_empty(),
        "the blast must leave a particle plume"
    );
}

/// Releasing the laser severs the crossed block, leaves the distant block and
/// the static ground alone, and re-arms for the next drag.
#[test]
fn laser_release_cuts_crossed_bodies_only() {
    let mut app = sandbox_app();
    app.world_mut().resource_mut::<ToolState>().mode = GameMode::Destroy;
    app.world_mut().resource_mut::<ToolState>().weapon = Weapon::Laser;
    let crossed = spawn_rect_block(&mut app, Vec2::ZERO, Material::Wood);
    let distant = spawn_rect_block(&mut app, Vec2::new(400.0, 0.0), Material::Wood);
    app.update();

    *app.world_mut().resource_mut::<CutState>() = CutState::Cutting {
        start: Vec2::new(-60.0, 0.0),
        end: Vec2::new(60.0, 0.0),
    };
    {
        let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);
    }
    app.update();

    assert!(
        app.world().get_entity(crossed).is_err(),
        "the crossed block must be severed"
    );
    assert!(
        app.world().get_entity(distant).is_ok(),
        "a block away from the beam must survive"
    );
    let ground = ground_entity(&mut app);
    assert!(app.world().get_entity(ground).is_ok(), "ground is immune");
    assert_eq!(debris_count(&mut app), 4, "the cut shatters one 80x30 block");
    assert_eq!(
        *app.world().resource::<CutState>(),
        CutState::Idle,
        "the gesture must return to idle after release"
    );
}

/// R clears every block, fragment, and particle; the ground slab stays.
#[test]
fn reset_clears_a_built_scene() {
    let mut app = sandbox_app();
    app.world_mut()
        .run_system_once(|mut commands: Commands| {
            rubble::block::build_preset(&mut commands, rubble::block::Preset::Wall, 0.0);
        })
        .expect("preset system runs");
    app.update();
    app.world_mut().resource_scope(|world, mut field: Mut<ParticleField>| {
        let mut rng = world.resource_mut::<FractureRng>();
        field.emit_sparks(Vec2::ZERO, &mut rng.0);
    });
    assert_eq!(block_count(&mut app), 25, "wall preset is 5x5");

    press_key(&mut app, KeyCode::KeyR);

    assert_eq!(block_count(&mut app), 0, "reset removes every block");
    assert_eq!(debris_count(&mut app), 0);
    assert!(app.world().resource::<ParticleField>().is_empty());
    let mut ground = app.world_mut().query_filtered::<Entity, With<Ground>>();
    assert_eq!(
        ground.iter(app.world()).count(),
        1,
        "the ground must survive a reset"
    );
}

/// While the physics pipeline is off, the particle field must not advance;
/// toggling back on resumes it.
#[test]
fn pause_freezes_the_particle_field() {
    let mut app = sandbox_app();
    app.world_mut().spawn(RapierConfiguration::new(1.0));
    app.world_mut().resource_scope(|world, mut field: Mut<ParticleField>| {
        let mut rng = world.resource_mut::<FractureRng>();
        let params = BurstParams {
            count: 1,
            speed: 4.0,
            gravity: 0.0,
            life: 600,
            ..Default::default()
        };
        field.emit(Vec2::ZERO, params, &mut rng.0);
    });

    press_key(&mut app, KeyCode::Space); // pause
    app.update(); // the pipeline flag is definitely off by now
    let frozen = app
        .world()
        .resource::<ParticleField>()
        .iter()
        .next()
        .expect("particle alive")
        .position;
    app.update();
    let still_frozen = app
        .world()
        .resource::<ParticleField>()
        .iter()
        .next()
        .expect("particle alive")
        .position;
    assert_eq!(frozen, still_frozen, "paused particles must not move");

    press_key(&mut app, KeyCode::Space); // resume
    app.update();
    let thawed = app
        .world()
        .resource::<ParticleField>()
        .iter()
        .next()
        .expect("particle alive")
        .position;
    assert_ne!(still_frozen, thawed, "resumed particles must move again");
}

/// One ArrowUp step must scale the Rapier gravity vector by the new setting.
#[test]
fn gravity_scale_steps_update_rapier() {
    let mut app = sandbox_app();
    app.world_mut().spawn(RapierConfiguration::new(1.0));

    press_key(&mut app, KeyCode::ArrowUp);

    let scale = app.world().resource::<GravitySetting>().scale;
    assert!(
        (scale - (1.0 + GRAVITY_SCALE_STEP)).abs() < 1e-6,
        "one step up from the default scale"
    );
    let accel = app.world().resource::<SandboxConfig>().gravity_accel;
    let mut query = app.world_mut().query::<&RapierConfiguration>();
    let cfg = query.single(app.world()).unwrap();
    assert_eq!(
        cfg.gravity,
        Vec2::new(0.0, -accel * scale),
        "the gravity vector must track the scale"
    );
}
