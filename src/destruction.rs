//! Impact-driven fracture: the rules that decide when a body breaks and what
//! it breaks into.
//!
//! ## Pipeline
//!
//! 1. Rapier raises `CollisionEvent::Started` for pairs involving a block.
//! 2. `collision_monitor_system` scores each material participant on its own
//!    motion: `impact = speed × mass`, with speed read in units per tick.
//! 3. Above the material's fracture threshold the body is broken up by
//!    [`fracture_body`]; softer hits above [`SPARK_IMPACT_FLOOR`] just throw
//!    sparks.
//!
//! ## Fracture recipe
//!
//! | Quantity       | Rule                                       |
//! |----------------|--------------------------------------------|
//! | fragment count | `clamp(⌊w·h / 400⌋, 2, 4)`                 |
//! | fragment size  | `max(5, min(w, h) / 2)` square             |
//! | placement      | centre ± 25% of the bounds on each axis    |
//! | velocity       | inherited ± 2.5 u/tick jitter on each axis |
//!
//! `w`/`h` are the rotated bounding box of the body's outline, so a toppled
//! plank shatters along its resting footprint.  A degenerate outline clamps to
//! the minimum fragment size rather than failing; once despawned, a body must
//! always be replaced by rubble.
//!
//! Fragments carry [`Debris`] and no [`Block`], so an impact can never
//! re-fracture them.  All removals and insertions go through `Commands`, which
//! apply after the contact pass completes; a per-pass seen-set keeps duplicate
//! contacts from fracturing the same body twice before that.

use crate::block::{Block, Debris, DebrisTint, Paint, Vertices};
use crate::constants::*;
use crate::material::{darkened, generic_debris_color};
use crate::particles::ParticleField;
use crate::rng::FractureRng;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::Rng;
use std::collections::HashSet;

// ── Impact scoring ────────────────────────────────────────────────────────────

/// Momentum-style proxy for how destructive a contact is.
///
/// `speed` is the body's own velocity magnitude in units per tick; `mass` its
/// cached material mass.  Compared strictly against the material threshold, so
/// a body exactly at threshold survives.
pub fn impact_magnitude(speed: f32, mass: f32) -> f32 {
    speed * mass
}

/// How many fragments a `width × height` body shatters into.
pub fn fragment_count(width: f32, height: f32) -> u32 {
    ((width * height / FRACTURE_AREA_PER_FRAGMENT).floor() as u32)
        .clamp(FRAGMENT_COUNT_MIN, FRAGMENT_COUNT_MAX)
}

/// Side length of the square fragments for a `width × height` body.
pub fn fragment_size(width: f32, height: f32) -> f32 {
    (width.min(height) / 2.0).max(FRAGMENT_MIN_SIZE)
}

/// Width and height of the rotated outline's axis-aligned bounds.
///
/// An empty outline yields `(0, 0)`, which the recipe clamps downstream.
pub fn rotated_extents(vertices: &[Vec2], rotation: Quat) -> (f32, f32) {
    if vertices.is_empty() {
        return (0.0, 0.0);
    }
    let mut min = Vec2::splat(f32::INFINITY);
    let mut max = Vec2::splat(f32::NEG_INFINITY);
    for v in vertices {
        let w = rotation.mul_vec3(v.extend(0.0)).truncate();
        min = min.min(w);
        max = max.max(w);
    }
    (max.x - min.x, max.y - min.y)
}

/// Debris colour resolution: explicit override first, then the body's own
/// tint, then generic gray.
pub fn resolve_debris_color(override_color: Option<Color>, tint: Option<&DebrisTint>) -> Color {
    override_color
        .or(tint.map(|t| t.0))
        .unwrap_or_else(generic_debris_color)
}

// ── Fracture ──────────────────────────────────────────────────────────────────

/// Replace one body with 2–4 debris fragments and a dust burst.
///
/// The despawn and every fragment spawn are deferred through `Commands`; the
/// caller is responsible for not invoking this twice on the same entity within
/// one pass.
#[allow(clippy::too_many_arguments)]
pub fn fracture_body(
    commands: &mut Commands,
    entity: Entity,
    transform: &Transform,
    velocity: Vec2,
    vertices: &[Vec2],
    color: Color,
    field: &mut ParticleField,
    rng: &mut impl Rng,
) {
    let position = transform.translation.truncate();
    let (width, height) = rotated_extents(vertices, transform.rotation);
    let count = fragment_count(width, height);
    let size = fragment_size(width, height);

    commands.entity(entity).despawn();

    for _ in 0..count {
        let offset = Vec2::new(
            (rng.gen::<f32>() * 2.0 - 1.0) * FRAGMENT_POSITION_JITTER * width,
            (rng.gen::<f32>() * 2.0 - 1.0) * FRAGMENT_POSITION_JITTER * height,
        );
        // Jitter is tuned per tick; Rapier wants units per second.
        let kick = Vec2::new(
            (rng.gen::<f32>() * 2.0 - 1.0) * FRAGMENT_VELOCITY_JITTER * TICK_RATE,
            (rng.gen::<f32>() * 2.0 - 1.0) * FRAGMENT_VELOCITY_JITTER * TICK_RATE,
        );
        spawn_fragment(commands, position + offset, size, velocity + kick, color);
    }

    field.emit_debris(position, color, FRACTURE_BURST_COUNT, rng);
}

/// One square rubble fragment with generic debris physics.
fn spawn_fragment(
    commands: &mut Commands,
    position: Vec2,
    size: f32,
    velocity: Vec2,
    color: Color,
) -> Entity {
    let half = size / 2.0;
    commands
        .spawn((
            (
                Transform::from_translation(position.extend(0.05)),
                GlobalTransform::default(),
                Debris,
                Vertices(vec![
                    Vec2::new(-half, -half),
                    Vec2::new(half, -half),
                    Vec2::new(half, half),
                    Vec2::new(-half, half),
                ]),
                Paint {
                    fill: color,
                    stroke: darkened(color, 0.7),
                },
                DebrisTint(color),
            ),
            (
                RigidBody::Dynamic,
                Collider::cuboid(half, half),
                ColliderMassProperties::Density(DEBRIS_DENSITY),
                Friction::coefficient(DEBRIS_FRICTION),
                Restitution::coefficient(DEBRIS_RESTITUTION),
                Velocity {
                    linvel: velocity,
                    angvel: 0.0,
                },
                ExternalImpulse::default(),
            ),
        ))
        .id()
}

// ── Contact monitoring ────────────────────────────────────────────────────────

/// Score every material participant of each new contact and fracture the ones
/// hit hard enough.
///
/// Statics, debris, and projectiles carry no [`Block`], so the query lookup
/// filters them out; they are never modified here.
pub fn collision_monitor_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    q_blocks: Query<(&Block, &Transform, &Velocity, &Vertices, &DebrisTint)>,
    mut field: ResMut<ParticleField>,
    mut rng: ResMut<FractureRng>,
) {
    let mut broken: HashSet<Entity> = Default::default();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        for entity in [e1, e2] {
            if broken.contains(&entity) {
                continue;
            }
            let Ok((block, transform, velocity, vertices, tint)) = q_blocks.get(entity) else {
                continue;
            };

            let speed = velocity.linvel.length() / TICK_RATE;
            let impact = impact_magnitude(speed, block.mass);
            let threshold = block.material.def().fracture_threshold;

            if impact > threshold {
                broken.insert(entity);
                fracture_body(
                    &mut commands,
                    entity,
                    transform,
                    velocity.linvel,
                    &vertices.0,
                    resolve_debris_color(None, Some(tint)),
                    &mut field,
                    &mut rng.0,
                );
            } else if impact > SPARK_IMPACT_FLOOR {
                field.emit_sparks(transform.translation.truncate(), &mut rng.0);
            }
        }
    }
}

pub struct DestructionPlugin;

impl Plugin for DestructionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, collision_monitor_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

    fn destruction_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<CollisionEvent>();
        app.insert_resource(ParticleField::default());
        app.insert_resource(FractureRng::seeded(7));
        app.add_systems(Update, collision_monitor_system);
        app
    }

    /// A block with an explicit mass and per-second velocity, bypassing the
    /// live spawn path so tests control the impact arithmetic exactly.
    fn spawn_test_block(
        app: &mut App,
        material: Material,
        mass: f32,
        linvel: Vec2,
        width: f32,
        height: f32,
    ) -> Entity {
        let hw = width / 2.0;
        let hh = height / 2.0;
        app.world_mut()
            .spawn((
                Block { material, mass },
                Transform::default(),
                Velocity {
                    linvel,
                    angvel: 0.0,
                },
                Vertices(vec![
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ]),
                DebrisTint(Material::Wood.def().debris),
            ))
            .id()
    }

    fn send_contact(app: &mut App, a: Entity, b: Entity) {
        app.world_mut()
            .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
    }

    fn debris_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<Debris>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn impact_is_speed_times_mass() {
        // Wood threshold is 5: slow-and-light survives, slow-and-heavy breaks.
        let threshold = Material::Wood.def().fracture_threshold;
        assert!(impact_magnitude(3.0, 1.0) < threshold);
        assert!(impact_magnitude(2.0, 3.0) > threshold);
    }

    #[test]
    fn fragment_count_scales_with_area() {
        assert_eq!(fragment_count(80.0, 30.0), 4, "2400 u² caps at 4");
        assert_eq!(fragment_count(40.0, 30.0), 3, "1200 u² gives 3");
        assert_eq!(fragment_count(20.0, 20.0), 2, "small bodies floor at 2");
        assert_eq!(fragment_count(0.0, 0.0), 2, "degenerate bounds floor at 2");
    }

    #[test]
    fn fragment_size_is_half_the_short_side_with_floor() {
        assert_eq!(fragment_size(80.0, 30.0), 15.0);
        assert_eq!(fragment_size(6.0, 40.0), 5.0);
        assert_eq!(fragment_size(0.0, 0.0), 5.0, "degenerate bounds clamp up");
    }

    #[test]
    fn rotated_extents_track_the_rotation() {
        let square = vec![
            Vec2::new(-5.0, -5.0),
            Vec2::new(5.0, -5.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(-5.0, 5.0),
        ];
        let (w, h) = rotated_extents(&square, Quat::IDENTITY);
        assert!((w - 10.0).abs() < 1e-4);
        assert!((h - 10.0).abs() < 1e-4);

        // A square at 45° spans its diagonal on both axes.
        let (w, h) = rotated_extents(&square, Quat::from_rotation_z(std::f32::consts::FRAC_PI_4));
        let diagonal = 10.0 * 2.0_f32.sqrt();
        assert!((w - diagonal).abs() < 1e-3);
        assert!((h - diagonal).abs() < 1e-3);
    }

    #[test]
    fn debris_color_resolution_order() {
        let over = Color::srgb(1.0, 0.0, 0.0);
        let tint = DebrisTint(Color::srgb(0.0, 1.0, 0.0));
        assert_eq!(resolve_debris_color(Some(over), Some(&tint)), over);
        assert_eq!(resolve_debris_color(None, Some(&tint)), tint.0);
        assert_eq!(resolve_debris_color(None, None), generic_debris_color());
    }

    #[test]
    fn hard_impact_replaces_block_with_fragments_and_dust() {
        let mut app = destruction_test_app();
        // 2 u/tick at mass 9.6 scores 19.2, well past wood's threshold of 5.
        let block = spawn_test_block(
            &mut app,
            Material::Wood,
            9.6,
            Vec2::new(2.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let wall = app.world_mut().spawn(Transform::default()).id();

        send_contact(&mut app, block, wall);
        app.update();

        assert!(
            app.world().get_entity(block).is_err(),
            "fractured block must be despawned"
        );
        assert_eq!(debris_count(&mut app), 4, "80×30 bounds shatter into 4");
        assert_eq!(
            app.world().resource::<ParticleField>().len() as u32,
            FRACTURE_BURST_COUNT,
            "one dust burst per fracture"
        );
        assert!(
            app.world().get_entity(wall).is_ok(),
            "the contact partner is untouched"
        );
    }

    #[test]
    fn impact_exactly_at_threshold_does_not_fracture() {
        let mut app = destruction_test_app();
        // Speed 5 u/tick × mass 1 lands exactly on wood's threshold.
        let block = spawn_test_block(
            &mut app,
            Material::Wood,
            1.0,
            Vec2::new(5.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let wall = app.world_mut().spawn(Transform::default()).id();

        send_contact(&mut app, block, wall);
        app.update();

        assert!(app.world().get_entity(block).is_ok());
        assert_eq!(debris_count(&mut app), 0);
    }

    #[test]
    fn wood_scenario_light_survives_heavy_breaks() {
        let mut app = destruction_test_app();
        let light = spawn_test_block(
            &mut app,
            Material::Wood,
            1.0,
            Vec2::new(3.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let heavy = spawn_test_block(
            &mut app,
            Material::Wood,
            3.0,
            Vec2::new(2.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let wall = app.world_mut().spawn(Transform::default()).id();

        send_contact(&mut app, light, wall);
        send_contact(&mut app, heavy, wall);
        app.update();

        assert!(
            app.world().get_entity(light).is_ok(),
            "impact 3 is under wood's threshold of 5"
        );
        assert!(
            app.world().get_entity(heavy).is_err(),
            "impact 6 is over wood's threshold of 5"
        );
    }

    #[test]
    fn duplicate_contacts_fracture_once() {
        let mut app = destruction_test_app();
        let block = spawn_test_block(
            &mut app,
            Material::Glass,
            5.0,
            Vec2::new(4.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let wall = app.world_mut().spawn(Transform::default()).id();
        let floor = app.world_mut().spawn(Transform::default()).id();

        // The same body reported in two pairs within one pass.
        send_contact(&mut app, block, wall);
        send_contact(&mut app, floor, block);
        app.update();

        assert_eq!(
            debris_count(&mut app),
            4,
            "the seen-set must stop a second fracture of the same body"
        );
    }

    #[test]
    fn fragments_inherit_velocity_with_bounded_jitter() {
        let mut app = destruction_test_app();
        let parent_vel = Vec2::new(7.0 * TICK_RATE, 0.0);
        let block = spawn_test_block(&mut app, Material::Glass, 5.0, parent_vel, 80.0, 30.0);
        let wall = app.world_mut().spawn(Transform::default()).id();

        send_contact(&mut app, block, wall);
        app.update();

        let jitter = FRAGMENT_VELOCITY_JITTER * TICK_RATE;
        let mut checked = 0;
        let mut query = app.world_mut().query_filtered::<&Velocity, With<Debris>>();
        for velocity in query.iter(app.world()) {
            let delta = velocity.linvel - parent_vel;
            assert!(delta.x.abs() <= jitter + 1e-3, "x jitter out of range");
            assert!(delta.y.abs() <= jitter + 1e-3, "y jitter out of range");
            checked += 1;
        }
        assert!(checked >= 2, "fracture must produce fragments to check");
    }

    #[test]
    fn soft_contact_sparks_without_breaking() {
        let mut app = destruction_test_app();
        // Impact 3 on wood: under the threshold of 5, over the spark floor.
        let block = spawn_test_block(
            &mut app,
            Material::Wood,
            1.0,
            Vec2::new(3.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let wall = app.world_mut().spawn(Transform::default()).id();

        send_contact(&mut app, block, wall);
        app.update();

        assert!(app.world().get_entity(block).is_ok());
        assert_eq!(debris_count(&mut app), 0);
        let sparks = app.world().resource::<ParticleField>().len();
        assert!(
            sparks > 0 && (sparks as u32) < FRACTURE_BURST_COUNT,
            "a soft contact throws a small spark burst, got {sparks}"
        );
    }

    #[test]
    fn debris_cannot_refracture_from_contacts() {
        let mut app = destruction_test_app();
        let block = spawn_test_block(
            &mut app,
            Material::Glass,
            5.0,
            Vec2::new(4.0 * TICK_RATE, 0.0),
            80.0,
            30.0,
        );
        let wall = app.world_mut().spawn(Transform::default()).id();
        send_contact(&mut app, block, wall);
        app.update();
        let first_wave = debris_count(&mut app);

        // Slam every fragment into the wall; none carries a material rule.
        let fragments: Vec<Entity> = app
            .world_mut()
            .query_filtered::<Entity, With<Debris>>()
            .iter(app.world())
            .collect();
        for fragment in fragments {
            send_contact(&mut app, fragment, wall);
        }
        app.update();

        assert_eq!(debris_count(&mut app), first_wave);
    }
}
