//! Buildable blocks: shapes, materials, spawn helpers, and structure presets.
//!
//! ## Components
//!
//! | Component    | Carried by                  | Purpose                          |
//! |--------------|-----------------------------|----------------------------------|
//! | [`Block`]    | placed blocks only          | material kind + cached mass      |
//! | [`Vertices`] | every destructible body     | local-space polygon for cut tests|
//! | [`Paint`]    | every destructible body     | fill/stroke colours for meshes   |
//! | [`DebrisTint`] | every destructible body   | colour its debris inherits       |
//! | [`Debris`]   | fracture fragments          | marks material-less rubble       |
//! | [`Projectile`] | cannonballs, wrecking balls | marks material-less tools      |
//!
//! The split matters for the collision monitor: only [`Block`] entities have a
//! fracture threshold; debris and projectiles break only when cut directly.
//!
//! Circles carry a 12-gon [`Vertices`] approximation so the cut resolver can
//! treat every body as a polygon edge loop.

use crate::constants::*;
use crate::material::Material;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// A placed building block.
///
/// `mass` is cached at spawn (material density × shape area) so the impact
/// check never has to read mass back out of the physics engine.
#[derive(Component)]
pub struct Block {
    pub material: Material,
    pub mass: f32,
}

/// Local-space polygon outline of a destructible body.
///
/// For rects and triangles these are the exact corners; for circles a
/// [`CIRCLE_CUT_SEGMENTS`]-gon stands in.  World-space points are obtained by
/// applying the entity's `Transform`.
#[derive(Component)]
pub struct Vertices(pub Vec<Vec2>);

/// Fill and stroke colours used by the mesh/outline rendering systems.
#[derive(Component)]
pub struct Paint {
    pub fill: Color,
    pub stroke: Color,
}

/// Colour this body's debris (fragments and dust) inherits when it breaks.
#[derive(Component)]
pub struct DebrisTint(pub Color);

/// Marker: a fracture fragment.  Carries no material, so contact impacts can
/// never re-fracture it; only a direct cut breaks it further.
#[derive(Component)]
pub struct Debris;

/// Marker: a tool-launched body (cannonball or wrecking ball).
#[derive(Component)]
pub struct Projectile;

// ── Shapes ────────────────────────────────────────────────────────────────────

/// The three buildable shapes with their dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockShape {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
    /// Equilateral, point-up, described by its circumradius.
    Triangle { radius: f32 },
}

impl BlockShape {
    /// Default rectangle from the build-tool dimensions.
    pub fn default_rect() -> Self {
        Self::Rect {
            width: BLOCK_RECT_WIDTH,
            height: BLOCK_RECT_HEIGHT,
        }
    }

    pub fn default_circle() -> Self {
        Self::Circle {
            radius: BLOCK_CIRCLE_RADIUS,
        }
    }

    pub fn default_triangle() -> Self {
        Self::Triangle {
            radius: BLOCK_TRIANGLE_RADIUS,
        }
    }

    /// Local-space outline, counter-clockwise.
    pub fn vertices(self) -> Vec<Vec2> {
        match self {
            BlockShape::Rect { width, height } => {
                let hw = width / 2.0;
                let hh = height / 2.0;
                vec![
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ]
            }
            BlockShape::Circle { radius } => regular_polygon(radius, CIRCLE_CUT_SEGMENTS),
            BlockShape::Triangle { radius } => regular_polygon(radius, 3),
        }
    }

    /// Exact shape area (u²), used for the cached mass.
    pub fn area(self) -> f32 {
        match self {
            BlockShape::Rect { width, height } => width * height,
            BlockShape::Circle { radius } => std::f32::consts::PI * radius * radius,
            // Equilateral triangle with circumradius r: (3√3 / 4) · r².
            BlockShape::Triangle { radius } => 3.0 * 3.0_f32.sqrt() / 4.0 * radius * radius,
        }
    }

    /// Axis-aligned bounding box `(width, height)` in local space.
    ///
    /// This is what the fracture recipe measures: fragment count and size are
    /// functions of the bounds, not the exact outline.
    pub fn bounding_box(self) -> (f32, f32) {
        match self {
            BlockShape::Rect { width, height } => (width, height),
            BlockShape::Circle { radius } => (radius * 2.0, radius * 2.0),
            // Point-up: width spans the two base corners, height from base to apex.
            BlockShape::Triangle { radius } => (radius * 3.0_f32.sqrt(), radius * 1.5),
        }
    }

    /// Rapier collider for this shape.
    pub fn collider(self) -> Collider {
        match self {
            BlockShape::Rect { width, height } => Collider::cuboid(width / 2.0, height / 2.0),
            BlockShape::Circle { radius } => Collider::ball(radius),
            BlockShape::Triangle { radius } => {
                let verts = regular_polygon(radius, 3);
                // Three non-collinear points always admit a hull.
                Collider::convex_hull(&verts).unwrap_or(Collider::ball(radius / 2.0))
            }
        }
    }

    /// Lowercase label for the HUD.
    pub fn label(self) -> &'static str {
        match self {
            BlockShape::Rect { .. } => "rect",
            BlockShape::Circle { .. } => "circle",
            BlockShape::Triangle { .. } => "triangle",
        }
    }
}

/// Regular `n`-gon with the first vertex at the top (+Y).
pub fn regular_polygon(radius: f32, sides: u32) -> Vec<Vec2> {
    let n = sides.max(3);
    (0..n)
        .map(|i| {
            let angle = std::f32::consts::FRAC_PI_2 + std::f32::consts::TAU * i as f32 / n as f32;
            Vec2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// Spawn one block of the given shape and material at `position`.
pub fn spawn_block(
    commands: &mut Commands,
    position: Vec2,
    shape: BlockShape,
    material: Material,
) -> Entity {
    let opts = material.spawn_options();
    let mass = opts.density * shape.area();

    commands
        .spawn((
            (
                Transform::from_translation(position.extend(0.05)),
                GlobalTransform::default(),
                Block { material, mass },
                Vertices(shape.vertices()), // local-space outline
                Paint {
                    fill: opts.fill,
                    stroke: opts.stroke,
                },
                DebrisTint(material.def().debris),
            ),
            (
                RigidBody::Dynamic,
                shape.collider(),
                ColliderMassProperties::Density(opts.density),
                Friction::coefficient(opts.friction),
                Restitution::coefficient(opts.restitution),
                Velocity::zero(),
                ExternalImpulse::default(),
                ActiveEvents::COLLISION_EVENTS,
            ),
        ))
        .id()
}

// ── Presets ───────────────────────────────────────────────────────────────────

/// Prefab structures placeable with one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Tower,
    Wall,
    Bridge,
}

impl Preset {
    pub fn label(self) -> &'static str {
        match self {
            Preset::Tower => "tower",
            Preset::Wall => "wall",
            Preset::Bridge => "bridge",
        }
    }
}

/// Build a preset centred horizontally on `x`, resting on the ground.
pub fn build_preset(commands: &mut Commands, preset: Preset, x: f32) {
    let ground_top = GROUND_Y + GROUND_HEIGHT / 2.0;
    match preset {
        Preset::Tower => build_tower(commands, x, ground_top + 10.0),
        Preset::Wall => build_wall(commands, x, ground_top + 10.0),
        // The deck sits on 60-tall pillars: pillar centre 40 below the deck,
        // pillar bottom 70 below, so the deck rides 70 above the ground.
        Preset::Bridge => build_bridge(commands, x, ground_top + 70.0),
    }
}

/// Eight staggered rows of paired brick blocks, like running-bond masonry.
fn build_tower(commands: &mut Commands, x: f32, base_y: f32) {
    let shape = BlockShape::Rect {
        width: 80.0,
        height: 20.0,
    };
    for row in 0..8 {
        let y = base_y + row as f32 * 22.0;
        let offset = if row % 2 == 0 { 0.0 } else { 40.0 };
        spawn_block(
            commands,
            Vec2::new(x - 40.0 + offset, y),
            shape,
            Material::Brick,
        );
        spawn_block(
            commands,
            Vec2::new(x + 40.0 + offset, y),
            shape,
            Material::Brick,
        );
    }
}

/// A five-by-five stone block wall.
fn build_wall(commands: &mut Commands, x: f32, base_y: f32) {
    let shape = BlockShape::Rect {
        width: 60.0,
        height: 20.0,
    };
    for row in 0..5 {
        for col in 0..5 {
            let bx = x + (col as f32 - 2.0) * 62.0;
            let by = base_y + row as f32 * 22.0;
            spawn_block(commands, Vec2::new(bx, by), shape, Material::Stone);
        }
    }
}

/// Five wooden deck planks on three steel pillars.
fn build_bridge(commands: &mut Commands, x: f32, deck_y: f32) {
    let plank = BlockShape::Rect {
        width: 100.0,
        height: 15.0,
    };
    for i in 0..5 {
        spawn_block(
            commands,
            Vec2::new(x + (i as f32 - 2.0) * 102.0, deck_y),
            plank,
            Material::Wood,
        );
    }

    let pillar = BlockShape::Rect {
        width: 15.0,
        height: 60.0,
    };
    for px in [x - 200.0, x + 200.0, x] {
        spawn_block(commands, Vec2::new(px, deck_y - 40.0), pillar, Material::Steel);
    }
}
