//! Tool selection and click dispatch: where build and destroy actions begin.
//!
//! ## Bindings
//!
//! | Input        | Effect                                            |
//! |--------------|---------------------------------------------------|
//! | Tab          | Toggle Build / Destroy mode                       |
//! | 1–5          | Select material (Build)                           |
//! | Q / W / E    | Select rect / circle / triangle shape (Build)     |
//! | B / C / V / L| Select bomb / cannon / wrecking ball / laser      |
//! | T / Y / U    | Drop a tower / wall / bridge preset at view centre|
//! | G            | Toggle grid snapping                              |
//! | Left click   | Place a block (Build) or fire the weapon (Destroy)|
//!
//! Picking a material or shape switches to Build mode; picking a weapon
//! switches to Destroy, so one key press always arms what it names.  The laser
//! is press-drag-release and owns its own pointer handling in the cut module;
//! the click dispatcher leaves it alone.

use crate::block::{
    build_preset, regular_polygon, spawn_block, BlockShape, Paint, Preset, Projectile, Vertices,
};
use crate::config::SandboxConfig;
use crate::constants::*;
use crate::explosion::apply_explosion;
use crate::graphics::{cursor_world_position, visible_half_extents, MainCamera};
use crate::material::{darkened, Material, ALL_MATERIALS};
use crate::particles::ParticleField;
use crate::rng::FractureRng;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Selection state ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Build,
    Destroy,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Build => "build",
            GameMode::Destroy => "destroy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Weapon {
    #[default]
    Bomb,
    Cannon,
    WreckingBall,
    Laser,
}

impl Weapon {
    pub fn label(self) -> &'static str {
        match self {
            Weapon::Bomb => "bomb",
            Weapon::Cannon => "cannon",
            Weapon::WreckingBall => "wrecking ball",
            Weapon::Laser => "laser",
        }
    }
}

/// What the next click will do.
#[derive(Resource)]
pub struct ToolState {
    pub mode: GameMode,
    pub material: Material,
    pub shape: BlockShape,
    pub weapon: Weapon,
    pub snap_to_grid: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            mode: GameMode::Build,
            material: Material::Wood,
            shape: BlockShape::default_rect(),
            weapon: Weapon::Bomb,
            snap_to_grid: false,
        }
    }
}

impl ToolState {
    /// True while cut gestures should be interpreted.
    pub fn laser_armed(&self) -> bool {
        self.mode == GameMode::Destroy && self.weapon == Weapon::Laser
    }
}

/// Round a point to the nearest grid intersection.
pub fn snap_to_grid(point: Vec2, spacing: f32) -> Vec2 {
    if spacing <= 0.0 {
        return point;
    }
    (point / spacing).round() * spacing
}

// ── Selection systems ─────────────────────────────────────────────────────────

const MATERIAL_KEYS: [KeyCode; 5] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
];

pub fn tool_selection_system(keys: Res<ButtonInput<KeyCode>>, mut tool: ResMut<ToolState>) {
    if keys.just_pressed(KeyCode::Tab) {
        tool.mode = match tool.mode {
            GameMode::Build => GameMode::Destroy,
            GameMode::Destroy => GameMode::Build,
        };
    }

    for (key, material) in MATERIAL_KEYS.iter().zip(ALL_MATERIALS) {
        if keys.just_pressed(*key) {
            tool.material = material;
            tool.mode = GameMode::Build;
        }
    }

    let shapes = [
        (KeyCode::KeyQ, BlockShape::default_rect()),
        (KeyCode::KeyW, BlockShape::default_circle()),
        (KeyCode::KeyE, BlockShape::default_triangle()),
    ];
    for (key, shape) in shapes {
        if keys.just_pressed(key) {
            tool.shape = shape;
            tool.mode = GameMode::Build;
        }
    }

    let weapons = [
        (KeyCode::KeyB, Weapon::Bomb),
        (KeyCode::KeyC, Weapon::Cannon),
        (KeyCode::KeyV, Weapon::WreckingBall),
        (KeyCode::KeyL, Weapon::Laser),
    ];
    for (key, weapon) in weapons {
        if keys.just_pressed(key) {
            tool.weapon = weapon;
            tool.mode = GameMode::Destroy;
        }
    }

    if keys.just_pressed(KeyCode::KeyG) {
        tool.snap_to_grid = !tool.snap_to_grid;
    }
}

/// Drop a prefab structure at the centre of the current view.
pub fn preset_hotkey_system(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    camera: Query<&Transform, With<MainCamera>>,
) {
    let center_x = camera.single().map(|t| t.translation.x).unwrap_or(0.0);
    let presets = [
        (KeyCode::KeyT, Preset::Tower),
        (KeyCode::KeyY, Preset::Wall),
        (KeyCode::KeyU, Preset::Bridge),
    ];
    for (key, preset) in presets {
        if keys.just_pressed(key) {
            build_preset(&mut commands, preset, center_x);
            info!("Placed {} preset", preset.label());
        }
    }
}

// ── Click dispatch ────────────────────────────────────────────────────────────

/// Route a left click to the armed tool.
#[allow(clippy::too_many_arguments)]
pub fn tool_click_system(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform, &Projection), With<MainCamera>>,
    tool: Res<ToolState>,
    config: Res<SandboxConfig>,
    mut bodies: Query<(&RigidBody, &Transform, &mut ExternalImpulse)>,
    mut field: ResMut<ParticleField>,
    mut rng: ResMut<FractureRng>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform, projection)) = camera.single() else {
        return;
    };
    let Some(point) = cursor_world_position(window, camera, camera_transform) else {
        return;
    };

    match tool.mode {
        GameMode::Build => {
            let position = if tool.snap_to_grid {
                snap_to_grid(point, config.grid_spacing)
            } else {
                point
            };
            spawn_block(&mut commands, position, tool.shape, tool.material);
        }
        GameMode::Destroy => match tool.weapon {
            Weapon::Bomb => {
                apply_explosion(
                    point,
                    config.bomb_radius,
                    config.bomb_force,
                    config.explosion_impulse_scale,
                    bodies.iter_mut(),
                    &mut field,
                    &mut rng.0,
                );
            }
            Weapon::Cannon => {
                let half = visible_half_extents(window, projection);
                let spawn = Vec2::new(
                    camera_transform.translation().x - half.x - CANNON_BALL_RADIUS,
                    point.y,
                );
                // The spawn shares the click's height, so this is a level shot.
                let dir = (point - spawn).normalize_or_zero();
                spawn_cannon_ball(
                    &mut commands,
                    spawn,
                    dir * config.cannon_ball_speed * TICK_RATE,
                );
            }
            Weapon::WreckingBall => {
                let half = visible_half_extents(window, projection);
                let top = camera_transform.translation().y + half.y + WRECKING_BALL_DROP_MARGIN;
                spawn_wrecking_ball(&mut commands, Vec2::new(point.x, top));
            }
            // Press-drag-release, resolved by the cut systems.
            Weapon::Laser => {}
        },
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A level shot from off-screen left.
pub fn spawn_cannon_ball(commands: &mut Commands, position: Vec2, velocity: Vec2) -> Entity {
    spawn_ball(
        commands,
        position,
        velocity,
        CANNON_BALL_RADIUS,
        CANNON_BALL_DENSITY,
        CANNON_BALL_FRICTION,
        CANNON_BALL_RESTITUTION,
        Color::srgb_u8(0x2C, 0x3E, 0x50),
    )
}

/// A heavy ball dropped from above the view.
pub fn spawn_wrecking_ball(commands: &mut Commands, position: Vec2) -> Entity {
    spawn_ball(
        commands,
        position,
        Vec2::ZERO,
        WRECKING_BALL_RADIUS,
        WRECKING_BALL_DENSITY,
        WRECKING_BALL_FRICTION,
        WRECKING_BALL_RESTITUTION,
        Color::srgb_u8(0x1A, 0x1A, 0x2E),
    )
}

/// Balls carry no `DebrisTint`: when cut, their rubble falls back to the
/// generic gray rather than any material colour.
#[allow(clippy::too_many_arguments)]
fn spawn_ball(
    commands: &mut Commands,
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    density: f32,
    friction: f32,
    restitution: f32,
    fill: Color,
) -> Entity {
    commands
        .spawn((
            (
                Transform::from_translation(position.extend(0.05)),
                GlobalTransform::default(),
                Projectile,
                Vertices(regular_polygon(radius, CIRCLE_CUT_SEGMENTS)),
                Paint {
                    fill,
                    stroke: darkened(fill, 0.7),
                },
            ),
            (
                RigidBody::Dynamic,
                Collider::ball(radius),
                ColliderMassProperties::Density(density),
                Friction::coefficient(friction),
                Restitution::coefficient(restitution),
                Velocity {
                    linvel: velocity,
                    angvel: 0.0,
                },
                ExternalImpulse::default(),
            ),
        ))
        .id()
}

// ── Placement preview ─────────────────────────────────────────────────────────

/// Ghost outline of the pending block, plus the grid while snapping is on.
pub fn build_preview_system(
    tool: Res<ToolState>,
    config: Res<SandboxConfig>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform, &Projection), With<MainCamera>>,
    mut gizmos: Gizmos,
) {
    if tool.mode != GameMode::Build {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform, projection)) = camera.single() else {
        return;
    };

    if tool.snap_to_grid {
        let half = visible_half_extents(window, projection).min(Vec2::splat(GRID_DRAW_EXTENT));
        draw_grid(
            &mut gizmos,
            camera_transform.translation().truncate(),
            half,
            config.grid_spacing,
        );
    }

    let Some(point) = cursor_world_position(window, camera, camera_transform) else {
        return;
    };
    let position = if tool.snap_to_grid {
        snap_to_grid(point, config.grid_spacing)
    } else {
        point
    };

    let ghost = tool.material.def().stroke.with_alpha(0.5);
    let outline: Vec<Vec2> = tool
        .shape
        .vertices()
        .into_iter()
        .map(|v| v + position)
        .collect();
    let first = outline[0];
    gizmos.linestrip_2d(outline.into_iter().chain(std::iter::once(first)), ghost);
}

fn draw_grid(gizmos: &mut Gizmos, center: Vec2, half: Vec2, spacing: f32) {
    if spacing <= 0.0 {
        return;
    }
    let color = Color::srgba(1.0, 1.0, 1.0, 0.08);
    let min = snap_to_grid(center - half, spacing) - Vec2::splat(spacing);
    let max = center + half + Vec2::splat(spacing);

    let mut x = min.x;
    while x <= max.x {
        gizmos.line_2d(Vec2::new(x, min.y), Vec2::new(x, max.y), color);
        x += spacing;
    }
    let mut y = min.y;
    while y <= max.y {
        gizmos.line_2d(Vec2::new(min.x, y), Vec2::new(max.x, y), color);
        y += spacing;
    }
}

pub struct ToolsPlugin;

impl Plugin for ToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToolState>().add_systems(
            Update,
            (
                tool_selection_system,
                preset_hotkey_system,
                tool_click_system,
                build_preview_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::DebrisTint;

    #[test]
    fn snapping_rounds_to_nearest_intersection() {
        assert_eq!(snap_to_grid(Vec2::new(7.0, 12.0), 20.0), Vec2::new(0.0, 20.0));
        assert_eq!(
            snap_to_grid(Vec2::new(-30.0, 49.0), 20.0),
            Vec2::new(-40.0, 40.0)
        );
        let p = Vec2::new(13.7, -4.2);
        assert_eq!(snap_to_grid(p, 0.0), p, "zero spacing must pass through");
    }

    #[test]
    fn defaults_arm_wood_rect_building() {
        let tool = ToolState::default();
        assert_eq!(tool.mode, GameMode::Build);
        assert_eq!(tool.material, Material::Wood);
        assert_eq!(tool.shape, BlockShape::default_rect());
        assert!(!tool.snap_to_grid);
        assert!(!tool.laser_armed());
    }

    fn selection_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ToolState>();
        app.add_systems(Update, tool_selection_system);
        app
    }

    fn press(app: &mut App, key: KeyCode) {
        {
            let mut input = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            input.clear();
            input.press(key);
        }
        app.update();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .release(key);
    }

    #[test]
    fn tab_toggles_mode_both_ways() {
        let mut app = selection_test_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.world().resource::<ToolState>().mode, GameMode::Destroy);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.world().resource::<ToolState>().mode, GameMode::Build);
    }

    #[test]
    fn weapon_keys_arm_destroy_mode() {
        let mut app = selection_test_app();
        press(&mut app, KeyCode::KeyL);
        let tool = app.world().resource::<ToolState>();
        assert_eq!(tool.weapon, Weapon::Laser);
        assert_eq!(tool.mode, GameMode::Destroy);
        assert!(tool.laser_armed());
    }

    #[test]
    fn material_keys_return_to_build_mode() {
        let mut app = selection_test_app();
        press(&mut app, KeyCode::KeyB);
        press(&mut app, KeyCode::Digit3);
        let tool = app.world().resource::<ToolState>();
        assert_eq!(tool.material, Material::Stone);
        assert_eq!(tool.mode, GameMode::Build);
    }

    #[test]
    fn grid_toggle_flips_back_and_forth() {
        let mut app = selection_test_app();
        press(&mut app, KeyCode::KeyG);
        assert!(app.world().resource::<ToolState>().snap_to_grid);
        press(&mut app, KeyCode::KeyG);
        assert!(!app.world().resource::<ToolState>().snap_to_grid);
    }

    #[test]
    fn balls_are_projectiles_without_material_tint() {
        let mut app = App::new();
        app.add_systems(Update, |mut commands: Commands| {
            spawn_cannon_ball(
                &mut commands,
                Vec2::new(-640.0, 50.0),
                Vec2::new(CANNON_BALL_SPEED * TICK_RATE, 0.0),
            );
            spawn_wrecking_ball(&mut commands, Vec2::new(100.0, 500.0));
        });
        app.update();

        let mut balls = 0;
        let mut query = app
            .world_mut()
            .query_filtered::<(Entity, &Velocity, &Vertices), With<Projectile>>();
        let rows: Vec<(Entity, f32, usize)> = query
            .iter(app.world())
            .map(|(e, v, verts)| (e, v.linvel.length(), verts.0.len()))
            .collect();
        for (entity, _speed, vertex_count) in &rows {
            assert_eq!(
                *vertex_count, CIRCLE_CUT_SEGMENTS as usize,
                "balls must carry a polygon outline for cut tests"
            );
            assert!(
                app.world().get::<DebrisTint>(*entity).is_none(),
                "ball rubble must fall back to generic gray"
            );
            balls += 1;
        }
        assert_eq!(balls, 2);

        let max_speed = rows.iter().map(|(_, s, _)| *s).fold(0.0, f32::max);
        assert!(
            (max_speed - CANNON_BALL_SPEED * TICK_RATE).abs() < 1e-3,
            "the cannon ball must launch at the configured speed"
        );
    }
}
