//! The directed cut: press, drag, release; everything the beam crossed is
//! severed.
//!
//! ## Gesture
//!
//! A small state machine backs the tool: `Idle → Cutting → Idle`.  Press
//! anchors the start point, dragging moves the free end, and release resolves
//! the cut against every dynamic body before returning to idle.  A release
//! that arrives while idle (duplicate pointer-up) does nothing.
//!
//! Resolution is a segment-versus-polygon-edge test in world space using the
//! parametric intersection form; a near-zero determinant is treated as
//! parallel and never divides.  Hit bodies fracture with their own debris
//! colour.  Only the begin step checks the armed tool, so switching tools
//! mid-drag still lets the release land.

use crate::block::{DebrisTint, Vertices};
use crate::destruction::{collision_monitor_system, fracture_body, resolve_debris_color};
use crate::graphics::{cursor_world_position, MainCamera};
use crate::particles::ParticleField;
use crate::rng::FractureRng;
use crate::tools::ToolState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Determinants smaller than this are treated as parallel segments.
const PARALLEL_EPSILON: f32 = 1e-10;

fn beam_color() -> Color {
    Color::srgb_u8(0x00, 0xFF, 0x88)
}

// ── Gesture state ─────────────────────────────────────────────────────────────

/// The cut gesture in progress, if any.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum CutState {
    #[default]
    Idle,
    Cutting {
        start: Vec2,
        end: Vec2,
    },
}

impl CutState {
    /// Anchor a new cut; both endpoints start at the press point.
    pub fn begin(&mut self, point: Vec2) {
        *self = CutState::Cutting {
            start: point,
            end: point,
        };
    }

    /// Follow the pointer with the free end.  Ignored while idle.
    pub fn drag(&mut self, point: Vec2) {
        if let CutState::Cutting { end, .. } = self {
            *end = point;
        }
    }

    /// Complete the gesture, yielding the final segment.
    ///
    /// Returns `None` when no cut was in progress, so duplicate release events
    /// fall through harmlessly.
    pub fn finish(&mut self) -> Option<(Vec2, Vec2)> {
        match std::mem::take(self) {
            CutState::Idle => None,
            CutState::Cutting { start, end } => Some((start, end)),
        }
    }

    pub fn is_cutting(&self) -> bool {
        matches!(self, CutState::Cutting { .. })
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Do segments `a1–a2` and `b1–b2` intersect (endpoints inclusive)?
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d = (a2.x - a1.x) * (b2.y - b1.y) - (a2.y - a1.y) * (b2.x - b1.x);
    if d.abs() < PARALLEL_EPSILON {
        return false;
    }
    let t = ((b1.x - a1.x) * (b2.y - b1.y) - (b1.y - a1.y) * (b2.x - b1.x)) / d;
    let u = ((b1.x - a1.x) * (a2.y - a1.y) - (b1.y - a1.y) * (a2.x - a1.x)) / d;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Does the segment cross any edge of the closed polygon?
pub fn segment_hits_polygon(start: Vec2, end: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 2 {
        return false;
    }
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        if segments_intersect(start, end, a, b) {
            return true;
        }
    }
    false
}

/// A body's outline translated and rotated into world space.
pub fn world_outline(transform: &Transform, vertices: &[Vec2]) -> Vec<Vec2> {
    let origin = transform.translation.truncate();
    vertices
        .iter()
        .map(|v| origin + transform.rotation.mul_vec3(v.extend(0.0)).truncate())
        .collect()
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Drive the cut gesture from the pointer and resolve it on release.
#[allow(clippy::too_many_arguments)]
pub fn cut_gesture_system(
    mut commands: Commands,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    tool: Res<ToolState>,
    mut cut: ResMut<CutState>,
    bodies: Query<(
        Entity,
        &RigidBody,
        &Transform,
        &Velocity,
        &Vertices,
        Option<&DebrisTint>,
    )>,
    mut field: ResMut<ParticleField>,
    mut rng: ResMut<FractureRng>,
) {
    let cursor = windows.single().ok().and_then(|window| {
        camera
            .single()
            .ok()
            .and_then(|(camera, cam_transform)| cursor_world_position(window, camera, cam_transform))
    });

    if buttons.just_pressed(MouseButton::Left) && tool.laser_armed() {
        if let Some(point) = cursor {
            cut.begin(point);
        }
    }

    if let Some(point) = cursor {
        cut.drag(point);
    }

    if buttons.just_released(MouseButton::Left) {
        let Some((start, end)) = cut.finish() else {
            return;
        };
        for (entity, body, transform, velocity, vertices, tint) in bodies.iter() {
            if !matches!(body, RigidBody::Dynamic) {
                continue;
            }
            let outline = world_outline(transform, &vertices.0);
            if segment_hits_polygon(start, end, &outline) {
                fracture_body(
                    &mut commands,
                    entity,
                    transform,
                    velocity.linvel,
                    &vertices.0,
                    resolve_debris_color(None, tint),
                    &mut field,
                    &mut rng.0,
                );
            }
        }
    }
}

/// Draw the beam while a cut is in progress.
pub fn beam_render_system(cut: Res<CutState>, mut gizmos: Gizmos) {
    if let CutState::Cutting { start, end } = *cut {
        gizmos.line_2d(start, end, beam_color());
    }
}

pub struct LaserPlugin;

impl Plugin for LaserPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CutState>().add_systems(
            Update,
            (
                // Contact fractures despawn first, so a release in the same
                // frame cannot sever a body that is already rubble.
                cut_gesture_system.after(collision_monitor_system),
                beam_render_system,
            ),
        );
    }
}
