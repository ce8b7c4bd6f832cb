//! Camera setup and navigation: right-drag panning and wheel zoom.

use crate::config::SandboxConfig;
use crate::constants::ZOOM_STEP_FACTOR;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

/// Marker for the one world camera, so queries skip any UI cameras.
#[derive(Component)]
pub struct MainCamera;

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d with default scale shows roughly the full window area
    commands.spawn((Camera2d, MainCamera));
    eprintln!("[SETUP] Camera spawned");
}

/// Cursor position in world space, if the cursor is over the window.
pub fn cursor_world_position(
    window: &Window,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    let cursor = window.cursor_position()?;
    camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

/// Half the width and height of the visible world area at the current zoom.
pub fn visible_half_extents(window: &Window, projection: &Projection) -> Vec2 {
    let scale = match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => 1.0,
    };
    Vec2::new(window.width(), window.height()) * 0.5 * scale
}

/// One wheel notch applied to the orthographic scale, keeping the
/// magnification inside `[min_zoom, max_zoom]`.
pub fn stepped_scale(scale: f32, wheel_up: bool, min_zoom: f32, max_zoom: f32) -> f32 {
    let zoom = 1.0 / scale;
    let factor = if wheel_up {
        ZOOM_STEP_FACTOR
    } else {
        1.0 / ZOOM_STEP_FACTOR
    };
    1.0 / (zoom * factor).clamp(min_zoom, max_zoom)
}

/// Drag the view with the right mouse button.
///
/// Deltas arrive in screen pixels; multiplying by the orthographic scale keeps
/// the world gliding with the cursor at any zoom.
pub fn camera_pan_system(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: MessageReader<MouseMotion>,
    mut camera: Query<(&mut Transform, &Projection), With<MainCamera>>,
) {
    let Ok((mut transform, projection)) = camera.single_mut() else {
        return;
    };
    if !buttons.pressed(MouseButton::Right) {
        motion.clear();
        return;
    }
    let scale = match projection {
        Projection::Orthographic(ortho) => ortho.scale,
        _ => 1.0,
    };
    for ev in motion.read() {
        transform.translation.x -= ev.delta.x * scale;
        transform.translation.y += ev.delta.y * scale;
    }
}

/// Wheel zoom anchored at the cursor: the world point under the pointer stays
/// put while the view scales around it.
pub fn camera_zoom_system(
    mut wheel: MessageReader<MouseWheel>,
    windows: Query<&Window>,
    config: Res<SandboxConfig>,
    mut camera: Query<(&mut Transform, &mut Projection), With<MainCamera>>,
) {
    let Ok((mut transform, mut projection)) = camera.single_mut() else {
        return;
    };
    let Projection::Orthographic(ortho) = projection.as_mut() else {
        return;
    };

    for ev in wheel.read() {
        if ev.y == 0.0 {
            continue;
        }
        let old_scale = ortho.scale;
        let new_scale = stepped_scale(old_scale, ev.y > 0.0, config.min_zoom, config.max_zoom);
        ortho.scale = new_scale;

        let Ok(window) = windows.single() else {
            continue;
        };
        if let Some(cursor) = window.cursor_position() {
            let centered = Vec2::new(
                cursor.x - window.width() / 2.0,
                -(cursor.y - window.height() / 2.0),
            );
            transform.translation.x += centered.x * (old_scale - new_scale);
            transform.translation.y += centered.y * (old_scale - new_scale);
        }
    }
}

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        // setup_camera runs from main's Startup chain.
        app.add_systems(Update, (camera_pan_system, camera_zoom_system));
    }
}
