//! HUD overlay: the always-on status line in the top-left corner.
//!
//! A single Bevy UI node shows the active mode, the selected material/shape
//! (or weapon), the gravity scale, and live body/particle counts. The text is
//! rebuilt only when one of its inputs changes.
//!
//! ## System Responsibilities
//!
//! | System              | Schedule | Purpose                          |
//! |---------------------|----------|----------------------------------|
//! | `setup_hud`         | Startup  | Spawn the status-line node       |
//! | `hud_status_system` | Update   | Refresh the status-line text     |

use crate::arena::GravitySetting;
use crate::block::{Block, Debris, Projectile};
use crate::config::SandboxConfig;
use crate::particles::ParticleField;
use crate::tools::{GameMode, ToolState};
use bevy::prelude::*;
use bevy_rapier2d::plugin::RapierConfiguration;

// ── Components ────────────────────────────────────────────────────────────────

/// Marker for the HUD status-line node (parent of the text child).
#[derive(Component)]
pub struct HudStatusDisplay;

// ── Startup: status line ──────────────────────────────────────────────────────

/// Spawn the permanent status line in the top-left corner.
pub fn setup_hud(mut commands: Commands, config: Res<SandboxConfig>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            HudStatusDisplay,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("BUILD | wood rect"),
                TextFont {
                    font_size: config.hud_font_size,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.88)),
            ));
        });
    eprintln!("[SETUP] HUD spawned");
}

// ── Update: status line ───────────────────────────────────────────────────────

/// Refresh the status line whenever the tool, pause flag, gravity scale, or
/// body/particle population changes.
pub fn hud_status_system(
    tools: Res<ToolState>,
    gravity: Res<GravitySetting>,
    field: Res<ParticleField>,
    rapier_config: Query<&RapierConfiguration>,
    bodies: Query<Entity, Or<(With<Block>, With<Debris>, With<Projectile>)>>,
    parent_query: Query<&Children, With<HudStatusDisplay>>,
    mut text_query: Query<&mut Text>,
    mut last_line: Local<String>,
) {
    let paused = rapier_config
        .iter()
        .any(|cfg| !cfg.physics_pipeline_active);

    let selection = match tools.mode {
        GameMode::Build => format!("{} {}", tools.material.label(), tools.shape.label()),
        GameMode::Destroy => tools.weapon.label().to_string(),
    };

    let mut line = format!(
        "{} | {} | g x{:.1} | {} bodies, {} particles",
        tools.mode.label().to_uppercase(),
        selection,
        gravity.scale,
        bodies.iter().count(),
        field.len()
    );
    if tools.mode == GameMode::Build && tools.snap_to_grid {
        line.push_str(" | grid");
    }
    if paused {
        line.push_str(" | PAUSED");
    }

    if line == *last_line {
        return;
    }
    for children in parent_query.iter() {
        for child in children.iter() {
            if let Ok(mut text) = text_query.get_mut(child) {
                *text = Text::new(line.clone());
            }
        }
    }
    *last_line = line;
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the HUD refresh system. `setup_hud` runs from the startup chain
/// in `main`, after the config file has been applied.
pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, hud_status_system);
    }
}
