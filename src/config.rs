//! Runtime sandbox configuration loaded from `assets/sandbox.toml`.
//!
//! [`SandboxConfig`] is a Bevy [`Resource`] that mirrors the tuneable subset of
//! [`crate::constants`].  At startup, [`load_sandbox_config`] reads
//! `assets/sandbox.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<SandboxConfig>` to any system parameter list and read
//! values with `config.bomb_radius`, `config.cannon_ball_speed`, etc.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/sandbox.toml`.
//! 2. Restart the sandbox; no recompilation required.
//! 3. `cargo test` validates the destruction rules against the defaults.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `SandboxConfig::default()`.

use crate::constants::*;
use crate::error;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable sandbox configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/sandbox.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    // ── World ─────────────────────────────────────────────────────────────────
    /// Downward gravity acceleration (u/s²) at gravity scale 1.0.
    pub gravity_accel: f32,
    /// Gravity multiplier applied at startup; adjustable at runtime.
    pub gravity_scale: f32,

    // ── Bomb ──────────────────────────────────────────────────────────────────
    pub bomb_radius: f32,
    pub bomb_force: f32,
    pub explosion_impulse_scale: f32,

    // ── Cannon ────────────────────────────────────────────────────────────────
    /// Muzzle speed in legacy units per tick.
    pub cannon_ball_speed: f32,

    // ── Particles ─────────────────────────────────────────────────────────────
    pub particle_cap: usize,

    // ── Building ──────────────────────────────────────────────────────────────
    pub grid_spacing: f32,

    // ── Camera ────────────────────────────────────────────────────────────────
    pub min_zoom: f32,
    pub max_zoom: f32,

    // ── HUD ───────────────────────────────────────────────────────────────────
    pub hud_font_size: f32,

    // ── Randomness ────────────────────────────────────────────────────────────
    /// Optional fixed seed for the shared fracture RNG.  Unset (the default)
    /// seeds from OS entropy; set it to make debris scatter reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            // World
            gravity_accel: GRAVITY_ACCEL,
            gravity_scale: 1.0,
            // Bomb
            bomb_radius: BOMB_RADIUS,
            bomb_force: BOMB_FORCE,
            explosion_impulse_scale: EXPLOSION_IMPULSE_SCALE,
            // Cannon
            cannon_ball_speed: CANNON_BALL_SPEED,
            // Particles
            particle_cap: PARTICLE_CAP,
            // Building
            grid_spacing: GRID_SPACING,
            // Camera
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            // HUD
            hud_font_size: HUD_FONT_SIZE,
            // Randomness
            rng_seed: None,
        }
    }
}

/// Startup system: attempt to load `assets/sandbox.toml` and overwrite the
/// `SandboxConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are printed
/// to stderr but do not abort the sandbox.  A missing file is silently ignored
/// (defaults are already in place from `insert_resource`).  Overridden values
/// that fail validation are rejected individually and revert to the default.
pub fn load_sandbox_config(mut config: ResMut<SandboxConfig>) {
    let path = "assets/sandbox.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<SandboxConfig>(&contents) {
            Ok(loaded) => {
                *config = sanitize(loaded);
                println!("✓ Loaded sandbox config from {path}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present: defaults are already in place, not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

/// Reject individually-unsafe overrides, reverting each to its default.
fn sanitize(mut loaded: SandboxConfig) -> SandboxConfig {
    let defaults = SandboxConfig::default();

    if let Err(e) = error::validate_bomb_radius(loaded.bomb_radius) {
        warn!("{e}; reverting to {}", defaults.bomb_radius);
        loaded.bomb_radius = defaults.bomb_radius;
    }
    if let Err(e) = error::validate_gravity_scale(loaded.gravity_scale) {
        warn!("{e}; reverting to {}", defaults.gravity_scale);
        loaded.gravity_scale = defaults.gravity_scale;
    }
    if let Err(e) = error::validate_particle_cap(loaded.particle_cap) {
        warn!("{e}; reverting to {}", defaults.particle_cap);
        loaded.particle_cap = defaults.particle_cap;
    }

    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_constants() {
        let config = SandboxConfig::default();
        assert_eq!(config.bomb_radius, BOMB_RADIUS);
        assert_eq!(config.bomb_force, BOMB_FORCE);
        assert_eq!(config.cannon_ball_speed, CANNON_BALL_SPEED);
        assert_eq!(config.particle_cap, PARTICLE_CAP);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let loaded: SandboxConfig = toml::from_str("bomb_radius = 200.0").unwrap();
        assert_eq!(loaded.bomb_radius, 200.0);
        assert_eq!(loaded.bomb_force, BOMB_FORCE, "unnamed keys keep defaults");
    }

    #[test]
    fn sanitize_rejects_nonpositive_bomb_radius() {
        let mut bad = SandboxConfig::default();
        bad.bomb_radius = -1.0;
        let fixed = sanitize(bad);
        assert_eq!(fixed.bomb_radius, BOMB_RADIUS);
    }

    #[test]
    fn rng_seed_parses_from_toml() {
        let loaded: SandboxConfig = toml::from_str("rng_seed = 12345").unwrap();
        assert_eq!(loaded.rng_seed, Some(12345));
    }
}
