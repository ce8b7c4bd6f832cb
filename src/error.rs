//! Sandbox error types.
//!
//! Fallible paths hand back a [`SandboxResult`] and let the caller decide
//! whether to warn, fall back, or abort; panics are reserved for tests.
//!
//! ## Usage
//!
//! ```rust
//! use rubble::error::SandboxResult;
//! use rubble::material::Material;
//!
//! fn material_for(label: &str) -> SandboxResult<Material> {
//!     Material::from_label(label)
//! }
//! assert!(material_for("plutonium").is_err());
//! ```

use crate::constants::{GRAVITY_SCALE_MAX, GRAVITY_SCALE_MIN};
use std::fmt;

/// Everything that can go wrong outside the physics engine.
#[derive(Debug)]
pub enum SandboxError {
    /// A material label outside the fixed catalog.  Spawn paths propagate
    /// this; debris-colour resolution falls back to generic gray instead,
    /// because a breaking body must always break.
    UnknownMaterial { label: String },

    /// A config override landed outside its allowed range.  Carries the TOML
    /// key, the rejected value, and a printable description of the range.
    ValueOutOfRange {
        key: &'static str,
        value: f32,
        allowed: &'static str,
    },
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxError::UnknownMaterial { label } => write!(f, "unknown material '{label}'"),
            SandboxError::ValueOutOfRange {
                key,
                value,
                allowed,
            } => write!(f, "config key '{key}' = {value} outside allowed {allowed}"),
        }
    }
}

impl std::error::Error for SandboxError {}

/// Shorthand for results carrying a [`SandboxError`].
pub type SandboxResult<T> = Result<T, SandboxError>;

// ── Config range checks ───────────────────────────────────────────────────────

/// The blast falloff divides by the radius, so zero and negative radii are
/// rejected before they can reach the explosion model.
pub fn validate_bomb_radius(value: f32) -> SandboxResult<()> {
    if value > 0.0 {
        return Ok(());
    }
    Err(SandboxError::ValueOutOfRange {
        key: "bomb_radius",
        value,
        allowed: "strictly positive",
    })
}

/// Gravity scale must sit inside the Up/Down stepping range.
pub fn validate_gravity_scale(value: f32) -> SandboxResult<()> {
    if (GRAVITY_SCALE_MIN..=GRAVITY_SCALE_MAX).contains(&value) {
        return Ok(());
    }
    Err(SandboxError::ValueOutOfRange {
        key: "gravity_scale",
        value,
        allowed: "[0.0, 3.0]",
    })
}

/// Particle caps above 50 000 stall the gizmo pass on integrated GPUs; zero
/// would silence every effect.
pub fn validate_particle_cap(value: usize) -> SandboxResult<()> {
    if (1..=50_000).contains(&value) {
        return Ok(());
    }
    Err(SandboxError::ValueOutOfRange {
        key: "particle_cap",
        value: value as f32,
        allowed: "[1, 50000]",
    })
}
