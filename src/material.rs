//! The material catalog: physical and visual properties per block material.
//!
//! Five materials form a fixed hardness ladder.  `fracture_threshold` is the
//! impact magnitude (per-tick speed × mass) a body of that material survives;
//! anything strictly above it shatters.
//!
//! | Material | Density | Friction | Restitution | Threshold |
//! |----------|---------|----------|-------------|-----------|
//! | Glass    | 0.006   | 0.2      | 0.4         | 2         |
//! | Wood     | 0.004   | 0.6      | 0.2         | 5         |
//! | Brick    | 0.008   | 0.7      | 0.1         | 10        |
//! | Stone    | 0.012   | 0.8      | 0.05        | 20        |
//! | Steel    | 0.020   | 0.4      | 0.3         | 50        |
//!
//! Debris fragments do *not* use these properties: they carry one generic
//! debris material (see `constants`) and no threshold, so rubble cannot
//! re-fracture.

use crate::error::{SandboxError, SandboxResult};
use bevy::prelude::*;

// ── Material kinds ────────────────────────────────────────────────────────────

/// The fixed set of buildable materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Material {
    Wood,
    Brick,
    Stone,
    Steel,
    Glass,
}

/// All materials in toolbar order.
pub const ALL_MATERIALS: [Material; 5] = [
    Material::Wood,
    Material::Brick,
    Material::Stone,
    Material::Steel,
    Material::Glass,
];

/// Full property record for one material kind.
///
/// Immutable; one logical instance per kind, produced by [`Material::def`].
#[derive(Debug, Clone, Copy)]
pub struct MaterialDef {
    pub kind: Material,
    /// Mass per unit area (Rapier `ColliderMassProperties::Density`).
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Impact magnitude (per-tick speed × mass) above which a body shatters.
    /// Strictly-greater comparison: an impact of exactly this value survives.
    pub fracture_threshold: f32,
    /// Fill colour of placed blocks.
    pub fill: Color,
    /// Outline colour of placed blocks.
    pub stroke: Color,
    /// Colour given to debris fragments and fracture dust.
    pub debris: Color,
}

impl Material {
    /// Look up the property record for this material.
    pub fn def(self) -> MaterialDef {
        match self {
            Material::Wood => MaterialDef {
                kind: self,
                density: 0.004,
                friction: 0.6,
                restitution: 0.2,
                fracture_threshold: 5.0,
                fill: Color::srgb_u8(0x8B, 0x69, 0x14),
                stroke: Color::srgb_u8(0x6B, 0x4F, 0x12),
                debris: Color::srgb_u8(0xA0, 0x78, 0x2C),
            },
            Material::Brick => MaterialDef {
                kind: self,
                density: 0.008,
                friction: 0.7,
                restitution: 0.1,
                fracture_threshold: 10.0,
                fill: Color::srgb_u8(0xC0, 0x39, 0x2B),
                stroke: Color::srgb_u8(0x96, 0x2D, 0x22),
                debris: Color::srgb_u8(0xD4, 0x57, 0x4A),
            },
            Material::Stone => MaterialDef {
                kind: self,
                density: 0.012,
                friction: 0.8,
                restitution: 0.05,
                fracture_threshold: 20.0,
                fill: Color::srgb_u8(0x7F, 0x8C, 0x8D),
                stroke: Color::srgb_u8(0x61, 0x6A, 0x6B),
                debris: Color::srgb_u8(0x95, 0xA5, 0xA6),
            },
            Material::Steel => MaterialDef {
                kind: self,
                density: 0.020,
                friction: 0.4,
                restitution: 0.3,
                fracture_threshold: 50.0,
                fill: Color::srgb_u8(0xBD, 0xC3, 0xC7),
                stroke: Color::srgb_u8(0x95, 0xA5, 0xA6),
                debris: Color::srgb_u8(0xD5, 0xDB, 0xDB),
            },
            // Glass is translucent: alpha carried on all three colours.
            Material::Glass => MaterialDef {
                kind: self,
                density: 0.006,
                friction: 0.2,
                restitution: 0.4,
                fracture_threshold: 2.0,
                fill: Color::srgba_u8(174, 214, 241, 153),
                stroke: Color::srgba_u8(133, 193, 233, 204),
                debris: Color::srgba_u8(174, 214, 241, 204),
            },
        }
    }

    /// Lowercase label used in the HUD and config files.
    pub fn label(self) -> &'static str {
        match self {
            Material::Wood => "wood",
            Material::Brick => "brick",
            Material::Stone => "stone",
            Material::Steel => "steel",
            Material::Glass => "glass",
        }
    }

    /// Parse a label back into a material kind.
    ///
    /// Fails with [`SandboxError::UnknownMaterial`] for anything outside the
    /// fixed catalog; callers spawning blocks must propagate this rather than
    /// substituting a default.
    pub fn from_label(label: &str) -> SandboxResult<Material> {
        match label {
            "wood" => Ok(Material::Wood),
            "brick" => Ok(Material::Brick),
            "stone" => Ok(Material::Stone),
            "steel" => Ok(Material::Steel),
            "glass" => Ok(Material::Glass),
            other => Err(SandboxError::UnknownMaterial {
                label: other.to_string(),
            }),
        }
    }

    /// The tuple a build tool needs to construct a body of this material.
    pub fn spawn_options(self) -> SpawnOptions {
        let def = self.def();
        SpawnOptions {
            density: def.density,
            friction: def.friction,
            restitution: def.restitution,
            fill: def.fill,
            stroke: def.stroke,
            label: self.label(),
        }
    }
}

/// Construction parameters for a new block of a given material.
#[derive(Debug, Clone, Copy)]
pub struct SpawnOptions {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub fill: Color,
    pub stroke: Color,
    pub label: &'static str,
}

/// Fallback colour for debris whose source material is unknown.
pub fn generic_debris_color() -> Color {
    Color::srgb_u8(0x88, 0x88, 0x88)
}

/// Scale a colour's RGB channels toward black, keeping alpha.  Used to derive
/// stroke colours for bodies that only specify a fill.
pub fn darkened(color: Color, factor: f32) -> Color {
    let c = color.to_srgba();
    Color::srgba(c.red * factor, c.green * factor, c.blue * factor, c.alpha)
}
