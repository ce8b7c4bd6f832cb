//! Radial blast forces with linear distance falloff.
//!
//! The falloff itself is a pure function ([`explosion_impulse`]) so the
//! numbers can be pinned in unit tests; [`apply_explosion`] walks the dynamic
//! bodies, accumulates the scaled impulse on each, and fires the particle
//! burst exactly once.
//!
//! Static bodies are never affected: the ground has no `ExternalImpulse` to
//! write to, and the body-kind check guards anything that does.

use crate::particles::ParticleField;
use bevy::prelude::*;
use bevy_rapier2d::prelude::{ExternalImpulse, RigidBody};
use rand::Rng;

/// Impulse a body at `body_pos` receives from a blast at `origin`.
///
/// Linear falloff: full `force` at the centre, zero at `radius`, directed
/// radially outward.  Returns `None` outside the blast radius, at the exact
/// boundary, and at the exact centre (no direction exists there, and the
/// division by distance would blow up).
pub fn explosion_impulse(origin: Vec2, body_pos: Vec2, radius: f32, force: f32) -> Option<Vec2> {
    let delta = body_pos - origin;
    let dist = delta.length();
    if dist <= 0.0 || dist >= radius {
        return None;
    }
    let intensity = 1.0 - dist / radius;
    Some(delta / dist * force * intensity)
}

/// Apply a blast to every dynamic body, then emit one explosion burst.
///
/// `bodies` is the live component view from the calling system; non-dynamic
/// entries are skipped.  `impulse_scale` converts the legacy force units into
/// Rapier impulses (see `constants::EXPLOSION_IMPULSE_SCALE`).
pub fn apply_explosion<'a>(
    origin: Vec2,
    radius: f32,
    force: f32,
    impulse_scale: f32,
    bodies: impl Iterator<Item = (&'a RigidBody, &'a Transform, Mut<'a, ExternalImpulse>)>,
    field: &mut ParticleField,
    rng: &mut impl Rng,
) {
    for (body, transform, mut impulse) in bodies {
        if !matches!(body, RigidBody::Dynamic) {
            continue;
        }
        let pos = transform.translation.truncate();
        if let Some(kick) = explosion_impulse(origin, pos, radius, force) {
            impulse.impulse += kick * impulse_scale;
        }
    }
    field.emit_explosion(origin, radius, rng);
}
