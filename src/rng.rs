//! Shared random source for debris scatter and particle emission.
//!
//! All gameplay randomness draws from one seedable generator held as a
//! resource, so a fixed seed reproduces an entire destruction sequence.
//! Production seeds from OS entropy; tests (and the `rng_seed` config key)
//! pin the seed.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Resource wrapping the sandbox-wide RNG.
///
/// Systems take `ResMut<FractureRng>` and pass `&mut rng.0` down into the
/// fracture and emission helpers, which accept any `rand::Rng`.  Unit tests
/// skip the resource entirely and hand the helpers a seeded `StdRng`.
#[derive(Resource)]
pub struct FractureRng(pub StdRng);

impl FractureRng {
    /// Entropy-seeded generator for normal play.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Fixed-seed generator for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for FractureRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
