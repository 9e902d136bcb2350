//! Seeded random source shared by all effects of one animator.

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

/// Random number generator resource.
///
/// Two animators built with the same seed and driven by the same calls
/// produce identical particles.
#[derive(Resource, Clone, Debug)]
pub struct EffectRng(pub Rng);

impl EffectRng {
    pub fn with_seed(seed: u64) -> Self {
        EffectRng(Rng::with_seed(seed))
    }

    /// Seed from `seed` when given, otherwise from entropy.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => EffectRng(Rng::new()),
        }
    }
}

impl Default for EffectRng {
    fn default() -> Self {
        EffectRng(Rng::new())
    }
}
