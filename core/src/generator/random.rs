use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::*;

/// Uniformly random icons, reproducible for a given seed.
#[derive(Clone, Debug)]
pub struct RandomIconGenerator {
    icon_types: u8,
    rng: Pcg32,
}

impl RandomIconGenerator {
    pub fn new(seed: u64, icon_types: u8) -> Self {
        if icon_types == 0 {
            log::warn!("Random generator needs at least one icon type, using 1");
        }
        Self {
            icon_types: icon_types.max(1),
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl IconGenerator for RandomIconGenerator {
    fn icon_types(&self) -> u8 {
        self.icon_types
    }

    fn generate(&mut self) -> Icon {
        Icon::new(self.rng.random_range(0..self.icon_types))
    }
}
