// Grow many independent neurons at once

use rayon::prelude::*;

use crate::config::GrowthConfig;
use crate::simulation::Simulation;

/// Grow `count` neurons in parallel. Neuron `i` gets id `i + 1` and seed
/// `base_seed + i`, so the result only depends on `base_seed`.
pub fn grow_population(config: &GrowthConfig, base_seed: u64, count: usize) -> Vec<Simulation> {
    tracing::info!(count, base_seed, "growing population");
    (0..count)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let mut sim = Simulation::with_id(config.clone(), seed, i as u64 + 1);
            sim.run();
            sim
        })
        .collect()
}
