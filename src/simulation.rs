use ::rand as external_rand;
use external_rand::rngs::StdRng;
use external_rand::{Rng, SeedableRng};

use crate::config::GrowthConfig;
use crate::neuron::Neuron;
use crate::types::Parent;

/// Where the driver is in the growth schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthPhase {
    Dendritic { remaining: usize },
    Axonal { remaining: usize },
    Complete,
}

/// What a single growth iteration did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowthEvent {
    Extended,
    Branched,
    Skipped,
}

// Simulation - drives one neuron through the dendritic and axonal phases
pub struct Simulation {
    pub neuron: Neuron,
    pub config: GrowthConfig,
    rng: StdRng,
    seed: u64,
    phase: GrowthPhase,
    steps_taken: usize,
}

impl Simulation {
    /// Seed from `config.seed`, or from the OS when none is set.
    pub fn with_config(config: GrowthConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| external_rand::thread_rng().gen());
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GrowthConfig, seed: u64) -> Self {
        Self::with_id(config, seed, 1)
    }

    pub fn with_id(config: GrowthConfig, seed: u64, id: u64) -> Self {
        let neuron = Neuron::with_rules(
            id,
            config.soma(),
            config.dendrite_rules(),
            config.axon_rules(),
        );
        let phase = GrowthPhase::Dendritic {
            remaining: config.dendrite_steps,
        };
        tracing::debug!(neuron = id, seed, "simulation created");
        Self {
            neuron,
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
            phase,
            steps_taken: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GrowthPhase {
        self.phase
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GrowthPhase::Complete
    }

    /// Run one iteration of the current phase. Returns false once growth is
    /// complete.
    pub fn step(&mut self) -> bool {
        match self.phase {
            GrowthPhase::Dendritic { remaining: 0 } => {
                self.begin_axonal_phase();
                return !self.is_complete();
            }
            GrowthPhase::Dendritic { remaining } => {
                self.grow_dendrite();
                self.phase = GrowthPhase::Dendritic {
                    remaining: remaining - 1,
                };
            }
            GrowthPhase::Axonal { remaining: 0 } => {
                self.finish();
                return false;
            }
            GrowthPhase::Axonal { remaining } => {
                self.grow_axon();
                self.phase = GrowthPhase::Axonal {
                    remaining: remaining - 1,
                };
            }
            GrowthPhase::Complete => return false,
        }
        self.steps_taken += 1;
        true
    }

    /// Step until growth is complete.
    pub fn run(&mut self) -> &Neuron {
        while self.step() {}
        &self.neuron
    }

    pub fn into_neuron(mut self) -> Neuron {
        self.run();
        self.neuron
    }

    /// Throw the neuron away and start again from the same seed.
    pub fn reset(&mut self) {
        *self = Self::with_id(self.config.clone(), self.seed, self.neuron.id);
    }

    /// One iteration of the dendritic phase.
    pub fn grow_dendrite(&mut self) -> GrowthEvent {
        let count = self.neuron.dendrites().len();
        let parent = if count == 0 {
            Parent::root(
                self.neuron.position,
                self.rng.gen_range(0.0..360.0),
                self.config.initial_dendrite_length,
            )
        } else {
            let idx = self.rng.gen_range(0..count);
            Parent::from_segment(idx, &self.neuron.dendrites()[idx])
        };
        let (low, high) = self.config.dendrite_growth_range;
        let growth_rate = self.rng.gen_range(low..=high);
        let choice: f64 = self.rng.gen();

        // Extend is tested first, so with the default thresholds the branch
        // arm is unreachable.
        if choice > self.config.dendrite_extend_threshold {
            self.neuron.extend_dendrite(&mut self.rng, &parent, growth_rate);
            GrowthEvent::Extended
        } else if choice > self.config.dendrite_branch_threshold {
            self.neuron
                .branch_dendrite(&parent, growth_rate, self.config.sprout_count);
            GrowthEvent::Branched
        } else {
            GrowthEvent::Skipped
        }
    }

    /// One iteration of the axonal phase. Seeds the axon first if needed.
    pub fn grow_axon(&mut self) -> GrowthEvent {
        if self.neuron.axon_terminals().is_empty() {
            self.neuron
                .init_axon_terminal(&mut self.rng, self.config.initial_axon_length, None);
        }
        let idx = self.rng.gen_range(0..self.neuron.axon_terminals().len());
        let parent = Parent::from_segment(idx, &self.neuron.axon_terminals()[idx]);
        let (low, high) = self.config.axon_growth_range;
        let growth_rate = self.rng.gen_range(low..=high);
        let choice: f64 = self.rng.gen();

        if choice > self.config.axon_extend_threshold {
            self.neuron.extend_axon(&mut self.rng, &parent, growth_rate);
            GrowthEvent::Extended
        } else {
            self.neuron
                .branch_axon(&parent, growth_rate, self.config.sprout_count);
            GrowthEvent::Branched
        }
    }

    fn begin_axonal_phase(&mut self) {
        tracing::info!(
            neuron = self.neuron.id,
            dendrites = self.neuron.dendrites().len(),
            "dendritic phase done"
        );
        self.neuron
            .init_axon_terminal(&mut self.rng, self.config.initial_axon_length, None);
        self.phase = GrowthPhase::Axonal {
            remaining: self.config.axon_steps,
        };
        if self.config.axon_steps == 0 {
            self.finish();
        }
    }

    fn finish(&mut self) {
        let stats = self.neuron.stats();
        tracing::info!(
            neuron = self.neuron.id,
            seed = self.seed,
            dendrites = stats.dendrite_count,
            axon_terminals = stats.axon_count,
            "growth complete"
        );
        self.phase = GrowthPhase::Complete;
    }
}
