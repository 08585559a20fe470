//! Simulation configuration with documented constants
//!
//! Every tunable knob of the engines lives here so scenario files can
//! override them in one `[simulation]` table.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};

/// Configuration for the combat engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Soft cap on the number of non-leader units in one army
    ///
    /// Exceeding it only logs a warning; the battle still runs.
    pub max_units: u32,

    /// Hard cap on rounds per battle
    ///
    /// Armies made of zero-damage or zero-accuracy units never finish on
    /// their own. When the cap is reached the battle ends as a stalemate.
    pub max_rounds: u32,

    /// Number of trials handed to one rayon worker
    ///
    /// Each shard owns its own seeded random stream, so results only
    /// depend on the seed and this value, never on thread scheduling.
    pub shard_size: usize,

    /// Minimum trial count before batch runs are sharded across threads
    pub parallel_threshold: usize,

    /// Seed for every random stream derived by the simulators
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_units: 200,
            max_rounds: 500,
            shard_size: 1024,
            parallel_threshold: 4096,
            seed: 12345,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(SimError::InvalidConfig(
                "max_rounds must be at least 1".into(),
            ));
        }

        if self.shard_size == 0 {
            return Err(SimError::InvalidConfig(
                "shard_size must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
