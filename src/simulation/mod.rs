//! Many-battle drivers and their columnar output

pub mod batch;
pub mod monte_carlo;
pub mod output;
pub mod stats;

pub use batch::{run_parallel, FightSimulation};
pub use monte_carlo::run_battles;
pub use output::BatchOutcome;
pub use stats::Distribution;
