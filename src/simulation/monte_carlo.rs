//! Repeated scalar battles
//!
//! Works for every army the scalar engine accepts, including mixed
//! splash and flanking setups the batch engine rejects.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::battle::army::Army;
use crate::battle::observer::NullObserver;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::simulation::output::BatchOutcome;

/// Fight `trials` independent battles between fresh copies of both armies
///
/// Trials are cut into shards of `config.shard_size`; shard `k` uses
/// `ChaCha8Rng::seed_from_u64(seed + k)`. Shards run on rayon once
/// `trials` reaches `config.parallel_threshold`, and are concatenated in
/// shard order either way. Battles are capped at `config.max_rounds`,
/// whatever cap the armies were built with.
pub fn run_battles(
    attacker: &Army,
    defender: &Army,
    trials: usize,
    config: &SimulationConfig,
) -> Result<BatchOutcome> {
    config.validate()?;

    let shards: Vec<(u64, usize)> = (0..trials)
        .step_by(config.shard_size)
        .enumerate()
        .map(|(k, start)| (k as u64, config.shard_size.min(trials - start)))
        .collect();

    let run_shard = |&(k, size): &(u64, usize)| -> BatchOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(k));
        let mut a = attacker.clone();
        a.set_max_rounds(config.max_rounds);
        let mut d = defender.clone();
        let mut out = BatchOutcome::with_shape(a.len(), d.len(), size);
        for _ in 0..size {
            a.revive();
            d.revive();
            let report = a.attack(&mut d, &mut NullObserver, &mut rng);
            out.push(&report);
        }
        out
    };

    let parts: Vec<BatchOutcome> = if trials >= config.parallel_threshold {
        shards.par_iter().map(run_shard).collect()
    } else {
        shards.iter().map(run_shard).collect()
    };

    let mut out = BatchOutcome::with_shape(attacker.len(), defender.len(), trials);
    for part in parts {
        out.append(part);
    }
    tracing::debug!(
        trials,
        shards = shards.len(),
        "{} vs {}: {}",
        attacker.name(),
        defender.name(),
        out.summary()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battalion::Battalion;
    use crate::battle::report::BattleOutcome;
    use crate::battle::unit::Unit;
    use crate::core::types::{Side, Speed};

    fn armies() -> (Army, Army) {
        let a = Army::new(
            "A",
            vec![Battalion::new(12, Unit::new("Spear", 30, 10, 20, 0.7, Speed::Normal))],
        )
        .unwrap();
        let d = Army::new(
            "D",
            vec![Battalion::new(10, Unit::new("Spear", 30, 10, 20, 0.7, Speed::Normal))],
        )
        .unwrap();
        (a, d)
    }

    #[test]
    fn test_columns_have_one_entry_per_trial() {
        let (a, d) = armies();
        let out = run_battles(&a, &d, 50, &SimulationConfig::default()).unwrap();

        assert_eq!(out.trials(), 50);
        assert_eq!(out.attacker_losses.len(), 1);
        assert_eq!(out.attacker_losses[0].len(), 50);
        assert!(out.outcomes.iter().all(BattleOutcome::is_decided));
        assert!(out.defender_losses[0].iter().all(|&l| l <= 10));
    }

    #[test]
    fn test_sharding_is_independent_of_threads() {
        let (a, d) = armies();
        let parallel = SimulationConfig {
            shard_size: 7,
            parallel_threshold: 0,
            ..SimulationConfig::default()
        };
        let sequential = SimulationConfig {
            parallel_threshold: usize::MAX,
            ..parallel.clone()
        };

        let first = run_battles(&a, &d, 60, &parallel).unwrap();
        let second = run_battles(&a, &d, 60, &sequential).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_input_armies_are_untouched() {
        let (a, d) = armies();
        run_battles(&a, &d, 5, &SimulationConfig::default()).unwrap();
        assert_eq!(a.rounds(), 0);
        assert_eq!(d.defeated_counts(), vec![0]);
    }

    #[test]
    fn test_bigger_army_wins_more_often() {
        let (a, d) = armies();
        let out = run_battles(&a, &d, 400, &SimulationConfig::default()).unwrap();
        assert!(out.win_rate(Side::Attacker) > out.win_rate(Side::Defender));
    }

    #[test]
    fn test_round_cap_comes_from_config() {
        let idle = Unit::new("Idle", 10, 0, 0, 1.0, Speed::Normal);
        let a = Army::new("A", vec![Battalion::new(2, idle.clone())]).unwrap();
        let d = Army::new("D", vec![Battalion::new(2, idle)]).unwrap();

        let config = SimulationConfig::default().with_max_rounds(4);
        let out = run_battles(&a, &d, 10, &config).unwrap();

        assert_eq!(out.rounds, vec![4; 10]);
        assert_eq!(out.outcomes, vec![BattleOutcome::Stalemate; 10]);
        assert_eq!(a.max_rounds(), SimulationConfig::default().max_rounds);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (a, d) = armies();
        let config = SimulationConfig {
            shard_size: 0,
            ..SimulationConfig::default()
        };
        assert!(run_battles(&a, &d, 5, &config).is_err());
    }
}
