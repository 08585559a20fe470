//! Batch engine: many independent battles advanced together
//!
//! Each battalion's mutable counters are held as length-`n` columns, one
//! slot per trial. Instead of resolving unit by unit, an attacking
//! battalion draws the number of high rolls from a binomial, sums its
//! damage, and turns it into kills by dividing by the target's hit points.
//!
//! Only units that always splash can be aggregated this way: their damage
//! pools chain front to back exactly like the scalar engine's, so the sum
//! of pools is all that matters. Normal attacks waste overkill per unit
//! and have no closed form here, so they are rejected.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Binomial, Distribution};
use rayon::prelude::*;

use crate::battle::army::Army;
use crate::battle::report::BattleOutcome;
use crate::battle::unit::Unit;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Speed, Splash};
use crate::simulation::output::BatchOutcome;

/// Progress of one trial's splash chain within a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chain {
    /// Damage not rolled yet
    Fresh,
    /// Overflow from a wiped-out target, owed to the next one
    Carrying(u64),
    Done,
}

#[derive(Debug, Clone)]
struct BatchBattalion {
    unit: Unit,
    n: u32,
    /// `n - defeated` as of the start of the tier
    alive: Vec<u32>,
    /// Live kill count, updated as attacks land
    defeated: Vec<u32>,
    attacks: Vec<u32>,
    chain: Vec<Chain>,
    /// Damage sitting on the front unit
    wound: Vec<u64>,
}

impl BatchBattalion {
    fn new(unit: Unit, n: u32) -> Self {
        Self {
            unit,
            n,
            alive: Vec::new(),
            defeated: Vec::new(),
            attacks: Vec::new(),
            chain: Vec::new(),
            wound: Vec::new(),
        }
    }

    fn reset(&mut self, trials: usize) {
        self.alive = vec![self.n; trials];
        self.defeated = vec![0; trials];
        self.wound = vec![0; trials];
        self.reset_attacks(trials);
    }

    fn reset_attacks(&mut self, trials: usize) {
        self.attacks = vec![0; trials];
        self.chain = vec![Chain::Fresh; trials];
    }

    fn remaining(&self, trial: usize) -> u32 {
        self.n - self.defeated[trial]
    }

    fn update_n_alive(&mut self) {
        for (alive, defeated) in self.alive.iter_mut().zip(&self.defeated) {
            *alive = self.n - defeated;
        }
    }
}

#[derive(Debug, Clone)]
struct BatchSide {
    name: String,
    battalions: Vec<BatchBattalion>,
    flank_order: Vec<usize>,
    line_order: Vec<usize>,
}

impl BatchSide {
    fn from_army(army: &Army) -> Self {
        let mut pristine = army.clone();
        pristine.revive();
        Self {
            name: army.name().to_string(),
            battalions: army
                .battalions()
                .iter()
                .map(|b| BatchBattalion::new(b.unit().clone(), b.n()))
                .collect(),
            flank_order: pristine.indices(true),
            line_order: pristine.indices(false),
        }
    }

    fn is_wiped_out(&self, trial: usize) -> bool {
        self.battalions.iter().all(|b| b.remaining(trial) == 0)
    }
}

/// Columnar simulator for splash-only armies
#[derive(Debug, Clone)]
pub struct FightSimulation {
    attacker: BatchSide,
    defender: BatchSide,
    trials: usize,
    rounds: Vec<u32>,
    decided: Vec<bool>,
    max_rounds: u32,
}

impl FightSimulation {
    pub fn new(attacker: &Army, defender: &Army) -> Self {
        Self {
            attacker: BatchSide::from_army(attacker),
            defender: BatchSide::from_army(defender),
            trials: 0,
            rounds: Vec::new(),
            decided: Vec::new(),
            max_rounds: attacker.max_rounds(),
        }
    }

    /// Replace the round cap taken from the attacking army
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Fail on any battalion the aggregate model cannot represent
    ///
    /// Mixed armies are rejected as a whole so no column is ever filled
    /// with a plausible but wrong number.
    pub fn ensure_supported(&self) -> Result<()> {
        let sides = [&self.attacker, &self.defender];
        for battalion in sides.iter().flat_map(|s| s.battalions.iter()) {
            if battalion.unit.splash != Splash::Always {
                return Err(SimError::Unsupported {
                    battalion: battalion.unit.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Allocate fresh columns for `trials` battles
    pub fn reset_battalions(&mut self, trials: usize) {
        self.trials = trials;
        for battalion in self
            .attacker
            .battalions
            .iter_mut()
            .chain(self.defender.battalions.iter_mut())
        {
            battalion.reset(trials);
        }
        self.rounds = vec![0; trials];
        self.decided = vec![false; trials];
    }

    /// Reset and resolve a single pass over the speed tiers
    pub fn run<R: Rng + ?Sized>(&mut self, trials: usize, rng: &mut R) -> Result<()> {
        self.ensure_supported()?;
        self.reset_battalions(trials);
        self.advance_round(rng)
    }

    /// Reset and resolve rounds until every trial is decided or the cap is hit
    pub fn run_to_completion<R: Rng + ?Sized>(&mut self, trials: usize, rng: &mut R) -> Result<()> {
        self.ensure_supported()?;
        self.reset_battalions(trials);
        let mut played = 0;
        while played < self.max_rounds && self.decided.iter().any(|d| !d) {
            self.advance_round(rng)?;
            played += 1;
        }
        tracing::debug!(
            trials,
            played,
            "{} vs {} batch finished",
            self.attacker.name,
            self.defender.name
        );
        Ok(())
    }

    /// Resolve one more pass over the speed tiers without resetting
    pub fn advance_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        self.ensure_supported()?;
        for (rounds, decided) in self.rounds.iter_mut().zip(&self.decided) {
            if !decided {
                *rounds += 1;
            }
        }

        for speed in Speed::DESCENDING {
            self.resolve_tier(speed, rng)?;
        }
        Ok(())
    }

    /// Both directions of one tier, then book the kills
    fn resolve_tier<R: Rng + ?Sized>(&mut self, speed: Speed, rng: &mut R) -> Result<()> {
        let mut skip = self.decided.clone();
        strike(&mut self.attacker, &mut self.defender, speed, &skip, rng)?;

        // A side wiped out by the first strike never answers
        for (trial, skip) in skip.iter_mut().enumerate() {
            *skip = *skip || self.attacker.is_wiped_out(trial) || self.defender.is_wiped_out(trial);
        }
        strike(&mut self.defender, &mut self.attacker, speed, &skip, rng)?;

        for battalion in self
            .attacker
            .battalions
            .iter_mut()
            .chain(self.defender.battalions.iter_mut())
        {
            battalion.update_n_alive();
            battalion.reset_attacks(self.trials);
        }

        for trial in 0..self.trials {
            if !self.decided[trial] {
                self.decided[trial] =
                    self.attacker.is_wiped_out(trial) || self.defender.is_wiped_out(trial);
            }
        }
        Ok(())
    }

    pub fn outcome_of(&self, trial: usize) -> BattleOutcome {
        BattleOutcome::from_defeats(
            self.attacker.is_wiped_out(trial),
            self.defender.is_wiped_out(trial),
        )
    }

    /// Columns for every trial run so far
    pub fn outcome(&self) -> BatchOutcome {
        let losses = |side: &BatchSide| -> Vec<Vec<u32>> {
            side.battalions.iter().map(|b| b.defeated.clone()).collect()
        };
        BatchOutcome {
            attacker_losses: losses(&self.attacker),
            defender_losses: losses(&self.defender),
            rounds: self.rounds.clone(),
            outcomes: (0..self.trials).map(|t| self.outcome_of(t)).collect(),
        }
    }
}

/// One direction of a tier across all trials not in `skip`
fn strike<R: Rng + ?Sized>(
    attacker: &mut BatchSide,
    defender: &mut BatchSide,
    speed: Speed,
    skip: &[bool],
    rng: &mut R,
) -> Result<()> {
    for a in attacker.battalions.iter_mut() {
        if a.unit.speed != speed {
            continue;
        }
        let order = if a.unit.flanking {
            &defender.flank_order
        } else {
            &defender.line_order
        };
        for &j in order {
            splash_attack(a, &mut defender.battalions[j], skip, rng)?;
        }
    }
    Ok(())
}

/// Aggregate splash exchange between two battalions, per trial
///
/// The first target of a chain receives the battalion's rolled damage;
/// later targets receive whatever overflowed from wiping out the previous
/// one. Leftover damage on a surviving target stays on its front unit.
fn splash_attack<R: Rng + ?Sized>(
    a: &mut BatchBattalion,
    d: &mut BatchBattalion,
    skip: &[bool],
    rng: &mut R,
) -> Result<()> {
    if a.unit.splash != Splash::Always {
        return Err(SimError::Unsupported {
            battalion: a.unit.name.clone(),
        });
    }

    let hp = d.unit.hp as u64;
    for trial in 0..skip.len() {
        if skip[trial] || d.remaining(trial) == 0 {
            continue;
        }

        let damage = match a.chain[trial] {
            Chain::Done => continue,
            Chain::Carrying(excess) => excess,
            Chain::Fresh => {
                let n_can = a.alive[trial] - a.attacks[trial];
                if n_can == 0 {
                    continue;
                }
                a.attacks[trial] += n_can;
                roll_damage(&a.unit, n_can, rng)?
            }
        };

        let remaining = d.remaining(trial);
        let total = damage + d.wound[trial];
        let killed = (total / hp).min(remaining as u64) as u32;
        let leftover = total - killed as u64 * hp;
        d.defeated[trial] += killed;

        if killed == remaining {
            d.wound[trial] = 0;
            a.chain[trial] = if leftover > 0 {
                Chain::Carrying(leftover)
            } else {
                Chain::Done
            };
        } else {
            d.wound[trial] = leftover;
            a.chain[trial] = Chain::Done;
        }
    }
    Ok(())
}

/// Summed damage of `n` units using the binary accuracy model
fn roll_damage<R: Rng + ?Sized>(unit: &Unit, n: u32, rng: &mut R) -> Result<u64> {
    let binomial = Binomial::new(n as u64, unit.accuracy).map_err(|_| SimError::InvalidAccuracy {
        unit: unit.name.clone(),
        accuracy: unit.accuracy,
    })?;
    let high = binomial.sample(rng);
    Ok(high * unit.dmg_max as u64 + (n as u64 - high) * unit.dmg_min as u64)
}

/// Run `trials` battles to completion, sharded across rayon workers
///
/// Shard `k` draws from `ChaCha8Rng::seed_from_u64(seed + k)`, so the
/// result depends only on the seed and shard size. Battles are capped at
/// `config.max_rounds`, whatever cap the armies were built with.
pub fn run_parallel(
    attacker: &Army,
    defender: &Army,
    trials: usize,
    config: &SimulationConfig,
) -> Result<BatchOutcome> {
    config.validate()?;
    let template = FightSimulation::new(attacker, defender).with_max_rounds(config.max_rounds);
    template.ensure_supported()?;

    let shards: Vec<(u64, usize)> = (0..trials)
        .step_by(config.shard_size)
        .enumerate()
        .map(|(k, start)| (k as u64, config.shard_size.min(trials - start)))
        .collect();

    let run_shard = |&(k, size): &(u64, usize)| -> Result<BatchOutcome> {
        let mut sim = template.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(k));
        sim.run_to_completion(size, &mut rng)?;
        Ok(sim.outcome())
    };

    let parts: Vec<BatchOutcome> = if trials >= config.parallel_threshold {
        shards.par_iter().map(run_shard).collect::<Result<_>>()?
    } else {
        shards.iter().map(run_shard).collect::<Result<_>>()?
    };

    let mut out = BatchOutcome::with_shape(attacker.len(), defender.len(), trials);
    for part in parts {
        out.append(part);
    }
    Ok(out)
}
