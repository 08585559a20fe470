//! Armies and the scalar round loop
//!
//! Each round walks the speed tiers fast to slow. Within a tier both armies
//! strike, the side whose `attack` was called first. Attack eligibility for
//! both directions comes from the bookkeeping as it stood when the tier
//! began, so units killed in the first direction still strike back. Kills
//! are applied to the bookkeeping once the whole tier has resolved.

use std::fmt;
use std::ops::Index;

use rand::Rng;

use crate::battle::battalion::Battalion;
use crate::battle::observer::{BattleObserver, Exchange};
use crate::battle::report::{BattleOutcome, BattleReport};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::Speed;

#[derive(Debug, Clone)]
pub struct Army {
    name: String,
    battalions: Vec<Battalion>,
    speeds: Vec<Speed>,
    /// Battalion indices by ascending template HP, leader last
    hp_order: Vec<usize>,
    rounds: u32,
    max_units: u32,
    max_rounds: u32,
}

impl Army {
    /// Build an army with the default unit and round caps
    pub fn new(name: impl Into<String>, battalions: Vec<Battalion>) -> Result<Self> {
        Self::configured(name, battalions, &SimulationConfig::default())
    }

    /// Build an army, dropping empty battalions
    pub fn configured(
        name: impl Into<String>,
        battalions: Vec<Battalion>,
        config: &SimulationConfig,
    ) -> Result<Self> {
        let mut army = Self {
            name: name.into(),
            battalions: Vec::with_capacity(battalions.len()),
            speeds: Vec::with_capacity(battalions.len()),
            hp_order: Vec::new(),
            rounds: 0,
            max_units: config.max_units,
            max_rounds: config.max_rounds,
        };
        for battalion in battalions {
            army.insert(battalion, None)?;
        }
        army.reindex();
        army.check_capacity();
        Ok(army)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn battalions(&self) -> &[Battalion] {
        &self.battalions
    }

    pub fn len(&self) -> usize {
        self.battalions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battalions.is_empty()
    }

    pub fn speeds(&self) -> &[Speed] {
        &self.speeds
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn set_max_rounds(&mut self, max_rounds: u32) {
        self.max_rounds = max_rounds;
    }

    /// Index of the leader battalion, if any
    pub fn leader_index(&self) -> Option<usize> {
        self.battalions.iter().position(|b| b.is_leader())
    }

    /// Insert a battalion (default: append) between battles
    pub fn add(&mut self, battalion: Battalion, position: Option<usize>) -> Result<&mut Self> {
        self.insert(battalion, position)?;
        self.reindex();
        self.check_capacity();
        Ok(self)
    }

    fn insert(&mut self, battalion: Battalion, position: Option<usize>) -> Result<()> {
        if battalion.n() == 0 {
            return Ok(());
        }
        battalion.unit().validate()?;
        if battalion.is_leader() && self.leader_index().is_some() {
            return Err(SimError::DuplicateLeader(self.name.clone()));
        }
        let position = position
            .unwrap_or(self.battalions.len())
            .min(self.battalions.len());
        self.battalions.insert(position, battalion);
        Ok(())
    }

    fn reindex(&mut self) {
        self.speeds = self.battalions.iter().map(|b| b.unit().speed).collect();
        self.hp_order = self.hp_indices();
    }

    fn hp_indices(&self) -> Vec<usize> {
        let leader = self.leader_index();
        let mut order: Vec<usize> = (0..self.battalions.len())
            .filter(|&i| Some(i) != leader)
            .collect();
        order.sort_by_key(|&i| self.battalions[i].unit().hp);
        order.extend(leader);
        order
    }

    /// More non-leader units than `max_units`; only ever warned about
    pub fn is_over_capacity(&self) -> bool {
        self.unit_count() > self.max_units
    }

    fn check_capacity(&self) {
        if self.is_over_capacity() {
            tracing::warn!(
                "{} has too many units ({}/{})",
                self.name,
                self.unit_count(),
                self.max_units
            );
        }
    }

    /// Original size of all non-leader battalions
    pub fn unit_count(&self) -> u32 {
        self.battalions
            .iter()
            .filter(|b| !b.is_leader())
            .map(|b| b.n())
            .sum()
    }

    /// Living units outside the leader battalion
    pub fn size(&self) -> u32 {
        self.battalions
            .iter()
            .filter(|b| !b.is_leader())
            .map(|b| b.n_alive())
            .sum()
    }

    /// Targeting order for an attacker, restricted to battalions still standing
    ///
    /// Flanking attackers go by ascending template HP with the leader last;
    /// everyone else follows declaration order.
    pub fn indices(&self, flanking: bool) -> Vec<usize> {
        let standing = |&i: &usize| !self.battalions[i].is_wiped_out();
        if flanking {
            self.hp_order.iter().copied().filter(standing).collect()
        } else {
            (0..self.battalions.len()).filter(standing).collect()
        }
    }

    pub fn has_speed_units(&self, speed: Speed) -> bool {
        self.battalions
            .iter()
            .zip(&self.speeds)
            .any(|(b, &s)| s == speed && !b.is_wiped_out())
    }

    /// Every battalion's bookkeeping says it is gone
    pub fn is_defeated(&self) -> bool {
        self.battalions.iter().all(|b| b.is_defeated())
    }

    /// No living unit left, including kills not yet booked
    pub fn is_wiped_out(&self) -> bool {
        self.battalions.iter().all(|b| b.is_wiped_out())
    }

    pub fn update_n_defeated(&mut self) {
        for battalion in &mut self.battalions {
            battalion.update_n_defeated();
        }
    }

    fn reset_attacks(&mut self) {
        for battalion in &mut self.battalions {
            battalion.reset_attacks();
        }
    }

    pub fn revive(&mut self) {
        for battalion in &mut self.battalions {
            battalion.revive();
        }
        self.rounds = 0;
    }

    /// Defeated units per battalion
    pub fn defeated_counts(&self) -> Vec<u32> {
        self.battalions.iter().map(|b| b.n_defeated()).collect()
    }

    /// One direction of a tier: this side's battalions at `speed` attack
    fn strike<R, O>(&mut self, opponent: &mut Army, speed: Speed, observer: &mut O, rng: &mut R)
    where
        R: Rng + ?Sized,
        O: BattleObserver + ?Sized,
    {
        for i in 0..self.battalions.len() {
            if self.speeds[i] != speed {
                continue;
            }
            let battalion = &mut self.battalions[i];
            let targets = opponent.indices(battalion.unit().flanking);

            for j in targets {
                if !battalion.can_attack() || opponent.is_wiped_out() {
                    break;
                }
                let target = &mut opponent.battalions[j];
                if target.is_wiped_out() {
                    continue;
                }
                let attackers = battalion.n_can_attack();
                let outcome = battalion.attack(target, rng);
                observer.exchange(&Exchange {
                    attacker: battalion.name(),
                    defender: target.name(),
                    attackers,
                    killed: outcome.killed,
                    defender_alive: target.n_alive(),
                    defender_total: target.n(),
                });
            }
        }
    }

    /// Resolve one speed tier in both directions and book the kills
    ///
    /// Returns true once either army is defeated. The counter-strike is
    /// skipped when the first direction already wiped out an army.
    pub fn resolve_tier<R, O>(
        &mut self,
        opponent: &mut Army,
        speed: Speed,
        observer: &mut O,
        rng: &mut R,
    ) -> bool
    where
        R: Rng + ?Sized,
        O: BattleObserver + ?Sized,
    {
        observer.tier_started(speed);
        self.strike(opponent, speed, observer, rng);
        if !opponent.is_wiped_out() && !self.is_wiped_out() {
            opponent.strike(self, speed, observer, rng);
        }

        self.update_n_defeated();
        opponent.update_n_defeated();
        self.reset_attacks();
        opponent.reset_attacks();

        self.is_defeated() || opponent.is_defeated()
    }

    /// One full round over every active tier. Returns true if the battle ended.
    pub fn resolve_round<R, O>(&mut self, opponent: &mut Army, observer: &mut O, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
        O: BattleObserver + ?Sized,
    {
        observer.round_started(self.rounds + 1);
        let mut decided = false;
        for speed in Speed::DESCENDING {
            if !(self.has_speed_units(speed) || opponent.has_speed_units(speed)) {
                continue;
            }
            if self.resolve_tier(opponent, speed, observer, rng) {
                decided = true;
                break;
            }
        }
        self.rounds += 1;
        opponent.rounds += 1;
        decided
    }

    /// Fight rounds until one army is defeated or the round cap is hit
    pub fn attack<R, O>(&mut self, opponent: &mut Army, observer: &mut O, rng: &mut R) -> BattleReport
    where
        R: Rng + ?Sized,
        O: BattleObserver + ?Sized,
    {
        let own_before = self.defeated_counts();
        let their_before = opponent.defeated_counts();
        let mut played = 0;

        while !self.is_defeated() && !opponent.is_defeated() {
            if played >= self.max_rounds {
                tracing::debug!(
                    "{} vs {} stopped after {} rounds",
                    self.name,
                    opponent.name,
                    played
                );
                break;
            }
            self.resolve_round(opponent, observer, rng);
            played += 1;
        }

        let outcome = BattleOutcome::from_defeats(self.is_defeated(), opponent.is_defeated());
        observer.battle_ended(outcome, played);

        BattleReport {
            outcome,
            rounds: played,
            attacker_losses: losses(&own_before, &self.defeated_counts()),
            defender_losses: losses(&their_before, &opponent.defeated_counts()),
        }
    }
}

fn losses(before: &[u32], after: &[u32]) -> Vec<u32> {
    before.iter().zip(after).map(|(b, a)| a - b).collect()
}

impl Index<usize> for Army {
    type Output = Battalion;

    fn index(&self, index: usize) -> &Self::Output {
        &self.battalions[index]
    }
}

impl fmt::Display for Army {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with {} units:", self.name, self.unit_count())?;
        for battalion in &self.battalions {
            write!(f, " {} ({})", battalion.name(), battalion.alive_str())?;
        }
        Ok(())
    }
}
