//! Battalions: homogeneous groups of one unit type
//!
//! A battalion keeps one `UnitState` per original member. Opponents are
//! always hit front to back, so the living units form a suffix of the slot
//! list and a single forward cursor finds the next target.

use rand::Rng;

use crate::battle::unit::{Unit, UnitState};

/// What one `Battalion::attack` call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Units that completed their attack
    pub attacked: u32,
    pub killed: u32,
    /// The opponent ran out of living units before every eligible unit acted
    pub out_of_targets: bool,
}

/// Where a splash chain stopped
enum ChainEnd {
    Spent,
    /// No living opponent left; carries the damage still in the pool
    OutOfTargets(u32),
}

#[derive(Debug, Clone)]
pub struct Battalion {
    unit: Unit,
    units: Vec<UnitState>,
    n: u32,
    n_defeated: u32,
    n_attacks: u32,
    leader: bool,
    /// Index of the first slot that may still be alive
    front: usize,
    /// Unspent pool of a splash chain interrupted by an empty opponent
    pending_splash: Option<u32>,
}

impl Battalion {
    pub fn new(n: u32, unit: Unit) -> Self {
        Self {
            units: vec![UnitState::new(unit.hp); n as usize],
            unit,
            n,
            n_defeated: 0,
            n_attacks: 0,
            leader: false,
            front: 0,
            pending_splash: None,
        }
    }

    /// Single-unit battalion that flanking attackers always target last
    pub fn leader(unit: Unit) -> Self {
        Self::new(1, unit).with_leader(true)
    }

    pub fn with_leader(mut self, leader: bool) -> Self {
        self.leader = leader;
        self
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn name(&self) -> &str {
        &self.unit.name
    }

    pub fn is_leader(&self) -> bool {
        self.leader
    }

    pub fn units(&self) -> &[UnitState] {
        &self.units
    }

    /// Original size
    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn n_defeated(&self) -> u32 {
        self.n_defeated
    }

    pub fn n_attacks(&self) -> u32 {
        self.n_attacks
    }

    /// Units not yet killed, counted from the dead flags
    ///
    /// Equals `n - n_defeated` between tiers; inside a tier it already
    /// reflects kills that the bookkeeping has not applied yet.
    pub fn n_alive(&self) -> u32 {
        self.units.iter().filter(|u| !u.dead).count() as u32
    }

    pub fn n_can_attack(&self) -> u32 {
        self.n - self.n_defeated - self.n_attacks
    }

    pub fn can_attack(&self) -> bool {
        self.n_can_attack() > 0
    }

    pub fn is_defeated(&self) -> bool {
        self.n_defeated == self.n
    }

    /// No living unit left, regardless of bookkeeping
    pub fn is_wiped_out(&self) -> bool {
        self.units.last().map_or(true, |u| u.dead)
    }

    pub fn alive_str(&self) -> String {
        format!("{}/{}", self.n_alive(), self.n)
    }

    /// Slot of the first living unit, in registration order
    pub fn next_target(&mut self) -> Option<usize> {
        while self.front < self.units.len() && self.units[self.front].dead {
            self.front += 1;
        }
        (self.front < self.units.len()).then_some(self.front)
    }

    /// Resolve this battalion's eligible units against `opponent`
    ///
    /// Stops early, without counting the remaining units as having
    /// attacked, when the opponent has nobody left standing.
    pub fn attack<R: Rng + ?Sized>(&mut self, opponent: &mut Battalion, rng: &mut R) -> AttackOutcome {
        let mut outcome = AttackOutcome::default();

        if let Some(pool) = self.pending_splash.take() {
            match self.splash_chain(pool, opponent, rng, &mut outcome.killed) {
                ChainEnd::Spent => {
                    self.n_attacks += 1;
                    outcome.attacked += 1;
                }
                ChainEnd::OutOfTargets(rest) => {
                    self.pending_splash = Some(rest);
                    outcome.out_of_targets = true;
                    return outcome;
                }
            }
        }

        while self.can_attack() {
            let Some(target) = opponent.next_target() else {
                outcome.out_of_targets = true;
                break;
            };

            if self.unit.roll_splash(rng) {
                let pool = self.unit.roll_damage(rng);
                match self.splash_chain(pool, opponent, rng, &mut outcome.killed) {
                    ChainEnd::Spent => {}
                    ChainEnd::OutOfTargets(rest) => {
                        self.pending_splash = Some(rest);
                        outcome.out_of_targets = true;
                        break;
                    }
                }
            } else {
                let state = &mut opponent.units[target];
                self.unit.attack(state, None, rng);
                if state.dead {
                    outcome.killed += 1;
                }
            }

            self.n_attacks += 1;
            outcome.attacked += 1;
        }

        outcome
    }

    /// Spend one splash pool front to back until it is used up
    fn splash_chain<R: Rng + ?Sized>(
        &self,
        mut pool: u32,
        opponent: &mut Battalion,
        rng: &mut R,
        killed: &mut u32,
    ) -> ChainEnd {
        loop {
            let Some(target) = opponent.next_target() else {
                return ChainEnd::OutOfTargets(pool);
            };
            let state = &mut opponent.units[target];
            let excess = self.unit.attack(state, Some(pool), rng);
            if state.dead {
                *killed += 1;
            }
            if excess <= 0 {
                return ChainEnd::Spent;
            }
            pool = excess as u32;
        }
    }

    /// Apply kills from the last exchange to the bookkeeping
    pub fn update_n_defeated(&mut self) {
        self.n_defeated = self.n - self.n_alive();
    }

    /// Round boundary: everyone may act again
    pub fn reset_attacks(&mut self) {
        self.n_attacks = 0;
        self.pending_splash = None;
    }

    pub fn revive(&mut self) {
        let hp = self.unit.hp;
        for unit in &mut self.units {
            unit.revive(hp);
        }
        self.n_defeated = 0;
        self.front = 0;
        self.reset_attacks();
    }
}
