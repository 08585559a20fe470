//! Trace sinks for battle resolution
//!
//! The engines never print. Callers pass an observer into `Army::attack`
//! and choose whether events go nowhere, to `tracing`, or into a log.

use serde::{Deserialize, Serialize};

use crate::battle::report::BattleOutcome;
use crate::core::types::Speed;

/// One battalion-vs-battalion exchange
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub attacker: &'a str,
    pub defender: &'a str,
    /// Units that were eligible to act when the exchange started
    pub attackers: u32,
    pub killed: u32,
    pub defender_alive: u32,
    pub defender_total: u32,
}

pub trait BattleObserver {
    fn round_started(&mut self, _round: u32) {}

    fn tier_started(&mut self, _speed: Speed) {}

    fn exchange(&mut self, _exchange: &Exchange<'_>) {}

    fn battle_ended(&mut self, _outcome: BattleOutcome, _rounds: u32) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl BattleObserver for NullObserver {}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BattleObserver for TracingObserver {
    fn round_started(&mut self, round: u32) {
        tracing::debug!(round, "round started");
    }

    fn tier_started(&mut self, speed: Speed) {
        tracing::debug!("{} units", speed.label());
    }

    fn exchange(&mut self, exchange: &Exchange<'_>) {
        tracing::debug!(
            "{} {} killed {} {} ({}/{})",
            exchange.attackers,
            exchange.attacker,
            exchange.killed,
            exchange.defender,
            exchange.defender_alive,
            exchange.defender_total
        );
    }

    fn battle_ended(&mut self, outcome: BattleOutcome, rounds: u32) {
        tracing::info!(?outcome, rounds, "battle ended");
    }
}

/// Recorded battle event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    RoundStarted { round: u32 },
    TierStarted { speed: Speed },
    Exchange {
        attacker: String,
        defender: String,
        attackers: u32,
        killed: u32,
        defender_alive: u32,
    },
    BattleEnded { outcome: BattleOutcome, rounds: u32 },
}

/// Keeps every event in order
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kills_by(&self, attacker: &str) -> u32 {
        self.events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::Exchange {
                    attacker: a,
                    killed,
                    ..
                } if a == attacker => Some(*killed),
                _ => None,
            })
            .sum()
    }

    pub fn tiers(&self) -> Vec<Speed> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BattleEvent::TierStarted { speed } => Some(*speed),
                _ => None,
            })
            .collect()
    }
}

impl BattleObserver for BattleEventLog {
    fn round_started(&mut self, round: u32) {
        self.events.push(BattleEvent::RoundStarted { round });
    }

    fn tier_started(&mut self, speed: Speed) {
        self.events.push(BattleEvent::TierStarted { speed });
    }

    fn exchange(&mut self, exchange: &Exchange<'_>) {
        self.events.push(BattleEvent::Exchange {
            attacker: exchange.attacker.to_string(),
            defender: exchange.defender.to_string(),
            attackers: exchange.attackers,
            killed: exchange.killed,
            defender_alive: exchange.defender_alive,
        });
    }

    fn battle_ended(&mut self, outcome: BattleOutcome, rounds: u32) {
        self.events.push(BattleEvent::BattleEnded { outcome, rounds });
    }
}
