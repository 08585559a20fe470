//! Batch output in columnar form
//!
//! Element `i` of every column describes trial `i`.

use serde::{Deserialize, Serialize};

use crate::battle::report::{BattleOutcome, BattleReport};
use crate::core::types::Side;
use crate::simulation::stats::{self, Distribution};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Losses indexed `[battalion][trial]`
    pub attacker_losses: Vec<Vec<u32>>,
    pub defender_losses: Vec<Vec<u32>>,
    pub rounds: Vec<u32>,
    pub outcomes: Vec<BattleOutcome>,
}

impl BatchOutcome {
    /// Empty output for the given battalion counts
    pub fn with_shape(attacker_battalions: usize, defender_battalions: usize, capacity: usize) -> Self {
        Self {
            attacker_losses: vec![Vec::with_capacity(capacity); attacker_battalions],
            defender_losses: vec![Vec::with_capacity(capacity); defender_battalions],
            rounds: Vec::with_capacity(capacity),
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub fn trials(&self) -> usize {
        self.rounds.len()
    }

    pub fn push(&mut self, report: &BattleReport) {
        for (column, &loss) in self.attacker_losses.iter_mut().zip(&report.attacker_losses) {
            column.push(loss);
        }
        for (column, &loss) in self.defender_losses.iter_mut().zip(&report.defender_losses) {
            column.push(loss);
        }
        self.rounds.push(report.rounds);
        self.outcomes.push(report.outcome);
    }

    /// Concatenate another shard after this one
    pub fn append(&mut self, mut other: BatchOutcome) {
        for (column, more) in self.attacker_losses.iter_mut().zip(other.attacker_losses.iter_mut()) {
            column.append(more);
        }
        for (column, more) in self.defender_losses.iter_mut().zip(other.defender_losses.iter_mut()) {
            column.append(more);
        }
        self.rounds.append(&mut other.rounds);
        self.outcomes.append(&mut other.outcomes);
    }

    /// Row view of one trial
    pub fn trial(&self, index: usize) -> Option<BattleReport> {
        Some(BattleReport {
            outcome: *self.outcomes.get(index)?,
            rounds: self.rounds[index],
            attacker_losses: self.attacker_losses.iter().map(|c| c[index]).collect(),
            defender_losses: self.defender_losses.iter().map(|c| c[index]).collect(),
        })
    }

    pub fn losses(&self, side: Side, battalion: usize) -> &[u32] {
        match side {
            Side::Attacker => &self.attacker_losses[battalion],
            Side::Defender => &self.defender_losses[battalion],
        }
    }

    pub fn mean_losses(&self, side: Side, battalion: usize) -> f64 {
        stats::mean(self.losses(side, battalion))
    }

    pub fn mean_rounds(&self) -> f64 {
        stats::mean(&self.rounds)
    }

    /// Fraction of trials won by `side`
    pub fn win_rate(&self, side: Side) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let wins = self
            .outcomes
            .iter()
            .filter(|o| o.loser() == Some(side.opponent()))
            .count();
        wins as f64 / self.outcomes.len() as f64
    }

    pub fn loss_distribution(&self, side: Side, battalion: usize) -> Distribution {
        Distribution::from_values(self.losses(side, battalion))
    }

    pub fn round_distribution(&self) -> Distribution {
        Distribution::from_values(&self.rounds)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} trials, {:.1} rounds on average, attacker wins {:.1}%",
            self.trials(),
            self.mean_rounds(),
            self.win_rate(Side::Attacker) * 100.0,
        )
    }
}
