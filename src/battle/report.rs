//! Battle results handed to the reporting layer

use serde::{Deserialize, Serialize};

use crate::core::types::Side;

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    AttackerWon,
    DefenderWon,
    /// Round cap reached with both armies standing
    Stalemate,
}

impl BattleOutcome {
    /// Resolve the outcome from the two defeat flags
    ///
    /// When both armies are defeated together the attacker is the loser.
    /// The batch engine applies the same rule per trial.
    pub fn from_defeats(attacker_defeated: bool, defender_defeated: bool) -> Self {
        if attacker_defeated {
            BattleOutcome::DefenderWon
        } else if defender_defeated {
            BattleOutcome::AttackerWon
        } else {
            BattleOutcome::Stalemate
        }
    }

    pub fn loser(&self) -> Option<Side> {
        match self {
            BattleOutcome::AttackerWon => Some(Side::Defender),
            BattleOutcome::DefenderWon => Some(Side::Attacker),
            BattleOutcome::Stalemate => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, BattleOutcome::Stalemate)
    }
}

/// Result of one scalar battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    /// Units lost per battalion, in battalion order
    pub attacker_losses: Vec<u32>,
    pub defender_losses: Vec<u32>,
}

impl BattleReport {
    pub fn losses(&self, side: Side) -> &[u32] {
        match side {
            Side::Attacker => &self.attacker_losses,
            Side::Defender => &self.defender_losses,
        }
    }

    pub fn total_losses(&self, side: Side) -> u32 {
        self.losses(side).iter().sum()
    }
}
