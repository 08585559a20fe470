//! Army compositions: ordered `(unit, count)` lists resolved against a catalog

use serde::{Deserialize, Serialize};

use crate::battle::army::Army;
use crate::battle::battalion::Battalion;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::roster::catalog::UnitCatalog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionEntry {
    pub unit: String,
    /// Signed so that out-of-range counts are reported instead of failing to parse
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub name: String,
    #[serde(default)]
    pub battalions: Vec<CompositionEntry>,
    /// Unit fielded as a single-unit leader battalion
    #[serde(default)]
    pub leader: Option<String>,
    /// Unit fielded as a single-unit battalion after everything else
    #[serde(default)]
    pub boss: Option<String>,
}

impl Composition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            battalions: Vec::new(),
            leader: None,
            boss: None,
        }
    }

    pub fn with(mut self, unit: impl Into<String>, count: i64) -> Self {
        self.battalions.push(CompositionEntry {
            unit: unit.into(),
            count,
        });
        self
    }

    pub fn with_leader(mut self, unit: impl Into<String>) -> Self {
        self.leader = Some(unit.into());
        self
    }

    pub fn with_boss(mut self, unit: impl Into<String>) -> Self {
        self.boss = Some(unit.into());
        self
    }

    /// Resolve every entry and build the army
    ///
    /// All configuration errors surface here, before any battle starts.
    pub fn build(&self, catalog: &UnitCatalog, config: &SimulationConfig) -> Result<Army> {
        let mut battalions = Vec::with_capacity(self.battalions.len() + 2);

        for entry in &self.battalions {
            let count = u32::try_from(entry.count).map_err(|_| SimError::InvalidCount {
                unit: entry.unit.clone(),
                count: entry.count,
            })?;
            let unit = catalog.get(&entry.unit)?;
            battalions.push(Battalion::new(count, unit.clone()));
        }

        if let Some(leader) = &self.leader {
            battalions.push(Battalion::leader(catalog.get(leader)?.clone()));
        }
        if let Some(boss) = &self.boss {
            battalions.push(Battalion::new(1, catalog.get(boss)?.clone()));
        }

        Army::configured(self.name.clone(), battalions, config)
    }

    /// Stock player army, always led by a General
    pub fn player(recruits: i64, militia: i64, soldiers: i64, cavalry: i64, bowmen: i64, longbowmen: i64) -> Self {
        Self::new("Player")
            .with("Recruit", recruits)
            .with("Militia", militia)
            .with("Soldier", soldiers)
            .with("Cavalry", cavalry)
            .with("Bowman", bowmen)
            .with("LongBowman", longbowmen)
            .with_leader(crate::roster::catalog::GENERAL)
    }

    /// Stock bandit army
    pub fn bandits(scavengers: i64, thugs: i64, guard_dogs: i64, roughnecks: i64, stonethrowers: i64, rangers: i64) -> Self {
        Self::new("Bandits")
            .with("Scavenger", scavengers)
            .with("Thug", thugs)
            .with("Guard Dog", guard_dogs)
            .with("Roughneck", roughnecks)
            .with("Stonethrower", stonethrowers)
            .with("Ranger", rangers)
    }
}
