//! Scenario files: config, extra units and both compositions in one TOML

use std::fs;
use std::path::Path;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::army::Army;
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::roster::catalog::{UnitCatalog, UnitSpec};
use crate::roster::composition::Composition;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Added to, or overriding, the stock catalog
    #[serde(default)]
    pub units: AHashMap<String, UnitSpec>,
    pub attacker: Composition,
    pub defender: Composition,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Longbow company against a handful of scavengers
    pub fn skirmish() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            units: AHashMap::new(),
            attacker: Composition::player(111, 0, 0, 0, 0, 89),
            defender: Composition::bandits(15, 0, 0, 0, 0, 0),
        }
    }

    pub fn catalog(&self) -> Result<UnitCatalog> {
        let mut catalog = UnitCatalog::builtin();
        catalog.extend_from_specs(self.units.clone())?;
        Ok(catalog)
    }

    /// Validate everything and build `(attacker, defender)`
    pub fn build(&self) -> Result<(Army, Army)> {
        self.simulation.validate()?;
        let catalog = self.catalog()?;
        let attacker = self.attacker.build(&catalog, &self.simulation)?;
        let defender = self.defender.build(&catalog, &self.simulation)?;
        tracing::debug!("{} vs {}", attacker, defender);
        Ok((attacker, defender))
    }
}
