//! Unit catalog: templates keyed by name
//!
//! Ships with the stock roster and accepts `[units.<Name>]` tables from
//! scenario files, which add new units or override stock ones.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::battle::unit::Unit;
use crate::core::error::{Result, SimError};
use crate::core::types::{Speed, Splash};

/// Leader unit of the stock player army
pub const GENERAL: &str = "General";

/// One row of a unit table. The name comes from the table key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub hp: u32,
    pub dmg_min: u32,
    pub dmg_max: u32,
    pub accuracy: f64,
    pub speed: Speed,
    #[serde(default)]
    pub splash: Option<Splash>,
    #[serde(default)]
    pub flanking: Option<bool>,
}

impl UnitSpec {
    pub fn into_unit(self, name: &str) -> Result<Unit> {
        let mut unit = Unit::new(
            name,
            self.hp,
            self.dmg_min,
            self.dmg_max,
            self.accuracy,
            self.speed,
        );
        if let Some(splash) = self.splash {
            unit = unit.with_splash(splash);
        }
        if let Some(flanking) = self.flanking {
            unit = unit.with_flanking(flanking);
        }
        unit.validate()?;
        Ok(unit)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitCatalog {
    units: AHashMap<String, Unit>,
}

impl UnitCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock player, enemy and boss units
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        let stock = [
            // Player
            Unit::new("Recruit", 40, 15, 30, 0.8, Speed::Normal),
            Unit::new("Militia", 60, 20, 40, 0.8, Speed::Normal),
            Unit::new("Soldier", 90, 20, 40, 0.85, Speed::Normal),
            Unit::new("Bowman", 10, 20, 40, 0.8, Speed::Normal),
            Unit::new("LongBowman", 10, 30, 60, 0.8, Speed::Normal),
            Unit::new("Cavalry", 5, 5, 10, 0.8, Speed::Fast),
            Unit::new(GENERAL, 1, 180, 180, 0.8, Speed::Normal).with_splash(Splash::Always),
            // Enemy
            Unit::new("Scavenger", 40, 15, 30, 0.6, Speed::Normal),
            Unit::new("Thug", 60, 20, 40, 0.6, Speed::Normal),
            Unit::new("Roughneck", 90, 20, 40, 0.6, Speed::Normal),
            Unit::new("Stonethrower", 10, 20, 40, 0.6, Speed::Normal),
            Unit::new("Ranger", 10, 30, 60, 0.6, Speed::Normal),
            Unit::new("Guard Dog", 5, 5, 10, 0.6, Speed::Fast),
            // Bosses
            Unit::new("Skunk", 5000, 1, 100, 0.5, Speed::Slow),
            Unit::new("One-Eyed Bert", 6000, 300, 500, 0.5, Speed::Slow),
            Unit::new("Metal Tooth", 11000, 250, 500, 0.5, Speed::Slow),
        ];
        for unit in stock {
            catalog.units.insert(unit.name.clone(), unit);
        }
        catalog
    }

    /// Add or replace a template after validating it
    pub fn insert(&mut self, unit: Unit) -> Result<()> {
        unit.validate()?;
        self.units.insert(unit.name.clone(), unit);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Unit> {
        self.units
            .get(name)
            .ok_or_else(|| SimError::UnknownUnit(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Names in alphabetical order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.units.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Merge a unit table on top of this catalog
    pub fn extend_from_specs(&mut self, specs: AHashMap<String, UnitSpec>) -> Result<()> {
        for (name, spec) in specs {
            let unit = spec.into_unit(&name)?;
            self.units.insert(name, unit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roster_is_valid() {
        let catalog = UnitCatalog::builtin();
        assert_eq!(catalog.len(), 16);
        for name in catalog.names() {
            assert!(catalog.get(name).unwrap().validate().is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_builtin_policies() {
        let catalog = UnitCatalog::builtin();
        assert!(catalog.get("Cavalry").unwrap().flanking);
        assert_eq!(catalog.get(GENERAL).unwrap().splash, Splash::Always);
        assert_eq!(catalog.get("Metal Tooth").unwrap().splash, Splash::Always);
        assert_eq!(catalog.get("Recruit").unwrap().splash, Splash::Never);
    }

    #[test]
    fn test_unknown_unit() {
        let catalog = UnitCatalog::builtin();
        assert!(matches!(catalog.get("Dragon"), Err(SimError::UnknownUnit(_))));
    }

    #[test]
    fn test_spec_overrides_defaults() {
        let spec: UnitSpec = toml::from_str(
            "hp = 10\ndmg_min = 5\ndmg_max = 8\naccuracy = 0.5\nspeed = 0\nsplash = false\nflanking = true",
        )
        .unwrap();
        let unit = spec.into_unit("Sapper").unwrap();
        assert_eq!(unit.splash, Splash::Never);
        assert!(unit.flanking);
    }

    #[test]
    fn test_spec_validation_names_unit() {
        let spec = UnitSpec {
            hp: 10,
            dmg_min: 9,
            dmg_max: 3,
            accuracy: 0.5,
            speed: Speed::Normal,
            splash: None,
            flanking: None,
        };
        let err = spec.into_unit("Backwards").unwrap_err();
        assert!(err.to_string().contains("Backwards"));
        assert!(err.is_configuration());
    }
}
