//! Unit templates and single-target attack resolution
//!
//! A `Unit` is the immutable stat block shared by every member of a
//! battalion. The mutable part of an in-battle unit (hit points, dead flag)
//! lives in `UnitState`, one per battalion slot.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimError};
use crate::core::types::{Speed, Splash};

/// Immutable combat stat template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub hp: u32,
    pub dmg_min: u32,
    pub dmg_max: u32,
    /// Probability of rolling `dmg_max` instead of `dmg_min`
    pub accuracy: f64,
    pub speed: Speed,
    pub splash: Splash,
    /// Flanking units go after the weakest battalions first
    pub flanking: bool,
}

impl Unit {
    /// Template with the default policies: slow units splash, fast units flank
    pub fn new(
        name: impl Into<String>,
        hp: u32,
        dmg_min: u32,
        dmg_max: u32,
        accuracy: f64,
        speed: Speed,
    ) -> Self {
        Self {
            name: name.into(),
            hp,
            dmg_min,
            dmg_max,
            accuracy,
            speed,
            splash: Self::default_splash(speed),
            flanking: Self::default_flanking(speed),
        }
    }

    pub fn default_splash(speed: Speed) -> Splash {
        if speed == Speed::Slow {
            Splash::Always
        } else {
            Splash::Never
        }
    }

    pub fn default_flanking(speed: Speed) -> bool {
        speed == Speed::Fast
    }

    /// In-range chances of 0 or 1 collapse to `Never` / `Always`
    pub fn with_splash(mut self, splash: Splash) -> Self {
        self.splash = match splash {
            Splash::Chance(p) if (0.0..=1.0).contains(&p) => Splash::from_chance(p),
            other => other,
        };
        self
    }

    pub fn with_flanking(mut self, flanking: bool) -> Self {
        self.flanking = flanking;
        self
    }

    /// Reject stat blocks the engines cannot run
    pub fn validate(&self) -> Result<()> {
        if self.hp == 0 {
            return Err(SimError::ZeroHitPoints(self.name.clone()));
        }
        if self.dmg_min > self.dmg_max {
            return Err(SimError::InvalidDamageRange {
                unit: self.name.clone(),
                min: self.dmg_min,
                max: self.dmg_max,
            });
        }
        if !(0.0..=1.0).contains(&self.accuracy) {
            return Err(SimError::InvalidAccuracy {
                unit: self.name.clone(),
                accuracy: self.accuracy,
            });
        }
        if let Splash::Chance(p) = self.splash {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidSplash {
                    unit: self.name.clone(),
                    chance: p,
                });
            }
        }
        Ok(())
    }

    /// Binary accuracy model: a hit deals `dmg_max`, a miss `dmg_min`
    pub fn roll_damage<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if rng.gen_bool(self.accuracy) {
            self.dmg_max
        } else {
            self.dmg_min
        }
    }

    pub fn roll_splash<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.splash.roll(rng)
    }

    /// Apply one attack to `target` and return the signed overflow
    ///
    /// Uses `damage` when supplied (splash chains), otherwise rolls. A
    /// positive result is damage left over after killing the target.
    pub fn attack<R: Rng + ?Sized>(
        &self,
        target: &mut UnitState,
        damage: Option<u32>,
        rng: &mut R,
    ) -> i64 {
        let damage = match damage {
            Some(d) => d,
            None => self.roll_damage(rng),
        };
        target.take_damage(damage)
    }
}

/// Mutable state of one in-battle unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitState {
    pub current_hp: i64,
    pub dead: bool,
    pub hits: u32,
}

impl UnitState {
    pub fn new(hp: u32) -> Self {
        Self {
            current_hp: hp as i64,
            dead: false,
            hits: 0,
        }
    }

    /// Returns `-current_hp` after the hit
    pub fn take_damage(&mut self, damage: u32) -> i64 {
        self.current_hp -= damage as i64;
        self.dead = self.current_hp <= 0;
        self.hits += 1;
        -self.current_hp
    }

    pub fn revive(&mut self, hp: u32) {
        *self = Self::new(hp);
    }
}
