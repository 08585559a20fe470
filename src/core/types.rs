//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::SimError;

/// Initiative tier. Faster tiers resolve first within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Speed {
    Slow = 0,
    Normal = 1,
    Fast = 2,
}

impl Speed {
    /// Resolution order within a round
    pub const DESCENDING: [Speed; 3] = [Speed::Fast, Speed::Normal, Speed::Slow];

    pub fn label(&self) -> &'static str {
        match self {
            Speed::Slow => "Slow",
            Speed::Normal => "Normal",
            Speed::Fast => "Fast",
        }
    }
}

impl TryFrom<u8> for Speed {
    type Error = SimError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Speed::Slow),
            1 => Ok(Speed::Normal),
            2 => Ok(Speed::Fast),
            other => Err(SimError::InvalidSpeed(other)),
        }
    }
}

impl From<Speed> for u8 {
    fn from(speed: Speed) -> Self {
        speed as u8
    }
}

/// Whether an attack spreads its damage over several targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SplashRepr", into = "SplashRepr")]
pub enum Splash {
    Never,
    Always,
    /// Independent Bernoulli draw per attacking unit
    Chance(f64),
}

impl Splash {
    pub fn from_chance(chance: f64) -> Self {
        if chance <= 0.0 {
            Splash::Never
        } else if chance >= 1.0 {
            Splash::Always
        } else {
            Splash::Chance(chance)
        }
    }

    pub fn chance(&self) -> f64 {
        match self {
            Splash::Never => 0.0,
            Splash::Always => 1.0,
            Splash::Chance(p) => *p,
        }
    }

    /// Draw for one attacking unit. Deterministic variants consume no randomness.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        match self {
            Splash::Never => false,
            Splash::Always => true,
            Splash::Chance(p) => rng.gen_bool(*p),
        }
    }
}

/// Unit tables write splash either as a flag or as a probability
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum SplashRepr {
    Flag(bool),
    Chance(f64),
}

impl From<SplashRepr> for Splash {
    fn from(repr: SplashRepr) -> Self {
        match repr {
            SplashRepr::Flag(true) => Splash::Always,
            SplashRepr::Flag(false) => Splash::Never,
            // Out-of-range values are kept so validation can reject them by name
            SplashRepr::Chance(p) if p.is_nan() || !(0.0..=1.0).contains(&p) => Splash::Chance(p),
            SplashRepr::Chance(p) => Splash::from_chance(p),
        }
    }
}

impl From<Splash> for SplashRepr {
    fn from(splash: Splash) -> Self {
        match splash {
            Splash::Never => SplashRepr::Flag(false),
            Splash::Always => SplashRepr::Flag(true),
            Splash::Chance(p) => SplashRepr::Chance(p),
        }
    }
}

/// Which army of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[derive(Deserialize)]
    struct Row {
        speed: Speed,
        splash: Splash,
    }

    #[test]
    fn test_speed_order() {
        assert_eq!(Speed::DESCENDING, [Speed::Fast, Speed::Normal, Speed::Slow]);
        assert!(Speed::Fast > Speed::Slow);
    }

    #[test]
    fn test_speed_rejects_unknown_tier() {
        assert!(matches!(Speed::try_from(3), Err(SimError::InvalidSpeed(3))));
        assert!(toml::from_str::<Row>("speed = 7\nsplash = false").is_err());
        assert_eq!(u8::from(Speed::Fast), 2);
    }

    #[test]
    fn test_splash_from_flag_and_chance() {
        let row: Row = toml::from_str("speed = 0\nsplash = true").unwrap();
        assert_eq!(row.speed, Speed::Slow);
        assert_eq!(row.splash, Splash::Always);

        let row: Row = toml::from_str("speed = 1\nsplash = 0.25").unwrap();
        assert_eq!(row.splash, Splash::Chance(0.25));

        let row: Row = toml::from_str("speed = 1\nsplash = 1.0").unwrap();
        assert_eq!(row.splash, Splash::Always);
    }

    #[test]
    fn test_deterministic_splash_uses_no_randomness() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        assert!(Splash::Always.roll(&mut a));
        assert!(!Splash::Never.roll(&mut a));
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Attacker.opponent(), Side::Defender);
        assert_eq!(Side::Defender.opponent(), Side::Attacker);
    }
}
