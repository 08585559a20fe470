use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Unit count for {unit} must be within 0..={max}, got {count}", max = u32::MAX)]
    InvalidCount { unit: String, count: i64 },

    #[error("Invalid damage range for {unit}: {min}-{max}")]
    InvalidDamageRange { unit: String, min: u32, max: u32 },

    #[error("Accuracy for {unit} must be within [0, 1], got {accuracy}")]
    InvalidAccuracy { unit: String, accuracy: f64 },

    #[error("Splash chance for {unit} must be within [0, 1], got {chance}")]
    InvalidSplash { unit: String, chance: f64 },

    #[error("Invalid speed tier: {0}")]
    InvalidSpeed(u8),

    #[error("Unit {0} must have positive hit points")]
    ZeroHitPoints(String),

    #[error("Army {0} already has a leader battalion")]
    DuplicateLeader(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Batch engine does not support {battalion}: only units that always splash can be simulated in batch")]
    Unsupported { battalion: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl SimError {
    /// True for errors raised while validating a unit table or composition
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::UnknownUnit(_)
                | SimError::InvalidCount { .. }
                | SimError::InvalidDamageRange { .. }
                | SimError::InvalidAccuracy { .. }
                | SimError::InvalidSplash { .. }
                | SimError::InvalidSpeed(_)
                | SimError::ZeroHitPoints(_)
                | SimError::DuplicateLeader(_)
                | SimError::InvalidConfig(_)
                | SimError::TomlError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
