//! Scalar combat engine
//!
//! Unit templates -> battalions -> armies -> round loop. Every random draw
//! goes through a caller-supplied `rand::Rng`, so a seeded stream makes a
//! battle fully reproducible.

pub mod army;
pub mod battalion;
pub mod observer;
pub mod report;
pub mod unit;

// Re-exports for convenient access
pub use army::Army;
pub use battalion::{AttackOutcome, Battalion};
pub use observer::{BattleEvent, BattleEventLog, BattleObserver, Exchange, NullObserver, TracingObserver};
pub use report::{BattleOutcome, BattleReport};
pub use unit::{Unit, UnitState};
