//! Skirmish - stochastic battalion combat
//!
//! Two armies of battalions trade blows in speed tiers until one side is
//! gone. The `battle` module resolves single battles unit by unit; the
//! `simulation` module runs thousands of them, either by repeating the
//! scalar engine or with the columnar batch engine for splash armies.

pub mod battle;
pub mod core;
pub mod roster;
pub mod simulation;
