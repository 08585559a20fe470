//! Unit tables, army compositions and scenario files

pub mod catalog;
pub mod composition;
pub mod scenario;

pub use catalog::{UnitCatalog, UnitSpec, GENERAL};
pub use composition::{Composition, CompositionEntry};
pub use scenario::Scenario;
