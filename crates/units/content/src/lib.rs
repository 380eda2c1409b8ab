//! Data-driven content for the unit attribute engine.
//!
//! Provides loaders for RON/TOML data files:
//! - Static definitions: units, skills and their modifier rules, experience
//!   tables, weapon grades, realms, zone effects, picks, damage types (RON)
//! - Engine configuration (TOML)
//! - World and roster scenarios (RON)
//!
//! All loaders use units-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, DefinitionLoader, Scenario, ScenarioLoader};
