//! Unit attribute resolution engine.
//!
//! Computes the fully resolved statistics of a unit from layered declarative
//! modifiers: definition values, spell and item skills, experience, weapon
//! grade, zone effects and stack-wide auras, with per-source attribution.
//!
//! Modules:
//! - [`state`]: identifiers and live unit, spell, zone effect and player records
//! - [`env`]: oracles for static definitions, world knowledge and the roster
//! - [`stats`]: baseline builder, modifier engine, expansion pipeline, result view
//! - [`config`]: well-known skill identifiers and the wind boost setting
pub mod config;
pub mod env;
pub mod error;
pub mod state;
pub mod stats;

pub use config::{EngineConfig, SkillIds, WindBoost};
pub use env::{
    CategoryDefinition, DamageImmunity, DamageTypeDefinition, DefinitionIndex, DefinitionOracle,
    DefinitionSet, Env, ExperienceLevelDefinition, MagicRealmDefinition, NegatedBy, Negation,
    OracleError, PickDefinition, RangedAttackTypeDefinition, RosterOracle, RosterSnapshot,
    SkillDefinition, TerrainCell, TerrainKind, UnitCategory, UnitDefinition, UpkeepModifier,
    WeaponGradeDefinition, WorldOracle, WorldSnapshot, ZoneAffects, ZoneEffectDefinition,
};
pub use error::{EngineError, ErrorSeverity};
pub use state::{
    ActiveZoneEffect, CombatPlacement, CombatSide, DamageTypeId, HeroItem, MagicRealmId,
    MaintainedSpell, MapLocation, PickId, PlayerId, PlayerRecord, ProductionTypeId,
    RangedAttackTypeId, SkillGrant, SkillId, SkillValues, SpellId, UnitId, UnitInstance,
    UnitTypeId, WeaponGrade, ZoneEffectId,
};
pub use stats::{
    AttackContext, BaselineUnit, Breakdown, Component, ComponentFilter, ExpandError,
    ExpandedUnit, ModifierRule, RuleFlags, RuleOutcome, SignFilter, SkillBreakdown, ValueKind,
    ViewError, expand,
};
