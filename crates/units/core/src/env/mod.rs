//! Traits describing the read-only inputs of a calculation.
//!
//! Three oracles feed the engine: static definitions (loaded once), world
//! knowledge and the player roster (both read per call). The [`Env`]
//! aggregate bundles them with the engine configuration so the pipeline can
//! reach everything without coupling to concrete stores.
mod definitions;
mod error;
mod index;
mod roster;
mod snapshot;
mod world;

pub use definitions::{
    CategoryDefinition, DamageImmunity, DamageTypeDefinition, DefinitionOracle,
    ExperienceLevelDefinition, MagicRealmDefinition, NegatedBy, Negation, PickDefinition,
    RangedAttackTypeDefinition, SkillDefinition, UnitCategory, UnitDefinition, UpkeepModifier,
    WeaponGradeDefinition, ZoneAffects, ZoneEffectDefinition,
};
pub use error::OracleError;
pub use index::{DefinitionIndex, DefinitionSet};
pub use roster::RosterOracle;
pub use snapshot::{RosterSnapshot, TerrainCell, WorldSnapshot};
pub use world::{TerrainKind, WorldOracle};

use crate::config::EngineConfig;
use crate::state::{
    DamageTypeId, MagicRealmId, PickId, PlayerId, PlayerRecord, RangedAttackTypeId, SkillId,
    UnitTypeId, WeaponGrade, ZoneEffectId,
};

/// Aggregates the read-only inputs of one calculation.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    definitions: &'a dyn DefinitionOracle,
    world: &'a dyn WorldOracle,
    roster: &'a dyn RosterOracle,
    config: &'a EngineConfig,
}

impl<'a> Env<'a> {
    pub fn new(
        definitions: &'a dyn DefinitionOracle,
        world: &'a dyn WorldOracle,
        roster: &'a dyn RosterOracle,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            definitions,
            world,
            roster,
            config,
        }
    }

    pub fn definitions(&self) -> &'a dyn DefinitionOracle {
        self.definitions
    }

    pub fn world(&self) -> &'a dyn WorldOracle {
        self.world
    }

    pub fn roster(&self) -> &'a dyn RosterOracle {
        self.roster
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    // ========================================================================
    // Required lookups
    // ========================================================================
    //
    // Each returns the data-integrity fault for its identifier kind when the
    // definition is missing.

    pub fn unit(&self, id: &UnitTypeId) -> Result<&'a UnitDefinition, OracleError> {
        self.definitions
            .unit(id)
            .ok_or_else(|| OracleError::UnitNotFound(id.clone()))
    }

    pub fn skill(&self, id: &SkillId) -> Result<&'a SkillDefinition, OracleError> {
        self.definitions
            .skill(id)
            .ok_or_else(|| OracleError::SkillNotFound(id.clone()))
    }

    pub fn category(&self, category: UnitCategory) -> Result<&'a CategoryDefinition, OracleError> {
        self.definitions
            .category(category)
            .ok_or(OracleError::CategoryNotFound(category))
    }

    pub fn weapon_grade(&self, grade: WeaponGrade) -> Result<&'a WeaponGradeDefinition, OracleError> {
        self.definitions
            .weapon_grade(grade)
            .ok_or(OracleError::WeaponGradeNotFound(grade))
    }

    pub fn ranged_attack_type(
        &self,
        id: &RangedAttackTypeId,
    ) -> Result<&'a RangedAttackTypeDefinition, OracleError> {
        self.definitions
            .ranged_attack_type(id)
            .ok_or_else(|| OracleError::RangedAttackTypeNotFound(id.clone()))
    }

    pub fn magic_realm(&self, id: &MagicRealmId) -> Result<&'a MagicRealmDefinition, OracleError> {
        self.definitions
            .magic_realm(id)
            .ok_or_else(|| OracleError::MagicRealmNotFound(id.clone()))
    }

    pub fn zone_effect(&self, id: &ZoneEffectId) -> Result<&'a ZoneEffectDefinition, OracleError> {
        self.definitions
            .zone_effect(id)
            .ok_or_else(|| OracleError::ZoneEffectNotFound(id.clone()))
    }

    pub fn pick(&self, id: &PickId) -> Result<&'a PickDefinition, OracleError> {
        self.definitions
            .pick(id)
            .ok_or_else(|| OracleError::PickNotFound(id.clone()))
    }

    pub fn damage_type(&self, id: &DamageTypeId) -> Result<&'a DamageTypeDefinition, OracleError> {
        self.definitions
            .damage_type(id)
            .ok_or_else(|| OracleError::DamageTypeNotFound(id.clone()))
    }

    /// Player record, or `None` if the roster does not know the player.
    pub fn player(&self, id: PlayerId) -> Option<&'a PlayerRecord> {
        self.roster.player(id)
    }
}
