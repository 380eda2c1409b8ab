//! Live, caller-owned records: identifiers, units, maintained spells, zone
//! effects and players.
//!
//! The engine never mutates these. They are read through the oracles in
//! [`crate::env`] and snapshotted into fresh results on every calculation.
mod common;
mod unit;
mod world;

pub use common::{
    DamageTypeId, MagicRealmId, MapLocation, PickId, PlayerId, ProductionTypeId,
    RangedAttackTypeId, SkillId, SpellId, UnitId, UnitTypeId, WeaponGrade, ZoneEffectId,
};
pub use unit::{CombatPlacement, CombatSide, HeroItem, SkillGrant, SkillValues, UnitInstance};
pub use world::{ActiveZoneEffect, MaintainedSpell, PlayerRecord};
