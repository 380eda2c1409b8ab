//! Oracle access errors.
//!
//! Every variant is a data-integrity fault: a referenced static identifier is
//! missing from the definition index, or the index itself is malformed.

use crate::env::UnitCategory;
use crate::error::{EngineError, ErrorSeverity};
use crate::state::{
    DamageTypeId, MagicRealmId, PickId, RangedAttackTypeId, SkillId, UnitTypeId, WeaponGrade,
    ZoneEffectId,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("unit definition '{0}' not found")]
    UnitNotFound(UnitTypeId),

    #[error("skill definition '{0}' not found")]
    SkillNotFound(SkillId),

    #[error("unit category '{0}' not found")]
    CategoryNotFound(UnitCategory),

    #[error("weapon grade {0} not found")]
    WeaponGradeNotFound(WeaponGrade),

    #[error("zone effect '{0}' not found")]
    ZoneEffectNotFound(ZoneEffectId),

    #[error("ranged attack type '{0}' not found")]
    RangedAttackTypeNotFound(RangedAttackTypeId),

    #[error("magic realm '{0}' not found")]
    MagicRealmNotFound(MagicRealmId),

    #[error("pick '{0}' not found")]
    PickNotFound(PickId),

    #[error("damage type '{0}' not found")]
    DamageTypeNotFound(DamageTypeId),

    /// Two definitions of the same kind share an identifier.
    #[error("duplicate {kind} definition '{id}'")]
    DuplicateDefinition { kind: &'static str, id: String },

    /// A modifier rule targets a skill with no definition.
    #[error("rule declared on '{owner}' targets undefined skill '{target}'")]
    DanglingRuleTarget { owner: String, target: SkillId },
}

impl EngineError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            UnitNotFound(_) => "ORACLE_UNIT_NOT_FOUND",
            SkillNotFound(_) => "ORACLE_SKILL_NOT_FOUND",
            CategoryNotFound(_) => "ORACLE_CATEGORY_NOT_FOUND",
            WeaponGradeNotFound(_) => "ORACLE_WEAPON_GRADE_NOT_FOUND",
            ZoneEffectNotFound(_) => "ORACLE_ZONE_EFFECT_NOT_FOUND",
            RangedAttackTypeNotFound(_) => "ORACLE_RANGED_ATTACK_TYPE_NOT_FOUND",
            MagicRealmNotFound(_) => "ORACLE_MAGIC_REALM_NOT_FOUND",
            PickNotFound(_) => "ORACLE_PICK_NOT_FOUND",
            DamageTypeNotFound(_) => "ORACLE_DAMAGE_TYPE_NOT_FOUND",
            DuplicateDefinition { .. } => "ORACLE_DUPLICATE_DEFINITION",
            DanglingRuleTarget { .. } => "ORACLE_DANGLING_RULE_TARGET",
        }
    }
}
