//! Expansion and result view errors.

use crate::env::OracleError;
use crate::error::{EngineError, ErrorSeverity};
use crate::state::{PlayerId, SkillId, UnitId};

/// Faults that abort the expansion of a unit.
///
/// None of these are recoverable: they point at corrupt static data or at a
/// caller passing inconsistent inputs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The unit's owner is not in the roster.
    #[error("player {0} not found in roster")]
    PlayerNotFound(PlayerId),

    /// A skill grants itself, directly or through other skills.
    #[error("skill '{0}' grants itself through a cycle")]
    CyclicSkillGrant(SkillId),

    /// A persisted unit is absent from the stack built around it.
    #[error("unit {0} missing from its own stack")]
    UnitNotInStack(UnitId),

    /// The unit's experience is below every defined level threshold.
    #[error("experience {experience} matches no level defined for unit '{unit}'")]
    NoExperienceLevel { unit: String, experience: i32 },
}

impl ExpandError {
    /// Missing or malformed static data.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::Oracle(_) | Self::PlayerNotFound(_) | Self::CyclicSkillGrant(_)
        )
    }

    /// Inputs that contradict each other.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::UnitNotInStack(_) | Self::NoExperienceLevel { .. })
    }
}

impl EngineError for ExpandError {
    fn severity(&self) -> ErrorSeverity {
        if self.is_data_integrity() {
            ErrorSeverity::Fatal
        } else {
            ErrorSeverity::Internal
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Oracle(err) => err.error_code(),
            Self::PlayerNotFound(_) => "EXPAND_PLAYER_NOT_FOUND",
            Self::CyclicSkillGrant(_) => "EXPAND_CYCLIC_SKILL_GRANT",
            Self::UnitNotInStack(_) => "EXPAND_UNIT_NOT_IN_STACK",
            Self::NoExperienceLevel { .. } => "EXPAND_NO_EXPERIENCE_LEVEL",
        }
    }
}

/// Failed lookups on a finished [`crate::stats::ExpandedUnit`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("unit does not have skill '{0}'")]
    SkillAbsent(SkillId),

    #[error("skill '{0}' carries no value")]
    SkillValueless(SkillId),
}

impl EngineError for ViewError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SkillAbsent(_) => "VIEW_SKILL_ABSENT",
            Self::SkillValueless(_) => "VIEW_SKILL_VALUELESS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_families_are_disjoint() {
        let faults = [
            ExpandError::Oracle(OracleError::SkillNotFound(SkillId::from("Flight"))),
            ExpandError::PlayerNotFound(PlayerId(7)),
            ExpandError::CyclicSkillGrant(SkillId::from("Flight")),
            ExpandError::UnitNotInStack(UnitId(3)),
            ExpandError::NoExperienceLevel {
                unit: "Spearmen".into(),
                experience: -1,
            },
        ];

        for fault in &faults {
            assert_ne!(fault.is_data_integrity(), fault.is_invariant_violation());
        }
        assert_eq!(faults[0].severity(), ErrorSeverity::Fatal);
        assert_eq!(faults[3].severity(), ErrorSeverity::Internal);
        assert_eq!(faults[0].error_code(), "ORACLE_SKILL_NOT_FOUND");
    }
}
