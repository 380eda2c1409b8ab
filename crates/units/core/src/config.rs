use crate::state::{SkillId, SpellId};

/// Engine configuration: the well-known identifiers the pipeline and the
/// result view key off.
///
/// Every field has a default so a partial `engine.toml` is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub skills: SkillIds,

    /// Overland spell that speeds up friendly ships and slows enemy ones.
    /// `None` disables the stage entirely.
    pub wind_boost: Option<WindBoost>,
}

impl EngineConfig {
    pub const DEFAULT_WIND_BOOST_PERCENT: i32 = 50;

    pub fn new() -> Self {
        Self {
            skills: SkillIds::default(),
            wind_boost: Some(WindBoost::default()),
        }
    }

    pub fn without_wind_boost(mut self) -> Self {
        self.wind_boost = None;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Skill identifiers with engine-level meaning.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillIds {
    /// Raw experience points. Absent on units that never gain experience.
    pub experience: SkillId,
    /// Hit points of a single figure.
    pub hit_points: SkillId,
    /// Ranged attack strength; weapon grade bonuses to it depend on the
    /// ranged attack type.
    pub ranged_attack: SkillId,
    /// Ranged attack ammunition.
    pub ammo: SkillId,
    /// Overland movement.
    pub movement: SkillId,
    /// Accuracy bonus, forced into the working set during expansion.
    pub plus_to_hit: SkillId,
    /// Defense roll bonus, forced into the working set during expansion.
    pub plus_to_block: SkillId,
    /// Fixed mana pool of caster units.
    pub caster_unit: SkillId,
    /// Level-scaled mana pool of caster heroes.
    pub caster_hero: SkillId,
}

impl Default for SkillIds {
    fn default() -> Self {
        Self {
            experience: SkillId::from("Experience"),
            hit_points: SkillId::from("HitPoints"),
            ranged_attack: SkillId::from("RangedAttack"),
            ammo: SkillId::from("Ammo"),
            movement: SkillId::from("Movement"),
            plus_to_hit: SkillId::from("PlusToHit"),
            plus_to_block: SkillId::from("PlusToBlock"),
            caster_unit: SkillId::from("CasterUnit"),
            caster_hero: SkillId::from("CasterHero"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindBoost {
    pub spell: SpellId,
    /// Percentage of base movement gained by the caster's ships and lost by
    /// everyone else's.
    pub movement_percent: i32,
}

impl Default for WindBoost {
    fn default() -> Self {
        Self {
            spell: SpellId::from("WindMastery"),
            movement_percent: EngineConfig::DEFAULT_WIND_BOOST_PERCENT,
        }
    }
}
