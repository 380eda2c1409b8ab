//! Static definition records and the oracle that serves them.

use std::collections::BTreeMap;

use crate::state::{
    DamageTypeId, MagicRealmId, PickId, PlayerId, ProductionTypeId, RangedAttackTypeId, SkillGrant,
    SkillId, SkillValues, UnitInstance, UnitTypeId, WeaponGrade, ZoneEffectId,
};
use crate::stats::rule::ModifierRule;

/// Read-only access to the static rule/definition database.
///
/// Loaded once at process start and shared by every calculation.
pub trait DefinitionOracle: Send + Sync {
    fn unit(&self, id: &UnitTypeId) -> Option<&UnitDefinition>;

    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition>;

    /// All skill definitions in declaration order.
    fn skills(&self) -> &[SkillDefinition];

    fn category(&self, category: UnitCategory) -> Option<&CategoryDefinition>;

    fn weapon_grade(&self, grade: WeaponGrade) -> Option<&WeaponGradeDefinition>;

    fn ranged_attack_type(&self, id: &RangedAttackTypeId) -> Option<&RangedAttackTypeDefinition>;

    fn magic_realm(&self, id: &MagicRealmId) -> Option<&MagicRealmDefinition>;

    fn zone_effect(&self, id: &ZoneEffectId) -> Option<&ZoneEffectDefinition>;

    fn pick(&self, id: &PickId) -> Option<&PickDefinition>;

    fn damage_type(&self, id: &DamageTypeId) -> Option<&DamageTypeDefinition>;
}

/// Broad unit category; decides whether and how a unit gains experience.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitCategory {
    Hero,
    Summoned,
    Normal,
}

/// A unit type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDefinition {
    pub id: UnitTypeId,
    pub category: UnitCategory,
    pub magic_realm: MagicRealmId,
    #[cfg_attr(feature = "serde", serde(default = "default_figure_count"))]
    pub figure_count: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged_attack_type: Option<RangedAttackTypeId>,
    /// Non-zero for ships and other transports.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transport_capacity: u8,
    /// Skills every new unit of this type starts with.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: SkillValues,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upkeep: BTreeMap<ProductionTypeId, i32>,
}

impl UnitDefinition {
    pub fn new(
        id: impl Into<UnitTypeId>,
        category: UnitCategory,
        magic_realm: impl Into<MagicRealmId>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            magic_realm: magic_realm.into(),
            figure_count: 1,
            ranged_attack_type: None,
            transport_capacity: 0,
            skills: SkillValues::new(),
            upkeep: BTreeMap::new(),
        }
    }

    pub fn with_figures(mut self, figure_count: i32) -> Self {
        self.figure_count = figure_count;
        self
    }

    pub fn with_skill(mut self, skill: impl Into<SkillId>, value: Option<i32>) -> Self {
        self.skills.insert(skill.into(), value);
        self
    }

    pub fn with_ranged_attack_type(mut self, rat: impl Into<RangedAttackTypeId>) -> Self {
        self.ranged_attack_type = Some(rat.into());
        self
    }

    pub fn with_transport_capacity(mut self, capacity: u8) -> Self {
        self.transport_capacity = capacity;
        self
    }

    pub fn with_upkeep(mut self, production: impl Into<ProductionTypeId>, amount: i32) -> Self {
        self.upkeep.insert(production.into(), amount);
        self
    }

    pub fn is_transport(&self) -> bool {
        self.transport_capacity > 0
    }

    /// Creates a hypothetical unit of this type carrying the definition's
    /// starting skills.
    pub fn spawn(&self, owner: PlayerId) -> UnitInstance {
        UnitInstance {
            skills: self.skills.clone(),
            ..UnitInstance::new(self.id.clone(), owner)
        }
    }
}

/// A skill and everything it does.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    /// Rules sourced from this skill.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<ModifierRule>,
    /// Valueless skills that having this skill implies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<SkillId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub negated_by: Vec<Negation>,
    /// Changes the unit's magic realm / lifeform classification.
    #[cfg_attr(feature = "serde", serde(default))]
    pub realm_override: Option<MagicRealmId>,
    /// Hands control of the unit to the caster of the spell granting it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transfers_control: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upkeep_modifiers: Vec<UpkeepModifier>,
}

impl SkillDefinition {
    pub fn new(id: impl Into<SkillId>) -> Self {
        Self {
            id: id.into(),
            modifiers: Vec::new(),
            grants: Vec::new(),
            negated_by: Vec::new(),
            realm_override: None,
            transfers_control: false,
            upkeep_modifiers: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: ModifierRule) -> Self {
        self.modifiers.push(rule);
        self
    }

    pub fn granting(mut self, skill: impl Into<SkillId>) -> Self {
        self.grants.push(skill.into());
        self
    }

    pub fn negated_by(mut self, skill: impl Into<SkillId>, by: NegatedBy) -> Self {
        self.negated_by.push(Negation {
            skill: skill.into(),
            by,
        });
        self
    }

    pub fn overriding_realm(mut self, realm: impl Into<MagicRealmId>) -> Self {
        self.realm_override = Some(realm.into());
        self
    }

    pub fn transferring_control(mut self) -> Self {
        self.transfers_control = true;
        self
    }

    pub fn with_upkeep_modifier(mut self, modifier: UpkeepModifier) -> Self {
        self.upkeep_modifiers.push(modifier);
        self
    }
}

/// A condition under which a skill is switched off.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Negation {
    pub skill: SkillId,
    pub by: NegatedBy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NegatedBy {
    /// The unit itself has the negating skill.
    OwnUnit,
    /// An enemy engaging the unit has the negating skill.
    EnemyUnit,
}

/// Experience table of a unit category.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CategoryDefinition {
    pub category: UnitCategory,
    /// Empty for categories that never gain experience.
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: Vec<ExperienceLevelDefinition>,
}

impl CategoryDefinition {
    pub fn new(category: UnitCategory) -> Self {
        Self {
            category,
            levels: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: ExperienceLevelDefinition) -> Self {
        self.levels.push(level);
        self
    }

    pub fn gains_experience(&self) -> bool {
        !self.levels.is_empty()
    }

    pub fn level(&self, number: u8) -> Option<&ExperienceLevelDefinition> {
        self.levels.iter().find(|level| level.number == number)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperienceLevelDefinition {
    pub number: u8,
    /// Experience needed to reach this level.
    pub threshold: i32,
    /// Fixed bonuses a unit at this level receives (not cumulative).
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<ModifierRule>,
}

impl ExperienceLevelDefinition {
    pub fn new(number: u8, threshold: i32) -> Self {
        Self {
            number,
            threshold,
            bonuses: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, rule: ModifierRule) -> Self {
        self.bonuses.push(rule);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponGradeDefinition {
    pub grade: WeaponGrade,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<ModifierRule>,
}

impl WeaponGradeDefinition {
    pub fn new(grade: WeaponGrade) -> Self {
        Self {
            grade,
            bonuses: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, rule: ModifierRule) -> Self {
        self.bonuses.push(rule);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangedAttackTypeDefinition {
    pub id: RangedAttackTypeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic_realm: Option<MagicRealmId>,
    /// Whether weapon grade bonuses improve attacks of this type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon_grade_applies: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicRealmDefinition {
    pub id: MagicRealmId,
    /// False for undead and other non-living classifications.
    #[cfg_attr(feature = "serde", serde(default = "default_living"))]
    pub living: bool,
}

#[cfg(feature = "serde")]
fn default_figure_count() -> i32 {
    1
}

#[cfg(feature = "serde")]
fn default_living() -> bool {
    true
}

impl MagicRealmDefinition {
    pub fn new(id: impl Into<MagicRealmId>) -> Self {
        Self {
            id: id.into(),
            living: true,
        }
    }
}

/// Which units a zone effect touches, relative to its caster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneAffects {
    #[default]
    AllUnits,
    CastersUnits,
    OpponentsUnits,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneEffectDefinition {
    pub id: ZoneEffectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub affects: ZoneAffects,
    #[cfg_attr(feature = "serde", serde(default))]
    pub combat_only: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<SkillGrant>,
    /// Extra experience levels granted to affected units.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_experience_levels: u8,
}

impl ZoneEffectDefinition {
    pub fn new(id: impl Into<ZoneEffectId>) -> Self {
        Self {
            id: id.into(),
            affects: ZoneAffects::AllUnits,
            combat_only: false,
            grants: Vec::new(),
            extra_experience_levels: 0,
        }
    }

    pub fn affecting(mut self, affects: ZoneAffects) -> Self {
        self.affects = affects;
        self
    }

    pub fn in_combat_only(mut self) -> Self {
        self.combat_only = true;
        self
    }

    pub fn granting(mut self, skill: impl Into<SkillId>, value: Option<i32>) -> Self {
        self.grants.push(SkillGrant::new(skill, value));
        self
    }

    pub fn with_extra_levels(mut self, levels: u8) -> Self {
        self.extra_experience_levels = levels;
        self
    }
}

/// A player pick (retort or spell book).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickDefinition {
    pub id: PickId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_experience_levels: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub upkeep_modifiers: Vec<UpkeepModifier>,
}

impl PickDefinition {
    pub fn new(id: impl Into<PickId>) -> Self {
        Self {
            id: id.into(),
            extra_experience_levels: 0,
            upkeep_modifiers: Vec::new(),
        }
    }

    pub fn with_extra_levels(mut self, levels: u8) -> Self {
        self.extra_experience_levels = levels;
        self
    }

    pub fn with_upkeep_modifier(mut self, modifier: UpkeepModifier) -> Self {
        self.upkeep_modifiers.push(modifier);
        self
    }
}

/// Percentage reduction of upkeep.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpkeepModifier {
    /// `None` applies to every category.
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<UnitCategory>,
    /// `None` applies to every production type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub production_type: Option<ProductionTypeId>,
    pub percent_reduction: i32,
}

impl UpkeepModifier {
    pub fn new(percent_reduction: i32) -> Self {
        Self {
            category: None,
            production_type: None,
            percent_reduction,
        }
    }

    pub fn for_category(mut self, category: UnitCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn for_production(mut self, production: impl Into<ProductionTypeId>) -> Self {
        self.production_type = Some(production.into());
        self
    }

    pub fn applies(&self, category: UnitCategory, production: &ProductionTypeId) -> bool {
        self.category.is_none_or(|wanted| wanted == category)
            && self
                .production_type
                .as_ref()
                .is_none_or(|wanted| wanted == production)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTypeDefinition {
    pub id: DamageTypeId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub immunities: Vec<DamageImmunity>,
}

impl DamageTypeDefinition {
    pub fn new(id: impl Into<DamageTypeId>) -> Self {
        Self {
            id: id.into(),
            immunities: Vec::new(),
        }
    }

    pub fn with_immunity(mut self, skill: impl Into<SkillId>, max_hits: Option<i32>) -> Self {
        self.immunities.push(DamageImmunity {
            skill: skill.into(),
            max_hits_per_figure: max_hits,
        });
        self
    }
}

/// A skill that protects against a damage type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageImmunity {
    pub skill: SkillId,
    /// Partial protection caps hits per figure; `None` is complete immunity.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_hits_per_figure: Option<i32>,
}
