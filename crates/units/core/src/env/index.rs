//! In-memory rule and definition index.
//!
//! [`DefinitionSet`] is the flat, serializable form the content loaders read.
//! [`DefinitionIndex::build`] validates it once and serves it through
//! [`DefinitionOracle`] for the rest of the process lifetime.

use std::collections::BTreeMap;

use super::OracleError;
use super::definitions::{
    CategoryDefinition, DamageTypeDefinition, DefinitionOracle, MagicRealmDefinition,
    PickDefinition, RangedAttackTypeDefinition, SkillDefinition, UnitCategory, UnitDefinition,
    WeaponGradeDefinition, ZoneEffectDefinition,
};
use crate::state::{
    DamageTypeId, MagicRealmId, PickId, RangedAttackTypeId, SkillId, UnitTypeId, WeaponGrade,
    ZoneEffectId,
};
use crate::stats::rule::ModifierRule;

/// Flat collection of every static definition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefinitionSet {
    pub units: Vec<UnitDefinition>,
    /// Declaration order is significant: it breaks ties between skills that
    /// override the magic realm.
    pub skills: Vec<SkillDefinition>,
    pub categories: Vec<CategoryDefinition>,
    pub weapon_grades: Vec<WeaponGradeDefinition>,
    pub ranged_attack_types: Vec<RangedAttackTypeDefinition>,
    pub magic_realms: Vec<MagicRealmDefinition>,
    pub zone_effects: Vec<ZoneEffectDefinition>,
    pub picks: Vec<PickDefinition>,
    pub damage_types: Vec<DamageTypeDefinition>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: UnitDefinition) -> Self {
        self.units.push(unit);
        self
    }

    pub fn with_skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_category(mut self, category: CategoryDefinition) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_weapon_grade(mut self, grade: WeaponGradeDefinition) -> Self {
        self.weapon_grades.push(grade);
        self
    }

    pub fn with_ranged_attack_type(mut self, rat: RangedAttackTypeDefinition) -> Self {
        self.ranged_attack_types.push(rat);
        self
    }

    pub fn with_magic_realm(mut self, realm: MagicRealmDefinition) -> Self {
        self.magic_realms.push(realm);
        self
    }

    pub fn with_zone_effect(mut self, effect: ZoneEffectDefinition) -> Self {
        self.zone_effects.push(effect);
        self
    }

    pub fn with_pick(mut self, pick: PickDefinition) -> Self {
        self.picks.push(pick);
        self
    }

    pub fn with_damage_type(mut self, damage_type: DamageTypeDefinition) -> Self {
        self.damage_types.push(damage_type);
        self
    }
}

/// Validated, lookup-ready definitions.
#[derive(Clone, Debug, Default)]
pub struct DefinitionIndex {
    skills: Vec<SkillDefinition>,
    skill_slots: BTreeMap<SkillId, usize>,
    units: BTreeMap<UnitTypeId, UnitDefinition>,
    categories: BTreeMap<UnitCategory, CategoryDefinition>,
    weapon_grades: BTreeMap<WeaponGrade, WeaponGradeDefinition>,
    ranged_attack_types: BTreeMap<RangedAttackTypeId, RangedAttackTypeDefinition>,
    magic_realms: BTreeMap<MagicRealmId, MagicRealmDefinition>,
    zone_effects: BTreeMap<ZoneEffectId, ZoneEffectDefinition>,
    picks: BTreeMap<PickId, PickDefinition>,
    damage_types: BTreeMap<DamageTypeId, DamageTypeDefinition>,
}

impl DefinitionIndex {
    /// Indexes a definition set.
    ///
    /// Stamps every skill-declared rule with its source skill and rejects
    /// duplicate identifiers and rules aimed at undefined skills.
    pub fn build(set: DefinitionSet) -> Result<Self, OracleError> {
        let mut index = Self::default();

        for mut skill in set.skills {
            if index.skill_slots.contains_key(&skill.id) {
                return Err(duplicate("skill", &skill.id));
            }
            for rule in &mut skill.modifiers {
                rule.source = Some(skill.id.clone());
            }
            index.skill_slots.insert(skill.id.clone(), index.skills.len());
            index.skills.push(skill);
        }

        index.units = keyed(set.units, "unit", |unit| unit.id.clone())?;
        index.categories = keyed(set.categories, "category", |category| category.category)?;
        index.weapon_grades = keyed(set.weapon_grades, "weapon grade", |grade| grade.grade)?;
        index.ranged_attack_types =
            keyed(set.ranged_attack_types, "ranged attack type", |rat| rat.id.clone())?;
        index.magic_realms = keyed(set.magic_realms, "magic realm", |realm| realm.id.clone())?;
        index.zone_effects = keyed(set.zone_effects, "zone effect", |effect| effect.id.clone())?;
        index.picks = keyed(set.picks, "pick", |pick| pick.id.clone())?;
        index.damage_types = keyed(set.damage_types, "damage type", |damage| damage.id.clone())?;

        index.validate_rule_targets()?;
        Ok(index)
    }

    fn validate_rule_targets(&self) -> Result<(), OracleError> {
        let skill_rules = self
            .skills
            .iter()
            .flat_map(|skill| skill.modifiers.iter().map(move |rule| (skill.id.to_string(), rule)));
        let level_rules = self.categories.values().flat_map(|category| {
            category.levels.iter().flat_map(move |level| {
                level
                    .bonuses
                    .iter()
                    .map(move |rule| (format!("{} level {}", category.category, level.number), rule))
            })
        });
        let grade_rules = self.weapon_grades.values().flat_map(|grade| {
            grade
                .bonuses
                .iter()
                .map(move |rule| (grade.grade.to_string(), rule))
        });

        for (owner, rule) in skill_rules.chain(level_rules).chain(grade_rules) {
            self.ensure_target(owner, rule)?;
        }
        Ok(())
    }

    fn ensure_target(&self, owner: String, rule: &ModifierRule) -> Result<(), OracleError> {
        if self.skill_slots.contains_key(&rule.target) {
            Ok(())
        } else {
            Err(OracleError::DanglingRuleTarget {
                owner,
                target: rule.target.clone(),
            })
        }
    }
}

fn duplicate(kind: &'static str, id: &impl ToString) -> OracleError {
    OracleError::DuplicateDefinition {
        kind,
        id: id.to_string(),
    }
}

fn keyed<K, V>(
    values: Vec<V>,
    kind: &'static str,
    key: impl Fn(&V) -> K,
) -> Result<BTreeMap<K, V>, OracleError>
where
    K: Ord + ToString,
{
    let mut map = BTreeMap::new();
    for value in values {
        let id = key(&value);
        if map.contains_key(&id) {
            return Err(duplicate(kind, &id));
        }
        map.insert(id, value);
    }
    Ok(map)
}

impl DefinitionOracle for DefinitionIndex {
    fn unit(&self, id: &UnitTypeId) -> Option<&UnitDefinition> {
        self.units.get(id)
    }

    fn skill(&self, id: &SkillId) -> Option<&SkillDefinition> {
        self.skill_slots.get(id).map(|slot| &self.skills[*slot])
    }

    fn skills(&self) -> &[SkillDefinition] {
        &self.skills
    }

    fn category(&self, category: UnitCategory) -> Option<&CategoryDefinition> {
        self.categories.get(&category)
    }

    fn weapon_grade(&self, grade: WeaponGrade) -> Option<&WeaponGradeDefinition> {
        self.weapon_grades.get(&grade)
    }

    fn ranged_attack_type(&self, id: &RangedAttackTypeId) -> Option<&RangedAttackTypeDefinition> {
        self.ranged_attack_types.get(id)
    }

    fn magic_realm(&self, id: &MagicRealmId) -> Option<&MagicRealmDefinition> {
        self.magic_realms.get(id)
    }

    fn zone_effect(&self, id: &ZoneEffectId) -> Option<&ZoneEffectDefinition> {
        self.zone_effects.get(id)
    }

    fn pick(&self, id: &PickId) -> Option<&PickDefinition> {
        self.picks.get(id)
    }

    fn damage_type(&self, id: &DamageTypeId) -> Option<&DamageTypeDefinition> {
        self.damage_types.get(id)
    }
}
