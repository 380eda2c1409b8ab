//! Baseline builder: quick per-unit snapshots and the stack around a unit.
//!
//! A [`BaselineUnit`] resolves identity, category and experience level
//! without running any modifier rules. The expansion pipeline builds one for
//! the unit itself, one for every unit sharing its stack, and one for every
//! engaging enemy.

use std::collections::{BTreeMap, BTreeSet};

use crate::env::{CategoryDefinition, Env, UnitCategory, ZoneAffects, ZoneEffectDefinition};
use crate::state::{
    ActiveZoneEffect, PlayerId, SkillId, SkillValues, UnitId, UnitInstance, UnitTypeId,
};
use crate::stats::error::ExpandError;
use crate::stats::rule::ValueKind;

/// Per-unit snapshot taken before any modifiers run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaselineUnit {
    pub unit_id: Option<UnitId>,
    pub definition: UnitTypeId,
    pub category: UnitCategory,
    pub owner: PlayerId,
    /// Level reached by experience alone.
    pub base_experience_level: Option<u8>,
    /// Level after extra levels from picks and zone effects.
    pub experience_level: Option<u8>,
    /// Raw skill values, experience already adjusted by spells.
    pub skills: SkillValues,
}

impl BaselineUnit {
    pub fn build(unit: &UnitInstance, env: Env<'_>) -> Result<Self, ExpandError> {
        let definition = env.unit(&unit.definition)?;
        let owner = env
            .player(unit.owner)
            .ok_or(ExpandError::PlayerNotFound(unit.owner))?;

        let mut skills = unit.skills.clone();
        adjust_experience(unit, &mut skills, env)?;

        let category = env.category(definition.category)?;
        let experience = skills
            .get(&env.config().skills.experience)
            .copied()
            .flatten();

        let (base_experience_level, experience_level) = match experience {
            Some(experience) if category.gains_experience() => {
                let base = level_for(category, experience).ok_or_else(|| {
                    ExpandError::NoExperienceLevel {
                        unit: unit.definition.to_string(),
                        experience,
                    }
                })?;

                let mut extra = 0u8;
                for (pick, count) in &owner.picks {
                    if *count > 0 {
                        extra = extra.saturating_add(env.pick(pick)?.extra_experience_levels);
                    }
                }
                for active in env.world().zone_effects() {
                    let effect = env.zone_effect(&active.effect)?;
                    if zone_effect_applies(active, effect, unit) {
                        extra = extra.saturating_add(effect.extra_experience_levels);
                    }
                }

                (Some(base), Some(clamp_to_defined(category, base, extra)))
            }
            _ => (None, None),
        };

        Ok(Self {
            unit_id: unit.id,
            definition: unit.definition.clone(),
            category: definition.category,
            owner: unit.owner,
            base_experience_level,
            experience_level,
            skills,
        })
    }
}

/// Applies experience rules of spell-granted skills to the raw experience
/// value. Increments add; caps raise the value to at least the literal.
///
/// Done here rather than through the modifier engine because the engine
/// needs the level this value resolves to.
fn adjust_experience(
    unit: &UnitInstance,
    skills: &mut SkillValues,
    env: Env<'_>,
) -> Result<(), ExpandError> {
    let Some(id) = unit.id else {
        return Ok(());
    };
    let experience_skill = &env.config().skills.experience;
    let Some(Some(mut experience)) = skills.get(experience_skill).copied() else {
        return Ok(());
    };

    for spell in env.world().maintained_spells() {
        let Some(granted) = spell.granted_skill.as_ref().filter(|_| spell.targets(id)) else {
            continue;
        };
        for rule in &env.skill(granted)?.modifiers {
            if &rule.target != experience_skill {
                continue;
            }
            match (rule.kind, rule.value) {
                (ValueKind::AddFixed, Some(value)) => experience = experience.saturating_add(value),
                (ValueKind::Lock, Some(value)) => experience = experience.max(value),
                _ => {}
            }
        }
    }

    skills.insert(experience_skill.clone(), Some(experience));
    Ok(())
}

/// Highest level whose threshold `experience` meets.
fn level_for(category: &CategoryDefinition, experience: i32) -> Option<u8> {
    category
        .levels
        .iter()
        .filter(|level| level.threshold <= experience)
        .max_by_key(|level| (level.threshold, level.number))
        .map(|level| level.number)
}

/// Adds extra levels, stepping back down until the level is defined.
fn clamp_to_defined(category: &CategoryDefinition, base: u8, extra: u8) -> u8 {
    let mut level = base.saturating_add(extra);
    while level > base && category.level(level).is_none() {
        level -= 1;
    }
    level
}

// ============================================================================
// Zone effect applicability
// ============================================================================

/// Whether an active zone effect touches `unit`.
///
/// Located effects match the battle cell while in combat and the map cell
/// otherwise; global effects match everywhere.
pub fn zone_effect_applies(
    active: &ActiveZoneEffect,
    effect: &ZoneEffectDefinition,
    unit: &UnitInstance,
) -> bool {
    if effect.combat_only && !unit.is_in_combat() {
        return false;
    }

    if let Some(location) = active.location {
        let standing = match unit.combat {
            Some(placement) => Some(placement.location),
            None => unit.location,
        };
        if standing != Some(location) {
            return false;
        }
    }

    match effect.affects {
        ZoneAffects::AllUnits => true,
        ZoneAffects::CastersUnits => active.cast_by == Some(unit.owner),
        ZoneAffects::OpponentsUnits => active.cast_by.is_some_and(|caster| caster != unit.owner),
    }
}

// ============================================================================
// Stack context
// ============================================================================

/// Skills present in a group of units and the best value of each.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackSkills {
    present: BTreeSet<SkillId>,
    best: BTreeMap<SkillId, i32>,
}

impl StackSkills {
    /// Gathers the skills of a group. With `scaled`, values of units that
    /// have an experience level count as `(level + 1) * (value + 1)`.
    pub fn gather<'a>(members: impl IntoIterator<Item = &'a BaselineUnit>, scaled: bool) -> Self {
        let mut skills = Self::default();
        for member in members {
            for (skill, value) in &member.skills {
                let value = if scaled {
                    Self::scaled(*value, member.experience_level)
                } else {
                    *value
                };
                skills.record(skill.clone(), value);
            }
        }
        skills
    }

    /// `(level + 1) * (value + 1)` for members with a level, the raw value
    /// otherwise.
    pub fn scaled(value: Option<i32>, level: Option<u8>) -> Option<i32> {
        match (value, level) {
            (Some(value), Some(level)) => {
                Some((i32::from(level) + 1).saturating_mul(value.saturating_add(1)))
            }
            _ => value,
        }
    }

    /// Records one member's skill. Valueless entries mark presence only.
    pub fn record(&mut self, skill: SkillId, value: Option<i32>) {
        if let Some(value) = value {
            self.best
                .entry(skill.clone())
                .and_modify(|best| *best = (*best).max(value))
                .or_insert(value);
        }
        self.present.insert(skill);
    }

    pub fn contains(&self, skill: &SkillId) -> bool {
        self.present.contains(skill)
    }

    /// Best value of a skill across the group, ignoring valueless entries.
    pub fn best(&self, skill: &SkillId) -> Option<i32> {
        self.best.get(skill).copied()
    }

    /// Present skills in id order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillId> + '_ {
        self.present.iter()
    }
}

/// The unit being expanded and everyone sharing its stack.
#[derive(Clone, Debug)]
pub struct StackContext {
    pub unit: BaselineUnit,
    pub members: Vec<BaselineUnit>,
}

impl StackContext {
    /// Builds the stack around `unit`.
    ///
    /// In combat the stack is everyone on the same side of the same battle;
    /// otherwise everyone the same player owns in the same cell. A
    /// hypothetical unit stacks with nobody.
    pub fn build(unit: &UnitInstance, env: Env<'_>) -> Result<Self, ExpandError> {
        let baseline = BaselineUnit::build(unit, env)?;

        let Some(id) = unit.id else {
            return Ok(Self {
                members: vec![baseline.clone()],
                unit: baseline,
            });
        };

        let mut members = Vec::new();
        let mut found = false;
        for other in env.world().units() {
            if other.id == Some(id) {
                found = true;
                members.push(baseline.clone());
            } else if shares_stack(unit, other) {
                members.push(BaselineUnit::build(other, env)?);
            }
        }

        if !found {
            return Err(ExpandError::UnitNotInStack(id));
        }

        Ok(Self {
            unit: baseline,
            members,
        })
    }

    pub fn skills(&self) -> StackSkills {
        StackSkills::gather(&self.members, true)
    }

    /// Members other than the unit itself. Empty for a hypothetical unit.
    pub fn others(&self) -> impl Iterator<Item = &BaselineUnit> + '_ {
        self.members.iter().filter(move |member| {
            self.unit.unit_id.is_some() && member.unit_id != self.unit.unit_id
        })
    }
}

fn shares_stack(unit: &UnitInstance, other: &UnitInstance) -> bool {
    match unit.combat {
        Some(placement) => other.combat == Some(placement),
        None => {
            other.combat.is_none()
                && unit.location.is_some()
                && other.location == unit.location
                && other.owner == unit.owner
        }
    }
}
