//! Expansion pipeline.
//!
//! Turns a live [`UnitInstance`] into a fully resolved [`ExpandedUnit`] by
//! running a fixed sequence of stages over one working state:
//!
//! ```text
//! [ baseline + stack ]          1
//!      ↓
//! [ working skill set ]         2-8   merge, grant, negate, resolve realm
//!      ↓
//! [ breakdown: bonuses ]        9-17  seed, wind, grade, level, zone, rules, items
//!      ↓
//! [ breakdown: penalties ]      18
//!      ↓
//! [ upkeep + controller ]       19-20
//!      ↓
//! [ ExpandedUnit ]              21
//! ```
//!
//! Later stages read totals produced by earlier ones, so the order is part of
//! the semantics. Nothing is cached between calls.
mod modifiers;
mod skills;
mod upkeep;

use std::collections::{BTreeMap, BTreeSet};

use crate::env::{Env, UnitDefinition};
use crate::state::{PlayerId, ProductionTypeId, SkillId, SkillValues, UnitInstance};
use crate::stats::baseline::{BaselineUnit, StackContext, StackSkills};
use crate::stats::breakdown::{Breakdown, SkillBreakdown};
use crate::stats::engine::{AttackContext, RuleContext};
use crate::stats::error::ExpandError;
use crate::stats::view::ExpandedUnit;

/// Fully resolves `unit`.
///
/// `enemies` are the units currently engaging it (empty outside an attack);
/// their skills drive enemy-sourced negations and penalties. `attack` names
/// what the unit is being attacked with, if anything.
///
/// # Errors
///
/// Data-integrity faults for missing definitions, unknown owners and cyclic
/// grants; invariant violations when a persisted unit is missing from world
/// knowledge or its experience matches no level.
pub fn expand(
    unit: &UnitInstance,
    enemies: &[UnitInstance],
    attack: &AttackContext,
    env: Env<'_>,
) -> Result<ExpandedUnit, ExpandError> {
    let mut expansion = Expansion::start(unit, enemies, attack, env)?;

    // 2-8. Working skill set
    expansion.merge_spell_skills()?;
    expansion.merge_item_skills();
    expansion.close_grants()?;
    expansion.negate()?;
    expansion.resolve_realm()?;
    expansion.force_conditional_targets()?;

    // 9-18. Breakdown
    expansion.seed();
    expansion.apply_wind_boost();
    expansion.apply_weapon_grade()?;
    expansion.apply_experience()?;
    expansion.apply_zone_effects()?;
    expansion.negate_zone_skills()?;
    expansion.apply_skill_bonuses()?;
    expansion.apply_item_bonuses();
    expansion.drop_unused_forced();
    expansion.apply_skill_penalties()?;

    // 19-20. Economy and control
    expansion.apply_upkeep()?;
    expansion.resolve_controller()?;

    // 21. Assemble
    Ok(expansion.finish())
}

/// Working state threaded through every stage.
struct Expansion<'a> {
    env: Env<'a>,
    unit: &'a UnitInstance,
    definition: &'a UnitDefinition,
    baseline: BaselineUnit,
    /// Working skill set until the breakdown is seeded.
    skills: SkillValues,
    /// Skills merged from spells cast on the unit.
    spell_skills: BTreeSet<SkillId>,
    /// Skills forced in only so conditional rules can land on them.
    forced: Vec<SkillId>,
    /// Skills introduced by zone effects.
    zone_skills: BTreeSet<SkillId>,
    /// Raw skills of everyone else in the stack, level-scaled.
    stack_others: StackSkills,
    breakdown: Breakdown,
    ctx: RuleContext,
    base_upkeep: BTreeMap<ProductionTypeId, i32>,
    upkeep: BTreeMap<ProductionTypeId, i32>,
    controller: PlayerId,
}

impl<'a> Expansion<'a> {
    /// 1. Baseline, stack context and stack maxima.
    fn start(
        unit: &'a UnitInstance,
        enemies: &[UnitInstance],
        attack: &AttackContext,
        env: Env<'a>,
    ) -> Result<Self, ExpandError> {
        let definition = env.unit(&unit.definition)?;
        let stack = StackContext::build(unit, env)?;
        let stack_skills = stack.skills();
        let stack_others = StackSkills::gather(stack.others(), true);

        let enemy_baselines = enemies
            .iter()
            .map(|enemy| BaselineUnit::build(enemy, env))
            .collect::<Result<Vec<_>, _>>()?;
        let enemy_skills = StackSkills::gather(&enemy_baselines, false);

        let baseline = stack.unit;
        tracing::debug!(
            unit = ?unit.id,
            definition = %unit.definition,
            stack = stack.members.len(),
            enemies = enemies.len(),
            level = ?baseline.experience_level,
            "expansion started"
        );

        // 2. Raw skill snapshot
        let skills = baseline.skills.clone();
        let ctx = RuleContext {
            in_combat: unit.is_in_combat(),
            magic_realm: definition.magic_realm.clone(),
            ranged_attack_type: definition.ranged_attack_type.clone(),
            attack: attack.clone(),
            experience_level: baseline.experience_level,
            basic_values: skills.clone(),
            stack: stack_skills,
            enemies: enemy_skills,
        };

        Ok(Self {
            env,
            unit,
            definition,
            skills,
            spell_skills: BTreeSet::new(),
            forced: Vec::new(),
            zone_skills: BTreeSet::new(),
            stack_others,
            breakdown: Breakdown::new(),
            ctx,
            base_upkeep: BTreeMap::new(),
            upkeep: BTreeMap::new(),
            controller: baseline.owner,
            baseline,
        })
    }

    /// 3. Skills granted by spells cast on this unit. Grants those skills
    /// imply are picked up by the closure in stage 5.
    fn merge_spell_skills(&mut self) -> Result<(), ExpandError> {
        let Some(id) = self.unit.id else {
            return Ok(());
        };

        for spell in self.env.world().maintained_spells() {
            if !spell.targets(id) {
                continue;
            }
            if let Some(skill) = &spell.granted_skill {
                self.env.skill(skill)?;
                self.skills.entry(skill.clone()).or_insert(spell.value);
                self.spell_skills.insert(skill.clone());
            }
        }

        tracing::debug!(unit = ?self.unit.id, spells = self.spell_skills.len(), "spell skills merged");
        Ok(())
    }

    /// 4. Valueless skills from equipped hero items.
    fn merge_item_skills(&mut self) {
        if !self.unit.is_persisted() {
            return;
        }

        for item in &self.unit.hero_items {
            for grant in item.bonuses.iter().filter(|grant| grant.value.is_none()) {
                self.skills.entry(grant.skill.clone()).or_insert(None);
            }
        }
    }

    /// 5. Skill-grants-skill closure.
    fn close_grants(&mut self) -> Result<(), ExpandError> {
        skills::close_grants(&mut self.skills, self.env)?;
        tracing::debug!(unit = ?self.unit.id, skills = self.skills.len(), "grants closed");
        Ok(())
    }

    /// 6. Remove negated skills.
    fn negate(&mut self) -> Result<(), ExpandError> {
        for skill in skills::negated_skills(&self.skills, &self.ctx.enemies, self.env)? {
            tracing::debug!(unit = ?self.unit.id, %skill, "skill negated");
            self.skills.remove(&skill);
        }
        Ok(())
    }

    /// 7. Effective magic realm.
    fn resolve_realm(&mut self) -> Result<(), ExpandError> {
        if let Some(realm) = skills::realm_override(&self.skills, self.env) {
            self.ctx.magic_realm = realm;
        }
        self.env.magic_realm(&self.ctx.magic_realm)?;
        Ok(())
    }

    /// 8. Force the accuracy and block bonus skills in so conditional rules
    /// aimed at them still evaluate.
    fn force_conditional_targets(&mut self) -> Result<(), ExpandError> {
        let ids = &self.env.config().skills;
        for skill in [&ids.plus_to_hit, &ids.plus_to_block] {
            if !self.skills.contains_key(skill) {
                self.env.skill(skill)?;
                self.skills.insert(skill.clone(), None);
                self.forced.push(skill.clone());
            }
        }
        Ok(())
    }

    /// 9. Every remaining skill gets its basic component.
    fn seed(&mut self) {
        for (skill, value) in std::mem::take(&mut self.skills) {
            self.breakdown.insert(skill, SkillBreakdown::seeded(value));
        }
        tracing::debug!(unit = ?self.unit.id, skills = self.breakdown.len(), "breakdown seeded");
    }

    /// 17. Forced skills nothing landed on leave again.
    fn drop_unused_forced(&mut self) {
        for skill in &self.forced {
            if self
                .breakdown
                .get(skill)
                .is_some_and(SkillBreakdown::is_valueless)
            {
                self.breakdown.remove(skill);
            }
        }
    }

    /// 21. Immutable result.
    fn finish(self) -> ExpandedUnit {
        tracing::debug!(
            unit = ?self.unit.id,
            skills = self.breakdown.len(),
            realm = %self.ctx.magic_realm,
            controller = %self.controller,
            "expansion finished"
        );

        ExpandedUnit {
            baseline: self.baseline,
            magic_realm: self.ctx.magic_realm,
            weapon_grade: self.unit.weapon_grade,
            ranged_attack_type: self.ctx.ranged_attack_type,
            figure_count: self.definition.figure_count,
            damage_taken: self.unit.damage_taken,
            breakdown: self.breakdown,
            base_upkeep: self.base_upkeep,
            upkeep: self.upkeep,
            controlled_by: self.controller,
            skill_ids: self.env.config().skills.clone(),
        }
    }
}
