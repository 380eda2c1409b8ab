//! Breakdown stages: every bonus, then every penalty.

use super::Expansion;
use super::skills::is_negated;
use crate::env::{NegatedBy, SkillDefinition};
use crate::state::SkillId;
use crate::stats::baseline::{StackSkills, zone_effect_applies};
use crate::stats::breakdown::{Component, SkillBreakdown};
use crate::stats::engine::{self, RuleOutcome};
use crate::stats::error::ExpandError;
use crate::stats::rule::ModifierRule;

/// Which entry point of the modifier engine a pass runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pass {
    Bonus,
    Penalty,
}

impl Pass {
    fn handles(self, rule: &ModifierRule) -> bool {
        match self {
            Pass::Bonus => rule.kind.is_bonus(),
            Pass::Penalty => rule.kind.is_penalty(),
        }
    }
}

impl Expansion<'_> {
    /// 10. Ships on water gain movement from the owner's wind spell and lose
    /// it to everyone else's.
    pub(super) fn apply_wind_boost(&mut self) {
        let Some(wind) = &self.env.config().wind_boost else {
            return;
        };
        if !self.definition.is_transport() {
            return;
        }
        let on_water = self
            .unit
            .location
            .and_then(|location| self.env.world().terrain(location))
            .is_some_and(|terrain| terrain.is_water());
        if !on_water {
            return;
        }

        let movement = &self.env.config().skills.movement;
        let Some(base) = self.breakdown.total(movement) else {
            return;
        };
        let amount = base * wind.movement_percent / 100;
        if amount == 0 {
            return;
        }

        for spell in self.env.world().maintained_spells() {
            if spell.spell != wind.spell || spell.unit.is_some() {
                continue;
            }
            if spell.cast_by == self.baseline.owner {
                self.breakdown.add(movement, Component::SpellEffect, amount);
            } else {
                self.breakdown.add(movement, Component::Penalty, -amount);
            }
        }
    }

    /// 11. Weapon grade bonuses. Ranged attack bonuses only apply to ranged
    /// attack types that benefit from weapons.
    pub(super) fn apply_weapon_grade(&mut self) -> Result<(), ExpandError> {
        let Some(grade) = self.unit.weapon_grade else {
            return Ok(());
        };
        let grade = self.env.weapon_grade(grade)?;
        let ranged_benefits = match &self.ctx.ranged_attack_type {
            Some(rat) => self.env.ranged_attack_type(rat)?.weapon_grade_applies,
            None => false,
        };

        let ranged_attack = &self.env.config().skills.ranged_attack;
        for rule in &grade.bonuses {
            if &rule.target == ranged_attack && !ranged_benefits {
                continue;
            }
            engine::apply_bonus(
                &mut self.breakdown,
                rule,
                &self.ctx,
                Some(Component::WeaponGrade),
            );
        }
        Ok(())
    }

    /// 12. Fixed bonuses of the unit's experience level.
    pub(super) fn apply_experience(&mut self) -> Result<(), ExpandError> {
        let Some(level) = self.baseline.experience_level else {
            return Ok(());
        };
        let category = self.env.category(self.baseline.category)?;
        let Some(level) = category.level(level) else {
            return Ok(());
        };

        for rule in &level.bonuses {
            engine::apply_bonus(
                &mut self.breakdown,
                rule,
                &self.ctx,
                Some(Component::Experience),
            );
        }
        Ok(())
    }

    /// 13. Skills granted by zone effects. New skills are remembered for the
    /// second negation pass; valued grants on existing skills add to them.
    pub(super) fn apply_zone_effects(&mut self) -> Result<(), ExpandError> {
        for active in self.env.world().zone_effects() {
            let effect = self.env.zone_effect(&active.effect)?;
            if !zone_effect_applies(active, effect, self.unit) {
                continue;
            }

            for grant in &effect.grants {
                self.env.skill(&grant.skill)?;
                if self.breakdown.contains(&grant.skill) {
                    if let Some(value) = grant.value {
                        self.breakdown.add(&grant.skill, Component::ZoneEffect, value);
                    }
                } else {
                    let breakdown = grant
                        .value
                        .map_or_else(SkillBreakdown::valueless, |value| {
                            SkillBreakdown::with(Component::ZoneEffect, value)
                        });
                    self.breakdown.insert(grant.skill.clone(), breakdown);
                    self.zone_skills.insert(grant.skill.clone());
                }
            }
        }

        tracing::debug!(
            unit = ?self.unit.id,
            introduced = self.zone_skills.len(),
            "zone effects applied"
        );
        Ok(())
    }

    /// 14. Negation again, for conditions involving zone-introduced skills:
    /// an introduced skill may be negated, or may negate one already there.
    pub(super) fn negate_zone_skills(&mut self) -> Result<(), ExpandError> {
        if self.zone_skills.is_empty() {
            return Ok(());
        }

        let mut negated = Vec::new();
        for skill in self.breakdown.skill_ids() {
            let definition = self.env.skill(skill)?;
            let knocked_out = if self.zone_skills.contains(skill) {
                is_negated(
                    definition,
                    |other| self.breakdown.contains(other),
                    &self.ctx.enemies,
                )
            } else {
                definition.negated_by.iter().any(|negation| {
                    negation.by == NegatedBy::OwnUnit
                        && self.zone_skills.contains(&negation.skill)
                        && self.breakdown.contains(&negation.skill)
                })
            };
            if knocked_out {
                negated.push(skill.clone());
            }
        }

        for skill in negated {
            tracing::debug!(unit = ?self.unit.id, %skill, "skill negated by zone effect");
            self.breakdown.remove(&skill);
        }
        Ok(())
    }

    /// 15. Skill-to-skill bonuses: stack auras, the unit's own skills, then
    /// enemy skills.
    pub(super) fn apply_skill_bonuses(&mut self) -> Result<(), ExpandError> {
        self.refresh_own_stack_entry();
        let applied = self.apply_skill_rules(Pass::Bonus)?;
        tracing::debug!(unit = ?self.unit.id, applied, "skill bonuses applied");
        Ok(())
    }

    /// Replaces the unit's raw baseline in the stack maxima with the skills
    /// it holds now: negated skills drop out, skills gained from spells,
    /// items, grants and zone effects join.
    fn refresh_own_stack_entry(&mut self) {
        let mut stack = self.stack_others.clone();
        for (skill, breakdown) in self.breakdown.iter() {
            let value = breakdown
                .component(Component::Basic)
                .or_else(|| breakdown.component(Component::ZoneEffect));
            stack.record(
                skill.clone(),
                StackSkills::scaled(value, self.baseline.experience_level),
            );
        }
        self.ctx.stack = stack;
    }

    /// 16. Valued bonuses of equipped hero items.
    pub(super) fn apply_item_bonuses(&mut self) {
        if !self.unit.is_persisted() {
            return;
        }

        for item in &self.unit.hero_items {
            for grant in &item.bonuses {
                let Some(value) = grant.value else {
                    continue;
                };
                let rule = ModifierRule::fixed(grant.skill.clone(), value);
                engine::apply_bonus(
                    &mut self.breakdown,
                    &rule,
                    &self.ctx,
                    Some(Component::HeroItems),
                );
            }
        }
    }

    /// 18. Caps, divisions and multipliers, after every bonus has landed.
    pub(super) fn apply_skill_penalties(&mut self) -> Result<(), ExpandError> {
        let applied = self.apply_skill_rules(Pass::Penalty)?;
        tracing::debug!(unit = ?self.unit.id, applied, "skill penalties applied");
        Ok(())
    }

    /// Runs one pass over every rule group; returns how many rules applied.
    fn apply_skill_rules(&mut self, pass: Pass) -> Result<usize, ExpandError> {
        let env = self.env;
        let experience = &env.config().skills.experience;
        let mut rules: Vec<&ModifierRule> = Vec::new();

        // Stack auras from anyone in the stack
        for skill in self.ctx.stack.skills() {
            rules.extend(
                env.skill(skill)?
                    .modifiers
                    .iter()
                    .filter(|rule| rule.affects_entire_stack() && !rule.is_penalty_to_enemy()),
            );
        }

        // The unit's own skills. Experience rules of spell skills already ran
        // before level lookup.
        let own: Vec<SkillId> = self.breakdown.skill_ids().cloned().collect();
        for skill in &own {
            let definition = env.skill(skill)?;
            let from_spell = self.spell_skills.contains(skill);
            rules.extend(own_rules(definition).filter(|rule| !(from_spell && &rule.target == experience)));
        }

        // Enemy skills aimed at their opponents
        for skill in self.ctx.enemies.skills() {
            rules.extend(
                env.skill(skill)?
                    .modifiers
                    .iter()
                    .filter(|rule| rule.is_penalty_to_enemy()),
            );
        }

        let mut applied = 0;
        for rule in rules.into_iter().filter(|rule| pass.handles(rule)) {
            let outcome = match pass {
                Pass::Bonus => engine::apply_bonus(&mut self.breakdown, rule, &self.ctx, None),
                Pass::Penalty => engine::apply_penalty(&mut self.breakdown, rule, &self.ctx, None),
            };
            if let RuleOutcome::Applied { .. } = outcome {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

fn own_rules(definition: &SkillDefinition) -> impl Iterator<Item = &ModifierRule> {
    definition.modifiers.iter().filter(|rule| rule.applies_to_self())
}
