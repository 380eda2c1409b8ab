//! Modifier engine: evaluates one rule against one in-progress breakdown.
//!
//! Bonus and penalty evaluation share the same ordered applicability checks.
//! The first failing check decides the [`RuleOutcome`]; outcomes exist for
//! diagnostics and tests, the pipeline never branches on them.

use crate::state::{MagicRealmId, RangedAttackTypeId, SkillId, SkillValues};
use crate::stats::baseline::StackSkills;
use crate::stats::breakdown::{Breakdown, Component};
use crate::stats::rule::{ModifierRule, RuleFlags, ValueKind};

/// What the unit is being attacked with, if anything.
///
/// Empty for display and AI queries; rules conditioned on an attack never
/// apply then.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackContext {
    pub attacking_skill: Option<SkillId>,
    pub attacking_realm: Option<MagicRealmId>,
}

impl AttackContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_skill(skill: impl Into<SkillId>) -> Self {
        Self {
            attacking_skill: Some(skill.into()),
            attacking_realm: None,
        }
    }

    pub fn from_realm(mut self, realm: impl Into<MagicRealmId>) -> Self {
        self.attacking_realm = Some(realm.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attacking_skill.is_none() && self.attacking_realm.is_none()
    }
}

/// Everything about the unit a rule's conditions and magnitude may read.
#[derive(Clone, Debug)]
pub struct RuleContext {
    pub in_combat: bool,
    pub magic_realm: MagicRealmId,
    pub ranged_attack_type: Option<RangedAttackTypeId>,
    pub attack: AttackContext,
    /// Resolved experience level after extra levels; `None` for units that
    /// never gain experience.
    pub experience_level: Option<u8>,
    /// Raw skill values the unit started the expansion with.
    pub basic_values: SkillValues,
    pub stack: StackSkills,
    pub enemies: StackSkills,
}

/// Result of evaluating a single rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The rule applied. `amount` is the committed delta, possibly zero.
    Applied { component: Component, amount: i32 },
    NotPresent,
    WrongKind,
    NoAttackContext,
    NotInCombat,
    WrongRealm,
    WrongRangedAttackType,
    WrongAttackSkill,
    WrongAttackRealm,
}

impl RuleOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, RuleOutcome::Applied { .. })
    }
}

/// Evaluates an additive rule and commits its magnitude.
///
/// `filed_under` is the caller's component for whole rule tables (weapon
/// grade, experience); a component set on the rule itself wins over it.
pub fn apply_bonus(
    breakdown: &mut Breakdown,
    rule: &ModifierRule,
    ctx: &RuleContext,
    filed_under: Option<Component>,
) -> RuleOutcome {
    let outcome = match precheck(breakdown, rule, ctx, ValueKind::is_bonus) {
        Some(rejected) => rejected,
        None => {
            let (amount, hero_scaled) = bonus_magnitude(breakdown, rule, ctx);
            let component = component_for(rule, filed_under, hero_scaled, Component::SpellEffect);
            commit(breakdown, &rule.target, component, amount)
        }
    };
    log_outcome(rule, outcome);
    outcome
}

/// Evaluates a cap/divide/multiply rule and commits the resulting delta.
pub fn apply_penalty(
    breakdown: &mut Breakdown,
    rule: &ModifierRule,
    ctx: &RuleContext,
    filed_under: Option<Component>,
) -> RuleOutcome {
    let outcome = match precheck(breakdown, rule, ctx, ValueKind::is_penalty) {
        Some(rejected) => rejected,
        None => {
            let current = breakdown.total(&rule.target).unwrap_or_default();
            let amount = penalty_delta(current, rule.kind, rule.value);
            let component = component_for(rule, filed_under, false, Component::Penalty);
            commit(breakdown, &rule.target, component, amount)
        }
    };
    log_outcome(rule, outcome);
    outcome
}

/// Ordered applicability checks. `None` means the rule applies.
fn precheck(
    breakdown: &Breakdown,
    rule: &ModifierRule,
    ctx: &RuleContext,
    handles: fn(ValueKind) -> bool,
) -> Option<RuleOutcome> {
    // 1. Target must already be present
    if !breakdown.contains(&rule.target) {
        return Some(RuleOutcome::NotPresent);
    }

    // 2. Kind must belong to this entry point
    if !handles(rule.kind) {
        return Some(RuleOutcome::WrongKind);
    }

    // 3. Attack-conditioned rules need some attack context
    if rule.needs_attack_context() && ctx.attack.is_empty() {
        return Some(RuleOutcome::NoAttackContext);
    }

    // 4. Combat only
    if rule.is_combat_only() && !ctx.in_combat {
        return Some(RuleOutcome::NotInCombat);
    }

    // 5. Magic realm
    if rule
        .magic_realm
        .as_ref()
        .is_some_and(|realm| *realm != ctx.magic_realm)
    {
        return Some(RuleOutcome::WrongRealm);
    }

    // 6. Ranged attack type
    if rule
        .ranged_attack_type
        .as_ref()
        .is_some_and(|rat| ctx.ranged_attack_type.as_ref() != Some(rat))
    {
        return Some(RuleOutcome::WrongRangedAttackType);
    }

    // 7. Attacking skill, optionally inverted
    if let Some(skill) = &rule.attacking_skill {
        let matches = ctx.attack.attacking_skill.as_ref() == Some(skill);
        let negated = rule.flags.contains(RuleFlags::NEGATE_ATTACKING_SKILL);
        if matches == negated {
            return Some(RuleOutcome::WrongAttackSkill);
        }
    }

    // 8. Attacking realm
    if rule
        .attacking_realm
        .as_ref()
        .is_some_and(|realm| ctx.attack.attacking_realm.as_ref() != Some(realm))
    {
        return Some(RuleOutcome::WrongAttackRealm);
    }

    None
}

/// Magnitude of an additive rule, and whether it took the level-scaled
/// hero attribute path.
fn bonus_magnitude(breakdown: &Breakdown, rule: &ModifierRule, ctx: &RuleContext) -> (i32, bool) {
    match rule.kind {
        ValueKind::AddFixed => (rule.value.unwrap_or_default(), false),
        ValueKind::AddDivisor => {
            let Some(source) = &rule.source else {
                return (0, false);
            };

            if rule.is_penalty_to_enemy() {
                let best = ctx.enemies.best(source).unwrap_or_default();
                (scale_down(best.max(0), rule.value), false)
            } else if rule.affects_entire_stack() {
                let best = ctx.stack.best(source).unwrap_or_default();
                (scale_down(best, rule.value), false)
            } else if let Some(divisor) = rule.value {
                let Some(level) = ctx.experience_level else {
                    return (0, true);
                };
                let tier = ctx
                    .basic_values
                    .get(source)
                    .copied()
                    .flatten()
                    .unwrap_or_default()
                    + 1;
                (
                    scale_down((i32::from(level) + 1) * tier, Some(divisor)),
                    true,
                )
            } else {
                (breakdown.total(source).unwrap_or_default().max(0), false)
            }
        }
        _ => (0, false),
    }
}

/// `value / (divisor * 2)`; no divisor leaves the value unscaled and a
/// non-positive divisor yields nothing.
fn scale_down(value: i32, divisor: Option<i32>) -> i32 {
    match divisor {
        None => value,
        Some(divisor) if divisor > 0 => value / (divisor * 2),
        Some(_) => 0,
    }
}

/// Delta taking `current` to the penalised value. Caps and divisions that
/// would raise the value contribute nothing.
fn penalty_delta(current: i32, kind: ValueKind, literal: Option<i32>) -> i32 {
    let Some(literal) = literal else {
        return 0;
    };

    let new_value = match kind {
        ValueKind::Lock => literal,
        ValueKind::Divide if literal > 0 => current / literal,
        ValueKind::Divide => current,
        ValueKind::Multiply => current.saturating_mul(literal),
        ValueKind::AddFixed | ValueKind::AddDivisor => current,
    };

    if matches!(kind, ValueKind::Lock | ValueKind::Divide) && new_value > current {
        0
    } else {
        new_value.saturating_sub(current)
    }
}

fn component_for(
    rule: &ModifierRule,
    filed_under: Option<Component>,
    hero_scaled: bool,
    fallback: Component,
) -> Component {
    if let Some(component) = rule.component.or(filed_under) {
        component
    } else if rule.is_penalty_to_enemy() {
        Component::Penalty
    } else if rule.affects_entire_stack() {
        Component::Stack
    } else if hero_scaled {
        Component::HeroSkill
    } else {
        fallback
    }
}

fn commit(breakdown: &mut Breakdown, target: &SkillId, component: Component, amount: i32) -> RuleOutcome {
    if amount != 0 {
        breakdown.add(target, component, amount);
    }
    RuleOutcome::Applied { component, amount }
}

fn log_outcome(rule: &ModifierRule, outcome: RuleOutcome) {
    tracing::trace!(
        source = ?rule.source,
        target = %rule.target,
        kind = %rule.kind,
        ?outcome,
        "modifier rule evaluated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::breakdown::SkillBreakdown;

    fn context() -> RuleContext {
        RuleContext {
            in_combat: false,
            magic_realm: MagicRealmId::from("Normal"),
            ranged_attack_type: None,
            attack: AttackContext::none(),
            experience_level: None,
            basic_values: SkillValues::new(),
            stack: StackSkills::default(),
            enemies: StackSkills::default(),
        }
    }

    fn defence(value: i32) -> Breakdown {
        let mut breakdown = Breakdown::new();
        breakdown.insert(SkillId::from("Defence"), SkillBreakdown::seeded(Some(value)));
        breakdown
    }

    #[test]
    fn bonus_on_absent_target_is_not_present() {
        let mut breakdown = Breakdown::new();
        let rule = ModifierRule::fixed("Defence", 2);
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &context(), None),
            RuleOutcome::NotPresent
        );
    }

    #[test]
    fn entry_points_reject_each_others_kinds() {
        let mut breakdown = defence(2);
        let ctx = context();
        assert_eq!(
            apply_bonus(&mut breakdown, &ModifierRule::lock("Defence", 1), &ctx, None),
            RuleOutcome::WrongKind
        );
        assert_eq!(
            apply_penalty(&mut breakdown, &ModifierRule::fixed("Defence", 1), &ctx, None),
            RuleOutcome::WrongKind
        );
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(2));
    }

    #[test]
    fn attack_context_is_checked_before_combat() {
        let mut breakdown = defence(2);
        let rule = ModifierRule::fixed("Defence", 2)
            .combat_only()
            .when_attacked_with("RangedAttack");

        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &context(), None),
            RuleOutcome::NoAttackContext
        );

        let ctx = RuleContext {
            attack: AttackContext::with_skill("RangedAttack"),
            ..context()
        };
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &ctx, None),
            RuleOutcome::NotInCombat
        );
    }

    #[test]
    fn negated_attacking_skill_excludes_the_named_attack() {
        let mut breakdown = defence(2);
        let rule = ModifierRule::fixed("Defence", 1).unless_attacked_with("MeleeAttack");

        let melee = RuleContext {
            attack: AttackContext::with_skill("MeleeAttack"),
            ..context()
        };
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &melee, None),
            RuleOutcome::WrongAttackSkill
        );

        let ranged = RuleContext {
            attack: AttackContext::with_skill("RangedAttack"),
            ..context()
        };
        assert!(apply_bonus(&mut breakdown, &rule, &ranged, None).is_applied());
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(3));
    }

    #[test]
    fn realm_and_ranged_attack_type_restrictions() {
        let mut breakdown = defence(2);
        let ctx = context();

        let chaos_only = ModifierRule::fixed("Defence", 1).in_realm("Chaos");
        assert_eq!(
            apply_bonus(&mut breakdown, &chaos_only, &ctx, None),
            RuleOutcome::WrongRealm
        );

        let bows_only = ModifierRule::fixed("Defence", 1).with_ranged_attack_type("Arrow");
        assert_eq!(
            apply_bonus(&mut breakdown, &bows_only, &ctx, None),
            RuleOutcome::WrongRangedAttackType
        );

        let from_death = ModifierRule::fixed("Defence", 1).when_attacked_from("Death");
        let attacked = RuleContext {
            attack: AttackContext::none().from_realm("Life"),
            ..context()
        };
        assert_eq!(
            apply_bonus(&mut breakdown, &from_death, &attacked, None),
            RuleOutcome::WrongAttackRealm
        );
    }

    #[test]
    fn fixed_bonus_files_under_spell_effect_by_default() {
        let mut breakdown = defence(2);
        let rule = ModifierRule::fixed("Defence", 2).from_skill("LargeShield");
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &context(), None),
            RuleOutcome::Applied {
                component: Component::SpellEffect,
                amount: 2
            }
        );

        let filed = apply_bonus(&mut breakdown, &rule, &context(), Some(Component::WeaponGrade));
        assert_eq!(
            filed,
            RuleOutcome::Applied {
                component: Component::WeaponGrade,
                amount: 2
            }
        );
    }

    #[test]
    fn hero_divisor_scales_with_level_and_tier() {
        let mut breakdown = Breakdown::new();
        breakdown.insert(SkillId::from("HitPoints"), SkillBreakdown::seeded(Some(10)));
        breakdown.insert(SkillId::from("Constitution"), SkillBreakdown::seeded(Some(1)));

        let mut ctx = context();
        ctx.experience_level = Some(2);
        ctx.basic_values.insert(SkillId::from("Constitution"), Some(1));

        let rule = ModifierRule::divisor("HitPoints", Some(2)).from_skill("Constitution");
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &ctx, None),
            RuleOutcome::Applied {
                component: Component::HeroSkill,
                amount: 1
            }
        );

        ctx.experience_level = None;
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &ctx, None),
            RuleOutcome::Applied {
                component: Component::HeroSkill,
                amount: 0
            }
        );
        assert_eq!(breakdown.total(&SkillId::from("HitPoints")), Some(11));
    }

    #[test]
    fn stack_divisor_uses_best_value_in_stack() {
        let mut breakdown = defence(1);
        let mut ctx = context();
        ctx.stack.record(SkillId::from("Leadership"), Some(9));
        ctx.stack.record(SkillId::from("Leadership"), Some(4));

        let rule = ModifierRule::divisor("Defence", Some(2))
            .from_skill("Leadership")
            .stack_wide();
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &ctx, None),
            RuleOutcome::Applied {
                component: Component::Stack,
                amount: 2
            }
        );
    }

    #[test]
    fn plain_divisor_adds_source_total_when_positive() {
        let mut breakdown = defence(1);
        breakdown.insert(SkillId::from("Holy"), SkillBreakdown::seeded(Some(3)));
        breakdown.insert(SkillId::from("Cursed"), SkillBreakdown::seeded(Some(-2)));

        let holy = ModifierRule::divisor("Defence", None).from_skill("Holy");
        let cursed = ModifierRule::divisor("Defence", None).from_skill("Cursed");
        apply_bonus(&mut breakdown, &holy, &context(), None);
        apply_bonus(&mut breakdown, &cursed, &context(), None);
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(4));
    }

    #[test]
    fn enemy_rules_file_under_penalty() {
        let mut breakdown = defence(4);
        let rule = ModifierRule::fixed("Defence", -1)
            .from_skill("Terror")
            .against_enemies();
        assert_eq!(
            apply_bonus(&mut breakdown, &rule, &context(), None),
            RuleOutcome::Applied {
                component: Component::Penalty,
                amount: -1
            }
        );
    }

    #[test]
    fn lock_reduces_but_never_raises() {
        let mut breakdown = defence(5);
        let lock = ModifierRule::lock("Defence", 1);
        assert_eq!(
            apply_penalty(&mut breakdown, &lock, &context(), None),
            RuleOutcome::Applied {
                component: Component::Penalty,
                amount: -4
            }
        );
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(1));

        let mut zero = defence(0);
        apply_penalty(&mut zero, &lock, &context(), None);
        let defence = zero.get(&SkillId::from("Defence")).unwrap();
        assert_eq!(defence.total(), 0);
        assert_eq!(defence.component(Component::Penalty), None);
    }

    #[test]
    fn divide_and_multiply_commit_deltas() {
        let mut breakdown = defence(7);
        apply_penalty(&mut breakdown, &ModifierRule::divide("Defence", 2), &context(), None);
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(3));

        apply_penalty(&mut breakdown, &ModifierRule::multiply("Defence", 3), &context(), None);
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(9));

        apply_penalty(&mut breakdown, &ModifierRule::divide("Defence", 0), &context(), None);
        assert_eq!(breakdown.total(&SkillId::from("Defence")), Some(9));
    }
}
