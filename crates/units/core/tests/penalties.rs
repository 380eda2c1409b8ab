//! Property checks for cap, divide and multiply rules.

use proptest::prelude::*;
use units_core::stats::{RuleContext, StackSkills, apply_penalty};
use units_core::{
    AttackContext, Breakdown, Component, MagicRealmId, ModifierRule, RuleOutcome, SkillBreakdown,
    SkillId, SkillValues,
};

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

fn defence(base: i32, bonus: i32) -> Breakdown {
    let id = SkillId::from("Defence");
    let mut breakdown = Breakdown::new();
    breakdown.insert(id.clone(), SkillBreakdown::seeded(Some(base)));
    breakdown.add(&id, Component::SpellEffect, bonus);
    breakdown
}

fn components_sum(breakdown: &Breakdown) -> i32 {
    breakdown
        .get(&SkillId::from("Defence"))
        .map(|defence| defence.components().map(|(_, value)| value).sum())
        .unwrap_or_default()
}

proptest! {
    #[test]
    fn caps_and_divisions_never_raise(
        base in -50i32..50,
        bonus in 0i32..20,
        literal in -10i32..10,
        lock in any::<bool>(),
    ) {
        let mut breakdown = defence(base, bonus);
        let before = breakdown.total(&SkillId::from("Defence")).unwrap();
        let rule = if lock {
            ModifierRule::lock("Defence", literal)
        } else {
            ModifierRule::divide("Defence", literal)
        };

        let outcome = apply_penalty(&mut breakdown, &rule, &context(), None);
        prop_assert!(outcome.is_applied());

        let after = breakdown.total(&SkillId::from("Defence")).unwrap();
        prop_assert!(after <= before);
        prop_assert_eq!(after, components_sum(&breakdown));
    }

    #[test]
    fn multiply_scales_the_running_total(
        base in 0i32..50,
        bonus in 0i32..20,
        factor in 1i32..5,
    ) {
        let mut breakdown = defence(base, bonus);
        let rule = ModifierRule::multiply("Defence", factor);

        apply_penalty(&mut breakdown, &rule, &context(), None);

        let after = breakdown.total(&SkillId::from("Defence")).unwrap();
        prop_assert_eq!(after, (base + bonus) * factor);
        prop_assert_eq!(after, components_sum(&breakdown));
    }
}

#[test]
fn lock_to_the_current_value_commits_nothing() {
    let mut breakdown = defence(3, 0);
    let outcome = apply_penalty(
        &mut breakdown,
        &ModifierRule::lock("Defence", 3),
        &context(),
        None,
    );

    assert_eq!(
        outcome,
        RuleOutcome::Applied {
            component: Component::Penalty,
            amount: 0
        }
    );
    let defence = breakdown.get(&SkillId::from("Defence")).unwrap();
    assert_eq!(defence.component(Component::Penalty), None);
}
