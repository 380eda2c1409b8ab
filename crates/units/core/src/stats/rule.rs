//! Declarative modifier rules.
//!
//! A [`ModifierRule`] says "skill X changes skill Y by Z, under these
//! conditions". Rules live on skill definitions (the source skill) and on the
//! weapon grade and experience level tables (no source skill). They carry no
//! behaviour; [`crate::stats::engine`] evaluates them.

use bitflags::bitflags;

use crate::state::{MagicRealmId, RangedAttackTypeId, SkillId};
use crate::stats::breakdown::Component;

/// How a rule's value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValueKind {
    /// Adds the literal value.
    AddFixed,
    /// Adds a magnitude derived from the source skill, scaled down by the value.
    AddDivisor,
    /// Caps the target at the value.
    Lock,
    /// Divides the target by the value.
    Divide,
    /// Multiplies the target by the value.
    Multiply,
}

impl ValueKind {
    pub const fn is_bonus(self) -> bool {
        matches!(self, ValueKind::AddFixed | ValueKind::AddDivisor)
    }

    pub const fn is_penalty(self) -> bool {
        !self.is_bonus()
    }
}

bitflags! {
    /// Boolean applicability conditions of a [`ModifierRule`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(
        feature = "serde",
        derive(serde::Serialize, serde::Deserialize),
        serde(transparent)
    )]
    pub struct RuleFlags: u8 {
        /// Only applies while the unit is engaged in combat.
        const COMBAT_ONLY            = 1 << 0;
        /// Applies to every unit in the source unit's stack.
        const AFFECTS_ENTIRE_STACK   = 1 << 1;
        /// Declared on an enemy's skill; applies to the units it engages.
        const PENALTY_TO_ENEMY       = 1 << 2;
        /// Inverts the attacking-skill restriction.
        const NEGATE_ATTACKING_SKILL = 1 << 3;
    }
}

/// A single declarative modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierRule {
    /// Skill the rule is declared on; filled in by the definition index.
    #[cfg_attr(feature = "serde", serde(default))]
    pub source: Option<SkillId>,
    pub target: SkillId,
    pub kind: ValueKind,
    /// Literal for fixed/penalty kinds, divisor for divisor kinds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: RuleFlags,
    /// Only applies to units of this magic realm.
    #[cfg_attr(feature = "serde", serde(default))]
    pub magic_realm: Option<MagicRealmId>,
    /// Only applies to units with this ranged attack type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged_attack_type: Option<RangedAttackTypeId>,
    /// Only applies when attacked/attacking with this skill.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attacking_skill: Option<SkillId>,
    /// Only applies when the attack comes from this magic realm.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attacking_realm: Option<MagicRealmId>,
    /// Files the contribution under this component instead of the derived one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub component: Option<Component>,
}

impl ModifierRule {
    pub fn new(target: impl Into<SkillId>, kind: ValueKind, value: Option<i32>) -> Self {
        Self {
            source: None,
            target: target.into(),
            kind,
            value,
            flags: RuleFlags::empty(),
            magic_realm: None,
            ranged_attack_type: None,
            attacking_skill: None,
            attacking_realm: None,
            component: None,
        }
    }

    pub fn fixed(target: impl Into<SkillId>, value: i32) -> Self {
        Self::new(target, ValueKind::AddFixed, Some(value))
    }

    /// Divisor rule. `None` adds the source skill's own total unscaled.
    pub fn divisor(target: impl Into<SkillId>, divisor: Option<i32>) -> Self {
        Self::new(target, ValueKind::AddDivisor, divisor)
    }

    pub fn lock(target: impl Into<SkillId>, value: i32) -> Self {
        Self::new(target, ValueKind::Lock, Some(value))
    }

    pub fn divide(target: impl Into<SkillId>, value: i32) -> Self {
        Self::new(target, ValueKind::Divide, Some(value))
    }

    pub fn multiply(target: impl Into<SkillId>, value: i32) -> Self {
        Self::new(target, ValueKind::Multiply, Some(value))
    }

    pub fn from_skill(mut self, source: impl Into<SkillId>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn combat_only(mut self) -> Self {
        self.flags |= RuleFlags::COMBAT_ONLY;
        self
    }

    pub fn stack_wide(mut self) -> Self {
        self.flags |= RuleFlags::AFFECTS_ENTIRE_STACK;
        self
    }

    pub fn against_enemies(mut self) -> Self {
        self.flags |= RuleFlags::PENALTY_TO_ENEMY;
        self
    }

    pub fn in_realm(mut self, realm: impl Into<MagicRealmId>) -> Self {
        self.magic_realm = Some(realm.into());
        self
    }

    pub fn with_ranged_attack_type(mut self, rat: impl Into<RangedAttackTypeId>) -> Self {
        self.ranged_attack_type = Some(rat.into());
        self
    }

    pub fn when_attacked_with(mut self, skill: impl Into<SkillId>) -> Self {
        self.attacking_skill = Some(skill.into());
        self.flags.remove(RuleFlags::NEGATE_ATTACKING_SKILL);
        self
    }

    pub fn unless_attacked_with(mut self, skill: impl Into<SkillId>) -> Self {
        self.attacking_skill = Some(skill.into());
        self.flags |= RuleFlags::NEGATE_ATTACKING_SKILL;
        self
    }

    pub fn when_attacked_from(mut self, realm: impl Into<MagicRealmId>) -> Self {
        self.attacking_realm = Some(realm.into());
        self
    }

    pub fn filed_under(mut self, component: Component) -> Self {
        self.component = Some(component);
        self
    }

    pub fn is_combat_only(&self) -> bool {
        self.flags.contains(RuleFlags::COMBAT_ONLY)
    }

    pub fn affects_entire_stack(&self) -> bool {
        self.flags.contains(RuleFlags::AFFECTS_ENTIRE_STACK)
    }

    pub fn is_penalty_to_enemy(&self) -> bool {
        self.flags.contains(RuleFlags::PENALTY_TO_ENEMY)
    }

    /// Rules that only make sense with an attack in progress.
    pub fn needs_attack_context(&self) -> bool {
        self.attacking_skill.is_some() || self.attacking_realm.is_some()
    }

    /// Rules that apply to the unit declaring the source skill (neither
    /// stack-wide nor aimed at enemies).
    pub fn applies_to_self(&self) -> bool {
        !self.affects_entire_stack() && !self.is_penalty_to_enemy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kinds_split_into_bonus_and_penalty() {
        assert!(ValueKind::AddFixed.is_bonus());
        assert!(ValueKind::AddDivisor.is_bonus());
        assert!(ValueKind::Lock.is_penalty());
        assert!(ValueKind::Divide.is_penalty());
        assert!(ValueKind::Multiply.is_penalty());
    }

    #[test]
    fn builder_sets_condition_flags() {
        let rule = ModifierRule::fixed("Defence", 2)
            .from_skill("LargeShield")
            .combat_only()
            .unless_attacked_with("MeleeAttack");

        assert!(rule.is_combat_only());
        assert!(rule.flags.contains(RuleFlags::NEGATE_ATTACKING_SKILL));
        assert!(rule.needs_attack_context());
        assert!(rule.applies_to_self());
        assert_eq!(rule.source, Some(SkillId::from("LargeShield")));

        let rule = rule.when_attacked_with("RangedAttack");
        assert!(!rule.flags.contains(RuleFlags::NEGATE_ATTACKING_SKILL));
    }

    #[test]
    fn stack_and_enemy_rules_do_not_apply_to_self() {
        assert!(!ModifierRule::fixed("MeleeAttack", 1).stack_wide().applies_to_self());
        assert!(!ModifierRule::fixed("Resistance", -1).against_enemies().applies_to_self());
    }
}
