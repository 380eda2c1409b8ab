//! Per-source skill breakdowns.
//!
//! Every skill a unit has maps to a [`SkillBreakdown`]: one signed integer per
//! [`Component`] that contributed to it. A skill's total is always the sum of
//! its components. A skill with an empty breakdown is present but valueless
//! (a tag like a movement type); an absent skill has no entry at all.

use std::collections::BTreeMap;

use crate::state::SkillId;

/// Source bucket of a contribution to a skill.
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
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Component {
    /// Value from the unit definition (or raw record, for experience).
    Basic,
    /// Equipment tier bonuses.
    WeaponGrade,
    /// Experience level bonuses.
    Experience,
    /// Level-scaled hero attribute bonuses.
    HeroSkill,
    /// Numeric bonuses from equipped hero items.
    HeroItems,
    /// Spells and skills on the unit itself.
    SpellEffect,
    /// Zone effects.
    ZoneEffect,
    /// Auras from anywhere in the unit's stack.
    Stack,
    /// Reductions: enemy auras, caps, divisions and multipliers.
    Penalty,
}

/// Which components a filtered total should include.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComponentFilter {
    #[default]
    All,
    Only(Component),
}

impl ComponentFilter {
    fn matches(self, component: Component) -> bool {
        match self {
            ComponentFilter::All => true,
            ComponentFilter::Only(wanted) => wanted == component,
        }
    }
}

/// Which contributions a filtered total should include by sign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignFilter {
    #[default]
    Both,
    Positive,
    Negative,
}

impl SignFilter {
    fn matches(self, value: i32) -> bool {
        match self {
            SignFilter::Both => true,
            SignFilter::Positive => value > 0,
            SignFilter::Negative => value < 0,
        }
    }
}

/// Contributions to a single skill, keyed by source component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillBreakdown {
    components: BTreeMap<Component, i32>,
}

impl SkillBreakdown {
    /// A present skill with no magnitude.
    pub fn valueless() -> Self {
        Self::default()
    }

    /// A skill seeded from a raw value. `None` yields a valueless skill.
    pub fn seeded(value: Option<i32>) -> Self {
        value.map_or_else(Self::valueless, |value| Self::with(Component::Basic, value))
    }

    pub fn with(component: Component, value: i32) -> Self {
        let mut breakdown = Self::default();
        breakdown.add(component, value);
        breakdown
    }

    /// Adds to a component, creating it if needed.
    pub fn add(&mut self, component: Component, value: i32) {
        *self.components.entry(component).or_insert(0) += value;
    }

    pub fn is_valueless(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component(&self, component: Component) -> Option<i32> {
        self.components.get(&component).copied()
    }

    pub fn components(&self) -> impl Iterator<Item = (Component, i32)> + '_ {
        self.components.iter().map(|(c, v)| (*c, *v))
    }

    pub fn total(&self) -> i32 {
        self.components.values().sum()
    }

    pub fn filtered_total(&self, components: ComponentFilter, sign: SignFilter) -> i32 {
        self.components()
            .filter(|(component, value)| components.matches(*component) && sign.matches(*value))
            .map(|(_, value)| value)
            .sum()
    }
}

/// Breakdowns of every skill a unit has.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakdown {
    skills: BTreeMap<SkillId, SkillBreakdown>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, skill: &SkillId) -> bool {
        self.skills.contains_key(skill)
    }

    pub fn get(&self, skill: &SkillId) -> Option<&SkillBreakdown> {
        self.skills.get(skill)
    }

    pub fn insert(&mut self, skill: SkillId, breakdown: SkillBreakdown) {
        self.skills.insert(skill, breakdown);
    }

    pub fn remove(&mut self, skill: &SkillId) -> Option<SkillBreakdown> {
        self.skills.remove(skill)
    }

    /// Adds to a component of a skill the unit already has.
    ///
    /// Returns false, changing nothing, if the skill is absent.
    pub fn add(&mut self, skill: &SkillId, component: Component, value: i32) -> bool {
        match self.skills.get_mut(skill) {
            Some(breakdown) => {
                breakdown.add(component, value);
                true
            }
            None => false,
        }
    }

    /// Current total of a skill; `None` if absent. Valueless skills total 0.
    pub fn total(&self, skill: &SkillId) -> Option<i32> {
        self.skills.get(skill).map(SkillBreakdown::total)
    }

    pub fn skill_ids(&self) -> impl Iterator<Item = &SkillId> + '_ {
        self.skills.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, &SkillBreakdown)> + '_ {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_breakdown_distinguishes_valueless() {
        assert!(SkillBreakdown::seeded(None).is_valueless());
        let seeded = SkillBreakdown::seeded(Some(0));
        assert!(!seeded.is_valueless());
        assert_eq!(seeded.component(Component::Basic), Some(0));
    }

    #[test]
    fn total_sums_every_component() {
        let mut breakdown = SkillBreakdown::seeded(Some(2));
        breakdown.add(Component::WeaponGrade, 2);
        breakdown.add(Component::Penalty, -3);
        breakdown.add(Component::WeaponGrade, 1);
        assert_eq!(breakdown.total(), 2);
        assert_eq!(breakdown.component(Component::WeaponGrade), Some(3));
    }

    #[test]
    fn filtered_total_by_component_and_sign() {
        let mut breakdown = SkillBreakdown::seeded(Some(4));
        breakdown.add(Component::Stack, 1);
        breakdown.add(Component::Penalty, -2);

        assert_eq!(
            breakdown.filtered_total(ComponentFilter::Only(Component::Stack), SignFilter::Both),
            1
        );
        assert_eq!(
            breakdown.filtered_total(ComponentFilter::All, SignFilter::Positive),
            5
        );
        assert_eq!(
            breakdown.filtered_total(ComponentFilter::All, SignFilter::Negative),
            -2
        );
        assert_eq!(
            breakdown.filtered_total(ComponentFilter::Only(Component::Basic), SignFilter::Negative),
            0
        );
    }

    #[test]
    fn adding_to_absent_skill_is_refused() {
        let mut breakdown = Breakdown::new();
        let defence = SkillId::from("Defence");
        assert!(!breakdown.add(&defence, Component::Basic, 1));
        assert!(breakdown.total(&defence).is_none());

        breakdown.insert(defence.clone(), SkillBreakdown::valueless());
        assert!(breakdown.add(&defence, Component::SpellEffect, 1));
        assert_eq!(breakdown.total(&defence), Some(1));
    }

    #[test]
    fn component_names_round_trip_through_strum() {
        assert_eq!(Component::WeaponGrade.to_string(), "weapon_grade");
        assert_eq!("HERO_SKILL".parse::<Component>(), Ok(Component::HeroSkill));
    }
}
