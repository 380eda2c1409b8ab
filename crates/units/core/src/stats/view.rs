//! Result view: read-only queries over a finished expansion.

use std::collections::BTreeMap;

use crate::config::SkillIds;
use crate::env::{Env, OracleError, UnitCategory};
use crate::state::{
    DamageTypeId, MagicRealmId, PlayerId, ProductionTypeId, RangedAttackTypeId, SkillId, UnitId,
    UnitTypeId, WeaponGrade,
};
use crate::stats::baseline::BaselineUnit;
use crate::stats::breakdown::{Breakdown, ComponentFilter, SignFilter, SkillBreakdown};
use crate::stats::error::ViewError;

/// Fully resolved unit, as produced by [`crate::stats::expand`].
///
/// Built fresh per call and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedUnit {
    pub(crate) baseline: BaselineUnit,
    pub(crate) magic_realm: MagicRealmId,
    pub(crate) weapon_grade: Option<WeaponGrade>,
    pub(crate) ranged_attack_type: Option<RangedAttackTypeId>,
    pub(crate) figure_count: i32,
    pub(crate) damage_taken: i32,
    pub(crate) breakdown: Breakdown,
    pub(crate) base_upkeep: BTreeMap<ProductionTypeId, i32>,
    pub(crate) upkeep: BTreeMap<ProductionTypeId, i32>,
    pub(crate) controlled_by: PlayerId,
    pub(crate) skill_ids: SkillIds,
}

impl ExpandedUnit {
    // ========================================================================
    // Identity
    // ========================================================================

    pub fn unit_id(&self) -> Option<UnitId> {
        self.baseline.unit_id
    }

    pub fn definition(&self) -> &UnitTypeId {
        &self.baseline.definition
    }

    pub fn category(&self) -> UnitCategory {
        self.baseline.category
    }

    pub fn owner(&self) -> PlayerId {
        self.baseline.owner
    }

    /// Player currently giving orders to the unit.
    pub fn controlled_by(&self) -> PlayerId {
        self.controlled_by
    }

    pub fn base_experience_level(&self) -> Option<u8> {
        self.baseline.base_experience_level
    }

    pub fn experience_level(&self) -> Option<u8> {
        self.baseline.experience_level
    }

    pub fn magic_realm(&self) -> &MagicRealmId {
        &self.magic_realm
    }

    pub fn weapon_grade(&self) -> Option<WeaponGrade> {
        self.weapon_grade
    }

    pub fn ranged_attack_type(&self) -> Option<&RangedAttackTypeId> {
        self.ranged_attack_type.as_ref()
    }

    pub fn figure_count(&self) -> i32 {
        self.figure_count
    }

    pub fn damage_taken(&self) -> i32 {
        self.damage_taken
    }

    pub fn breakdown(&self) -> &Breakdown {
        &self.breakdown
    }

    pub fn base_upkeep(&self) -> &BTreeMap<ProductionTypeId, i32> {
        &self.base_upkeep
    }

    pub fn upkeep(&self) -> &BTreeMap<ProductionTypeId, i32> {
        &self.upkeep
    }

    // ========================================================================
    // Skill queries
    // ========================================================================

    pub fn has_skill(&self, skill: &SkillId) -> bool {
        self.breakdown.contains(skill)
    }

    /// Sum of every component of `skill`.
    ///
    /// Experience is special: a unit that has the skill but no breakdown for
    /// it has 0 experience, which is not the same as never gaining any.
    pub fn total_of(&self, skill: &SkillId) -> Result<i32, ViewError> {
        self.valued(skill).map(|breakdown| breakdown.map_or(0, SkillBreakdown::total))
    }

    /// Like [`Self::total_of`], restricted to matching components and signs.
    pub fn filtered_total(
        &self,
        skill: &SkillId,
        components: ComponentFilter,
        sign: SignFilter,
    ) -> Result<i32, ViewError> {
        self.valued(skill).map(|breakdown| {
            breakdown.map_or(0, |breakdown| breakdown.filtered_total(components, sign))
        })
    }

    /// Total of a valued skill; `None` if absent or valueless.
    pub fn value_of(&self, skill: &SkillId) -> Option<i32> {
        self.breakdown
            .get(skill)
            .filter(|breakdown| !breakdown.is_valueless())
            .map(SkillBreakdown::total)
    }

    /// Breakdown of a skill that can be totalled. `Ok(None)` is valueless
    /// experience, which totals 0.
    fn valued(&self, skill: &SkillId) -> Result<Option<&SkillBreakdown>, ViewError> {
        let breakdown = self
            .breakdown
            .get(skill)
            .ok_or_else(|| ViewError::SkillAbsent(skill.clone()))?;

        if !breakdown.is_valueless() {
            Ok(Some(breakdown))
        } else if *skill == self.skill_ids.experience {
            Ok(None)
        } else {
            Err(ViewError::SkillValueless(skill.clone()))
        }
    }

    // ========================================================================
    // Derived combat metrics
    // ========================================================================

    fn hit_points_per_figure(&self) -> i32 {
        self.value_of(&self.skill_ids.hit_points).unwrap_or_default()
    }

    /// Hit points of every figure at full health.
    pub fn total_hit_points(&self) -> i32 {
        self.figure_count * self.hit_points_per_figure()
    }

    pub fn hit_points_remaining(&self) -> i32 {
        self.total_hit_points() - self.damage_taken
    }

    pub fn figures_alive(&self) -> i32 {
        let per_figure = self.hit_points_per_figure();
        if per_figure <= 0 {
            return 0;
        }
        (self.figure_count - self.damage_taken / per_figure).max(0)
    }

    /// Remaining hit points of the figure currently taking damage.
    pub fn first_figure_hit_points(&self) -> i32 {
        let per_figure = self.hit_points_per_figure();
        if per_figure <= 0 {
            return 0;
        }
        per_figure - self.damage_taken % per_figure
    }

    pub fn full_ammo(&self) -> i32 {
        self.value_of(&self.skill_ids.ammo).unwrap_or_default()
    }

    /// Mana available for casting in combat: the fixed caster pool plus the
    /// level-scaled hero caster pool.
    pub fn castable_mana(&self) -> i32 {
        let fixed = self
            .value_of(&self.skill_ids.caster_unit)
            .unwrap_or_default();

        let scaled = match (
            self.value_of(&self.skill_ids.caster_hero),
            self.baseline.experience_level,
        ) {
            (Some(value), Some(level)) => value * 5 * (i32::from(level) + 1) / 2,
            _ => 0,
        };

        fixed + scaled
    }

    /// Whether the unit is completely immune to a damage type.
    ///
    /// Partial immunities, which cap hits per figure, do not count.
    pub fn is_immune_to(&self, damage_type: &DamageTypeId, env: Env<'_>) -> Result<bool, OracleError> {
        let damage_type = env.damage_type(damage_type)?;
        Ok(damage_type
            .immunities
            .iter()
            .any(|immunity| immunity.max_hits_per_figure.is_none() && self.has_skill(&immunity.skill)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::breakdown::Component;

    fn unit(skills: &[(&str, SkillBreakdown)]) -> ExpandedUnit {
        let mut breakdown = Breakdown::new();
        for (skill, values) in skills {
            breakdown.insert(SkillId::from(*skill), values.clone());
        }

        ExpandedUnit {
            baseline: BaselineUnit {
                unit_id: Some(UnitId(1)),
                definition: UnitTypeId::from("Swordsmen"),
                category: UnitCategory::Hero,
                owner: PlayerId(1),
                base_experience_level: Some(2),
                experience_level: Some(2),
                skills: Default::default(),
            },
            magic_realm: MagicRealmId::from("Normal"),
            weapon_grade: None,
            ranged_attack_type: None,
            figure_count: 6,
            damage_taken: 5,
            breakdown,
            base_upkeep: BTreeMap::new(),
            upkeep: BTreeMap::new(),
            controlled_by: PlayerId(1),
            skill_ids: SkillIds::default(),
        }
    }

    #[test]
    fn total_of_distinguishes_absent_and_valueless() {
        let unit = unit(&[
            ("Walking", SkillBreakdown::valueless()),
            ("Experience", SkillBreakdown::valueless()),
        ]);

        assert_eq!(
            unit.total_of(&SkillId::from("Melee")),
            Err(ViewError::SkillAbsent(SkillId::from("Melee")))
        );
        assert_eq!(
            unit.total_of(&SkillId::from("Walking")),
            Err(ViewError::SkillValueless(SkillId::from("Walking")))
        );
        assert_eq!(unit.total_of(&SkillId::from("Experience")), Ok(0));
        assert_eq!(unit.value_of(&SkillId::from("Walking")), None);
    }

    #[test]
    fn filtered_total_isolates_negative_contributions() {
        let mut defence = SkillBreakdown::seeded(Some(3));
        defence.add(Component::Stack, 1);
        defence.add(Component::Penalty, -2);
        let unit = unit(&[("Defence", defence)]);
        let id = SkillId::from("Defence");

        assert_eq!(unit.total_of(&id), Ok(2));
        assert_eq!(
            unit.filtered_total(&id, ComponentFilter::All, SignFilter::Negative),
            Ok(-2)
        );
        assert_eq!(
            unit.filtered_total(&id, ComponentFilter::Only(Component::Stack), SignFilter::Both),
            Ok(1)
        );
    }

    #[test]
    fn hit_point_metrics() {
        let unit = unit(&[("HitPoints", SkillBreakdown::seeded(Some(2)))]);

        assert_eq!(unit.total_hit_points(), 12);
        assert_eq!(unit.hit_points_remaining(), 7);
        assert_eq!(unit.figures_alive(), 4);
        assert_eq!(unit.first_figure_hit_points(), 1);
    }

    #[test]
    fn figures_alive_never_negative() {
        let mut unit = unit(&[("HitPoints", SkillBreakdown::seeded(Some(1)))]);
        unit.damage_taken = 40;
        assert_eq!(unit.figures_alive(), 0);
    }

    #[test]
    fn castable_mana_scales_hero_casting_with_level() {
        let unit = unit(&[
            ("CasterUnit", SkillBreakdown::seeded(Some(10))),
            ("CasterHero", SkillBreakdown::seeded(Some(3))),
        ]);
        // 10 + 3 * 5 * 3 / 2
        assert_eq!(unit.castable_mana(), 32);
        assert_eq!(unit.full_ammo(), 0);
    }
}
