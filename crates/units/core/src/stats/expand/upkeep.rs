//! Economy and control stages.

use std::collections::BTreeMap;

use super::Expansion;
use crate::env::UpkeepModifier;
use crate::state::ProductionTypeId;
use crate::stats::error::ExpandError;

impl Expansion<'_> {
    /// 19. Base upkeep from the definition, reduced by percentages from the
    /// owner's picks and the unit's own skills.
    pub(super) fn apply_upkeep(&mut self) -> Result<(), ExpandError> {
        self.base_upkeep = self.definition.upkeep.clone();

        let mut modifiers: Vec<&UpkeepModifier> = Vec::new();
        if let Some(owner) = self.env.player(self.baseline.owner) {
            for (pick, count) in &owner.picks {
                if *count > 0 {
                    modifiers.extend(&self.env.pick(pick)?.upkeep_modifiers);
                }
            }
        }
        for skill in self.breakdown.skill_ids() {
            modifiers.extend(&self.env.skill(skill)?.upkeep_modifiers);
        }

        self.upkeep = reduced_upkeep(&self.base_upkeep, &modifiers, |modifier, production| {
            modifier.applies(self.baseline.category, production)
        });
        Ok(())
    }

    /// 20. Controlling player: the owner, unless a control-transferring spell
    /// cast by someone else is still on the unit.
    pub(super) fn resolve_controller(&mut self) -> Result<(), ExpandError> {
        let Some(id) = self.unit.id else {
            return Ok(());
        };

        for spell in self.env.world().maintained_spells() {
            let Some(skill) = spell.granted_skill.as_ref().filter(|_| spell.targets(id)) else {
                continue;
            };
            if spell.cast_by != self.baseline.owner
                && self.breakdown.contains(skill)
                && self.env.skill(skill)?.transfers_control
            {
                self.controller = spell.cast_by;
                break;
            }
        }
        Ok(())
    }
}

/// Applies summed percentage reductions per production type, capped at 100%.
fn reduced_upkeep(
    base: &BTreeMap<ProductionTypeId, i32>,
    modifiers: &[&UpkeepModifier],
    applies: impl Fn(&UpkeepModifier, &ProductionTypeId) -> bool,
) -> BTreeMap<ProductionTypeId, i32> {
    base.iter()
        .map(|(production, amount)| {
            let percent: i32 = modifiers
                .iter()
                .filter(|&&modifier| applies(modifier, production))
                .map(|modifier| modifier.percent_reduction)
                .sum();
            let percent = percent.clamp(0, 100);
            (production.clone(), amount - amount * percent / 100)
        })
        .collect()
}
