//! Working skill set stages: grants, negation, realm resolution.

use std::collections::BTreeSet;

use crate::env::{Env, NegatedBy, SkillDefinition};
use crate::state::{MagicRealmId, SkillId, SkillValues};
use crate::stats::baseline::StackSkills;
use crate::stats::error::ExpandError;

/// Adds every skill reachable through skill-grants-skill edges.
///
/// Granted skills enter valueless; a skill the unit already has keeps its
/// value. Every skill visited must have a definition.
pub(super) fn close_grants(skills: &mut SkillValues, env: Env<'_>) -> Result<(), ExpandError> {
    let roots: Vec<SkillId> = skills.keys().cloned().collect();
    let mut done = BTreeSet::new();
    let mut on_path = BTreeSet::new();

    for root in roots {
        visit(&root, skills, env, &mut done, &mut on_path)?;
    }
    Ok(())
}

fn visit(
    skill: &SkillId,
    skills: &mut SkillValues,
    env: Env<'_>,
    done: &mut BTreeSet<SkillId>,
    on_path: &mut BTreeSet<SkillId>,
) -> Result<(), ExpandError> {
    if done.contains(skill) {
        return Ok(());
    }
    if !on_path.insert(skill.clone()) {
        return Err(ExpandError::CyclicSkillGrant(skill.clone()));
    }

    for granted in &env.skill(skill)?.grants {
        skills.entry(granted.clone()).or_insert(None);
        visit(granted, skills, env, done, on_path)?;
    }

    on_path.remove(skill);
    done.insert(skill.clone());
    Ok(())
}

/// Whether any negation condition of `definition` holds.
pub(super) fn is_negated(
    definition: &SkillDefinition,
    has_own: impl Fn(&SkillId) -> bool,
    enemies: &StackSkills,
) -> bool {
    definition.negated_by.iter().any(|negation| match negation.by {
        NegatedBy::OwnUnit => has_own(&negation.skill),
        NegatedBy::EnemyUnit => enemies.contains(&negation.skill),
    })
}

/// Skills in `skills` whose negation conditions hold, judged against the
/// set as it stands before any removal.
pub(super) fn negated_skills(
    skills: &SkillValues,
    enemies: &StackSkills,
    env: Env<'_>,
) -> Result<Vec<SkillId>, ExpandError> {
    let mut negated = Vec::new();
    for skill in skills.keys() {
        let definition = env.skill(skill)?;
        if is_negated(definition, |other| skills.contains_key(other), enemies) {
            negated.push(skill.clone());
        }
    }
    Ok(negated)
}

/// First skill in declaration order that overrides the realm, if the unit
/// has one.
pub(super) fn realm_override(skills: &SkillValues, env: Env<'_>) -> Option<MagicRealmId> {
    env.definitions()
        .skills()
        .iter()
        .filter(|definition| skills.contains_key(&definition.id))
        .find_map(|definition| definition.realm_override.clone())
}
