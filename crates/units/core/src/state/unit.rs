//! Live unit records as held in world knowledge.
//!
//! A [`UnitInstance`] is the mutable game-side record of a unit: which
//! definition it was built from, who owns it, where it stands and the raw
//! skill values it carries (including its experience). The engine only ever
//! reads these records.

use std::collections::BTreeMap;

use super::common::{MapLocation, PlayerId, SkillId, UnitId, UnitTypeId, WeaponGrade};

/// Raw skill values of a unit. `None` marks a valueless skill (a tag such as
/// a movement type) that is present but carries no magnitude.
pub type SkillValues = BTreeMap<SkillId, Option<i32>>;

/// One unit as known to the world, or a hypothetical unit for previews.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitInstance {
    /// `None` for hypothetical units that only exist for display purposes.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<UnitId>,
    pub definition: UnitTypeId,
    pub owner: PlayerId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<MapLocation>,
    /// Set while the unit takes part in a battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub combat: Option<CombatPlacement>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon_grade: Option<WeaponGrade>,
    pub skills: SkillValues,
    /// Total damage taken across all figures.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_taken: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hero_items: Vec<HeroItem>,
}

impl UnitInstance {
    /// Creates a hypothetical unit with no skills.
    pub fn new(definition: UnitTypeId, owner: PlayerId) -> Self {
        Self {
            id: None,
            definition,
            owner,
            location: None,
            combat: None,
            weapon_grade: None,
            skills: SkillValues::new(),
            damage_taken: 0,
            hero_items: Vec::new(),
        }
    }

    /// Returns true if the unit exists in world knowledge.
    ///
    /// Only persisted units can be targeted by spells, carry hero items or
    /// belong to a stack.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_in_combat(&self) -> bool {
        self.combat.is_some()
    }

    pub fn with_id(mut self, id: UnitId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn at(mut self, location: MapLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn in_combat(mut self, location: MapLocation, side: CombatSide) -> Self {
        self.combat = Some(CombatPlacement { location, side });
        self
    }

    pub fn with_weapon_grade(mut self, grade: WeaponGrade) -> Self {
        self.weapon_grade = Some(grade);
        self
    }

    pub fn with_skill(mut self, skill: impl Into<SkillId>, value: Option<i32>) -> Self {
        self.skills.insert(skill.into(), value);
        self
    }

    pub fn with_damage(mut self, damage_taken: i32) -> Self {
        self.damage_taken = damage_taken;
        self
    }

    pub fn with_item(mut self, item: HeroItem) -> Self {
        self.hero_items.push(item);
        self
    }
}

/// Where a unit stands inside a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatPlacement {
    /// Overland cell the battle is being fought over.
    pub location: MapLocation,
    pub side: CombatSide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatSide {
    Attacker,
    Defender,
}

/// An item equipped by a hero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroItem {
    pub name: String,
    pub bonuses: Vec<SkillGrant>,
}

impl HeroItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bonuses: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, skill: impl Into<SkillId>, value: Option<i32>) -> Self {
        self.bonuses.push(SkillGrant::new(skill, value));
        self
    }
}

/// A skill handed to a unit by something external to it (an item, a zone
/// effect). Valueless grants only add the skill; valued grants add to it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillGrant {
    pub skill: SkillId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<i32>,
}

impl SkillGrant {
    pub fn new(skill: impl Into<SkillId>, value: Option<i32>) -> Self {
        Self {
            skill: skill.into(),
            value,
        }
    }
}
