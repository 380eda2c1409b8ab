//! Records of world knowledge and the player roster.

use std::collections::BTreeMap;

use super::common::{MapLocation, PickId, PlayerId, SkillId, SpellId, UnitId, ZoneEffectId};

/// A spell that is currently in effect.
///
/// Spells cast on a unit grant it a skill; overland enchantments have no
/// target unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaintainedSpell {
    pub spell: SpellId,
    pub cast_by: PlayerId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: Option<UnitId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub granted_skill: Option<SkillId>,
    /// Strength of variable-strength spells, used as the granted skill's value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<i32>,
}

impl MaintainedSpell {
    /// An overland enchantment with no target.
    pub fn overland(spell: impl Into<SpellId>, cast_by: PlayerId) -> Self {
        Self {
            spell: spell.into(),
            cast_by,
            unit: None,
            granted_skill: None,
            value: None,
        }
    }

    /// A unit enchantment granting `skill` to `unit`.
    pub fn on_unit(
        spell: impl Into<SpellId>,
        cast_by: PlayerId,
        unit: UnitId,
        skill: impl Into<SkillId>,
    ) -> Self {
        Self {
            spell: spell.into(),
            cast_by,
            unit: Some(unit),
            granted_skill: Some(skill.into()),
            value: None,
        }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn targets(&self, unit: UnitId) -> bool {
        self.unit == Some(unit)
    }
}

/// A zone effect currently active somewhere (or everywhere).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveZoneEffect {
    pub effect: ZoneEffectId,
    /// `None` applies the effect everywhere.
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Option<MapLocation>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_by: Option<PlayerId>,
}

impl ActiveZoneEffect {
    pub fn global(effect: impl Into<ZoneEffectId>) -> Self {
        Self {
            effect: effect.into(),
            location: None,
            cast_by: None,
        }
    }

    pub fn at(mut self, location: MapLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn cast_by(mut self, player: PlayerId) -> Self {
        self.cast_by = Some(player);
        self
    }
}

/// Public record of a player.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRecord {
    pub id: PlayerId,
    /// Picks (retorts, spell books) and how many of each the player holds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub picks: BTreeMap<PickId, u8>,
}

impl PlayerRecord {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            picks: BTreeMap::new(),
        }
    }

    pub fn with_pick(mut self, pick: impl Into<PickId>, count: u8) -> Self {
        self.picks.insert(pick.into(), count);
        self
    }
}
