//! Owned, serializable implementations of the world and roster oracles.
//!
//! Scenario files, tests and tools build these directly; a live game would
//! implement [`WorldOracle`] and [`RosterOracle`] over its own stores instead.

use super::{RosterOracle, TerrainKind, WorldOracle};
use crate::state::{
    ActiveZoneEffect, MaintainedSpell, MapLocation, PlayerId, PlayerRecord, UnitInstance,
};

/// Terrain of a single overland cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainCell {
    pub location: MapLocation,
    pub terrain: TerrainKind,
}

/// Snapshot of world knowledge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldSnapshot {
    pub units: Vec<UnitInstance>,
    pub maintained_spells: Vec<MaintainedSpell>,
    pub zone_effects: Vec<ActiveZoneEffect>,
    /// Cells not listed are unknown terrain.
    pub terrain: Vec<TerrainCell>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: UnitInstance) -> Self {
        self.units.push(unit);
        self
    }

    pub fn with_spell(mut self, spell: MaintainedSpell) -> Self {
        self.maintained_spells.push(spell);
        self
    }

    pub fn with_zone_effect(mut self, effect: ActiveZoneEffect) -> Self {
        self.zone_effects.push(effect);
        self
    }

    pub fn with_terrain(mut self, location: MapLocation, terrain: TerrainKind) -> Self {
        self.terrain.retain(|cell| cell.location != location);
        self.terrain.push(TerrainCell { location, terrain });
        self
    }
}

impl WorldOracle for WorldSnapshot {
    fn units(&self) -> &[UnitInstance] {
        &self.units
    }

    fn maintained_spells(&self) -> &[MaintainedSpell] {
        &self.maintained_spells
    }

    fn zone_effects(&self) -> &[ActiveZoneEffect] {
        &self.zone_effects
    }

    fn terrain(&self, location: MapLocation) -> Option<TerrainKind> {
        self.terrain
            .iter()
            .find(|cell| cell.location == location)
            .map(|cell| cell.terrain)
    }
}

/// Snapshot of the player roster.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RosterSnapshot {
    pub players: Vec<PlayerRecord>,
}

impl RosterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, player: PlayerRecord) -> Self {
        self.players.push(player);
        self
    }
}

impl RosterOracle for RosterSnapshot {
    fn player(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|player| player.id == id)
    }
}
