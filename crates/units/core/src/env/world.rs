use crate::state::{ActiveZoneEffect, MaintainedSpell, MapLocation, UnitInstance};

/// Live world knowledge, read once per calculation.
///
/// Callers must not mutate the backing store while an expansion is running.
pub trait WorldOracle: Send + Sync {
    /// Every unit currently on the map, in any order.
    fn units(&self) -> &[UnitInstance];

    fn maintained_spells(&self) -> &[MaintainedSpell];

    fn zone_effects(&self) -> &[ActiveZoneEffect];

    fn terrain(&self, location: MapLocation) -> Option<TerrainKind>;
}

/// Overland terrain classes the engine cares about.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainKind {
    Land,
    Shore,
    Ocean,
}

impl TerrainKind {
    /// Cells where ships sail.
    pub fn is_water(self) -> bool {
        matches!(self, TerrainKind::Ocean)
    }
}
