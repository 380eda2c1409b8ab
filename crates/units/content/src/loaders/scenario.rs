//! World and roster scenario loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use units_core::{RosterSnapshot, WorldSnapshot};

use crate::loaders::{LoadResult, read_file};

/// A world knowledge snapshot and the roster it refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub world: WorldSnapshot,
    pub roster: RosterSnapshot,
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;

        tracing::debug!(
            units = scenario.world.units.len(),
            spells = scenario.world.maintained_spells.len(),
            players = scenario.roster.players.len(),
            "scenario parsed"
        );

        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units_core::{
        MapLocation, PlayerId, RosterOracle, SkillId, TerrainKind, UnitId, WorldOracle,
    };

    #[test]
    fn parses_world_and_roster() {
        let scenario = ScenarioLoader::parse(
            r#"
            (
                world: (
                    units: [
                        (
                            id: Some(1),
                            definition: "Trireme",
                            owner: 1,
                            location: Some((x: 3, y: 4, plane: 0)),
                            skills: { "Movement": Some(2) },
                        ),
                    ],
                    maintained_spells: [(spell: "WindMastery", cast_by: 1)],
                    terrain: [(location: (x: 3, y: 4, plane: 0), terrain: Ocean)],
                ),
                roster: (players: [(id: 1, picks: { "Warlord": 1 })]),
            )
            "#,
        )
        .unwrap();

        let world = &scenario.world;
        assert_eq!(world.units()[0].id, Some(UnitId(1)));
        assert_eq!(world.units()[0].skills[&SkillId::from("Movement")], Some(2));
        assert_eq!(world.maintained_spells()[0].unit, None);
        assert_eq!(
            world.terrain(MapLocation::new(3, 4, 0)),
            Some(TerrainKind::Ocean)
        );
        assert!(scenario.roster.player(PlayerId(1)).is_some());
    }

    #[test]
    fn empty_scenario_is_valid() {
        let scenario = ScenarioLoader::parse("()").unwrap();
        assert_eq!(scenario, Scenario::default());
    }
}
