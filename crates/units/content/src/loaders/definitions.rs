//! Static definition loader.

use std::path::Path;

use units_core::{DefinitionIndex, DefinitionSet};

use crate::loaders::{LoadResult, read_file};

/// Loader for the definition index from RON files.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Load and validate a [`DefinitionSet`] from a RON file.
    pub fn load(path: &Path) -> LoadResult<DefinitionIndex> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid definitions in {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<DefinitionIndex> {
        let set: DefinitionSet = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse definitions RON: {}", e))?;

        tracing::debug!(
            units = set.units.len(),
            skills = set.skills.len(),
            zone_effects = set.zone_effects.len(),
            "definitions parsed"
        );

        let index = DefinitionIndex::build(set)?;
        Ok(index)
    }
}
