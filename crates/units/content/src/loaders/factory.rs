//! Content factory for building engine inputs from data files.

use std::path::{Path, PathBuf};

use units_core::{DefinitionIndex, EngineConfig};

use crate::loaders::{ConfigLoader, DefinitionLoader, LoadResult, Scenario, ScenarioLoader};

/// Content factory that loads all engine content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── engine.toml
/// ├── definitions.ron
/// └── scenarios/
///     ├── river_crossing.ron
///     └── siege.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `engine.toml`, or the defaults if the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("engine.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(EngineConfig::default())
        }
    }

    /// Load and validate the definition index from `definitions.ron`.
    pub fn load_definitions(&self) -> LoadResult<DefinitionIndex> {
        let path = self.data_dir.join("definitions.ron");
        DefinitionLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
