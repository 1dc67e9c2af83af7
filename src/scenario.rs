use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{Params, ParamsError};
use crate::world::World;

fn default_width() -> u32 {
    60
}

fn default_height() -> u32 {
    40
}

fn default_snapshot_interval_ticks() -> u64 {
    0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Tick count for headless runs. `None` falls back to the CLI default.
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Params(#[from] ParamsError),
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Reject configurations the engine is not defined over. Runs at load
    /// time so a bad file fails before any world exists.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.width == 0 || self.height == 0 {
            return Err(ScenarioError::Validation(format!(
                "grid dimensions must be nonzero, got {}x{}",
                self.width, self.height
            )));
        }
        self.params.validate()?;
        Ok(())
    }

    pub fn build_world(&self) -> World {
        World::new(self.width, self.height)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(500)
    }
}
