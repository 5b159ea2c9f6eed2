use crate::obstacles::ObstacleConfig;

use neurodrive::{GeneticConfig, Genome, PopulationConfig, SimulationConfig};
use neurodrive_nn::Topology;

use anyhow::{Context, Result};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};

use std::fs;
use std::path::Path;

/// Every knob of a training run, as stored in a RON file.
/// Missing sections fall back to their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub population: PopulationConfig,
    pub genetic: GeneticConfig,
    pub simulation: SimulationConfig,
    pub topology: Topology,
    pub obstacles: ObstacleConfig,
}

impl Settings {
    /// Loads settings from `path`, or returns the
    /// defaults if no path is given.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings from {}", path.display()))?;
                ron::from_str(&text)
                    .with_context(|| format!("failed to parse settings in {}", path.display()))
            }
            None => Ok(Settings::default()),
        }
    }
}

pub fn load_genome(path: &Path) -> Result<Genome> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read genome from {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("failed to parse genome in {}", path.display()))
}

pub fn save_genome(path: &Path, genome: &Genome) -> Result<()> {
    let text = ron::ser::to_string_pretty(genome, PrettyConfig::new())
        .context("failed to serialize genome")?;
    fs::write(path, text).with_context(|| format!("failed to write genome to {}", path.display()))
}
