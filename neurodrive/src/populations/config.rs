use crate::ConfigurationError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for population generation
/// and evolution.
///
/// # Note
/// All quantities expressing probabilities or
/// fractions should be in the range [0.0, 1.0].
/// Using values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Size of the population.
    pub size: NonZeroUsize,
    /// Top n of the population which is copied
    /// as-is to the next generation.
    pub elitism: usize,
    /// Top % of the population which can participate
    /// in mating. At least one agent always can.
    pub survival_threshold: f32,
    /// How parents are picked from the mating pool.
    pub selection: Selection,
    /// Seed for the population's random number generator.
    /// If `None`, the generator is seeded from system entropy.
    pub seed: Option<u64>,
}

/// Fitness-weighted parent selection schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Draw `size` candidates (with replacement) and
    /// keep the fittest. `size` must be at least 2.
    Tournament { size: NonZeroUsize },
    /// Draw a candidate with probability proportional to
    /// its fitness, offset so that the least fit candidate
    /// retains a small chance.
    Roulette,
}

impl PopulationConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, empty, or in the case of
    /// `NonZeroUsize`s, 1. Tournaments are binary.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to abbreviate configuration
    /// instantiation, or to fill in unused values.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::PopulationConfig;
    ///
    /// let cfg1 = PopulationConfig::zero();
    ///
    /// let cfg2 = PopulationConfig {
    ///     // Specify some values here...
    ///     elitism: 2,
    ///     seed: Some(42),
    ///     // Default the rest...
    ///     ..PopulationConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::MIN,
            elitism: 0,
            survival_threshold: 0.0,
            selection: Selection::Tournament {
                size: NonZeroUsize::MIN.saturating_add(1),
            },
            seed: None,
        }
    }

    /// Checks that parent selection favours fitter genomes.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.selection {
            Selection::Tournament { size } if size.get() < 2 => {
                Err(ConfigurationError::TournamentSize { size: size.get() })
            }
            _ => Ok(()),
        }
    }
}

impl Default for PopulationConfig {
    /// A 300-agent population with a small elite and
    /// 3-way tournaments over the top half.
    fn default() -> Self {
        PopulationConfig {
            size: NonZeroUsize::new(300).unwrap_or(NonZeroUsize::MIN),
            elitism: 2,
            survival_threshold: 0.5,
            selection: Selection::Tournament {
                size: NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN),
            },
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_candidate_tournaments_are_invalid() {
        let config = PopulationConfig {
            selection: Selection::Tournament {
                size: NonZeroUsize::MIN,
            },
            ..PopulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::TournamentSize { size: 1 })
        );
    }

    #[test]
    fn provided_configs_are_valid() {
        assert_eq!(PopulationConfig::zero().validate(), Ok(()));
        assert_eq!(PopulationConfig::default().validate(), Ok(()));
        let roulette = PopulationConfig {
            selection: Selection::Roulette,
            ..PopulationConfig::zero()
        };
        assert_eq!(roulette.validate(), Ok(()));
    }
}
