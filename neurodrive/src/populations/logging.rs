use super::Population;

use crate::{Agent, Controller, Genome};

use std::fmt;

/// Defines different possible reporting levels for logging.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones every agent's genome.
    AllGenomes,
    /// Clones only the generation's fittest genome.
    GenerationChampion,
    /// Clones no genomes.
    NoGenomes,
}

/// A snapshot of a population, taken at the end of a generation.
#[derive(Clone, Debug)]
pub struct Log {
    pub generation_number: usize,
    pub generation_sample: GenerationMemberRecord,
    pub alive_count: usize,
    pub agent_stats: Vec<(String, Stats)>,
}

impl fmt::Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Log {{\n\
            \tgeneration_number: {:?}\n\
            \talive_count: {:?}\n\
            {}\
            }}",
            &self.generation_number,
            &self.alive_count,
            self.agent_stats
                .iter()
                .map(|(name, stats)| format!("\t{}: {:?}\n", name, stats))
                .collect::<Vec<_>>()
                .join("")
        )
    }
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f32,
    pub minimum: f32,
    pub mean: f32,
    pub median: f32,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    ///
    /// assert!(Stats::from(std::iter::empty()).is_none());
    /// ```
    pub fn from(data: impl Iterator<Item = f32>) -> Option<Stats> {
        let mut data: Vec<f32> = data.collect();
        if data.is_empty() {
            return None;
        }
        let (mut max, mut min, mut sum) = (f32::MIN, f32::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f32;
        data.sort_unstable_by(|a, b| a.total_cmp(b));
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Some(Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        })
    }
}

/// A reporting-level dependant store
/// of genomes from a population.
#[derive(Clone, Debug)]
pub enum GenerationMemberRecord {
    /// Every agent's genome and fitness, in agent order.
    AllGenomes(Vec<(Genome, f32)>),
    /// Only the fittest genome and its fitness.
    GenerationChampion(Genome, f32),
    /// Empty.
    None,
}

/// A log of the evolution of a population over time.
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    logs: Vec<Log>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::logging::{EvolutionLogger, ReportingLevel};
    ///
    /// let logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
    /// assert_eq!(logger.iter().count(), 0);
    /// ```
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            logs: vec![],
        }
    }

    /// Store a snapshot of a population. Meant to be called
    /// once per generation, after extinction and before
    /// [`Population::evolve`].
    ///
    /// The `agent_stat_extractor` provides a way of
    /// obtaining arbitrary statistics on the population,
    /// where each statistic is named by `stat_names`.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::logging::{EvolutionLogger, ReportingLevel};
    /// use neurodrive::{GeneticConfig, Population, PopulationConfig, SimulationConfig};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let mut logger = EvolutionLogger::new(ReportingLevel::GenerationChampion);
    /// let population = Population::<DenseNetwork>::new(
    ///     PopulationConfig::zero(),
    ///     GeneticConfig::zero(),
    ///     SimulationConfig::default(),
    ///     Topology::default(),
    /// )
    /// .unwrap();
    ///
    /// // Run the generation... Then log a snapshot.
    /// logger.log(&population, &|a| [a.fitness()], ["fitness"]);
    /// assert_eq!(logger.iter().count(), 1);
    /// ```
    pub fn log<C, ASE, const N: usize>(
        &mut self,
        population: &Population<C>,
        agent_stat_extractor: &ASE,
        stat_names: [&str; N],
    ) where
        C: Controller,
        ASE: Fn(&Agent<C>) -> [f32; N],
    {
        let stats: Vec<[f32; N]> = population.agents().map(agent_stat_extractor).collect();
        let agent_stats = stat_names
            .iter()
            .cloned()
            .map(String::from)
            .zip(unzip_n_vecs(stats.into_iter()))
            .filter_map(|(name, data)| Stats::from(data.into_iter()).map(|s| (name, s)))
            .collect();
        self.logs.push(Log {
            generation_number: population.generation(),
            generation_sample: match self.reporting_level {
                ReportingLevel::AllGenomes => GenerationMemberRecord::AllGenomes(
                    population
                        .agents()
                        .map(|a| (a.genome(), a.fitness()))
                        .collect(),
                ),
                ReportingLevel::GenerationChampion => match population.fittest_agent() {
                    Some(a) => GenerationMemberRecord::GenerationChampion(a.genome(), a.fitness()),
                    None => GenerationMemberRecord::None,
                },
                ReportingLevel::NoGenomes => GenerationMemberRecord::None,
            },
            alive_count: population.alive_count(),
            agent_stats,
        })
    }

    /// Iterate over all logged snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &Log> {
        self.logs.iter()
    }

    /// Returns the most recent snapshot, if any.
    pub fn last(&self) -> Option<&Log> {
        self.logs.last()
    }
}

fn unzip_n_vecs<T: Clone, const N: usize>(iter: impl Iterator<Item = [T; N]>) -> Vec<Vec<T>> {
    let mut vecs = vec![Vec::default(); N];
    for items in iter {
        for (vec, item) in vecs.iter_mut().zip(items) {
            vec.push(item);
        }
    }
    vecs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_length_median_averages_middle_pair() {
        let stats = Stats::from([4.0, 1.0, 3.0, 2.0].into_iter()).unwrap();
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.maximum, 4.0);
        assert_eq!(stats.minimum, 1.0);
    }

    #[test]
    fn unzip_splits_columns() {
        let columns = unzip_n_vecs(vec![[1, 2], [3, 4], [5, 6]].into_iter());
        assert_eq!(columns, vec![vec![1, 3, 5], vec![2, 4, 6]]);
    }
}
