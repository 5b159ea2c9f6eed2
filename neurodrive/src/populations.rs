//! A Population is a fixed-size cohort of agents.
//! It is driven tick by tick against obstacle snapshots
//! until every agent has died, at which point it can be
//! evolved into the next generation.
mod config;
mod errors;
pub mod logging;
mod offspring_factory;

pub use config::{PopulationConfig, Selection};
pub use errors::EvolutionError;
use offspring_factory::OffspringFactory;

use crate::agents::{Agent, SimulationConfig};
use crate::geometry::ObstacleSnapshot;
use crate::{ConfigurationError, Controller, GeneticConfig, Genome};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How a seed genome is distributed over a new population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedMode {
    /// Only the first agent carries the seed; the
    /// rest are randomly initialized. Used for replays.
    Single,
    /// Every agent carries the seed.
    All,
}

/// The best genome seen over the life of a population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub genome: Genome,
    pub fitness: f32,
    /// Generation during which the genome scored its fitness.
    pub generation: usize,
}

/// A population of agents driven by controllers of type `C`.
pub struct Population<C: Controller> {
    agents: Vec<Agent<C>>,
    generation: usize,
    champion: Option<Champion>,
    population_config: PopulationConfig,
    genetic_config: GeneticConfig,
    simulation_config: SimulationConfig,
    controller_config: C::Config,
    rng: StdRng,
}

impl<C: Controller> Population<C> {
    /// Creates a new population of randomly initialized agents.
    ///
    /// # Errors
    /// Returns an error if the controllers built from
    /// `controller_config` cannot be fed by the sensor fan
    /// (one input per ray) or produce fewer than 2 outputs,
    /// or if tournaments are set to pick from a single candidate.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::{GeneticConfig, Population, PopulationConfig, SimulationConfig};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let population = Population::<DenseNetwork>::new(
    ///     PopulationConfig {
    ///         size: std::num::NonZeroUsize::new(50).unwrap(),
    ///         ..PopulationConfig::default()
    ///     },
    ///     GeneticConfig::default(),
    ///     SimulationConfig::default(),
    ///     Topology::default(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(population.agents().count(), 50);
    /// assert_eq!(population.alive_count(), 50);
    /// assert_eq!(population.generation(), 0);
    /// ```
    pub fn new(
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        simulation_config: SimulationConfig,
        controller_config: C::Config,
    ) -> Result<Population<C>, ConfigurationError> {
        population_config.validate()?;
        let mut rng = match population_config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let agents = (0..population_config.size.get())
            .map(|_| Agent::new(C::new(&controller_config, &mut rng), &simulation_config))
            .collect::<Vec<_>>();
        if let Some(agent) = agents.first() {
            check_arity(agent.controller(), &simulation_config)?;
        }

        Ok(Population {
            agents,
            generation: 0,
            champion: None,
            population_config,
            genetic_config,
            simulation_config,
            controller_config,
            rng,
        })
    }

    /// Creates a new population where one or all agents,
    /// depending on `mode`, are driven by the controller
    /// encoded in `seed`.
    ///
    /// # Errors
    /// Returns an error if `seed` does not fit the controller
    /// topology, or for any of the reasons [`Population::new`] does.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::{
    ///     Controller, GeneticConfig, Genome, Population, PopulationConfig, SeedMode,
    ///     SimulationConfig,
    /// };
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let topology = Topology::default();
    /// let seed = Genome::zeros(DenseNetwork::genome_len(&topology));
    /// let population = Population::<DenseNetwork>::new_seeded(
    ///     &seed,
    ///     SeedMode::All,
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     SimulationConfig::default(),
    ///     topology,
    /// )
    /// .unwrap();
    ///
    /// assert!(population.agents().all(|a| a.genome() == seed));
    ///
    /// // Genomes that do not fit the topology are rejected.
    /// assert!(Population::<DenseNetwork>::new_seeded(
    ///     &Genome::zeros(3),
    ///     SeedMode::Single,
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     SimulationConfig::default(),
    ///     Topology::default(),
    /// )
    /// .is_err());
    /// ```
    pub fn new_seeded(
        seed: &Genome,
        mode: SeedMode,
        population_config: PopulationConfig,
        genetic_config: GeneticConfig,
        simulation_config: SimulationConfig,
        controller_config: C::Config,
    ) -> Result<Population<C>, ConfigurationError> {
        let expected = C::genome_len(&controller_config);
        if !seed.conforms_to(expected) {
            return Err(ConfigurationError::GenomeLength {
                expected,
                actual: seed.len(),
            });
        }

        let mut population = Population::new(
            population_config,
            genetic_config,
            simulation_config,
            controller_config,
        )?;
        let seeded = match mode {
            SeedMode::Single => 1,
            SeedMode::All => population.agents.len(),
        };
        for agent in &mut population.agents[..seeded] {
            agent.reinstantiate(seed, &population.simulation_config)?;
        }
        debug!(seeded, genome_len = seed.len(), "seeded population");

        Ok(population)
    }

    /// Advances every live agent by one tick.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::{ObstacleSnapshot, Rect};
    /// use neurodrive::{GeneticConfig, Population, PopulationConfig, SimulationConfig};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let mut population = Population::<DenseNetwork>::new(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     SimulationConfig::default(),
    ///     Topology::default(),
    /// )
    /// .unwrap();
    ///
    /// // An obstacle covering the whole arena kills everyone.
    /// let obstacles = vec![Rect::new(0.0, 0.0, 800.0, 600.0)];
    /// population.update(&ObstacleSnapshot::new(&obstacles));
    /// assert!(population.is_extinct());
    /// ```
    pub fn update(&mut self, snapshot: &ObstacleSnapshot<'_>) {
        let config = &self.simulation_config;
        for agent in &mut self.agents {
            agent.update(snapshot, config);
        }
    }

    /// Advances every live agent by one tick, spreading
    /// agents over rayon's thread pool.
    #[cfg(feature = "parallel")]
    pub fn par_update(&mut self, snapshot: &ObstacleSnapshot<'_>)
    where
        C: Send + Sync,
    {
        use rayon::prelude::*;

        let config = &self.simulation_config;
        self.agents
            .par_iter_mut()
            .for_each(|agent| agent.update(snapshot, config));
    }

    /// Returns the number of agents still alive.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_alive()).count()
    }

    /// Returns whether every agent has died.
    pub fn is_extinct(&self) -> bool {
        self.agents.iter().all(|a| !a.is_alive())
    }

    /// Produces the next generation from the current one:
    /// the top [elitism] genomes are carried over unchanged,
    /// and the rest are bred from the [fittest] agents,
    /// picked by the configured [selection] scheme.
    /// Every agent is then reset to the spawn point.
    ///
    /// Agents with a NaN fitness rank last.
    ///
    /// # Errors
    /// Returns an error if any agent is still alive, or if
    /// the offspring do not fit the controller topology. In
    /// either case the population is left untouched.
    ///
    /// [elitism]: PopulationConfig::elitism
    /// [fittest]: PopulationConfig::survival_threshold
    /// [selection]: PopulationConfig::selection
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::{ObstacleSnapshot, Rect};
    /// use neurodrive::{GeneticConfig, Population, PopulationConfig, SimulationConfig};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let mut population = Population::<DenseNetwork>::new(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     SimulationConfig::default(),
    ///     Topology::default(),
    /// )
    /// .unwrap();
    ///
    /// assert!(population.evolve().is_err());
    ///
    /// let obstacles = vec![Rect::new(0.0, 0.0, 800.0, 600.0)];
    /// while !population.is_extinct() {
    ///     population.update(&ObstacleSnapshot::new(&obstacles));
    /// }
    /// population.evolve().unwrap();
    ///
    /// assert_eq!(population.generation(), 1);
    /// assert_eq!(population.alive_count(), population.agents().count());
    /// ```
    pub fn evolve(&mut self) -> Result<(), EvolutionError> {
        let alive = self.alive_count();
        if alive > 0 {
            return Err(EvolutionError::NotExtinct { alive });
        }

        let ranked = self.rank_genomes();
        let offspring = OffspringFactory::new(
            &ranked,
            &self.genetic_config,
            &self.population_config,
            &mut self.rng,
        )
        .generate_offspring(self.agents.len());

        let expected = C::genome_len(&self.controller_config);
        if let Some(misfit) = offspring.iter().find(|g| !g.conforms_to(expected)) {
            return Err(ConfigurationError::GenomeLength {
                expected,
                actual: misfit.len(),
            }
            .into());
        }

        self.update_champion(&ranked);
        let (best, mean) = fitness_summary(&ranked);
        for (agent, genome) in self.agents.iter_mut().zip(&offspring) {
            agent.reinstantiate(genome, &self.simulation_config)?;
        }
        self.generation += 1;

        info!(
            generation = self.generation,
            best_fitness = best,
            mean_fitness = mean,
            "evolved population"
        );
        Ok(())
    }

    /// Returns every agent's genome and fitness,
    /// sorted by decreasing fitness.
    fn rank_genomes(&self) -> Vec<(Genome, f32)> {
        let mut ranked: Vec<(Genome, f32)> = self
            .agents
            .iter()
            .map(|a| (a.genome(), a.fitness()))
            .collect();
        ranked.sort_by(|(_, f1), (_, f2)| rank_key(*f2).total_cmp(&rank_key(*f1)));
        ranked
    }

    /// Replaces the champion if the generation's best beat it.
    fn update_champion(&mut self, ranked: &[(Genome, f32)]) {
        let (genome, fitness) = match ranked.first() {
            Some((genome, fitness)) if !fitness.is_nan() => (genome, *fitness),
            _ => return,
        };
        if self
            .champion
            .as_ref()
            .map_or(true, |champion| fitness > champion.fitness)
        {
            self.champion = Some(Champion {
                genome: genome.clone(),
                fitness,
                generation: self.generation,
            });
        }
    }

    /// Replaces every agent's controller with a freshly
    /// randomized one, and restarts the generation count.
    /// The champion is forgotten. Useful when a run has
    /// stagnated.
    pub fn reset(&mut self) {
        for agent in &mut self.agents {
            *agent = Agent::new(
                C::new(&self.controller_config, &mut self.rng),
                &self.simulation_config,
            );
        }
        self.generation = 0;
        self.champion = None;
    }

    /// Returns the live agent with the highest fitness,
    /// or `None` if the population is extinct.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::ObstacleSnapshot;
    /// use neurodrive::{GeneticConfig, Population, PopulationConfig, SimulationConfig};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let mut population = Population::<DenseNetwork>::new(
    ///     PopulationConfig::default(),
    ///     GeneticConfig::default(),
    ///     SimulationConfig::default(),
    ///     Topology::default(),
    /// )
    /// .unwrap();
    /// population.update(&ObstacleSnapshot::empty());
    ///
    /// if let Some(best) = population.best_agent() {
    ///     assert!(best.is_alive());
    ///     assert!(population
    ///         .agents()
    ///         .filter(|a| a.is_alive())
    ///         .all(|a| a.fitness() <= best.fitness()));
    /// }
    /// ```
    pub fn best_agent(&self) -> Option<&Agent<C>> {
        self.agents
            .iter()
            .filter(|a| a.is_alive())
            .max_by(|a1, a2| rank_key(a1.fitness()).total_cmp(&rank_key(a2.fitness())))
    }

    /// Returns the agent with the highest fitness, dead or alive.
    pub fn fittest_agent(&self) -> Option<&Agent<C>> {
        self.agents
            .iter()
            .max_by(|a1, a2| rank_key(a1.fitness()).total_cmp(&rank_key(a2.fitness())))
    }

    /// Returns the best genome recorded by [`Population::evolve`]
    /// so far, if any.
    pub fn champion(&self) -> Option<&Champion> {
        self.champion.as_ref()
    }

    /// Returns an iterator over all agents, dead or alive.
    pub fn agents(&self) -> impl Iterator<Item = &Agent<C>> {
        self.agents.iter()
    }

    /// Returns the current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn simulation_config(&self) -> &SimulationConfig {
        &self.simulation_config
    }

    pub fn population_config(&self) -> &PopulationConfig {
        &self.population_config
    }

    pub fn genetic_config(&self) -> &GeneticConfig {
        &self.genetic_config
    }

    pub fn controller_config(&self) -> &C::Config {
        &self.controller_config
    }
}

/// Checks that a controller can be fed by the sensor fan
/// and drive an agent.
fn check_arity<C: Controller>(
    controller: &C,
    config: &SimulationConfig,
) -> Result<(), ConfigurationError> {
    if controller.input_count() != config.sensor_count() {
        return Err(ConfigurationError::SensorFan {
            sensors: config.sensor_count(),
            inputs: controller.input_count(),
        });
    }
    if controller.output_count() < 2 {
        return Err(ConfigurationError::OutputCount {
            required: 2,
            actual: controller.output_count(),
        });
    }
    Ok(())
}

/// Total ordering key for fitness: NaN ranks below everything.
fn rank_key(fitness: f32) -> f32 {
    if fitness.is_nan() {
        f32::NEG_INFINITY
    } else {
        fitness
    }
}

/// Returns the best and mean fitness of a ranked generation.
fn fitness_summary(ranked: &[(Genome, f32)]) -> (f32, f32) {
    let best = ranked.first().map_or(f32::NAN, |(_, f)| *f);
    let mean = ranked.iter().map(|(_, f)| *f).sum::<f32>() / ranked.len().max(1) as f32;
    (best, mean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::test_utils::{ConstantConfig, ConstantController};

    use std::num::NonZeroUsize;

    const ARENA: [Rect; 1] = [Rect::new(0.0, 0.0, 800.0, 600.0)];

    fn population_config(size: usize, elitism: usize) -> PopulationConfig {
        PopulationConfig {
            size: NonZeroUsize::new(size).unwrap(),
            elitism,
            survival_threshold: 0.5,
            seed: Some(7),
            ..PopulationConfig::default()
        }
    }

    fn controller_config() -> ConstantConfig {
        ConstantConfig {
            inputs: SimulationConfig::default().sensor_count(),
            outputs: 2,
        }
    }

    fn population(size: usize, elitism: usize) -> Population<ConstantController> {
        Population::new(
            population_config(size, elitism),
            GeneticConfig::default(),
            SimulationConfig::default(),
            controller_config(),
        )
        .unwrap()
    }

    fn extinguish(population: &mut Population<ConstantController>) {
        let mut ticks = 0;
        while !population.is_extinct() {
            population.update(&ObstacleSnapshot::new(&ARENA));
            ticks += 1;
            assert!(ticks < 10, "population failed to die out");
        }
    }

    #[test]
    fn covering_obstacle_causes_extinction() {
        let mut population = population(20, 1);
        assert_eq!(population.alive_count(), 20);
        extinguish(&mut population);
        assert_eq!(population.alive_count(), 0);
        assert!(population.best_agent().is_none());
        // Stays extinct until evolution.
        population.update(&ObstacleSnapshot::empty());
        assert!(population.is_extinct());
    }

    #[test]
    fn evolving_live_population_fails() {
        let mut population = population(5, 1);
        assert_eq!(
            population.evolve(),
            Err(EvolutionError::NotExtinct { alive: 5 })
        );
        assert_eq!(population.generation(), 0);
    }

    #[test]
    fn generation_increases_by_one_per_evolution() {
        let mut population = population(10, 1);
        for generation in 1..=5 {
            extinguish(&mut population);
            population.evolve().unwrap();
            assert_eq!(population.generation(), generation);
            assert_eq!(population.alive_count(), 10);
            assert!(population.agents().all(|a| a.fitness() == 0.0));
        }
    }

    #[test]
    fn elite_genome_survives_evolution() {
        let mut population = Population::<ConstantController>::new(
            population_config(30, 1),
            GeneticConfig {
                gene_mutation_chance: 1.0,
                ..GeneticConfig::default()
            },
            SimulationConfig::default(),
            controller_config(),
        )
        .unwrap();
        extinguish(&mut population);
        let best = population.fittest_agent().unwrap();
        let (best_genome, best_fitness) = (best.genome(), best.fitness());

        population.evolve().unwrap();

        assert!(population.agents().any(|a| a.genome() == best_genome));
        let champion = population.champion().unwrap();
        assert_eq!(champion.genome, best_genome);
        assert_eq!(champion.fitness, best_fitness);
        assert_eq!(champion.generation, 0);
    }

    #[test]
    fn failed_evolution_leaves_population_untouched() {
        let mut population = population(10, 1);
        extinguish(&mut population);
        let before: Vec<(Genome, f32)> = population
            .agents()
            .map(|a| (a.genome(), a.fitness()))
            .collect();
        population.controller_config.outputs = 3;

        assert_eq!(
            population.evolve(),
            Err(EvolutionError::Configuration(
                ConfigurationError::GenomeLength {
                    expected: 3,
                    actual: 2
                }
            ))
        );
        let after: Vec<(Genome, f32)> = population
            .agents()
            .map(|a| (a.genome(), a.fitness()))
            .collect();
        assert_eq!(after, before);
        assert!(population.is_extinct());
        assert_eq!(population.generation(), 0);
        assert!(population.champion().is_none());
    }

    #[test]
    fn single_candidate_tournaments_are_rejected() {
        let result = Population::<ConstantController>::new(
            PopulationConfig {
                selection: Selection::Tournament {
                    size: NonZeroUsize::MIN,
                },
                ..population_config(10, 1)
            },
            GeneticConfig::default(),
            SimulationConfig::default(),
            controller_config(),
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::TournamentSize { size: 1 })
        );
    }

    #[test]
    fn seeding_single_or_all() {
        let seed = Genome::new(vec![0.25, 0.75]);
        let single = Population::<ConstantController>::new_seeded(
            &seed,
            SeedMode::Single,
            population_config(10, 1),
            GeneticConfig::default(),
            SimulationConfig::default(),
            controller_config(),
        )
        .unwrap();
        let seeded: Vec<bool> = single.agents().map(|a| a.genome() == seed).collect();
        assert!(seeded[0]);
        assert!(!seeded[1..].iter().all(|s| *s));

        let all = Population::<ConstantController>::new_seeded(
            &seed,
            SeedMode::All,
            population_config(10, 1),
            GeneticConfig::default(),
            SimulationConfig::default(),
            controller_config(),
        )
        .unwrap();
        assert!(all.agents().all(|a| a.genome() == seed));
    }

    #[test]
    fn seed_of_wrong_length_is_rejected() {
        let result = Population::<ConstantController>::new_seeded(
            &Genome::zeros(5),
            SeedMode::All,
            population_config(10, 1),
            GeneticConfig::default(),
            SimulationConfig::default(),
            controller_config(),
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::GenomeLength {
                expected: 2,
                actual: 5
            })
        );
    }

    #[test]
    fn controller_must_fit_sensor_fan() {
        let result = Population::<ConstantController>::new(
            population_config(3, 0),
            GeneticConfig::default(),
            SimulationConfig::default(),
            ConstantConfig {
                inputs: 3,
                outputs: 2,
            },
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::SensorFan {
                sensors: 8,
                inputs: 3
            })
        );

        let result = Population::<ConstantController>::new(
            population_config(3, 0),
            GeneticConfig::default(),
            SimulationConfig::default(),
            ConstantConfig {
                inputs: 8,
                outputs: 1,
            },
        );
        assert_eq!(
            result.err(),
            Some(ConfigurationError::OutputCount {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn best_agent_is_fittest_live_agent() {
        let mut population = population(25, 1);
        for _ in 0..3 {
            population.update(&ObstacleSnapshot::empty());
        }
        let best = population.best_agent().unwrap();
        assert!(best.is_alive());
        assert!(population
            .agents()
            .filter(|a| a.is_alive())
            .all(|a| a.fitness() <= best.fitness()));
    }

    #[test]
    fn nan_fitness_ranks_last() {
        assert!(rank_key(f32::NAN) < rank_key(-1e30));
        assert_eq!(rank_key(3.0), 3.0);
    }

    #[test]
    fn reset_restarts_generations() {
        let mut population = population(10, 1);
        extinguish(&mut population);
        population.evolve().unwrap();
        population.reset();
        assert_eq!(population.generation(), 0);
        assert!(population.champion().is_none());
        assert_eq!(population.alive_count(), 10);
    }
}
