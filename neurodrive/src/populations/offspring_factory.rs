use super::{PopulationConfig, Selection};
use crate::{GeneticConfig, Genome};

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use std::num::NonZeroUsize;

/// Auxiliary type for offspring generation.
/// Handles all the tasks of generating the next
/// generation's genomes from the current one,
/// ranked by decreasing fitness.
pub(super) struct OffspringFactory<'a, R: Rng> {
    ranked: &'a [(Genome, f32)],
    genetic_config: &'a GeneticConfig,
    population_config: &'a PopulationConfig,
    rng: &'a mut R,
}

impl<'a, R: Rng> OffspringFactory<'a, R> {
    pub(super) fn new(
        ranked: &'a [(Genome, f32)],
        genetic_config: &'a GeneticConfig,
        population_config: &'a PopulationConfig,
        rng: &'a mut R,
    ) -> OffspringFactory<'a, R> {
        OffspringFactory {
            ranked,
            genetic_config,
            population_config,
            rng,
        }
    }

    /// Generate `count` offspring genomes: the elite first,
    /// in rank order, then the mated offspring.
    pub(super) fn generate_offspring(&mut self, count: usize) -> Vec<Genome> {
        let elite = self
            .population_config
            .elitism
            .min(count)
            .min(self.ranked.len());
        let mut offspring = Vec::with_capacity(count);

        self.add_elite(&mut offspring, elite);
        self.add_mated_offspring(&mut offspring, count - elite);

        offspring
    }

    /// Copy the top "elite" genomes, unmutated.
    fn add_elite(&self, offspring: &mut Vec<Genome>, elite: usize) {
        offspring.extend(self.ranked[..elite].iter().map(|(g, _)| g.clone()));
    }

    /// Select parents from the mating pool and mate them,
    /// mutating each child.
    fn add_mated_offspring(&mut self, offspring: &mut Vec<Genome>, count: usize) {
        let ranked = self.ranked;
        let eligible_parents = &ranked[..self.count_survivors()];
        let wheel = match self.population_config.selection {
            Selection::Roulette => WeightedIndex::new(roulette_weights(eligible_parents)).ok(),
            Selection::Tournament { .. } => None,
        };

        for _ in 0..count {
            let parent1 = self.select_parent(eligible_parents, wheel.as_ref());
            let parent2 = self.select_parent(eligible_parents, wheel.as_ref());
            let mut child = parent1.mate_with(parent2, self.genetic_config, &mut *self.rng);
            child.mutate(self.genetic_config, &mut *self.rng);
            offspring.push(child);
        }
    }

    /// Pick a parent according to the configured selection scheme.
    /// A degenerate roulette wheel (e.g., all fitnesses NaN) falls
    /// back to binary tournaments.
    fn select_parent(
        &mut self,
        eligible_parents: &'a [(Genome, f32)],
        wheel: Option<&WeightedIndex<f64>>,
    ) -> &'a Genome {
        let index = match (self.population_config.selection, wheel) {
            (Selection::Roulette, Some(wheel)) => wheel.sample(&mut *self.rng),
            (Selection::Tournament { size }, _) => self.tournament(eligible_parents.len(), size),
            (Selection::Roulette, None) => {
                self.tournament(eligible_parents.len(), NonZeroUsize::MIN.saturating_add(1))
            }
        };
        &eligible_parents[index].0
    }

    /// Returns the best of `size` uniformly drawn ranks.
    /// Since candidates are sorted by decreasing fitness,
    /// the lowest rank is the fittest.
    fn tournament(&mut self, candidates: usize, size: NonZeroUsize) -> usize {
        (0..size.get())
            .map(|_| self.rng.gen_range(0..candidates))
            .min()
            .unwrap_or(0)
    }

    /// Number of top-ranked genomes allowed to mate.
    fn count_survivors(&self) -> usize {
        let len = self.ranked.len();
        ((len as f32 * self.population_config.survival_threshold).ceil() as usize).clamp(1, len)
    }
}

/// Roulette weights: fitness offset by the pool's minimum, plus
/// a small floor so that every finite candidate can be picked.
/// Candidates with non-finite fitness get no weight.
fn roulette_weights(candidates: &[(Genome, f32)]) -> Vec<f64> {
    const FLOOR: f64 = 1e-3;
    let min = candidates
        .iter()
        .map(|(_, f)| *f)
        .filter(|f| f.is_finite())
        .fold(f32::INFINITY, f32::min);
    candidates
        .iter()
        .map(|(_, f)| {
            if f.is_finite() {
                (*f - min) as f64 + FLOOR
            } else {
                0.0
            }
        })
        .collect()
}
