//! Genomes are the unit of heredity: a fixed-length vector
//! holding every parameter of one controller, in a stable order
//! defined by the controller's topology.
//!
//! Genomes are opaque to the genetic algorithm. They are
//! recombined and mutated gene-by-gene, and are handed back
//! to controllers to be decoded.

mod config;

pub use config::GeneticConfig;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use std::fmt;

/// A fixed-length vector of real-valued genes.
///
/// Serializes as a plain sequence of numbers, for
/// convenient saving and loading.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome {
    genes: Box<[f32]>,
}

impl Genome {
    /// Creates a genome from a vector of genes.
    /// The genome's length is fixed from here on.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::Genome;
    ///
    /// let genome = Genome::new(vec![0.5, -1.0, 2.0]);
    /// assert_eq!(genome.len(), 3);
    /// assert_eq!(genome.genes(), &[0.5, -1.0, 2.0]);
    /// ```
    pub fn new(genes: Vec<f32>) -> Genome {
        Genome {
            genes: genes.into_boxed_slice(),
        }
    }

    /// Returns a genome of `len` zero-valued genes.
    pub fn zeros(len: usize) -> Genome {
        Genome::new(vec![0.0; len])
    }

    /// Returns the number of genes in the genome.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns the genome's genes, in their stable order.
    pub fn genes(&self) -> &[f32] {
        &self.genes
    }

    /// Returns whether the genome has exactly `len` genes.
    pub fn conforms_to(&self, len: usize) -> bool {
        self.genes.len() == len
    }

    /// Combines two genomes and returns a child genome.
    ///
    /// Each of the child's genes is either the average of the
    /// parents' genes, with a [`mate_by_averaging_chance`] probability,
    /// or a copy of a randomly chosen parent's gene.
    ///
    /// [`mate_by_averaging_chance`]: GeneticConfig::mate_by_averaging_chance
    ///
    /// # Panics
    /// This function will panic if the parents are of
    /// different lengths.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::{GeneticConfig, Genome};
    ///
    /// let mother = Genome::new(vec![0.0; 16]);
    /// let father = Genome::new(vec![1.0; 16]);
    /// let config = GeneticConfig::zero();
    ///
    /// let child = mother.mate_with(&father, &config, &mut rand::thread_rng());
    /// assert_eq!(child.len(), 16);
    /// assert!(child.genes().iter().all(|g| *g == 0.0 || *g == 1.0));
    /// ```
    pub fn mate_with<R: Rng + ?Sized>(
        &self,
        other: &Genome,
        config: &GeneticConfig,
        rng: &mut R,
    ) -> Genome {
        assert_eq!(
            self.len(),
            other.len(),
            "attempted to mate genomes of different lengths"
        );
        self.genes
            .iter()
            .zip(other.genes.iter())
            .map(|(a, b)| {
                if rng.gen::<f32>() < config.mate_by_averaging_chance {
                    (a + b) / 2.0
                } else if rng.gen::<bool>() {
                    *a
                } else {
                    *b
                }
            })
            .collect()
    }

    /// Mutates each gene with a [`gene_mutation_chance`] probability,
    /// by adding Gaussian noise with a standard deviation of
    /// [`mutation_power`]. The noise is clamped to ±[`mutation_bound`],
    /// and the mutated gene to ±[`weight_bound`].
    ///
    /// [`gene_mutation_chance`]: GeneticConfig::gene_mutation_chance
    /// [`mutation_power`]: GeneticConfig::mutation_power
    /// [`mutation_bound`]: GeneticConfig::mutation_bound
    /// [`weight_bound`]: GeneticConfig::weight_bound
    ///
    /// # Examples
    /// ```
    /// use neurodrive::{GeneticConfig, Genome};
    ///
    /// let mut genome = Genome::zeros(100);
    /// genome.mutate(
    ///     &GeneticConfig {
    ///         gene_mutation_chance: 1.0,
    ///         mutation_power: 1.0,
    ///         mutation_bound: 0.5,
    ///         weight_bound: 5.0,
    ///         ..GeneticConfig::zero()
    ///     },
    ///     &mut rand::thread_rng(),
    /// );
    /// assert!(genome.genes().iter().all(|g| g.abs() <= 0.5));
    /// ```
    pub fn mutate<R: Rng + ?Sized>(&mut self, config: &GeneticConfig, rng: &mut R) {
        if config.gene_mutation_chance <= 0.0 {
            return;
        }
        let noise = match Normal::new(0.0f32, config.mutation_power.abs()) {
            Ok(noise) => noise,
            Err(_) => return,
        };
        let mutation_bound = config.mutation_bound.abs();
        let weight_bound = config.weight_bound.abs();
        for gene in self.genes.iter_mut() {
            if rng.gen::<f32>() < config.gene_mutation_chance {
                let delta = noise.sample(rng).clamp(-mutation_bound, mutation_bound);
                *gene = (*gene + delta).clamp(-weight_bound, weight_bound);
            }
        }
    }
}

impl From<Vec<f32>> for Genome {
    fn from(genes: Vec<f32>) -> Self {
        Genome::new(genes)
    }
}

impl FromIterator<f32> for Genome {
    fn from_iter<I: IntoIterator<Item = f32>>(iter: I) -> Self {
        Genome::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genome[{}] [", self.len())?;
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", gene)?;
        }
        write!(f, "]")
    }
}
