use serde::{Deserialize, Serialize};

/// Configuration data for inter-genome operations
/// (crossover and mutation).
///
/// # Note
/// All quantities expressing probabilities
/// should be in the range [0.0, 1.0]. Using
/// values that are not in this bound may result
/// in odd behaviours and/or incorrect programs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Chance, per gene, that a child's gene is the
    /// average of both parents' genes instead of a
    /// copy of a randomly chosen parent's gene.
    pub mate_by_averaging_chance: f32,
    /// Chance, per gene, of a child's gene being mutated.
    pub gene_mutation_chance: f32,
    /// Standard deviation of the Gaussian noise added
    /// to a gene during mutation.
    pub mutation_power: f32,
    /// Maximum magnitude of the noise added to a gene
    /// in a single mutation.
    pub mutation_bound: f32,
    /// Maximum magnitude of a mutated gene.
    pub weight_bound: f32,
}

impl GeneticConfig {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::GeneticConfig;
    ///
    /// let cfg1 = GeneticConfig::zero();
    ///
    /// let cfg2 = GeneticConfig {
    ///     // Specify some values here...
    ///     gene_mutation_chance: 0.05,
    ///     mutation_power: 0.2,
    ///     // Default the rest...
    ///     ..GeneticConfig::zero()
    /// };
    /// ```
    pub const fn zero() -> GeneticConfig {
        GeneticConfig {
            mate_by_averaging_chance: 0.0,
            gene_mutation_chance: 0.0,
            mutation_power: 0.0,
            mutation_bound: 0.0,
            weight_bound: 0.0,
        }
    }
}

impl Default for GeneticConfig {
    /// Settings that work well for the classic arena.
    fn default() -> Self {
        GeneticConfig {
            mate_by_averaging_chance: 0.2,
            gene_mutation_chance: 0.1,
            mutation_power: 0.25,
            mutation_bound: 1.0,
            weight_bound: 5.0,
        }
    }
}
