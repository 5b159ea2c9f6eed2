use crate::errors::ConfigurationError;
use crate::Genome;

use rand::RngCore;

/// An interface for the inference engines that drive agents.
///
/// A controller maps a sensor vector to an actuation vector, and
/// can be flattened to (and restored from) a [`Genome`] of a fixed
/// length determined by its configuration. Restoring a controller
/// from its own genome must leave [`forward`] observably unchanged.
///
/// [`forward`]: Controller::forward
pub trait Controller {
    type Config;

    /// Returns a controller with pseudo-randomly initialized parameters.
    fn new(config: &Self::Config, rng: &mut dyn RngCore) -> Self
    where
        Self: Sized;

    /// Returns a controller whose parameters are decoded from `genome`.
    ///
    /// # Errors
    /// Returns an error if the genome's length differs from
    /// [`Controller::genome_len`].
    fn from_genome(config: &Self::Config, genome: &Genome) -> Result<Self, ConfigurationError>
    where
        Self: Sized;

    /// Returns the genome length of any controller built from `config`.
    fn genome_len(config: &Self::Config) -> usize
    where
        Self: Sized;

    /// Returns the number of inputs expected by [`Controller::forward`].
    fn input_count(&self) -> usize;

    /// Returns the number of outputs produced by [`Controller::forward`].
    fn output_count(&self) -> usize;

    /// Computes the controller's outputs for the given inputs.
    /// Must be deterministic.
    ///
    /// # Errors
    /// Returns an error if `inputs.len() != self.input_count()`.
    fn forward(&self, inputs: &[f32]) -> Result<Vec<f32>, ConfigurationError>;

    /// Flattens the controller's parameters into a genome.
    fn genome(&self) -> Genome;

    /// Replaces the controller's parameters with those encoded in `genome`.
    ///
    /// # Errors
    /// Returns an error if the genome's length does not match
    /// the controller's; the controller is left untouched.
    fn set_genome(&mut self, genome: &Genome) -> Result<(), ConfigurationError>;
}
