//! Minimal controllers for exercising agents and
//! populations without a real network.

use crate::{ConfigurationError, Controller, Genome};

use rand::{Rng, RngCore};

#[derive(Clone, Debug)]
pub(crate) struct ConstantConfig {
    pub inputs: usize,
    pub outputs: usize,
}

/// Ignores its inputs and always answers with its genome.
#[derive(Clone, Debug)]
pub(crate) struct ConstantController {
    inputs: usize,
    outputs: Vec<f32>,
}

impl ConstantController {
    pub fn with_outputs(inputs: usize, outputs: &[f32]) -> ConstantController {
        ConstantController {
            inputs,
            outputs: outputs.to_vec(),
        }
    }
}

impl Controller for ConstantController {
    type Config = ConstantConfig;

    fn new(config: &ConstantConfig, rng: &mut dyn RngCore) -> Self {
        ConstantController {
            inputs: config.inputs,
            outputs: (0..config.outputs)
                .map(|_| rng.gen_range(-1.0..=1.0))
                .collect(),
        }
    }

    fn from_genome(config: &ConstantConfig, genome: &Genome) -> Result<Self, ConfigurationError> {
        if !genome.conforms_to(config.outputs) {
            return Err(ConfigurationError::GenomeLength {
                expected: config.outputs,
                actual: genome.len(),
            });
        }
        Ok(ConstantController::with_outputs(config.inputs, genome.genes()))
    }

    fn genome_len(config: &ConstantConfig) -> usize {
        config.outputs
    }

    fn input_count(&self) -> usize {
        self.inputs
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn forward(&self, inputs: &[f32]) -> Result<Vec<f32>, ConfigurationError> {
        if inputs.len() != self.inputs {
            return Err(ConfigurationError::InputCount {
                expected: self.inputs,
                actual: inputs.len(),
            });
        }
        Ok(self.outputs.clone())
    }

    fn genome(&self) -> Genome {
        Genome::new(self.outputs.clone())
    }

    fn set_genome(&mut self, genome: &Genome) -> Result<(), ConfigurationError> {
        if !genome.conforms_to(self.outputs.len()) {
            return Err(ConfigurationError::GenomeLength {
                expected: self.outputs.len(),
                actual: genome.len(),
            });
        }
        self.outputs.copy_from_slice(genome.genes());
        Ok(())
    }
}
