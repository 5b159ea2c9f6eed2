use crate::layout::{ParameterLayout, TensorId};
use crate::Topology;

use neurodrive::{ConfigurationError, Controller, Genome};

use rand::{Rng, RngCore};

/// A fully-connected feed-forward network with one hidden
/// layer. Both layers use a `tanh` activation, so every
/// output lies in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseNetwork {
    layout: ParameterLayout,
    hidden_kernel: Vec<f32>,
    hidden_bias: Vec<f32>,
    output_kernel: Vec<f32>,
    output_bias: Vec<f32>,
}

impl DenseNetwork {
    /// Returns a network of the given topology with every
    /// parameter set to 0.
    pub fn zeroed(topology: &Topology) -> DenseNetwork {
        let layout = topology.layout();
        let zeros = |id| vec![0.0; layout.spec(id).len()];
        DenseNetwork {
            hidden_kernel: zeros(TensorId::HiddenKernel),
            hidden_bias: zeros(TensorId::HiddenBias),
            output_kernel: zeros(TensorId::OutputKernel),
            output_bias: zeros(TensorId::OutputBias),
            layout,
        }
    }

    /// Returns the layout of the network's genome.
    pub fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    fn tensor(&self, id: TensorId) -> &[f32] {
        match id {
            TensorId::HiddenKernel => &self.hidden_kernel,
            TensorId::HiddenBias => &self.hidden_bias,
            TensorId::OutputKernel => &self.output_kernel,
            TensorId::OutputBias => &self.output_bias,
        }
    }

    fn tensor_mut(&mut self, id: TensorId) -> &mut [f32] {
        match id {
            TensorId::HiddenKernel => &mut self.hidden_kernel,
            TensorId::HiddenBias => &mut self.hidden_bias,
            TensorId::OutputKernel => &mut self.output_kernel,
            TensorId::OutputBias => &mut self.output_bias,
        }
    }

    fn check_genome(&self, genome: &Genome) -> Result<(), ConfigurationError> {
        if genome.conforms_to(self.layout.len()) {
            Ok(())
        } else {
            Err(ConfigurationError::GenomeLength {
                expected: self.layout.len(),
                actual: genome.len(),
            })
        }
    }
}

impl Controller for DenseNetwork {
    type Config = Topology;

    /// Returns a network with parameters drawn uniformly
    /// from `±topology.weight_bound`.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::Controller;
    /// use neurodrive_nn::{DenseNetwork, Topology};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let topology = Topology {
    ///     weight_bound: 0.5,
    ///     ..Topology::default()
    /// };
    /// let network = DenseNetwork::new(&topology, &mut StdRng::seed_from_u64(0));
    /// assert!(network.genome().genes().iter().all(|w| w.abs() <= 0.5));
    /// ```
    fn new(topology: &Topology, rng: &mut dyn RngCore) -> DenseNetwork {
        let bound = topology.weight_bound.abs();
        let mut network = DenseNetwork::zeroed(topology);
        for spec in network.layout.clone().tensors() {
            for w in network.tensor_mut(spec.id) {
                *w = rng.gen_range(-bound..=bound);
            }
        }
        network
    }

    fn from_genome(topology: &Topology, genome: &Genome) -> Result<DenseNetwork, ConfigurationError> {
        let mut network = DenseNetwork::zeroed(topology);
        network.set_genome(genome)?;
        Ok(network)
    }

    fn genome_len(topology: &Topology) -> usize {
        topology.layout().len()
    }

    fn input_count(&self) -> usize {
        self.layout.spec(TensorId::HiddenKernel).rows
    }

    fn output_count(&self) -> usize {
        self.layout.spec(TensorId::OutputBias).cols
    }

    /// Computes `tanh(tanh(x·W₁ + b₁)·W₂ + b₂)`.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::{Controller, Genome};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let topology = Topology::default();
    /// let network = DenseNetwork::from_genome(
    ///     &topology,
    ///     &Genome::zeros(DenseNetwork::genome_len(&topology)),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(network.forward(&[0.5; 8]).unwrap(), vec![0.0, 0.0]);
    /// assert!(network.forward(&[0.5; 3]).is_err());
    /// ```
    fn forward(&self, inputs: &[f32]) -> Result<Vec<f32>, ConfigurationError> {
        if inputs.len() != self.input_count() {
            return Err(ConfigurationError::InputCount {
                expected: self.input_count(),
                actual: inputs.len(),
            });
        }
        let hidden = dense_tanh(inputs, &self.hidden_kernel, &self.hidden_bias);
        Ok(dense_tanh(&hidden, &self.output_kernel, &self.output_bias))
    }

    fn genome(&self) -> Genome {
        self.layout
            .tensors()
            .iter()
            .flat_map(|spec| self.tensor(spec.id).iter().copied())
            .collect()
    }

    fn set_genome(&mut self, genome: &Genome) -> Result<(), ConfigurationError> {
        self.check_genome(genome)?;
        for spec in self.layout.clone().tensors() {
            self.tensor_mut(spec.id)
                .copy_from_slice(&genome.genes()[spec.range()]);
        }
        Ok(())
    }
}

/// A dense layer: `tanh(x·W + b)`, with `W` stored
/// row-major as `inputs × outputs`.
fn dense_tanh(inputs: &[f32], kernel: &[f32], bias: &[f32]) -> Vec<f32> {
    let outputs = bias.len();
    bias.iter()
        .enumerate()
        .map(|(j, b)| {
            let sum: f32 = inputs
                .iter()
                .enumerate()
                .map(|(i, x)| x * kernel[i * outputs + j])
                .sum();
            (sum + b).tanh()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::num::NonZeroUsize;

    fn topology(inputs: usize, hidden: usize, outputs: usize) -> Topology {
        Topology {
            input_count: NonZeroUsize::new(inputs).unwrap(),
            hidden_count: NonZeroUsize::new(hidden).unwrap(),
            output_count: NonZeroUsize::new(outputs).unwrap(),
            weight_bound: 1.0,
        }
    }

    #[test]
    fn genome_round_trip_preserves_behaviour() {
        let mut rng = StdRng::seed_from_u64(11);
        for topology in [topology(8, 8, 2), topology(3, 5, 2), topology(1, 1, 4)] {
            let network = DenseNetwork::new(&topology, &mut rng);
            let genome = network.genome();
            assert_eq!(genome.len(), DenseNetwork::genome_len(&topology));

            let restored = DenseNetwork::from_genome(&topology, &genome).unwrap();
            assert_eq!(restored, network);
            for inputs in input_battery(topology.input_count.get()) {
                assert_eq!(
                    restored.forward(&inputs).unwrap(),
                    network.forward(&inputs).unwrap()
                );
            }
        }
    }

    /// All zeros, all ones, alternating ±1 and a ramp over [0, 1].
    fn input_battery(len: usize) -> Vec<Vec<f32>> {
        vec![
            vec![0.0; len],
            vec![1.0; len],
            (0..len)
                .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 })
                .collect(),
            (0..len).map(|i| i as f32 / len as f32).collect(),
        ]
    }

    #[test]
    fn wrong_genome_length_is_rejected() {
        let topology = topology(8, 8, 2);
        let mut network = DenseNetwork::new(&topology, &mut StdRng::seed_from_u64(12));
        let before = network.clone();
        assert_eq!(
            network.set_genome(&Genome::zeros(89)),
            Err(ConfigurationError::GenomeLength {
                expected: 90,
                actual: 89
            })
        );
        assert_eq!(network, before);
        assert!(DenseNetwork::from_genome(&topology, &Genome::zeros(91)).is_err());
    }

    #[test]
    fn wrong_input_length_is_rejected() {
        let network = DenseNetwork::zeroed(&topology(4, 3, 2));
        assert_eq!(
            network.forward(&[0.0; 5]),
            Err(ConfigurationError::InputCount {
                expected: 4,
                actual: 5
            })
        );
    }

    #[test]
    fn outputs_are_saturated() {
        let topology = Topology {
            weight_bound: 50.0,
            ..topology(8, 8, 2)
        };
        let network = DenseNetwork::new(&topology, &mut StdRng::seed_from_u64(13));
        let outputs = network.forward(&[1.0; 8]).unwrap();
        assert_eq!(outputs.len(), 2);
        assert!(outputs.iter().all(|o| (-1.0..=1.0).contains(o)));
    }

    #[test]
    fn genome_order_is_kernel_then_bias_per_layer() {
        // Single-path network: x -> h -> y.
        let topology = topology(1, 1, 1);
        let network =
            DenseNetwork::from_genome(&topology, &Genome::new(vec![2.0, 0.5, 3.0, -1.0])).unwrap();
        assert_eq!(network.hidden_kernel, vec![2.0]);
        assert_eq!(network.hidden_bias, vec![0.5]);
        assert_eq!(network.output_kernel, vec![3.0]);
        assert_eq!(network.output_bias, vec![-1.0]);

        let x = 0.25_f32;
        let expected = (3.0 * (2.0 * x + 0.5).tanh() - 1.0).tanh();
        let output = network.forward(&[x]).unwrap()[0];
        assert!((output - expected).abs() < 1e-6);
    }

    #[test]
    fn kernels_are_input_major() {
        // Two inputs, two hidden neurons, identity-like output.
        let topology = topology(2, 2, 2);
        let mut genes = vec![0.0; DenseNetwork::genome_len(&topology)];
        // Hidden kernel: input 0 feeds hidden 1 only.
        genes[1] = 1.0;
        // Output kernel: hidden 1 feeds output 1 only.
        genes[6 + 3] = 1.0;
        let network = DenseNetwork::from_genome(&topology, &Genome::new(genes)).unwrap();
        let outputs = network.forward(&[1.0, 0.0]).unwrap();
        assert_eq!(outputs[0], 0.0);
        assert!((outputs[1] - 1.0f32.tanh().tanh()).abs() < 1e-6);
    }
}
