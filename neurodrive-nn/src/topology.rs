use crate::ParameterLayout;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Shape and initialization parameters of a
/// [`DenseNetwork`](crate::DenseNetwork).
///
/// A network has a single hidden layer, and one input
/// per agent sensor. Its first two outputs are read as
/// steering and throttle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    /// Number of network inputs.
    pub input_count: NonZeroUsize,
    /// Number of hidden neurons.
    pub hidden_count: NonZeroUsize,
    /// Number of network outputs.
    pub output_count: NonZeroUsize,
    /// Maximum magnitude of randomly initialized parameters.
    pub weight_bound: f32,
}

impl Topology {
    /// Returns a "zero-valued" default configuration.
    /// All values are 0, or in the case of `NonZeroUsize`s, 1.
    ///
    /// # Note
    /// This value is not suitable for use in most experiments.
    /// It is meant as a way to fill in unused values during
    /// configuration instantiation.
    ///
    /// # Examples
    /// ```
    /// use neurodrive_nn::Topology;
    /// use std::num::NonZeroUsize;
    ///
    /// let topology = Topology {
    ///     input_count: NonZeroUsize::new(5).unwrap(),
    ///     output_count: NonZeroUsize::new(2).unwrap(),
    ///     ..Topology::zero()
    /// };
    /// assert_eq!(topology.hidden_count.get(), 1);
    /// ```
    pub const fn zero() -> Topology {
        Topology {
            input_count: NonZeroUsize::MIN,
            hidden_count: NonZeroUsize::MIN,
            output_count: NonZeroUsize::MIN,
            weight_bound: 0.0,
        }
    }

    /// Returns the parameter layout shared by every
    /// network of this topology.
    pub fn layout(&self) -> ParameterLayout {
        ParameterLayout::new(self)
    }
}

impl Default for Topology {
    /// 8 sensors, 8 hidden neurons, steering and throttle.
    fn default() -> Self {
        let eight = NonZeroUsize::new(8).unwrap_or(NonZeroUsize::MIN);
        Topology {
            input_count: eight,
            hidden_count: eight,
            output_count: NonZeroUsize::new(2).unwrap_or(NonZeroUsize::MIN),
            weight_bound: 1.0,
        }
    }
}
