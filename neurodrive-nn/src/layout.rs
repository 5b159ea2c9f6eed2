//! Parameter layouts describe how a network's tensors are
//! laid out in its genome.
//!
//! The layout is computed once from a [`Topology`], and is
//! the only source of truth for both encoding and decoding:
//! tensors are stored layer by layer, kernels before biases,
//! each kernel row-major with the input index major.
use crate::Topology;

use std::ops::Range;

/// Identifies one of a network's parameter tensors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TensorId {
    /// Input to hidden weights, `inputs × hidden`.
    HiddenKernel,
    /// Hidden layer biases, `1 × hidden`.
    HiddenBias,
    /// Hidden to output weights, `hidden × outputs`.
    OutputKernel,
    /// Output layer biases, `1 × outputs`.
    OutputBias,
}

/// Shape and position of a tensor within a genome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorSpec {
    pub id: TensorId,
    pub rows: usize,
    pub cols: usize,
    /// Index of the tensor's first parameter in the genome.
    pub offset: usize,
}

impl TensorSpec {
    /// Number of parameters in the tensor.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Range of genome indices covered by the tensor.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len()
    }
}

/// The ordered list of a network's tensors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterLayout {
    tensors: [TensorSpec; 4],
}

impl ParameterLayout {
    /// Computes the layout of networks with the given topology.
    ///
    /// # Examples
    /// ```
    /// use neurodrive_nn::layout::{ParameterLayout, TensorId};
    /// use neurodrive_nn::Topology;
    ///
    /// let layout = ParameterLayout::new(&Topology::default());
    /// // 8×8 + 8 + 8×2 + 2
    /// assert_eq!(layout.len(), 90);
    ///
    /// let ids: Vec<TensorId> = layout.tensors().iter().map(|t| t.id).collect();
    /// assert_eq!(
    ///     ids,
    ///     [
    ///         TensorId::HiddenKernel,
    ///         TensorId::HiddenBias,
    ///         TensorId::OutputKernel,
    ///         TensorId::OutputBias
    ///     ]
    /// );
    /// ```
    pub fn new(topology: &Topology) -> ParameterLayout {
        let (inputs, hidden, outputs) = (
            topology.input_count.get(),
            topology.hidden_count.get(),
            topology.output_count.get(),
        );
        let shapes = [
            (TensorId::HiddenKernel, inputs, hidden),
            (TensorId::HiddenBias, 1, hidden),
            (TensorId::OutputKernel, hidden, outputs),
            (TensorId::OutputBias, 1, outputs),
        ];

        let mut offset = 0;
        let tensors = shapes.map(|(id, rows, cols)| {
            let spec = TensorSpec {
                id,
                rows,
                cols,
                offset,
            };
            offset += spec.len();
            spec
        });
        ParameterLayout { tensors }
    }

    /// Total number of parameters, i.e., the genome length.
    pub fn len(&self) -> usize {
        self.tensors.iter().map(TensorSpec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the tensors in genome order.
    pub fn tensors(&self) -> &[TensorSpec] {
        &self.tensors
    }

    /// Returns the spec of the tensor with the given id.
    pub fn spec(&self, id: TensorId) -> TensorSpec {
        match id {
            TensorId::HiddenKernel => self.tensors[0],
            TensorId::HiddenBias => self.tensors[1],
            TensorId::OutputKernel => self.tensors[2],
            TensorId::OutputBias => self.tensors[3],
        }
    }

    /// Returns the parameters of tensor `id` within `genes`.
    ///
    /// # Panics
    /// Panics if `genes` is shorter than the layout.
    pub fn slice<'a>(&self, id: TensorId, genes: &'a [f32]) -> &'a [f32] {
        &genes[self.spec(id).range()]
    }
}
