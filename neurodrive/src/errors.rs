use thiserror::Error;

/// Errors raised when a controller, genome or sensor
/// fan does not agree with the configured topology.
///
/// These are fatal to the operation that raised them
/// only; no other agent is affected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A genome's length does not match the topology's parameter count.
    #[error("genome of length {actual} does not fit a topology with {expected} parameters")]
    GenomeLength { expected: usize, actual: usize },
    /// An input vector's length does not match the controller's input count.
    #[error("controller expects {expected} inputs, got {actual}")]
    InputCount { expected: usize, actual: usize },
    /// The controller has too few outputs to drive an agent.
    #[error("controller produces {actual} outputs, at least {required} are needed")]
    OutputCount { required: usize, actual: usize },
    /// The sensor fan does not feed the controller's inputs exactly.
    #[error("sensor fan has {sensors} rays but the controller takes {inputs} inputs")]
    SensorFan { sensors: usize, inputs: usize },
    /// A tournament too small to favour fitter candidates.
    #[error("tournaments of size {size} pick parents uniformly, at least 2 candidates are needed")]
    TournamentSize { size: usize },
}
