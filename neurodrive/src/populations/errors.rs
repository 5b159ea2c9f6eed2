use crate::ConfigurationError;

use thiserror::Error;

/// Errors raised by [`Population::evolve`].
///
/// [`Population::evolve`]: crate::Population::evolve
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvolutionError {
    /// Evolution was attempted before every agent had died.
    #[error("attempted evolution with {alive} agent(s) still alive")]
    NotExtinct { alive: usize },
    /// An offspring genome did not fit its agent's controller.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
