//! # neurodrive-nn
//! A fixed-topology dense network implementation of the
//! [`neurodrive`] crate's `Controller` trait.
//!
//! Provides a [`DenseNetwork`] type usable in `neurodrive`
//! `Population`s: a two-layer `tanh` network whose parameters
//! are flattened into genomes following an explicit
//! [`ParameterLayout`], computed once from its [`Topology`].
//!
//! [`ParameterLayout`]: crate::layout::ParameterLayout
//!
//! # Example usage: replaying a saved driver
//! ```
//! use neurodrive::geometry::ObstacleSnapshot;
//! use neurodrive::{
//!     Controller, GeneticConfig, Genome, Population, PopulationConfig, SeedMode,
//!     SimulationConfig,
//! };
//! use neurodrive_nn::{DenseNetwork, Topology};
//! use std::num::NonZeroUsize;
//!
//! let topology = Topology::default();
//!
//! // A genome as it would be loaded back from storage.
//! let saved = serde_json::to_string(&Genome::zeros(DenseNetwork::genome_len(&topology))).unwrap();
//! let genome: Genome = serde_json::from_str(&saved).unwrap();
//!
//! let mut population = Population::<DenseNetwork>::new_seeded(
//!     &genome,
//!     SeedMode::Single,
//!     PopulationConfig {
//!         size: NonZeroUsize::new(1).unwrap(),
//!         ..PopulationConfig::zero()
//!     },
//!     GeneticConfig::zero(),
//!     SimulationConfig::default(),
//!     topology,
//! )
//! .unwrap();
//!
//! for _ in 0..100 {
//!     population.update(&ObstacleSnapshot::empty());
//! }
//! // An all-zero network never accelerates.
//! let driver = population.best_agent().unwrap();
//! assert_eq!(driver.fitness(), 0.0);
//! ```

pub mod layout;
mod network;
mod topology;

pub use layout::ParameterLayout;
pub use network::DenseNetwork;
pub use topology::Topology;
