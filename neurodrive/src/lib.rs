//! Neuroevolution of driving agents in a 2D obstacle arena.
//!
//! A [`Population`] of [`Agent`]s is driven tick by tick against
//! snapshots of axis-aligned obstacles. Each agent perceives the
//! arena only through a fan of ray-cast proximity sensors, and is
//! steered by its own [`Controller`]. Agents score fitness for the
//! distance they travel, lose some for driving too close to
//! obstacles, and die when they crash or leave the arena. Once
//! every agent has died, the population is evolved: the best
//! controllers' [`Genome`]s are carried over, bred and mutated to
//! produce the next generation.
//!
//! The crate is agnostic to the inference engine, which is
//! abstracted by the [`Controller`] trait. A small dense network
//! implementation is supplied via the `neurodrive-nn` crate.
//!
//! Spawning and moving obstacles, rendering, and saving genomes
//! are left to the caller.
//!
//! # Example usage: training against a static obstacle course
//! ```
//! use neurodrive::geometry::{ObstacleSnapshot, Rect};
//! use neurodrive::{GeneticConfig, Population, PopulationConfig, SimulationConfig};
//! use neurodrive_nn::{DenseNetwork, Topology};
//! use std::num::NonZeroUsize;
//!
//! fn main() {
//!     let population_config = PopulationConfig {
//!         size: NonZeroUsize::new(40).unwrap(),
//!         elitism: 2,
//!         seed: Some(42),
//!         ..PopulationConfig::default()
//!     };
//!
//!     let mut population = Population::<DenseNetwork>::new(
//!         population_config,
//!         GeneticConfig::default(),
//!         SimulationConfig::default(),
//!         Topology::default(),
//!     )
//!     .unwrap();
//!
//!     let obstacles = vec![
//!         Rect::new(500.0, 250.0, 40.0, 100.0),
//!         Rect::new(200.0, 100.0, 60.0, 60.0),
//!     ];
//!
//!     for _ in 0..3 {
//!         // Cap the generation's length, in case some agent
//!         // learns to stand still.
//!         for _ in 0..500 {
//!             population.update(&ObstacleSnapshot::new(&obstacles));
//!             if population.is_extinct() {
//!                 break;
//!             }
//!         }
//!         if !population.is_extinct() {
//!             // Kill the stragglers by covering the arena.
//!             let arena = [Rect::new(0.0, 0.0, 800.0, 600.0)];
//!             population.update(&ObstacleSnapshot::new(&arena));
//!         }
//!         population.evolve().unwrap();
//!     }
//!
//!     assert_eq!(population.generation(), 3);
//!     let champion = population.champion().unwrap();
//!     println!(
//!         "Best fitness: {} ({})",
//!         champion.fitness,
//!         serde_json::to_string(&champion.genome).unwrap()
//!     );
//! }
//! ```

pub mod agents;
mod controller;
mod errors;
mod genome;
pub mod geometry;
mod populations;
#[cfg(test)]
mod test_utils;

pub use agents::{Agent, SimulationConfig};
pub use controller::Controller;
pub use errors::ConfigurationError;
pub use genome::*;
pub use populations::*;
