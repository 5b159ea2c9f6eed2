use crate::geometry::{Point, Rect};

use serde::{Deserialize, Serialize};

/// Immutable description of the arena and of the agents'
/// physical and sensory capabilities.
///
/// A single configuration is shared, by reference, by every
/// agent in a population. Independent simulations can use
/// different configurations side by side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Width of the arena. Valid positions lie in `[0, arena_width]`.
    pub arena_width: f32,
    /// Height of the arena. Valid positions lie in `[0, arena_height]`.
    pub arena_height: f32,
    /// Where agents are placed when (re)instantiated.
    pub spawn_point: Point,
    /// Length of an agent's body, along its heading.
    pub body_length: f32,
    /// Width of an agent's body, across its heading.
    pub body_width: f32,
    /// Sensor fan: ray angles in degrees, relative to the heading.
    /// One controller input is fed per ray, in this order.
    pub sensor_angles: Vec<f32>,
    /// Maximum distance a sensor can see.
    pub sensor_range: f32,
    /// Heading change, in degrees per tick, at full steer.
    pub turn_rate: f32,
    /// Distance travelled per tick at full throttle.
    pub max_speed: f32,
    /// Sensor readings below this distance are considered
    /// dangerously close to an obstacle.
    pub proximity_threshold: f32,
    /// Fitness subtracted on every tick in which any sensor
    /// reads below [`proximity_threshold`].
    ///
    /// [`proximity_threshold`]: SimulationConfig::proximity_threshold
    pub proximity_penalty: f32,
    /// Fitness subtracted once when an agent dies. Should exceed
    /// anything an agent can gain in a single tick.
    pub terminal_penalty: f32,
}

impl SimulationConfig {
    /// Returns the arena's bounds.
    pub fn arena(&self) -> Rect {
        Rect::new(0.0, 0.0, self.arena_width, self.arena_height)
    }

    /// Returns whether `point` lies within the arena's bounds.
    pub fn in_bounds(&self, point: Point) -> bool {
        self.arena().contains_point(point)
    }

    pub fn sensor_count(&self) -> usize {
        self.sensor_angles.len()
    }
}

impl Default for SimulationConfig {
    /// The classic 800×600 arena, with agents spawning at its
    /// centre and an eight-ray fan biased towards the front.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::SimulationConfig;
    ///
    /// let config = SimulationConfig::default();
    /// assert_eq!(config.sensor_count(), 8);
    /// assert!(config.terminal_penalty > config.max_speed);
    /// ```
    fn default() -> Self {
        SimulationConfig {
            arena_width: 800.0,
            arena_height: 600.0,
            spawn_point: Point::new(400.0, 300.0),
            body_length: 20.0,
            body_width: 10.0,
            sensor_angles: vec![-180.0, -135.0, -60.0, -30.0, 0.0, 30.0, 60.0, 135.0],
            sensor_range: 200.0,
            turn_rate: 5.0,
            max_speed: 5.0,
            proximity_threshold: 40.0,
            proximity_penalty: 10.0,
            terminal_penalty: 400.0,
        }
    }
}
