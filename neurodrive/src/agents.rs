//! Agents are the phenotypes being evaluated: simulated
//! vehicles that perceive obstacles through a fan of ray
//! sensors and are driven by their own [`Controller`].
//!
//! An agent is either alive or dead. Dead agents ignore
//! updates until they are reset for the next generation.
//! Nothing that happens to an agent during a tick is an
//! error: collisions and boundary crossings are recorded
//! as state, so that any number of agents can always
//! complete a tick.
mod config;

pub use config::SimulationConfig;

use crate::geometry::{cast_ray, ObstacleSnapshot, Point, Rect, RayHit};
use crate::{Controller, Genome};

use tracing::{error, warn};

/// A simulated vehicle and the controller driving it.
#[derive(Clone, Debug)]
pub struct Agent<C> {
    controller: C,
    position: Point,
    heading: f32,
    speed: f32,
    alive: bool,
    fitness: f32,
    readings: Vec<RayHit>,
}

impl<C: Controller> Agent<C> {
    /// Creates a new live agent at the configured spawn point,
    /// facing angle 0 with zero speed and fitness.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::{Agent, Controller, SimulationConfig};
    /// use neurodrive_nn::{DenseNetwork, Topology};
    ///
    /// let config = SimulationConfig::default();
    /// let network = DenseNetwork::new(&Topology::default(), &mut rand::thread_rng());
    /// let agent = Agent::new(network, &config);
    ///
    /// assert!(agent.is_alive());
    /// assert_eq!(agent.position(), config.spawn_point);
    /// assert_eq!(agent.fitness(), 0.0);
    /// ```
    pub fn new(controller: C, config: &SimulationConfig) -> Agent<C> {
        Agent {
            controller,
            position: config.spawn_point,
            heading: 0.0,
            speed: 0.0,
            alive: true,
            fitness: 0.0,
            readings: Vec::with_capacity(config.sensor_count()),
        }
    }

    /// Advances the agent by one tick against the obstacles
    /// in `snapshot`. Does nothing if the agent is dead.
    ///
    /// In order, the agent:
    /// 1. casts its sensor fan, and is penalized if any
    ///    reading is dangerously close;
    /// 2. feeds the normalized readings to its controller;
    /// 3. steers and sets its speed from the controller's outputs;
    /// 4. moves, gaining fitness equal to the distance travelled;
    /// 5. dies, with a terminal penalty, if it has left the arena
    ///    or hit an obstacle.
    pub fn update(&mut self, snapshot: &ObstacleSnapshot<'_>, config: &SimulationConfig) {
        if !self.alive {
            return;
        }

        if self.cast_sensors(snapshot, config) {
            self.fitness -= config.proximity_penalty;
        }

        let inputs = self.sensor_inputs(config);
        let (steer, throttle) = self.actuation(&inputs);
        self.drive(steer, throttle, config);

        let previous = self.position;
        self.position = previous.project(self.heading, self.speed);
        self.fitness += previous.distance_to(self.position);

        if !config.in_bounds(self.position) || snapshot.collides_with(&self.body(config)) {
            self.alive = false;
            self.fitness -= config.terminal_penalty;
        }
    }

    /// Casts every sensor in the fan, recording the readings.
    /// Returns whether any reading is below the proximity threshold.
    fn cast_sensors(&mut self, snapshot: &ObstacleSnapshot<'_>, config: &SimulationConfig) -> bool {
        self.readings.clear();
        let mut too_close = false;
        for offset in &config.sensor_angles {
            let hit = cast_ray(
                self.position,
                self.heading + offset,
                config.sensor_range,
                snapshot.obstacles(),
            );
            too_close |= hit.distance < config.proximity_threshold;
            self.readings.push(hit);
        }
        too_close
    }

    /// Returns the current sensor readings as danger intensities
    /// in `[0, 1]`: 1 at contact, 0 at or beyond sensor range.
    /// Before any sensor has been cast, returns one zero per
    /// controller input.
    pub fn sensor_inputs(&self, config: &SimulationConfig) -> Vec<f32> {
        if self.readings.is_empty() {
            return vec![0.0; self.controller.input_count()];
        }
        self.readings
            .iter()
            .map(|hit| danger_intensity(hit.distance, config.sensor_range))
            .collect()
    }

    /// Queries the controller for `(steer, throttle)`. Degenerate
    /// answers are replaced by the neutral action `(0, 0)`.
    fn actuation(&self, inputs: &[f32]) -> (f32, f32) {
        let outputs = match self.controller.forward(inputs) {
            Ok(outputs) => outputs,
            Err(e) => {
                error!(error = %e, "controller rejected sensor inputs, holding still");
                return (0.0, 0.0);
            }
        };
        let steer = outputs.first().copied().unwrap_or(0.0);
        let throttle = outputs.get(1).copied().unwrap_or(0.0);
        if !steer.is_finite() || !throttle.is_finite() {
            warn!(steer, throttle, "non-finite actuation replaced with neutral action");
            return (0.0, 0.0);
        }
        (steer.clamp(-1.0, 1.0), throttle.clamp(-1.0, 1.0))
    }

    /// Positive steer turns clockwise on screen. There is no
    /// coasting or reversing: non-positive throttle stops the agent.
    fn drive(&mut self, steer: f32, throttle: f32, config: &SimulationConfig) {
        self.heading = wrap_degrees(self.heading - steer * config.turn_rate);
        self.speed = if throttle > 0.0 {
            throttle * config.max_speed
        } else {
            0.0
        };
    }

    /// Returns the axis-aligned hull of the agent's rotated body.
    pub fn body(&self, config: &SimulationConfig) -> Rect {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        Rect::centered(
            self.position,
            config.body_length * cos + config.body_width * sin,
            config.body_length * sin + config.body_width * cos,
        )
    }

    /// Returns the agent to its initial state at the spawn
    /// point: alive, facing angle 0, and with zero speed and
    /// fitness. The controller is kept.
    pub fn reset(&mut self, config: &SimulationConfig) {
        self.position = config.spawn_point;
        self.heading = 0.0;
        self.speed = 0.0;
        self.alive = true;
        self.fitness = 0.0;
        self.readings.clear();
    }

    /// Replaces the agent's controller parameters with `genome`
    /// and resets the agent.
    ///
    /// # Errors
    /// Returns an error if the genome does not fit the controller,
    /// in which case the agent is left untouched.
    pub fn reinstantiate(
        &mut self,
        genome: &Genome,
        config: &SimulationConfig,
    ) -> Result<(), crate::ConfigurationError> {
        self.controller.set_genome(genome)?;
        self.reset(config);
        Ok(())
    }

    /// Returns the genome encoding the agent's controller.
    pub fn genome(&self) -> Genome {
        self.controller.genome()
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Heading in degrees, in `[0, 360)`.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    /// Returns the latest sensor readings, one per ray in
    /// the configured fan. Empty before the first update.
    pub fn readings(&self) -> &[RayHit] {
        &self.readings
    }
}

/// Wraps an angle into `[0, 360)`. `rem_euclid` alone rounds
/// tiny negative angles up to exactly 360.
fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Maps a sensor distance to a danger intensity in `[0, 1]`.
fn danger_intensity(distance: f32, range: f32) -> f32 {
    (1.0 - distance / range).clamp(0.0, 1.0)
}
