use neurodrive::geometry::{ObstacleSnapshot, Rect};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Parameters of the falling obstacle course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Ticks between two spawns.
    pub spawn_interval: u32,
    /// Side lengths are drawn uniformly from `[min_size, max_size]`.
    pub min_size: f32,
    pub max_size: f32,
    /// Falling speeds, in units per tick, are drawn
    /// uniformly from `[min_speed, max_speed]`.
    pub min_speed: f32,
    pub max_speed: f32,
    /// Seed for obstacle placement. Entropy if `None`.
    pub seed: Option<u64>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        ObstacleConfig {
            spawn_interval: 30,
            min_size: 30.0,
            max_size: 80.0,
            min_speed: 2.0,
            max_speed: 5.0,
            seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FallingObstacle {
    rect: Rect,
    speed: f32,
}

/// Rectangles spawned above the arena that fall
/// through it, and are dropped once past its bottom.
pub struct ObstacleField {
    config: ObstacleConfig,
    arena_width: f32,
    arena_height: f32,
    falling: Vec<FallingObstacle>,
    rects: Vec<Rect>,
    frame: u32,
    rng: StdRng,
}

impl ObstacleField {
    pub fn new(config: ObstacleConfig, arena_width: f32, arena_height: f32) -> ObstacleField {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ObstacleField {
            config,
            arena_width,
            arena_height,
            falling: vec![],
            rects: vec![],
            frame: 0,
            rng,
        }
    }

    /// Spawns, moves and culls obstacles for one tick.
    pub fn tick(&mut self) {
        self.frame += 1;
        if self.frame >= self.config.spawn_interval {
            self.spawn();
            self.frame = 0;
        }
        for obstacle in &mut self.falling {
            obstacle.rect.y += obstacle.speed;
        }
        let bottom = self.arena_height;
        self.falling.retain(|o| o.rect.top() <= bottom);
        self.rects.clear();
        self.rects.extend(self.falling.iter().map(|o| o.rect));
    }

    fn spawn(&mut self) {
        let size = self.sample(self.config.min_size, self.config.max_size);
        let x = self.sample(0.0, (self.arena_width - size).max(0.0));
        let speed = self.sample(self.config.min_speed, self.config.max_speed);
        self.falling.push(FallingObstacle {
            rect: Rect::new(x, -size, size, size),
            speed,
        });
    }

    fn sample(&mut self, low: f32, high: f32) -> f32 {
        if high > low {
            self.rng.gen_range(low..=high)
        } else {
            low
        }
    }

    /// Removes every obstacle and restarts the spawn timer.
    pub fn clear(&mut self) {
        self.falling.clear();
        self.rects.clear();
        self.frame = 0;
    }

    pub fn snapshot(&self) -> ObstacleSnapshot<'_> {
        ObstacleSnapshot::new(&self.rects)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rects.len()
    }
}
