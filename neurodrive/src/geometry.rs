//! Planar geometry for the arena: points, axis-aligned
//! rectangles, segment clipping and sensor ray casting.
//!
//! The arena uses screen coordinates: the origin is the
//! top-left corner and `y` grows downwards. Angles are given
//! in degrees and grow counter-clockwise as seen on screen,
//! so a ray at angle `θ` travels along `(cos θ, -sin θ)`.

use serde::{Deserialize, Serialize};

/// A point (or displacement) in arena space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    /// Returns the Euclidean distance between two points.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::Point;
    ///
    /// assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    /// ```
    pub fn distance_to(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Returns the point reached by travelling `distance`
    /// units along `angle` (in degrees) from `self`.
    pub fn project(self, angle: f32, distance: f32) -> Point {
        let (sin, cos) = angle.to_radians().sin_cos();
        Point {
            x: self.x + cos * distance,
            y: self.y - sin * distance,
        }
    }
}

/// An axis-aligned rectangle, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns a rectangle of the given size centred on `center`.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::{Point, Rect};
    ///
    /// let rect = Rect::centered(Point::new(10.0, 10.0), 4.0, 2.0);
    /// assert_eq!(rect, Rect::new(8.0, 9.0, 4.0, 2.0));
    /// ```
    pub fn centered(center: Point, width: f32, height: f32) -> Rect {
        Rect {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns whether `point` lies inside the rectangle
    /// or on its boundary.
    pub fn contains_point(&self, point: Point) -> bool {
        (self.left()..=self.right()).contains(&point.x)
            && (self.top()..=self.bottom()).contains(&point.y)
    }

    /// Returns whether two rectangles overlap. Rectangles
    /// that merely share an edge do not intersect.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::Rect;
    ///
    /// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    /// assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Clips the segment `start -> end` against the rectangle
    /// (Liang–Barsky). Returns the parametric entry and exit
    /// positions `(t0, t1)`, with `0 <= t0 <= t1 <= 1`, or `None`
    /// if the segment misses the rectangle entirely.
    fn clip_parameters(&self, start: Point, end: Point) -> Option<(f32, f32)> {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let bounds = [
            (-dx, start.x - self.left()),
            (dx, self.right() - start.x),
            (-dy, start.y - self.top()),
            (dy, self.bottom() - start.y),
        ];

        let (mut t0, mut t1) = (0.0f32, 1.0f32);
        for (p, q) in bounds {
            if p == 0.0 {
                // Parallel to this edge pair.
                if q < 0.0 {
                    return None;
                }
            } else {
                let r = q / p;
                if p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }

    /// Returns the portion of the segment `start -> end`
    /// lying inside the rectangle, as `(entry, exit)` points.
    ///
    /// # Examples
    /// ```
    /// use neurodrive::geometry::{Point, Rect};
    ///
    /// let rect = Rect::new(10.0, -5.0, 10.0, 10.0);
    /// let (entry, exit) = rect
    ///     .clip_segment(Point::new(0.0, 0.0), Point::new(30.0, 0.0))
    ///     .unwrap();
    /// assert_eq!(entry, Point::new(10.0, 0.0));
    /// assert_eq!(exit, Point::new(20.0, 0.0));
    ///
    /// assert!(rect.clip_segment(Point::new(0.0, 20.0), Point::new(30.0, 20.0)).is_none());
    /// ```
    pub fn clip_segment(&self, start: Point, end: Point) -> Option<(Point, Point)> {
        let lerp = |t: f32| Point {
            x: start.x + (end.x - start.x) * t,
            y: start.y + (end.y - start.y) * t,
        };
        self.clip_parameters(start, end)
            .map(|(t0, t1)| (lerp(t0), lerp(t1)))
    }
}

/// The result of casting a single sensor ray.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    /// Nearest intersection, or the ray's endpoint
    /// if nothing was hit within range.
    pub point: Point,
}

/// Casts a ray of length `max_range` from `origin` along `angle`
/// (degrees) through `obstacles`, returning the nearest hit.
///
/// Overlapping rectangles resolve purely by distance. A rectangle
/// containing the origin reports a hit at distance 0.
///
/// # Complexity
/// `O(n)` in the number of obstacles.
///
/// # Examples
/// ```
/// use neurodrive::geometry::{cast_ray, Point, Rect};
///
/// let origin = Point::new(0.0, 0.0);
///
/// // Nothing in range: the full range is reported.
/// let miss = cast_ray(origin, 0.0, 100.0, &[]);
/// assert_eq!(miss.distance, 100.0);
/// assert_eq!(miss.point, Point::new(100.0, 0.0));
///
/// // Wall 40 units ahead.
/// let wall = Rect::new(40.0, -10.0, 5.0, 20.0);
/// let hit = cast_ray(origin, 0.0, 100.0, &[wall]);
/// assert!((hit.distance - 40.0).abs() < 1e-4);
/// ```
pub fn cast_ray(origin: Point, angle: f32, max_range: f32, obstacles: &[Rect]) -> RayHit {
    let end = origin.project(angle, max_range);
    let nearest = obstacles
        .iter()
        .filter_map(|rect| rect.clip_parameters(origin, end))
        .map(|(t0, _)| t0)
        .min_by(|a, b| a.total_cmp(b));

    match nearest {
        Some(t) => RayHit {
            distance: t * max_range,
            point: Point {
                x: origin.x + (end.x - origin.x) * t,
                y: origin.y + (end.y - origin.y) * t,
            },
        },
        None => RayHit {
            distance: max_range,
            point: end,
        },
    }
}

/// The set of obstacles present in the arena during a single tick.
///
/// Snapshots borrow the obstacle list from whoever manages the
/// obstacles' lifecycle, and cannot outlive it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObstacleSnapshot<'a> {
    obstacles: &'a [Rect],
}

impl<'a> ObstacleSnapshot<'a> {
    pub fn new(obstacles: &'a [Rect]) -> ObstacleSnapshot<'a> {
        ObstacleSnapshot { obstacles }
    }

    /// A snapshot of an obstacle-free arena.
    pub fn empty() -> ObstacleSnapshot<'static> {
        ObstacleSnapshot { obstacles: &[] }
    }

    pub fn obstacles(&self) -> &'a [Rect] {
        self.obstacles
    }

    /// Returns whether any obstacle overlaps `body`.
    pub fn collides_with(&self, body: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.intersects(body))
    }
}

impl<'a> From<&'a [Rect]> for ObstacleSnapshot<'a> {
    fn from(obstacles: &'a [Rect]) -> Self {
        ObstacleSnapshot::new(obstacles)
    }
}

impl<'a> From<&'a Vec<Rect>> for ObstacleSnapshot<'a> {
    fn from(obstacles: &'a Vec<Rect>) -> Self {
        ObstacleSnapshot::new(obstacles)
    }
}
