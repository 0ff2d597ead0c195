// Plane geometry shared by the growth code and the renderer

use serde::{Deserialize, Serialize};

/// Decimal digits kept by [`project`].
pub const PROJECTION_PRECISION: i32 = 8;

/// A point in world space. The y axis points up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Round `value` to `digits` decimal places, half away from zero.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}

/// Move `distance` away from `origin` in the direction `angle_degrees`
/// (counter-clockwise from the +x axis).
///
/// Coordinates are rounded to [`PROJECTION_PRECISION`] decimals so that
/// floating point noise does not pile up over many generations.
pub fn project(origin: Point, angle_degrees: f64, distance: f64) -> Point {
    let rad = angle_degrees.to_radians();
    Point {
        x: round_to(origin.x + distance * rad.cos(), PROJECTION_PRECISION),
        y: round_to(origin.y + distance * rad.sin(), PROJECTION_PRECISION),
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn around(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.min.x + self.max.x) * 0.5,
            y: (self.min.y + self.max.y) * 0.5,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
