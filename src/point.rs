//! The 2D point type consumed by every scan.

use serde::Deserialize;

/// An immutable 2D point.
///
/// Points carry no identity of their own: a point is known by its index in the
/// slice handed to a scan, and that index is the key of every result array.
///
/// Deserializes from a headerless CSV row `x,y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Point {
    /// x co-ordinate
    pub x: f64,
    /// y co-ordinate
    pub y: f64,
}

impl Point {
    /// Creates a point from its co-ordinates.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}
