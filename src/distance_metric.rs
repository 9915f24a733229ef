//! The trait that needs to be implemented by any distance metric

use crate::point::Point;

/// Trait implemented by the distance metrics a scan can be run with.
///
/// Implementations must be symmetric (`dist(a, b) == dist(b, a)`, bit for bit) and
/// non-negative. The symmetric strategies compute each unordered pair once and
/// credit the same value to both ends, so an asymmetric metric would make them
/// disagree with the serial scan.
pub trait DistanceMetric {
    /// returns the distance between two points, as measured
    /// by a particular distance metric
    fn dist(a: &Point, b: &Point) -> f64;
}
