//! Contains the distance metrics that can be chosen from to measure the distance
//! between two points.
//!
//! The set is closed: [`Euclidean`] for the plane and [`Toroidal`] for the unit square
//! with periodic boundaries. Scans are generic over [`DistanceMetric`] so the metric is
//! resolved at compile time; [`Metric`] is the runtime tag used where the choice comes
//! from configuration.

use std::fmt;

pub use crate::distance_metric::DistanceMetric;
use crate::point::Point;

/// Returns the straight-line distance between two points.
///
/// # Examples
///
/// ```rust
/// use nearfar::distance::{DistanceMetric, Euclidean};
/// use nearfar::Point;
///
/// assert_eq!(0f64, Euclidean::dist(&Point::new(0.0, 0.0), &Point::new(0.0, 0.0)));
/// assert_eq!(5f64, Euclidean::dist(&Point::new(0.0, 0.0), &Point::new(3.0, 4.0)));
/// assert_eq!(0.9f64, Euclidean::dist(&Point::new(0.0, 0.0), &Point::new(0.9, 0.0)));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean {}

impl DistanceMetric for Euclidean {
    #[inline]
    fn dist(a: &Point, b: &Point) -> f64 {
        euclidean(a, b)
    }
}

/// Returns the distance between two points on the unit torus.
///
/// Each axis difference is folded onto the shorter way round a period of 1.0 before
/// the two components are combined, so points near opposite edges are close.
///
/// Co-ordinates are expected to lie in `[0, 1]`. Outside that range an axis
/// difference greater than 1.0 folds to a negative component, which is squared away
/// and yields a meaningless (but finite) distance. No clamping or wrapping of the
/// inputs is attempted.
///
/// # Examples
///
/// ```rust
/// use nearfar::distance::{DistanceMetric, Toroidal};
/// use nearfar::Point;
///
/// let d = Toroidal::dist(&Point::new(0.0, 0.0), &Point::new(0.9, 0.0));
/// assert!((d - 0.1).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Toroidal {}

impl DistanceMetric for Toroidal {
    #[inline]
    fn dist(a: &Point, b: &Point) -> f64 {
        toroidal(a, b)
    }
}

/// Straight-line distance between `a` and `b`.
#[inline]
pub fn euclidean(a: &Point, b: &Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Wraparound distance between `a` and `b` on the unit square.
#[inline]
pub fn toroidal(a: &Point, b: &Point) -> f64 {
    let dx = wrap_axis(a.x, b.x);
    let dy = wrap_axis(a.y, b.y);
    (dx * dx + dy * dy).sqrt()
}

#[inline]
fn wrap_axis(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    if d > 0.5 {
        1.0 - d
    } else {
        d
    }
}

/// Runtime selection between the two metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// [`Euclidean`]
    Euclidean,
    /// [`Toroidal`]
    Toroidal,
}

impl Metric {
    /// Both metrics, in the order the CLI runs them.
    pub const ALL: [Metric; 2] = [Metric::Euclidean, Metric::Toroidal];

    /// Label used in log lines and output file names.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Euclidean => "standard",
            Metric::Toroidal => "wraparound",
        }
    }

    /// Distance between `a` and `b` under this metric.
    #[inline]
    pub fn dist(self, a: &Point, b: &Point) -> f64 {
        match self {
            Metric::Euclidean => Euclidean::dist(a, b),
            Metric::Toroidal => Toroidal::dist(a, b),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Point::new(0.0, 0.0), Point::new(0.9, 0.0), 0.9, 0.1)]
    #[case(Point::new(0.0, 0.0), Point::new(0.0, 0.9), 0.9, 0.1)]
    #[case(Point::new(0.1, 0.1), Point::new(0.9, 0.9), 0.8 * std::f64::consts::SQRT_2, 0.2 * std::f64::consts::SQRT_2)]
    #[case(Point::new(0.2, 0.3), Point::new(0.5, 0.7), 0.5, 0.5)]
    #[case(Point::new(0.0, 0.0), Point::new(0.5, 0.0), 0.5, 0.5)]
    #[case(Point::new(0.25, 0.25), Point::new(0.25, 0.25), 0.0, 0.0)]
    fn metrics_produce_expected_distances(
        #[case] a: Point,
        #[case] b: Point,
        #[case] expected_euclidean: f64,
        #[case] expected_toroidal: f64,
    ) {
        assert!((Euclidean::dist(&a, &b) - expected_euclidean).abs() < 1e-12);
        assert!((Toroidal::dist(&a, &b) - expected_toroidal).abs() < 1e-12);
    }

    #[test]
    fn metrics_are_symmetric_bit_for_bit() {
        let a = Point::new(0.123, 0.987);
        let b = Point::new(0.876, 0.012);

        assert_eq!(Euclidean::dist(&a, &b).to_bits(), Euclidean::dist(&b, &a).to_bits());
        assert_eq!(Toroidal::dist(&a, &b).to_bits(), Toroidal::dist(&b, &a).to_bits());
    }

    #[test]
    fn toroidal_never_exceeds_half_diagonal() {
        let limit = (0.5f64 * 0.5 + 0.5 * 0.5).sqrt();
        for i in 0..=20 {
            for j in 0..=20 {
                let a = Point::new(i as f64 / 20.0, j as f64 / 20.0);
                let d = Toroidal::dist(&Point::new(0.0, 0.0), &a);
                assert!(d <= limit + 1e-12, "{d} > {limit} for {a:?}");
            }
        }
    }

    #[test]
    fn runtime_metric_dispatches_to_static_metric() {
        let a = Point::new(0.05, 0.5);
        let b = Point::new(0.95, 0.5);

        assert_eq!(Metric::Euclidean.dist(&a, &b), Euclidean::dist(&a, &b));
        assert_eq!(Metric::Toroidal.dist(&a, &b), Toroidal::dist(&a, &b));
        assert_eq!(Metric::Euclidean.label(), "standard");
        assert_eq!(Metric::Toroidal.to_string(), "wraparound");
    }
}
