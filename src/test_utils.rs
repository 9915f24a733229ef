//! Helpers shared by the unit tests, integration tests and benches.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::extrema::{relative_diff, Extrema};
use crate::io::random_points_from;
use crate::point::Point;

/// `n` points uniformly distributed over the unit square, reproducible from `seed`.
pub fn rand_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_points_from(&mut rng, n)
}

/// The corners of the unit square, in the order (0,0), (1,0), (0,1), (1,1).
pub fn unit_square_corners() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(0.0, 1.0),
        Point::new(1.0, 1.0),
    ]
}

/// Panics unless both per-point arrays and both averages agree within relative `tol`.
pub fn assert_extrema_close(expected: &Extrema, actual: &Extrema, tol: f64) {
    assert_eq!(expected.len(), actual.len(), "point count");

    for (idx, (&e, &a)) in expected.nearest.iter().zip(&actual.nearest).enumerate() {
        assert!(relative_diff(e, a) <= tol, "nearest[{idx}]: {e} vs {a}");
    }
    for (idx, (&e, &a)) in expected.furthest.iter().zip(&actual.furthest).enumerate() {
        assert!(relative_diff(e, a) <= tol, "furthest[{idx}]: {e} vs {a}");
    }
    assert!(
        relative_diff(expected.avg_nearest, actual.avg_nearest) <= tol,
        "avg_nearest: {} vs {}",
        expected.avg_nearest,
        actual.avg_nearest
    );
    assert!(
        relative_diff(expected.avg_furthest, actual.avg_furthest) <= tol,
        "avg_furthest: {} vs {}",
        expected.avg_furthest,
        actual.avg_furthest
    );
}
