//! The four scanning strategies, and a [`Scanner`] that runs them on a dedicated pool.
//!
//! All strategies share one contract: given at least two points and a metric, produce
//! each point's nearest and furthest neighbour distance plus the two averages. They
//! differ only in how the O(n²) comparisons are divided up:
//!
//! | strategy | pairs visited | partitioning | locking |
//! |---|---|---|---|
//! | [`serial`] | n·(n−1) | none | none |
//! | [`naive`] | n·(n−1) | static, one equal chunk per worker | none |
//! | [`symmetric`] | n·(n−1)/2 | dynamic, per outer index | every pair |
//! | [`optimized`] | n·(n−1)/2 | dynamic, per outer index | only when the pair can improve a slot |
//!
//! The free functions run on the current rayon pool (the global pool unless called
//! from within [`rayon::ThreadPool::install`]). [`Scanner`] owns its own pool so the
//! worker count can be chosen per scan.

use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
#[cfg(feature = "tracing")]
use tracing::{event, span, Level};

use crate::distance::{Euclidean, Metric, Toroidal};
use crate::distance_metric::DistanceMetric;
use crate::error::ScanError;
use crate::extrema::{Extrema, ScanStats};
use crate::point::Point;
use crate::slots::Slots;

/// Selects one of the four scanning strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// [`serial`]
    Serial,
    /// [`naive`]
    Naive,
    /// [`symmetric`]
    Symmetric,
    /// [`optimized`]
    Optimized,
}

impl Strategy {
    /// Every strategy, cheapest to implement first.
    pub const ALL: [Strategy; 4] = [
        Strategy::Serial,
        Strategy::Naive,
        Strategy::Symmetric,
        Strategy::Optimized,
    ];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Serial => "serial",
            Strategy::Naive => "naive",
            Strategy::Symmetric => "symmetric",
            Strategy::Optimized => "optimized",
        }
    }

    /// Runs this strategy on the current rayon pool.
    pub fn run<D: DistanceMetric>(self, points: &[Point]) -> Result<Extrema, ScanError> {
        #[cfg(feature = "tracing")]
        let span = span!(Level::DEBUG, "scan", strategy = self.name(), points = points.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let result = match self {
            Strategy::Serial => serial::<D>(points),
            Strategy::Naive => naive::<D>(points),
            Strategy::Symmetric => symmetric::<D>(points),
            Strategy::Optimized => optimized::<D>(points),
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(extrema) => event!(
                Level::DEBUG,
                elapsed_ms = extrema.elapsed.as_secs_f64() * 1e3,
                comparisons = extrema.stats.comparisons,
                lock_acquisitions = extrema.stats.lock_acquisitions,
                "scan complete"
            ),
            Err(err) => event!(Level::WARN, %err, "scan failed"),
        }

        result
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for a [`Scanner`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Worker threads in the scanner's pool. `None` (or `Some(0)`) sizes the pool
    /// to the available hardware parallelism.
    pub threads: Option<usize>,
}

impl ScanConfig {
    /// A config with a fixed number of worker threads.
    pub fn with_threads(threads: usize) -> Self {
        ScanConfig {
            threads: Some(threads),
        }
    }
}

/// Runs any [`Strategy`] on a thread pool of its own.
///
/// # Examples
///
/// ```rust
/// use nearfar::{Metric, Point, ScanConfig, Scanner, Strategy};
///
/// let points: Vec<Point> = vec![[0.0, 0.0].into(), [0.9, 0.0].into()];
/// let scanner = Scanner::new(ScanConfig::with_threads(2)).unwrap();
///
/// let wrapped = scanner.scan_with(Strategy::Symmetric, &points, Metric::Toroidal).unwrap();
/// assert!((wrapped.nearest[0] - 0.1).abs() < 1e-12);
/// assert_eq!(wrapped.threads, 2);
/// ```
#[derive(Debug)]
pub struct Scanner {
    pool: ThreadPool,
}

impl Scanner {
    /// Builds the scanner's thread pool.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads.unwrap_or(0))
            .thread_name(|idx| format!("nearfar-{idx}"))
            .build()?;

        #[cfg(feature = "tracing")]
        event!(Level::DEBUG, threads = pool.current_num_threads(), "built scan pool");

        Ok(Scanner { pool })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Runs `strategy` over `points` with metric `D`.
    pub fn scan<D: DistanceMetric>(
        &self,
        strategy: Strategy,
        points: &[Point],
    ) -> Result<Extrema, ScanError> {
        self.pool.install(|| strategy.run::<D>(points))
    }

    /// Runs `strategy` over `points` with a metric chosen at runtime.
    pub fn scan_with(
        &self,
        strategy: Strategy,
        points: &[Point],
        metric: Metric,
    ) -> Result<Extrema, ScanError> {
        match metric {
            Metric::Euclidean => self.scan::<Euclidean>(strategy, points),
            Metric::Toroidal => self.scan::<Toroidal>(strategy, points),
        }
    }
}

/// Single-threaded scan over every ordered pair. The reference for the other strategies.
pub fn serial<D: DistanceMetric>(points: &[Point]) -> Result<Extrema, ScanError> {
    check_len(points)?;
    let start = Instant::now();
    let n = points.len();

    let mut nearest = Vec::with_capacity(n);
    let mut furthest = Vec::with_capacity(n);
    let mut total_nearest = 0f64;
    let mut total_furthest = 0f64;

    for idx in 0..n {
        let (near, far) = row_extrema::<D>(points, idx);
        nearest.push(near);
        furthest.push(far);
        total_nearest += near;
        total_furthest += far;
    }

    Ok(finish(
        nearest,
        furthest,
        (total_nearest, total_furthest),
        start,
        1,
        ScanStats {
            comparisons: ordered_pairs(n),
            lock_acquisitions: 0,
        },
    ))
}

/// Ordered-pair scan with the outer loop split into one equal chunk per worker.
///
/// Every index is written by exactly one worker, so there is no locking. Each chunk
/// returns its partial sums, which are added up in chunk order after the join; the
/// totals therefore depend on the worker count but not on scheduling.
pub fn naive<D: DistanceMetric>(points: &[Point]) -> Result<Extrema, ScanError> {
    check_len(points)?;
    let start = Instant::now();
    let n = points.len();
    let threads = rayon::current_num_threads();
    let chunk_len = n.div_ceil(threads);

    let mut nearest = vec![0f64; n];
    let mut furthest = vec![0f64; n];

    let partial_sums: Vec<(f64, f64)> = nearest
        .par_chunks_mut(chunk_len)
        .zip(furthest.par_chunks_mut(chunk_len))
        .enumerate()
        .map(|(chunk_idx, (near_chunk, far_chunk))| {
            let base = chunk_idx * chunk_len;
            let mut sums = (0f64, 0f64);

            for (offset, (near_slot, far_slot)) in
                near_chunk.iter_mut().zip(far_chunk.iter_mut()).enumerate()
            {
                let (near, far) = row_extrema::<D>(points, base + offset);
                *near_slot = near;
                *far_slot = far;
                sums.0 += near;
                sums.1 += far;
            }

            sums
        })
        .collect();

    let totals = partial_sums
        .iter()
        .fold((0f64, 0f64), |acc, &(near, far)| (acc.0 + near, acc.1 + far));

    Ok(finish(
        nearest,
        furthest,
        totals,
        start,
        threads,
        ScanStats {
            comparisons: ordered_pairs(n),
            lock_acquisitions: 0,
        },
    ))
}

/// Unordered-pair scan: each pair `i < j` is measured once and credited to both ends.
///
/// The outer index is handed out one at a time so that the shrinking rows balance
/// across workers. Index `j`'s slot can be written by any worker, so every update to
/// it takes `j`'s lock.
pub fn symmetric<D: DistanceMetric>(points: &[Point]) -> Result<Extrema, ScanError> {
    symmetric_scan::<D, false>(points)
}

/// As [`symmetric`], but reads `j`'s slot before locking it and skips the lock when
/// the pair's distance cannot improve the slot. Produces the same result with far
/// fewer lock acquisitions once slots have converged.
pub fn optimized<D: DistanceMetric>(points: &[Point]) -> Result<Extrema, ScanError> {
    symmetric_scan::<D, true>(points)
}

fn symmetric_scan<D: DistanceMetric, const SPECULATIVE: bool>(
    points: &[Point],
) -> Result<Extrema, ScanError> {
    check_len(points)?;
    let start = Instant::now();
    let n = points.len();
    let threads = rayon::current_num_threads();
    let slots = Slots::new(n)?;

    let merge = |idx: usize, near: f64, far: f64| -> u64 {
        if SPECULATIVE {
            u64::from(slots.merge_speculative(idx, near, far))
        } else {
            slots.merge_locked(idx, near, far);
            1
        }
    };

    let stats = (0..n)
        .into_par_iter()
        .with_max_len(1)
        .map(|i| {
            let p = &points[i];
            let mut near = f64::INFINITY;
            let mut far = f64::NEG_INFINITY;
            let mut locks = 0u64;

            for (j, q) in points.iter().enumerate().skip(i + 1) {
                let d = D::dist(p, q);
                if d < near {
                    near = d;
                }
                if d > far {
                    far = d;
                }
                locks += merge(j, d, d);
            }

            // i's own row is accumulated privately and folded in once; earlier rows may
            // be writing to i's slot concurrently.
            if i + 1 < n {
                locks += merge(i, near, far);
            }

            ScanStats {
                comparisons: (n - i - 1) as u64,
                lock_acquisitions: locks,
            }
        })
        .reduce(ScanStats::default, |a, b| a + b);

    let (nearest, furthest) = slots.into_arrays();
    let totals: (f64, f64) = (nearest.iter().sum(), furthest.iter().sum());

    Ok(finish(nearest, furthest, totals, start, threads, stats))
}

/// Nearest and furthest distance from `points[idx]` to every other point.
#[inline]
fn row_extrema<D: DistanceMetric>(points: &[Point], idx: usize) -> (f64, f64) {
    let p = &points[idx];
    let mut near = f64::INFINITY;
    let mut far = f64::NEG_INFINITY;

    for (j, q) in points.iter().enumerate() {
        if j == idx {
            continue;
        }
        let d = D::dist(p, q);
        if d < near {
            near = d;
        }
        if d > far {
            far = d;
        }
    }

    (near, far)
}

fn check_len(points: &[Point]) -> Result<(), ScanError> {
    if points.len() < 2 {
        return Err(ScanError::InvalidInput { len: points.len() });
    }
    Ok(())
}

fn ordered_pairs(n: usize) -> u64 {
    (n as u64) * (n as u64 - 1)
}

fn finish(
    nearest: Vec<f64>,
    furthest: Vec<f64>,
    (total_nearest, total_furthest): (f64, f64),
    start: Instant,
    threads: usize,
    stats: ScanStats,
) -> Extrema {
    let n = nearest.len() as f64;
    Extrema {
        avg_nearest: total_nearest / n,
        avg_furthest: total_furthest / n,
        nearest,
        furthest,
        elapsed: start.elapsed(),
        threads,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_extrema_close, rand_points, unit_square_corners};
    use rstest::rstest;
    use std::f64::consts::SQRT_2;

    #[rstest]
    #[case(Strategy::Serial)]
    #[case(Strategy::Naive)]
    #[case(Strategy::Symmetric)]
    #[case(Strategy::Optimized)]
    fn unit_square_corners_have_expected_extrema(#[case] strategy: Strategy) {
        let points = unit_square_corners();

        let result = strategy.run::<Euclidean>(&points).unwrap();

        assert_eq!(result.nearest, vec![1.0; 4]);
        for &far in &result.furthest {
            assert!((far - SQRT_2).abs() < 1e-12);
        }
        assert!((result.avg_nearest - 1.0).abs() < 1e-12);
        assert!((result.avg_furthest - 1.41421356).abs() < 1e-8);
    }

    #[rstest]
    #[case(Strategy::Serial, 0)]
    #[case(Strategy::Serial, 1)]
    #[case(Strategy::Naive, 0)]
    #[case(Strategy::Naive, 1)]
    #[case(Strategy::Symmetric, 0)]
    #[case(Strategy::Symmetric, 1)]
    #[case(Strategy::Optimized, 0)]
    #[case(Strategy::Optimized, 1)]
    fn fewer_than_two_points_is_invalid(#[case] strategy: Strategy, #[case] len: usize) {
        let points = vec![Point::new(0.5, 0.5); len];

        let err = strategy.run::<Euclidean>(&points).unwrap_err();

        assert!(matches!(err, ScanError::InvalidInput { len: l } if l == len));
    }

    #[test]
    fn two_points_are_each_others_nearest_and_furthest() {
        let points = vec![Point::new(0.0, 0.0), Point::new(0.9, 0.0)];

        for strategy in Strategy::ALL {
            let euclid = strategy.run::<Euclidean>(&points).unwrap();
            let torus = strategy.run::<Toroidal>(&points).unwrap();

            assert_eq!(euclid.nearest, euclid.furthest);
            assert!((euclid.nearest[0] - 0.9).abs() < 1e-12);
            assert!((torus.nearest[1] - 0.1).abs() < 1e-12);
        }
    }

    #[rstest]
    #[case(Strategy::Naive)]
    #[case(Strategy::Symmetric)]
    #[case(Strategy::Optimized)]
    fn parallel_strategies_match_serial(#[case] strategy: Strategy) {
        let points = rand_points(500, 7);

        let expected = serial::<Toroidal>(&points).unwrap();
        let actual = strategy.run::<Toroidal>(&points).unwrap();

        assert_extrema_close(&expected, &actual, 1e-9);
    }

    #[test]
    fn duplicate_points_have_zero_nearest_distance() {
        let points = vec![
            Point::new(0.2, 0.2),
            Point::new(0.2, 0.2),
            Point::new(0.8, 0.8),
        ];

        for strategy in Strategy::ALL {
            let result = strategy.run::<Euclidean>(&points).unwrap();
            assert_eq!(result.nearest[0], 0.0);
            assert_eq!(result.nearest[1], 0.0);
            assert!(result.nearest[2] > 0.0);
        }
    }

    #[test]
    fn comparison_counts_match_pairs_visited() {
        let n = 37u64;
        let points = rand_points(n as usize, 3);

        for strategy in Strategy::ALL {
            let result = strategy.run::<Euclidean>(&points).unwrap();
            let expected = match strategy {
                Strategy::Serial | Strategy::Naive => n * (n - 1),
                Strategy::Symmetric | Strategy::Optimized => n * (n - 1) / 2,
            };
            assert_eq!(result.stats.comparisons, expected, "{strategy}");
        }
    }

    #[test]
    fn symmetric_locks_every_pair_plus_each_row_merge() {
        let n = 64u64;
        let points = rand_points(n as usize, 11);

        let serial = serial::<Euclidean>(&points).unwrap();
        let naive = naive::<Euclidean>(&points).unwrap();
        let symmetric = symmetric::<Euclidean>(&points).unwrap();

        assert_eq!(serial.stats.lock_acquisitions, 0);
        assert_eq!(naive.stats.lock_acquisitions, 0);
        assert_eq!(symmetric.stats.lock_acquisitions, n * (n - 1) / 2 + (n - 1));
    }

    #[test]
    fn naive_uses_one_chunk_per_worker_even_when_points_do_not_divide() {
        let points = rand_points(103, 5);
        let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();

        let expected = serial::<Euclidean>(&points).unwrap();
        let actual = pool.install(|| naive::<Euclidean>(&points)).unwrap();

        assert_eq!(actual.threads, 4);
        assert_eq!(expected.nearest, actual.nearest);
        assert_eq!(expected.furthest, actual.furthest);
    }

    #[test]
    fn scanner_reports_its_thread_count() {
        let points = rand_points(50, 1);
        let scanner = Scanner::new(ScanConfig::with_threads(3)).unwrap();

        assert_eq!(scanner.threads(), 3);
        for strategy in [Strategy::Naive, Strategy::Symmetric, Strategy::Optimized] {
            let result = scanner.scan::<Euclidean>(strategy, &points).unwrap();
            assert_eq!(result.threads, 3);
        }
        let result = scanner.scan::<Euclidean>(Strategy::Serial, &points).unwrap();
        assert_eq!(result.threads, 1);
    }

    #[test]
    fn zero_threads_means_default_pool_size() {
        let scanner = Scanner::new(ScanConfig::with_threads(0)).unwrap();
        assert!(scanner.threads() >= 1);

        let scanner = Scanner::new(ScanConfig::default()).unwrap();
        assert!(scanner.threads() >= 1);
    }
}
