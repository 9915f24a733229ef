//! The result of a scan.

use std::ops::Add;
use std::time::Duration;

/// Work counters recorded by a scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// number of times the distance metric was evaluated
    pub comparisons: u64,
    /// number of per-point lock acquisitions
    pub lock_acquisitions: u64,
}

impl Add for ScanStats {
    type Output = ScanStats;

    #[inline]
    fn add(self, rhs: ScanStats) -> ScanStats {
        ScanStats {
            comparisons: self.comparisons + rhs.comparisons,
            lock_acquisitions: self.lock_acquisitions + rhs.lock_acquisitions,
        }
    }
}

/// Per-point nearest and furthest neighbour distances, plus their averages.
///
/// `nearest[i]` and `furthest[i]` are indexed identically to the point slice the
/// scan was run on.
#[derive(Clone, Debug, PartialEq)]
pub struct Extrema {
    /// distance from each point to its nearest other point
    pub nearest: Vec<f64>,
    /// distance from each point to its furthest other point
    pub furthest: Vec<f64>,
    /// mean of `nearest`
    pub avg_nearest: f64,
    /// mean of `furthest`
    pub avg_furthest: f64,
    /// wall-clock time of the scan itself, excluding pool construction
    pub elapsed: Duration,
    /// number of worker threads available to the scan
    pub threads: usize,
    /// work counters
    pub stats: ScanStats,
}

impl Extrema {
    /// Number of points the scan covered.
    pub fn len(&self) -> usize {
        self.nearest.len()
    }

    /// True if the scan covered no points. Never the case for a successful scan.
    pub fn is_empty(&self) -> bool {
        self.nearest.is_empty()
    }

    /// Largest relative difference between the per-point arrays of `self` and `other`,
    /// or `None` if they cover a different number of points.
    pub fn max_relative_diff(&self, other: &Extrema) -> Option<f64> {
        if self.len() != other.len() {
            return None;
        }

        let diff = |a: &[f64], b: &[f64]| {
            a.iter()
                .zip(b)
                .map(|(&x, &y)| relative_diff(x, y))
                .fold(0f64, f64::max)
        };

        Some(diff(&self.nearest, &other.nearest).max(diff(&self.furthest, &other.furthest)))
    }
}

#[inline]
pub(crate) fn relative_diff(a: f64, b: f64) -> f64 {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extrema(nearest: Vec<f64>, furthest: Vec<f64>) -> Extrema {
        Extrema {
            nearest,
            furthest,
            avg_nearest: 0.0,
            avg_furthest: 0.0,
            elapsed: Duration::ZERO,
            threads: 1,
            stats: ScanStats::default(),
        }
    }

    #[test]
    fn stats_add_componentwise() {
        let a = ScanStats {
            comparisons: 10,
            lock_acquisitions: 3,
        };
        let b = ScanStats {
            comparisons: 5,
            lock_acquisitions: 1,
        };

        assert_eq!(
            a + b,
            ScanStats {
                comparisons: 15,
                lock_acquisitions: 4
            }
        );
    }

    #[test]
    fn max_relative_diff_covers_both_arrays() {
        let a = extrema(vec![1.0, 2.0], vec![4.0, 4.0]);
        let b = extrema(vec![1.0, 2.0], vec![4.0, 5.0]);

        assert_eq!(a.max_relative_diff(&a), Some(0.0));
        assert!((a.max_relative_diff(&b).unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(a.max_relative_diff(&extrema(vec![1.0], vec![1.0])), None);
    }
}
