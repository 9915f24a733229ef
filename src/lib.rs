#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # Nearfar
//!
//! Brute-force nearest and furthest neighbour distances for every point of a 2D point set.
//!
//! Every point is compared against every other point, so the work is O(n²). What nearfar
//! provides is four interchangeable ways of doing that work, intended to be benchmarked
//! against each other:
//!
//! * [`Strategy::Serial`]: single-threaded reference scan over all ordered pairs.
//! * [`Strategy::Naive`]: the same ordered-pair scan with the outer loop split statically
//!   across a rayon pool. No shared mutable state.
//! * [`Strategy::Symmetric`]: scans each unordered pair once and writes both ends, guarding
//!   each point's result slot with its own lock.
//! * [`Strategy::Optimized`]: as `Symmetric`, but reads a slot speculatively before locking
//!   and skips the lock when the new distance cannot improve it.
//!
//! Two metrics are available: planar [`Euclidean`](distance::Euclidean) distance and
//! [`Toroidal`](distance::Toroidal) ("wraparound") distance on the unit square.
//!
//! ## Usage
//! ```rust
//! use nearfar::distance::Euclidean;
//! use nearfar::{Point, ScanConfig, Scanner, Strategy};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(1.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(1.0, 1.0),
//! ];
//!
//! let scanner = Scanner::new(ScanConfig::with_threads(2)).unwrap();
//! let result = scanner.scan::<Euclidean>(Strategy::Optimized, &points).unwrap();
//!
//! assert_eq!(result.nearest, vec![1.0; 4]);
//! assert!((result.avg_furthest - 2f64.sqrt()).abs() < 1e-12);
//! ```

pub mod distance;
pub mod distance_metric;
pub mod error;
pub mod extrema;
pub mod io;
pub mod point;
pub mod scan;
mod slots;
#[doc(hidden)]
pub mod test_utils;

pub use crate::distance::Metric;
pub use crate::distance_metric::DistanceMetric;
pub use crate::error::{IoError, ScanError};
pub use crate::extrema::{Extrema, ScanStats};
pub use crate::point::Point;
pub use crate::scan::{ScanConfig, Scanner, Strategy};
