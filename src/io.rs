//! Collaborators around the scans: where points come from and where results go.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "tracing")]
use tracing::info;

use crate::error::IoError;
use crate::point::Point;

/// Reads points from a headerless CSV file with one `x,y` row per point.
///
/// Blank lines are skipped and whitespace around values is ignored.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Point>, IoError> {
    let path = path.as_ref();
    let csv_err = |source| IoError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let points = reader
        .deserialize()
        .collect::<Result<Vec<Point>, _>>()
        .map_err(csv_err)?;

    #[cfg(feature = "tracing")]
    info!(count = points.len(), path = %path.display(), "loaded points");

    Ok(points)
}

/// `n` points uniformly distributed over the unit square.
///
/// With a seed the points are reproducible; without one the generator is seeded
/// from the OS.
pub fn generate_random_points(n: usize, seed: Option<u64>) -> Vec<Point> {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };

    let points = random_points_from(&mut rng, n);

    #[cfg(feature = "tracing")]
    info!(count = n, ?seed, "generated random points");

    points
}

pub(crate) fn random_points_from<R: Rng>(rng: &mut R, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| Point::new(rng.random::<f64>(), rng.random::<f64>()))
        .collect()
}

/// Writes `distances` to `dir/file_name`, one value per line with six decimal places.
///
/// `dir` is created if it does not exist. Returns the path written.
pub fn save_distances<P: AsRef<Path>>(
    dir: P,
    file_name: &str,
    distances: &[f64],
) -> Result<PathBuf, IoError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| IoError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file_name);
    let write_err = |source| IoError::Write {
        path: path.clone(),
        source,
    };

    let mut writer = BufWriter::new(File::create(&path).map_err(write_err)?);
    for d in distances {
        writeln!(writer, "{d:.6}").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;

    Ok(path)
}

/// Name of the file the nearest distances for `label` are saved to.
pub fn nearest_file_name(label: &str) -> String {
    format!("nearest_{label}.txt")
}

/// Name of the file the furthest distances for `label` are saved to.
pub fn furthest_file_name(label: &str) -> String {
    format!("furthest_{label}.txt")
}

/// Human-readable summary of a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    /// average nearest-neighbour distance
    pub avg_nearest: f64,
    /// average furthest-neighbour distance
    pub avg_furthest: f64,
    /// worker threads used
    pub threads: usize,
}

const RULE: &str = "---------------------------------------------------------------";

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "processing complete using {} threads", self.threads)?;
        writeln!(
            f,
            "average distance to nearest neighbour: {:.6}",
            self.avg_nearest
        )?;
        writeln!(
            f,
            "average distance to furthest neighbour: {:.6}",
            self.avg_furthest
        )?;
        write!(f, "{RULE}")
    }
}

/// Prints a [`Summary`] to stdout.
pub fn print_summary(avg_nearest: f64, avg_furthest: f64, threads: usize) {
    println!(
        "{}",
        Summary {
            avg_nearest,
            avg_furthest,
            threads,
        }
    );
}
