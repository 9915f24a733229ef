use std::error::Error;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use elapsed::ElapsedDuration;
use nearfar::io::{
    furthest_file_name, generate_random_points, nearest_file_name, print_summary, read_csv,
    save_distances,
};
use nearfar::{Metric, Point, ScanConfig, Scanner, Strategy};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliStrategy {
    Serial,
    Naive,
    Symmetric,
    Optimized,
    All,
}

impl CliStrategy {
    fn strategies(self) -> Vec<Strategy> {
        match self {
            CliStrategy::Serial => vec![Strategy::Serial],
            CliStrategy::Naive => vec![Strategy::Naive],
            CliStrategy::Symmetric => vec![Strategy::Symmetric],
            CliStrategy::Optimized => vec![Strategy::Optimized],
            CliStrategy::All => Strategy::ALL.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliMetric {
    #[value(name = "standard")]
    Standard,
    #[value(name = "wraparound")]
    Wraparound,
    Both,
}

impl CliMetric {
    fn metrics(self) -> Vec<Metric> {
        match self {
            CliMetric::Standard => vec![Metric::Euclidean],
            CliMetric::Wraparound => vec![Metric::Toroidal],
            CliMetric::Both => Metric::ALL.to_vec(),
        }
    }
}

/// Nearest and furthest neighbour distances for every point in a 2D point set
#[derive(Parser, Debug)]
#[command(name = "nearfar", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "random"])))]
struct Cli {
    /// Headerless CSV file of `x,y` rows
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Generate this many uniform random points in the unit square instead
    #[arg(long, value_name = "N")]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long)]
    seed: Option<u64>,

    /// Scanning strategy
    #[arg(long, value_enum, default_value_t = CliStrategy::Naive)]
    strategy: CliStrategy,

    /// Distance metric
    #[arg(long, value_enum, default_value_t = CliMetric::Both)]
    metric: CliMetric,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    threads: Option<usize>,

    /// Directory the distance files are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Skip writing the distance files
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "tracing")]
    {
        let subscriber = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let cli = Cli::parse();

    let points: Vec<Point> = match (&cli.input, cli.random) {
        (Some(path), _) => read_csv(path)?,
        (None, Some(n)) => generate_random_points(n, cli.seed),
        (None, None) => return Err("one of --input or --random is required".into()),
    };
    println!("Loaded {} points", points.len());

    let scanner = Scanner::new(ScanConfig {
        threads: cli.threads,
    })?;

    for metric in cli.metric.metrics() {
        for strategy in cli.strategy.strategies() {
            let label = if matches!(cli.strategy, CliStrategy::All) {
                format!("{}_{}", metric.label(), strategy.name())
            } else {
                metric.label().to_string()
            };

            println!("start analyzing for: {label} geometry ({strategy})...");
            let result = scanner.scan_with(strategy, &points, metric)?;

            print_summary(result.avg_nearest, result.avg_furthest, result.threads);
            println!("time taken: {}", ElapsedDuration::new(result.elapsed));

            if !cli.no_save {
                save_distances(&cli.output_dir, &nearest_file_name(&label), &result.nearest)?;
                save_distances(&cli.output_dir, &furthest_file_name(&label), &result.furthest)?;
                println!("saved output files for {label}.\n");
            }
        }
    }

    Ok(())
}
