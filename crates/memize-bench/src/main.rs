//! memize-bench - compare memoization strategies over a synthetic workload

mod report;
mod workload;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use memize::{memoize_indexed_with, memoize_queue_with, memoize_with, CacheStats, Options};
use tracing::{debug, info};

use crate::report::Row;
use crate::workload::Workload;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of calls in the workload
    #[arg(short = 'n', long, default_value_t = 100_000)]
    calls: usize,

    /// Number of distinct argument pairs
    #[arg(short, long, default_value_t = 256)]
    distinct: u64,

    /// Maximum cached records (0 = unbounded)
    #[arg(short, long, default_value_t = 0)]
    max_size: usize,

    /// JSON options file, overrides --max-size
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strategy to run
    #[arg(short, long, value_enum, default_value_t = Strategy::All)]
    strategy: Strategy,

    /// Workload seed
    #[arg(long, default_value_t = 0x9E37_79B9_7F4A_7C15)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    All,
    Recency,
    Queue,
    Indexed,
}

impl Strategy {
    fn includes(self, other: Strategy) -> bool {
        self == Strategy::All || self == other
    }
}

/// Work performed by the wrapped function
fn fibonacci_sum(args: &[u64]) -> u64 {
    let n = args.iter().copied().fold(0, u64::wrapping_add) % 90;
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    a
}

fn resolve_options(args: &Args) -> Result<Options> {
    match &args.config {
        Some(path) => Options::load(path)
            .with_context(|| format!("failed to load options from {}", path.display())),
        None => Ok(Options::max_size(args.max_size)),
    }
}

fn run(name: &str, workload: &Workload, mut call: impl FnMut(&[u64]) -> u64) -> (Row, u64) {
    let start = Instant::now();
    let mut checksum = 0u64;
    for pair in workload.calls() {
        checksum = checksum.wrapping_add(call(pair));
    }
    let elapsed = start.elapsed();
    debug!(strategy = name, ?elapsed, "run finished");

    (Row::timed(name, workload.call_count(), elapsed), checksum)
}

fn with_stats(row: Row, stats: &CacheStats, records: usize) -> Row {
    row.with_hit_ratio(stats.hit_ratio())
        .with_evictions(stats.evictions())
        .with_records(records)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let options = resolve_options(&args)?;

    info!("memize-bench v{}", env!("CARGO_PKG_VERSION"));
    info!(
        calls = args.calls,
        distinct = args.distinct,
        max_size = ?options.max_size,
        "generating workload"
    );

    let workload = Workload::skewed(args.calls, args.distinct, args.seed);
    let mut rows = Vec::new();

    let (baseline, expected) = run("unmemoized", &workload, fibonacci_sum);
    rows.push(baseline);

    if args.strategy.includes(Strategy::Recency) {
        let mut memoized = memoize_with(fibonacci_sum, options);
        let (row, checksum) = run("recency", &workload, |pair| memoized.call(pair));
        anyhow::ensure!(checksum == expected, "recency returned wrong results");
        rows.push(with_stats(row, memoized.stats(), memoized.len()));
    }

    if args.strategy.includes(Strategy::Queue) {
        let mut memoized = memoize_queue_with(fibonacci_sum, options);
        let (row, checksum) = run("queue", &workload, |pair| memoized.call(pair));
        anyhow::ensure!(checksum == expected, "queue returned wrong results");
        rows.push(with_stats(row, memoized.stats(), memoized.len()));
    }

    if args.strategy.includes(Strategy::Indexed) {
        let mut memoized = memoize_indexed_with(fibonacci_sum, options);
        let (row, checksum) = run("indexed", &workload, |pair| memoized.call(pair));
        anyhow::ensure!(checksum == expected, "indexed returned wrong results");
        rows.push(with_stats(row, memoized.stats(), memoized.len()));
    }

    print!("{}", report::render(&rows));
    Ok(())
}
