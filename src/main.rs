//! Demo driver: runs every engine on one random input, traces the leveled
//! runs, and verifies all parallel results against the sequential oracles.

use std::env;
use std::fmt;
use std::process::ExitCode;

use log::info;

use treescan::{
    blelloch, compare_reduce_strategies, compare_scan_strategies, reduction, EngineConfig,
    LevelObserver, MaxOp, Phase, Result, SumOp, ValueSource, WorkerPool, DEFAULT_SNAPSHOT_PREFIX,
};

const DEFAULT_LEN: usize = 1000;

struct Options {
    len: usize,
    seed: Option<u64>,
    workers: usize,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> std::result::Result<Self, String> {
        let mut len = DEFAULT_LEN;
        let mut seed = None;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or("--seed requires a value")?;
                    seed = Some(
                        value
                            .parse()
                            .map_err(|_| format!("invalid seed: {}", value))?,
                    );
                }
                other => {
                    len = other
                        .parse()
                        .map_err(|_| format!("invalid length: {}", other))?;
                    if len == 0 {
                        return Err("length must be at least 1".to_string());
                    }
                }
            }
        }
        let workers = match env::var("TREESCAN_WORKERS") {
            Ok(value) => value
                .parse()
                .map_err(|_| format!("invalid TREESCAN_WORKERS value: {}", value))?,
            Err(_) => EngineConfig::default().workers,
        };
        Ok(Self { len, seed, workers })
    }
}

/// Prints a bounded prefix of the working buffer after every level.
struct ConsoleObserver {
    prefix: usize,
}

impl<T: Copy + fmt::Display> LevelObserver<T> for ConsoleObserver {
    fn level_done(&mut self, phase: Phase, level: u32, stride: usize, buffer: &[T]) {
        let label = match phase {
            Phase::Reduce => "level",
            Phase::Upsweep => "upsweep",
            Phase::Downsweep => "downsweep",
        };
        println!(
            "  {} {} (stride {}): {}",
            label,
            level,
            stride,
            joined_prefix(buffer, self.prefix)
        );
    }
}

fn joined_prefix<T: fmt::Display>(values: &[T], max: usize) -> String {
    let take = values.len().min(max);
    let shown: Vec<String> = values[..take].iter().map(|v| v.to_string()).collect();
    let suffix = if values.len() > take { " ..." } else { "" };
    format!("{}{}", shown.join(" "), suffix)
}

fn run_maximum(pool: &WorkerPool, source: &mut ValueSource, len: usize) -> Result<bool> {
    let values = source.sequence(len, 0i64, 999);
    println!("== maximum of {} values in [0, 999] ==", len);
    println!(
        "input: {}",
        joined_prefix(&values, DEFAULT_SNAPSHOT_PREFIX)
    );

    println!("tree reduction trace:");
    let mut console = ConsoleObserver {
        prefix: DEFAULT_SNAPSHOT_PREFIX,
    };
    let traced = reduction::tree_reduce_observed(pool, &values, MaxOp, &mut console)?;
    println!(
        "  maximum {} after {} levels",
        traced.value, traced.sync_levels
    );

    let comparison = compare_reduce_strategies(pool, &values, MaxOp)?;
    println!(
        "sequential oracle: {} in {:?}",
        comparison.oracle, comparison.oracle_elapsed
    );
    for report in &comparison.reports {
        match &report.outcome {
            Ok(outcome) => {
                let verdict = report
                    .check
                    .as_ref()
                    .map(|check| check.to_string())
                    .unwrap_or_default();
                println!(
                    "  {:<18} value {:>6}  levels {:>2}  {:>12?}  {}",
                    report.strategy, outcome.value, outcome.sync_levels, report.elapsed, verdict
                );
            }
            Err(err) => println!("  {:<18} error: {}", report.strategy, err),
        }
    }
    println!();
    Ok(comparison.all_passed())
}

fn run_prefix_sum(pool: &WorkerPool, source: &mut ValueSource, len: usize) -> Result<bool> {
    let values = source.sequence(len, 1i64, 100);
    println!("== inclusive prefix sum of {} values in [1, 100] ==", len);
    println!(
        "input: {}",
        joined_prefix(&values, DEFAULT_SNAPSHOT_PREFIX)
    );

    println!("blelloch trace:");
    let mut console = ConsoleObserver {
        prefix: DEFAULT_SNAPSHOT_PREFIX,
    };
    let traced = blelloch::scan_observed(pool, &values, SumOp, &mut console)?;
    println!(
        "  total {} with padded capacity {} after {} levels",
        traced.total(),
        traced.padded_len.unwrap_or(values.len()),
        traced.sync_levels
    );

    let comparison = compare_scan_strategies(pool, &values, SumOp)?;
    if let Some(total) = comparison.oracle.last() {
        println!(
            "sequential oracle total: {} in {:?}",
            total, comparison.oracle_elapsed
        );
    }
    for report in &comparison.reports {
        match &report.outcome {
            Ok(outcome) => {
                let verdict = report
                    .check
                    .as_ref()
                    .map(|check| check.to_string())
                    .unwrap_or_default();
                println!(
                    "  {:<18} total {:>8}  levels {:>2}  {:>12?}  {}",
                    report.strategy,
                    outcome.total(),
                    outcome.sync_levels,
                    report.elapsed,
                    verdict
                );
            }
            Err(err) => println!("  {:<18} error: {}", report.strategy, err),
        }
    }
    println!();
    Ok(comparison.all_passed())
}

fn run(options: &Options) -> Result<bool> {
    let pool = WorkerPool::new(&EngineConfig::with_workers(options.workers))?;
    info!(
        "pool ready: {} workers, input length {}",
        pool.workers(),
        options.len
    );
    let mut source = match options.seed {
        Some(seed) => {
            println!(
                "treescan demo: {} elements, {} workers, seed {}",
                options.len,
                pool.workers(),
                seed
            );
            ValueSource::from_seed(seed)
        }
        None => {
            println!(
                "treescan demo: {} elements, {} workers, entropy-seeded",
                options.len,
                pool.workers()
            );
            ValueSource::from_entropy()
        }
    };
    println!();

    let maximum_ok = run_maximum(&pool, &mut source, options.len)?;
    let prefix_ok = run_prefix_sum(&pool, &mut source, options.len)?;

    let all_ok = maximum_ok && prefix_ok;
    println!(
        "verification {}",
        if all_ok { "PASSED" } else { "FAILED" }
    );
    Ok(all_ok)
}

fn main() -> ExitCode {
    env_logger::init();
    let options = match Options::parse(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("usage: treescan [LEN] [--seed SEED]");
            return ExitCode::FAILURE;
        }
    };
    match run(&options) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
