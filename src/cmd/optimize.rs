use crate::reports;
use bvopt::config::Config;
use bvopt::optimizer::SearchStats;
use bvopt::problem::Problem;
use bvopt::{DefaultOptimizer, Direction, SlsResult};
use clap::Args;
use num_bigint::BigUint;
use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Problem file (JSON).
    pub problem: String,

    /// Minimize the objective regardless of the problem file.
    #[arg(long, conflicts_with = "maximize")]
    pub minimize: bool,

    /// Maximize the objective regardless of the problem file.
    #[arg(long)]
    pub maximize: bool,
}

impl OptimizeArgs {
    pub fn direction(&self) -> Option<Direction> {
        match (self.minimize, self.maximize) {
            (true, _) => Some(Direction::Minimize),
            (_, true) => Some(Direction::Maximize),
            _ => None,
        }
    }
}

pub fn run(problem: &Problem, config: &Config, direction: Direction) -> SlsResult<()> {
    println!(
        "\n🔥 Optimizing ({}) over {} variables, {} constraints",
        direction,
        problem.signature.len(),
        problem.assertions.len()
    );

    let mut optimizer = DefaultOptimizer::with_config(problem.hard_tracker(), config);

    let last_report = Cell::new(Instant::now());
    let progress = |stats: &SearchStats, best: &BigUint| {
        if last_report.get().elapsed() >= Duration::from_secs(1) {
            info!(
                iterations = stats.iterations,
                moves = stats.moves,
                restarts = stats.restarts,
                best = %best,
                "Progress"
            );
            last_report.set(Instant::now());
        }
        true
    };

    let result = optimizer.optimize(
        &problem.objective,
        problem.initial.as_ref(),
        direction,
        &progress,
    )?;

    reports::print_result(&result, direction);
    if let Some(model) = &result.model {
        reports::print_model(&problem.signature, model);
    }
    reports::print_stats(&result.stats);
    reports::print_move_kinds(&result.stats);
    Ok(())
}
