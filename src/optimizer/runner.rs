use crate::bv::Expr;
use crate::config::{Config, MinimizeEncoding, MoveFamilies};
use crate::error::SlsResult;
use crate::model::Model;
use crate::optimizer::best::{BestModel, BestModelCache};
use crate::optimizer::moves::MoveCatalog;
use crate::optimizer::{Budget, HillClimber, ProgressCallback, SearchStats};
use crate::search::{ConstraintSearch, SatStatus, WalkSearch};
use crate::tracker::{AssertionTracker, HardTracker, ObjectiveEvaluator, ObjectiveTracker};
use clap::ValueEnum;
use fastrand::Rng;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::Display;
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub time_limit: Duration,
    pub max_restarts: usize,
    pub seed: Option<u64>,
    pub minimize_encoding: MinimizeEncoding,
    pub moves: MoveFamilies,
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            time_limit: Duration::try_from_secs_f64(cfg.search.time_limit_secs)
                .unwrap_or(Duration::MAX),
            max_restarts: cfg.search.max_restarts,
            seed: cfg.search.seed,
            minimize_encoding: cfg.search.minimize_encoding,
            moves: cfg.moves,
        }
    }
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub is_sat: SatStatus,
    /// Best score of the maximized expression (the negated or complemented
    /// objective when minimizing).
    pub optimum: Option<BigUint>,
    /// The caller's objective evaluated on the best model.
    pub objective_value: Option<BigUint>,
    pub model: Option<Model>,
    pub stats: SearchStats,
}

/// Top-level driver: feasibility first, then hill climbing on the objective.
pub struct Optimizer<H, O, S> {
    hard: H,
    objective: O,
    search: S,
    options: OptimizationOptions,
    catalog: MoveCatalog,
    rng: Rng,
    best: BestModelCache,
}

impl<H, O, S> Optimizer<H, O, S>
where
    H: HardTracker,
    O: ObjectiveTracker,
    S: ConstraintSearch,
{
    pub fn new(hard: H, objective: O, search: S, options: OptimizationOptions) -> Self {
        let rng = match options.seed {
            Some(s) => Rng::with_seed(s),
            None => Rng::new(),
        };
        let catalog = MoveCatalog::new(options.moves);
        Self {
            hard,
            objective,
            search,
            options,
            catalog,
            rng,
            best: BestModelCache::new(),
        }
    }

    pub fn hard(&self) -> &H {
        &self.hard
    }

    pub fn objective_tracker(&self) -> &O {
        &self.objective
    }

    pub fn constraint_search(&self) -> &S {
        &self.search
    }

    /// Best model of the last optimize call.
    pub fn best(&self) -> Option<&BestModel> {
        self.best.get()
    }

    /// The expression actually maximized for `direction`.
    pub fn target_for(&self, objective: &Expr, direction: Direction) -> Expr {
        match (direction, self.options.minimize_encoding) {
            (Direction::Maximize, _) => objective.clone(),
            (Direction::Minimize, MinimizeEncoding::Negate) => Expr::negate(objective.clone()),
            (Direction::Minimize, MinimizeEncoding::Complement) => {
                Expr::Not(Box::new(objective.clone()))
            }
        }
    }

    pub fn optimize<CB: ProgressCallback + ?Sized>(
        &mut self,
        objective: &Expr,
        initial_model: Option<&Model>,
        direction: Direction,
        callback: &CB,
    ) -> SlsResult<OptimizationResult> {
        info!(%direction, width = objective.width(), "Objective received");

        let mut budget = Budget::new(self.options.time_limit, self.options.max_restarts);
        let mut stats = SearchStats::default();
        self.best = BestModelCache::new();

        if let Some(model) = initial_model {
            info!(vars = model.len(), "Initial model provided");
            self.hard.set_model(model);
        }

        let mut is_sat = if self.hard.is_sat() {
            SatStatus::Sat
        } else {
            SatStatus::Unknown
        };

        while is_sat != SatStatus::Sat {
            info!(restarts_left = budget.restarts_left(), "Satisfying...");
            is_sat = self.search.search(&mut self.hard, &mut self.rng, &budget);
            if is_sat == SatStatus::Sat {
                break;
            }
            self.hard.randomize(&mut self.rng);
            if !(budget.has_time() && budget.try_restart()) {
                break;
            }
        }

        if is_sat != SatStatus::Sat {
            stats.restarts = budget.restarts();
            stats.elapsed = budget.elapsed();
            info!("No satisfying model found");
            return Ok(OptimizationResult {
                is_sat,
                optimum: None,
                objective_value: None,
                model: None,
                stats,
            });
        }

        let target = self.target_for(objective, direction);
        let optimum = HillClimber::new(
            &mut self.hard,
            &mut self.objective,
            &self.catalog,
            &mut self.rng,
        )
        .maximize(&target, &mut budget, &mut stats, &mut self.best, callback)?;

        stats.restarts = budget.restarts();
        stats.elapsed = budget.elapsed();

        let model = self.best.get().map(|b| b.model.clone());
        let objective_value = model.as_ref().map(|m| objective.eval(m));
        info!(
            %optimum,
            moves = stats.moves,
            restarts = stats.restarts,
            "Optimization finished"
        );

        Ok(OptimizationResult {
            is_sat,
            optimum: Some(optimum),
            objective_value,
            model,
            stats,
        })
    }

    pub fn maximize<CB: ProgressCallback + ?Sized>(
        &mut self,
        objective: &Expr,
        initial_model: Option<&Model>,
        callback: &CB,
    ) -> SlsResult<OptimizationResult> {
        self.optimize(objective, initial_model, Direction::Maximize, callback)
    }

    pub fn minimize<CB: ProgressCallback + ?Sized>(
        &mut self,
        objective: &Expr,
        initial_model: Option<&Model>,
        callback: &CB,
    ) -> SlsResult<OptimizationResult> {
        self.optimize(objective, initial_model, Direction::Minimize, callback)
    }
}

/// The reference stack: assertion tracker, objective evaluator and walk search.
pub type DefaultOptimizer = Optimizer<AssertionTracker, ObjectiveEvaluator, WalkSearch>;

impl DefaultOptimizer {
    pub fn with_config(hard: AssertionTracker, config: &Config) -> Self {
        let search = WalkSearch::new(
            config.search.walk_steps,
            config.search.walk_noise,
            config.moves,
        );
        Optimizer::new(
            hard,
            ObjectiveEvaluator::default(),
            search,
            OptimizationOptions::from(config),
        )
    }
}
