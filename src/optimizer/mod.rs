pub mod best;
pub mod diversify;
pub mod moves;
pub mod runner;
pub mod selector;
pub mod whatif;

use fastrand::Rng;
use fnv::FnvHashMap;
use num_bigint::BigUint;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use self::best::BestModelCache;
use self::moves::{MoveCatalog, MoveKind};
use self::whatif::Speculation;
use crate::arith;
use crate::bv::Expr;
use crate::error::SlsResult;
use crate::model::VarId;
use crate::tracker::{HardTracker, ObjectiveTracker};

/// Wall-clock deadline and restart counter for one optimize call.
#[derive(Debug, Clone)]
pub struct Budget {
    start: Instant,
    limit: Duration,
    restarts: usize,
    max_restarts: usize,
}

impl Budget {
    pub fn new(limit: Duration, max_restarts: usize) -> Self {
        Self {
            start: Instant::now(),
            limit,
            restarts: 0,
            max_restarts,
        }
    }

    pub fn has_time(&self) -> bool {
        self.start.elapsed() < self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn restarts_left(&self) -> usize {
        self.max_restarts.saturating_sub(self.restarts)
    }

    pub fn within_restarts(&self) -> bool {
        self.restarts <= self.max_restarts
    }

    /// Counts a restart and reports whether the count before it was still
    /// under the maximum.
    pub fn try_restart(&mut self) -> bool {
        let ok = self.restarts < self.max_restarts;
        self.restarts += 1;
        ok
    }

    pub fn note_restart(&mut self) {
        self.restarts += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub iterations: usize,
    pub moves: usize,
    /// Committed moves per kind.
    pub move_kinds: FnvHashMap<MoveKind, usize>,
    pub diversifications: usize,
    pub restarts: usize,
    pub what_if_evals: usize,
    pub elapsed: Duration,
    /// Every committed move and accepted diversification, in order.
    pub trail: Vec<(VarId, BigUint)>,
}

/// A trait for receiving updates during optimization.
/// Boolean return value indicates if the search should continue (true) or abort (false).
pub trait ProgressCallback {
    fn on_progress(&self, stats: &SearchStats, best_score: &BigUint) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(&SearchStats, &BigUint) -> bool,
{
    fn on_progress(&self, stats: &SearchStats, best_score: &BigUint) -> bool {
        self(stats, best_score)
    }
}

/// Callback that never cancels.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _stats: &SearchStats, _best_score: &BigUint) -> bool {
        true
    }
}

/// Steepest-ascent hill climbing with random escapes from plateaus.
pub struct HillClimber<'a, H: ?Sized, O: ?Sized> {
    hard: &'a mut H,
    objective: &'a mut O,
    catalog: &'a MoveCatalog,
    rng: &'a mut Rng,
}

impl<'a, H, O> HillClimber<'a, H, O>
where
    H: HardTracker + ?Sized,
    O: ObjectiveTracker + ?Sized,
{
    pub fn new(
        hard: &'a mut H,
        objective: &'a mut O,
        catalog: &'a MoveCatalog,
        rng: &'a mut Rng,
    ) -> Self {
        Self {
            hard,
            objective,
            catalog,
            rng,
        }
    }

    /// Maximizes `target` from the hard tracker's current (satisfying)
    /// model and returns the best score found. `best` holds the matching
    /// model afterwards.
    pub fn maximize<CB: ProgressCallback + ?Sized>(
        &mut self,
        target: &Expr,
        budget: &mut Budget,
        stats: &mut SearchStats,
        best: &mut BestModelCache,
        callback: &CB,
    ) -> SlsResult<BigUint> {
        debug_assert!(self.hard.is_sat());

        self.objective.initialize(target);
        self.objective.update_all();
        self.objective.set_model(&self.hard.model());

        let max_score = arith::max_value(self.objective.width());
        let constants = self.objective.constants().to_vec();
        let mut score = self.objective.score();

        info!(
            %score,
            %max_score,
            restarts_left = budget.restarts_left(),
            "Maximizing..."
        );
        best.save(&*self.hard, &*self.objective, &score)?;

        while budget.has_time() && budget.within_restarts() && score < max_score {
            let shown = best.score().unwrap_or(&score);
            if !callback.on_progress(stats, shown) {
                info!("Search cancelled");
                break;
            }
            stats.iterations += 1;

            let scan = selector::find_best_move(
                &mut *self.hard,
                &mut *self.objective,
                self.catalog,
                &constants,
                &score,
                &max_score,
            );
            stats.what_if_evals += scan.evals;

            match scan.best.mv {
                Some(mv) => {
                    Speculation::begin(&mut *self.hard, &mut *self.objective, mv.var)
                        .commit(&mv.value);
                    score = self.objective.score();
                    debug!(%mv, %score, "New best");
                    stats.moves += 1;
                    *stats.move_kinds.entry(mv.kind).or_default() += 1;
                    stats.trail.push((mv.var.id, mv.value));
                }
                None => {
                    best.offer(&*self.hard, &*self.objective, &score)?;
                    match diversify::randomize_wrt_hard(
                        &mut *self.hard,
                        &mut *self.objective,
                        &constants,
                        self.rng,
                    ) {
                        Some((var, value)) => {
                            budget.note_restart();
                            stats.diversifications += 1;
                            stats.trail.push((var.id, value));
                            score = self.objective.score();
                        }
                        None => {
                            debug!(%score, "Got stuck; bailing out");
                            break;
                        }
                    }
                }
            }
        }

        best.offer(&*self.hard, &*self.objective, &score)?;
        Ok(best.score().cloned().unwrap_or(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_restart_accounting() {
        let mut budget = Budget::new(Duration::from_secs(60), 2);
        assert!(budget.try_restart());
        assert!(budget.try_restart());
        assert!(!budget.try_restart());
        assert_eq!(budget.restarts(), 3);
        assert!(!budget.within_restarts());
        assert_eq!(budget.restarts_left(), 0);
    }

    #[test]
    fn test_zero_time_budget_is_exhausted() {
        let budget = Budget::new(Duration::ZERO, 5);
        assert!(!budget.has_time());
    }
}
