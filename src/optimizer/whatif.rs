use num_bigint::BigUint;
use tracing::trace;

use super::moves::Move;
use crate::model::Var;
use crate::tracker::{HardTracker, ObjectiveTracker, ADMISSIBLE};

/// Best strictly-improving move seen during one neighborhood scan.
#[derive(Debug, Clone)]
pub struct BestMove {
    pub score: BigUint,
    pub mv: Option<Move>,
}

impl BestMove {
    /// Starts a scan from the current score; only strictly greater scores
    /// replace it.
    pub fn starting_at(score: &BigUint) -> Self {
        Self {
            score: score.clone(),
            mv: None,
        }
    }
}

/// Scoped speculative assignment of one variable.
///
/// While the handle is alive the variable may take any number of tentative
/// values in both trackers. Dropping the handle restores the value it had when
/// the handle was opened, unless `commit` consumed it first.
pub struct Speculation<'t, H: HardTracker + ?Sized, O: ObjectiveTracker + ?Sized> {
    hard: &'t mut H,
    objective: &'t mut O,
    var: Var,
    original: BigUint,
    committed: bool,
}

impl<'t, H: HardTracker + ?Sized, O: ObjectiveTracker + ?Sized> Speculation<'t, H, O> {
    pub fn begin(hard: &'t mut H, objective: &'t mut O, var: Var) -> Self {
        let original = hard.value(var.id);
        Self {
            hard,
            objective,
            var,
            original,
            committed: false,
        }
    }

    pub fn original(&self) -> &BigUint {
        &self.original
    }

    /// Tentatively assigns `value` in the hard tracker only and returns the
    /// resulting admissibility.
    pub fn try_hard(&mut self, value: &BigUint) -> f64 {
        self.hard.update(self.var, value)
    }

    pub fn hard_is_sat(&self) -> bool {
        self.hard.is_sat()
    }

    /// Scores `mv` without committing it. If the hard constraints still hold
    /// and the objective strictly beats `best`, records the move in `best`
    /// and returns true.
    pub fn what_if(&mut self, mv: &Move, best: &mut BestMove) -> bool {
        debug_assert_eq!(mv.var.id, self.var.id);
        let r = self.try_hard(&mv.value);

        if r >= ADMISSIBLE && self.hard.is_sat() {
            self.objective.update(self.var, &mv.value);
            let score = self.objective.score();
            trace!(%mv, admissibility = r, %score, "what if");

            if score > best.score {
                best.score = score;
                best.mv = Some(mv.clone());
                return true;
            }
        }
        false
    }

    /// Makes `value` permanent in both trackers and releases the handle.
    pub fn commit(mut self, value: &BigUint) {
        self.hard.update(self.var, value);
        self.objective.update(self.var, value);
        self.committed = true;
    }
}

impl<H: HardTracker + ?Sized, O: ObjectiveTracker + ?Sized> Drop for Speculation<'_, H, O> {
    fn drop(&mut self) {
        if !self.committed {
            self.hard.update(self.var, &self.original);
            self.objective.update(self.var, &self.original);
        }
    }
}
