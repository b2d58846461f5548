//! Feasibility search: finds an assignment satisfying the hard constraints
//! before optimization starts.

use fastrand::Rng;
use num_bigint::BigUint;
use strum_macros::Display;
use tracing::debug;

use crate::arith;
use crate::config::MoveFamilies;
use crate::model::Var;
use crate::optimizer::moves::MoveCatalog;
use crate::optimizer::Budget;
use crate::tracker::HardTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SatStatus {
    Sat,
    Unknown,
}

pub trait ConstraintSearch {
    /// Tries to drive `hard` into a satisfying state from its current model.
    fn search<H: HardTracker + ?Sized>(
        &mut self,
        hard: &mut H,
        rng: &mut Rng,
        budget: &Budget,
    ) -> SatStatus;
}

/// Focused random walk.
///
/// Each step picks a violated constraint at random. With probability
/// `noise` one of its variables gets a random value. Otherwise every
/// catalog move of every variable in the constraint is scored by
/// admissibility and the best one is applied, even if it does not improve.
pub struct WalkSearch {
    pub steps: usize,
    pub noise: f64,
    catalog: MoveCatalog,
}

impl WalkSearch {
    /// The greedy step only tries the word-level moves enabled in `moves`.
    pub fn new(steps: usize, noise: f64, moves: MoveFamilies) -> Self {
        Self {
            steps,
            noise,
            catalog: MoveCatalog::new(moves),
        }
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    fn greedy_step<H: HardTracker + ?Sized>(&self, hard: &mut H, vars: &[Var]) {
        let mut best: Option<(f64, Var, BigUint)> = None;
        for &var in vars {
            let old = hard.value(var.id);
            for mv in self.catalog.candidates(var, &old) {
                let r = hard.update(var, &mv.value);
                if best.as_ref().map_or(true, |(b, _, _)| r > *b) {
                    best = Some((r, var, mv.value));
                }
            }
            hard.update(var, &old);
        }
        if let Some((_, var, value)) = best {
            hard.update(var, &value);
        }
    }
}

impl Default for WalkSearch {
    fn default() -> Self {
        Self::new(10_000, 0.1, MoveFamilies::default())
    }
}

impl ConstraintSearch for WalkSearch {
    fn search<H: HardTracker + ?Sized>(
        &mut self,
        hard: &mut H,
        rng: &mut Rng,
        budget: &Budget,
    ) -> SatStatus {
        for step in 0..self.steps {
            if hard.is_sat() {
                debug!(step, "walk reached a satisfying model");
                return SatStatus::Sat;
            }
            if step % 64 == 0 && !budget.has_time() {
                break;
            }

            let violated = hard.violated();
            let target = violated[rng.usize(..violated.len())];
            let vars = hard.constraint_vars(target).to_vec();
            if vars.is_empty() {
                // A ground constraint that is false cannot be repaired.
                return SatStatus::Unknown;
            }

            if rng.f64() < self.noise {
                let var = vars[rng.usize(..vars.len())];
                let value = arith::random_value(rng, var.width());
                hard.update(var, &value);
            } else {
                self.greedy_step(hard, &vars);
            }
        }

        if hard.is_sat() {
            SatStatus::Sat
        } else {
            SatStatus::Unknown
        }
    }
}
