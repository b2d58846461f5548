use fastrand::Rng;
use num_bigint::BigUint;
use tracing::trace;

use super::HardTracker;
use crate::arith;
use crate::bv::Expr;
use crate::model::{Model, Signature, Var, VarId};

/// Hard-constraint tracker over a conjunction of boolean assertions.
///
/// Keeps, for every variable, the list of assertions mentioning it so that an
/// update only re-evaluates those.
pub struct AssertionTracker {
    vars: Vec<Var>,
    model: Model,
    assertions: Vec<Expr>,
    assertion_vars: Vec<Vec<Var>>,
    occurs: Vec<Vec<usize>>,
    satisfied: Vec<bool>,
    unsat_count: usize,
}

impl AssertionTracker {
    pub fn new(signature: &Signature, assertions: Vec<Expr>) -> Self {
        let vars: Vec<Var> = signature.vars().collect();
        let mut occurs = vec![Vec::new(); vars.len()];
        let assertion_vars: Vec<Vec<Var>> = assertions.iter().map(Expr::vars).collect();

        for (idx, av) in assertion_vars.iter().enumerate() {
            for v in av {
                if let Some(list) = occurs.get_mut(v.id.index()) {
                    list.push(idx);
                }
            }
        }

        let mut tracker = Self {
            model: signature.zero_model(),
            satisfied: vec![false; assertions.len()],
            unsat_count: assertions.len(),
            vars,
            assertions,
            assertion_vars,
            occurs,
        };
        tracker.rescore_all();
        tracker
    }

    pub fn assertions(&self) -> &[Expr] {
        &self.assertions
    }

    fn rescore_all(&mut self) {
        for idx in 0..self.assertions.len() {
            self.satisfied[idx] = self.assertions[idx].holds(&self.model);
        }
        self.unsat_count = self.satisfied.iter().filter(|&&s| !s).count();
    }

    fn rescore(&mut self, idx: usize) {
        let now = self.assertions[idx].holds(&self.model);
        match (self.satisfied[idx], now) {
            (true, false) => self.unsat_count += 1,
            (false, true) => self.unsat_count -= 1,
            _ => {}
        }
        self.satisfied[idx] = now;
    }
}

impl HardTracker for AssertionTracker {
    fn is_sat(&self) -> bool {
        self.unsat_count == 0
    }

    fn admissibility(&self) -> f64 {
        if self.assertions.is_empty() {
            return 1.0;
        }
        let sat = self.assertions.len() - self.unsat_count;
        sat as f64 / self.assertions.len() as f64
    }

    fn value(&self, id: VarId) -> BigUint {
        self.model.get(id).cloned().unwrap_or_default()
    }

    fn update(&mut self, var: Var, value: &BigUint) -> f64 {
        self.model.set(var, value.clone());
        let affected = self.occurs.get(var.id.index()).cloned().unwrap_or_default();
        for idx in affected {
            self.rescore(idx);
        }
        let r = self.admissibility();
        trace!(var = %var.id, value = %value, admissibility = r, "hard update");
        r
    }

    fn model(&self) -> Model {
        self.model.clone()
    }

    fn set_model(&mut self, model: &Model) {
        for var in &self.vars {
            if let Some(v) = model.get(var.id) {
                self.model.set(*var, v.clone());
            }
        }
        self.rescore_all();
    }

    fn randomize(&mut self, rng: &mut Rng) {
        for var in &self.vars {
            self.model.set(*var, arith::random_value(rng, var.width()));
        }
        self.rescore_all();
    }

    fn violated(&self) -> Vec<usize> {
        self.satisfied
            .iter()
            .enumerate()
            .filter(|(_, s)| !**s)
            .map(|(i, _)| i)
            .collect()
    }

    fn constraint_vars(&self, idx: usize) -> &[Var] {
        self.assertion_vars
            .get(idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sort;

    #[test]
    fn test_incremental_update_tracks_unsat_count() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let y = sig.declare("y", Sort::BitVec(8)).unwrap();
        let mut tracker = AssertionTracker::new(
            &sig,
            vec![
                Expr::ult(Expr::var(x), Expr::num(200u32, 8)),
                Expr::equals(Expr::var(y), Expr::num(3u32, 8)),
            ],
        );

        assert!(!tracker.is_sat());
        assert_eq!(tracker.admissibility(), 0.5);
        assert_eq!(tracker.violated(), vec![1]);

        assert_eq!(tracker.update(y, &BigUint::from(3u32)), 1.0);
        assert!(tracker.is_sat());

        tracker.update(x, &BigUint::from(200u32));
        assert!(!tracker.is_sat());
        assert_eq!(tracker.violated(), vec![0]);
        assert_eq!(tracker.constraint_vars(0), &[x]);
    }

    #[test]
    fn test_no_assertions_is_trivially_sat() {
        let mut sig = Signature::new();
        sig.declare("x", Sort::BitVec(8)).unwrap();
        let tracker = AssertionTracker::new(&sig, vec![]);
        assert!(tracker.is_sat());
        assert_eq!(tracker.admissibility(), 1.0);
    }
}
