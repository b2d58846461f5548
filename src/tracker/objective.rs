use num_bigint::BigUint;
use num_traits::Zero;

use super::ObjectiveTracker;
use crate::bv::Expr;
use crate::model::{Model, Var};

/// Evaluates one bit-vector objective over its own partial model, which
/// holds exactly the objective's free variables.
pub struct ObjectiveEvaluator {
    objective: Expr,
    constants: Vec<Var>,
    model: Model,
    score: BigUint,
}

impl ObjectiveEvaluator {
    pub fn new(objective: &Expr) -> Self {
        let mut evaluator = Self::default();
        evaluator.initialize(objective);
        evaluator
    }

    pub fn objective(&self) -> &Expr {
        &self.objective
    }
}

impl Default for ObjectiveEvaluator {
    fn default() -> Self {
        Self {
            objective: Expr::num(0u32, 1),
            constants: Vec::new(),
            model: Model::new(),
            score: BigUint::zero(),
        }
    }
}

impl ObjectiveTracker for ObjectiveEvaluator {
    fn initialize(&mut self, objective: &Expr) {
        self.objective = objective.clone();
        self.constants = objective.vars();
        self.model = Model::new();
        for var in &self.constants {
            self.model.set(*var, BigUint::zero());
        }
        self.update_all();
    }

    fn update_all(&mut self) {
        self.score = self.objective.eval(&self.model);
    }

    fn update(&mut self, var: Var, value: &BigUint) {
        if self.model.contains(var.id) {
            self.model.set(var, value.clone());
            self.update_all();
        }
    }

    fn score(&self) -> BigUint {
        self.score.clone()
    }

    fn width(&self) -> u32 {
        self.objective.width()
    }

    fn model(&self) -> Model {
        self.model.clone()
    }

    fn set_model(&mut self, model: &Model) {
        for var in &self.constants {
            if let Some(v) = model.get(var.id) {
                self.model.set(*var, v.clone());
            }
        }
        self.update_all();
    }

    fn constants(&self) -> &[Var] {
        &self.constants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Signature, Sort};

    #[test]
    fn test_partial_model_ignores_foreign_vars() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let y = sig.declare("y", Sort::BitVec(8)).unwrap();
        let mut eval = ObjectiveEvaluator::new(&Expr::var(x));

        eval.update(y, &BigUint::from(9u32));
        assert!(!eval.model().contains(y.id));

        eval.update(x, &BigUint::from(42u32));
        assert_eq!(eval.score(), BigUint::from(42u32));
        assert_eq!(eval.width(), 8);
        assert_eq!(eval.constants(), &[x]);
    }

    #[test]
    fn test_reinitialize_drops_previous_objective() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let y = sig.declare("y", Sort::BitVec(4)).unwrap();
        let mut eval = ObjectiveEvaluator::new(&Expr::var(x));
        eval.update(x, &BigUint::from(5u32));

        eval.initialize(&Expr::negate(Expr::var(y)));
        assert_eq!(eval.constants(), &[y]);
        assert_eq!(eval.width(), 4);
        assert_eq!(eval.score(), BigUint::zero());
    }
}
