use num_bigint::BigUint;

use super::moves::MoveCatalog;
use super::whatif::{BestMove, Speculation};
use crate::model::Var;
use crate::tracker::{HardTracker, ObjectiveTracker};

pub struct ScanOutcome {
    pub best: BestMove,
    pub evals: usize,
}

/// Steepest-ascent scan over the whole neighborhood.
///
/// Every candidate of every variable is scored through a `Speculation`, and
/// each variable is back at its pre-scan value when its handle drops. The
/// first move reaching the best score wins; later moves replace it only
/// when strictly better. Stops early once `max_score` is reached.
pub fn find_best_move<H, O>(
    hard: &mut H,
    objective: &mut O,
    catalog: &MoveCatalog,
    constants: &[Var],
    score: &BigUint,
    max_score: &BigUint,
) -> ScanOutcome
where
    H: HardTracker + ?Sized,
    O: ObjectiveTracker + ?Sized,
{
    let mut best = BestMove::starting_at(score);
    let mut evals = 0;

    for &var in constants {
        if best.score >= *max_score {
            break;
        }
        let mut spec = Speculation::begin(&mut *hard, &mut *objective, var);
        let candidates = catalog.candidates(var, spec.original());

        for mv in &candidates {
            if best.score >= *max_score {
                break;
            }
            evals += 1;
            spec.what_if(mv, &mut best);
        }
    }

    ScanOutcome { best, evals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith;
    use crate::bv::Expr;
    use crate::config::MoveFamilies;
    use crate::model::{Signature, Sort};
    use crate::optimizer::moves::MoveKind;
    use crate::tracker::{AssertionTracker, ObjectiveEvaluator};

    #[test]
    fn test_scan_leaves_state_untouched() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let y = sig.declare("y", Sort::BitVec(8)).unwrap();
        let cap = Expr::ule(
            Expr::plus(
                Expr::ZeroExtend { extra: 1, arg: Box::new(Expr::var(x)) },
                Expr::ZeroExtend { extra: 1, arg: Box::new(Expr::var(y)) },
            ),
            Expr::num(300u32, 9),
        );
        let mut hard = AssertionTracker::new(&sig, vec![cap]);
        let objective = Expr::minus(Expr::var(x), Expr::var(y));
        let mut obj = ObjectiveEvaluator::new(&objective);

        let mut start = sig.zero_model();
        start.set(x, BigUint::from(40u32));
        start.set(y, BigUint::from(13u32));
        hard.set_model(&start);
        obj.set_model(&start);

        let before_hard = hard.model();
        let before_score = obj.score();
        let consts = obj.constants().to_vec();

        let scan = find_best_move(
            &mut hard,
            &mut obj,
            &MoveCatalog::default(),
            &consts,
            &before_score,
            &arith::max_value(8),
        );

        assert!(scan.best.mv.is_some());
        assert!(scan.evals > 0);
        assert_eq!(hard.model(), before_hard);
        assert_eq!(obj.score(), before_score);
        assert_eq!(obj.model(), before_hard);
    }

    #[test]
    fn test_no_improvement_reports_sentinel() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let mut hard = AssertionTracker::new(
            &sig,
            vec![Expr::equals(Expr::var(x), Expr::num(9u32, 8))],
        );
        let mut obj = ObjectiveEvaluator::new(&Expr::var(x));
        let mut start = sig.zero_model();
        start.set(x, BigUint::from(9u32));
        hard.set_model(&start);
        obj.set_model(&start);

        let consts = obj.constants().to_vec();
        let score = obj.score();
        let scan = find_best_move(
            &mut hard,
            &mut obj,
            &MoveCatalog::new(MoveFamilies::minimal()),
            &consts,
            &score,
            &arith::max_value(8),
        );
        assert!(scan.best.mv.is_none());
        assert_eq!(scan.best.score, BigUint::from(9u32));
    }

    #[test]
    fn test_first_of_equal_moves_wins() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let mut hard = AssertionTracker::new(&sig, vec![]);
        // x = 3 and x = 5 score the same; flip(1) reaches 3 before flip(2) reaches 5.
        let objective = Expr::ite(
            Expr::equals(Expr::var(x), Expr::num(3u32, 8)),
            Expr::num(5u32, 8),
            Expr::ite(
                Expr::equals(Expr::var(x), Expr::num(5u32, 8)),
                Expr::num(5u32, 8),
                Expr::num(0u32, 8),
            ),
        );
        let mut obj = ObjectiveEvaluator::new(&objective);
        let mut start = sig.zero_model();
        start.set(x, BigUint::from(1u32));
        hard.set_model(&start);
        obj.set_model(&start);

        let consts = obj.constants().to_vec();
        let score = obj.score();
        let scan = find_best_move(
            &mut hard,
            &mut obj,
            &MoveCatalog::new(MoveFamilies::minimal()),
            &consts,
            &score,
            &arith::max_value(8),
        );
        let mv = scan.best.mv.unwrap();
        assert_eq!(mv.kind, MoveKind::Flip);
        assert_eq!(mv.bit, Some(1));
        assert_eq!(mv.value, BigUint::from(3u32));
        assert_eq!(scan.best.score, BigUint::from(5u32));
    }
}
