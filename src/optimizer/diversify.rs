use fastrand::Rng;
use num_bigint::BigUint;
use tracing::debug;

use super::whatif::Speculation;
use crate::arith;
use crate::model::Var;
use crate::tracker::{HardTracker, ObjectiveTracker};

/// Number of random bits used to pick a variable index among `count`.
fn index_bits(count: usize) -> u32 {
    match count {
        0..=15 => 4,
        16..=255 => 8,
        256..=4095 => 12,
        4096..=65535 => 16,
        _ => 32,
    }
}

/// Moves one random variable to a random value of the same width, keeping
/// the hard constraints satisfied. Makes at most `constants.len()` attempts
/// and returns the accepted assignment, or `None` when every attempt broke
/// a hard constraint.
pub fn randomize_wrt_hard<H, O>(
    hard: &mut H,
    objective: &mut O,
    constants: &[Var],
    rng: &mut Rng,
) -> Option<(Var, BigUint)>
where
    H: HardTracker + ?Sized,
    O: ObjectiveTracker + ?Sized,
{
    let count = constants.len();
    if count == 0 {
        return None;
    }
    let bits = index_bits(count);

    for _ in 0..count {
        let idx = arith::random_uint(rng, bits) as usize % count;
        let var = constants[idx];
        let value = arith::random_value(rng, var.width());

        let mut spec = Speculation::begin(&mut *hard, &mut *objective, var);
        if value == *spec.original() {
            continue;
        }
        spec.try_hard(&value);
        if spec.hard_is_sat() {
            debug!(var = %var.id, %value, "randomized");
            spec.commit(&value);
            return Some((var, value));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bv::Expr;
    use crate::model::{Signature, Sort};
    use crate::tracker::{AssertionTracker, ObjectiveEvaluator};

    #[test]
    fn test_index_bits_thresholds() {
        assert_eq!(index_bits(1), 4);
        assert_eq!(index_bits(16), 8);
        assert_eq!(index_bits(4095), 12);
        assert_eq!(index_bits(65535), 16);
        assert_eq!(index_bits(65536), 32);
    }

    #[test]
    fn test_accepted_step_stays_feasible_and_mirrors() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let mut hard = AssertionTracker::new(&sig, vec![Expr::ult(Expr::var(x), Expr::num(128u32, 8))]);
        let mut obj = ObjectiveEvaluator::new(&Expr::var(x));
        let consts = obj.constants().to_vec();
        let mut rng = Rng::with_seed(3);

        for _ in 0..200 {
            if let Some((var, value)) = randomize_wrt_hard(&mut hard, &mut obj, &consts, &mut rng) {
                assert_eq!(var.id, x.id);
                assert!(value < BigUint::from(128u32));
                assert_eq!(obj.score(), value);
            }
            assert!(hard.is_sat());
            assert_eq!(hard.value(x.id), obj.score());
        }
    }

    #[test]
    fn test_fails_when_no_other_value_is_feasible() {
        let mut sig = Signature::new();
        let x = sig.declare("x", Sort::BitVec(8)).unwrap();
        let mut hard = AssertionTracker::new(&sig, vec![Expr::equals(Expr::var(x), Expr::num(0u32, 8))]);
        let mut obj = ObjectiveEvaluator::new(&Expr::var(x));
        let consts = obj.constants().to_vec();
        let mut rng = Rng::with_seed(11);

        for _ in 0..50 {
            assert!(randomize_wrt_hard(&mut hard, &mut obj, &consts, &mut rng).is_none());
            assert_eq!(hard.value(x.id), BigUint::from(0u32));
        }
    }
}
