//! Collaborator contracts consumed by the optimizer, plus the reference
//! trackers that back the CLI and the tests.

pub mod assertions;
pub mod objective;

pub use self::assertions::AssertionTracker;
pub use self::objective::ObjectiveEvaluator;

use crate::bv::Expr;
use crate::model::{Model, Var, VarId};
use fastrand::Rng;
use num_bigint::BigUint;

/// Admissibility at or above this value means every hard constraint holds.
pub const ADMISSIBLE: f64 = 1.0;

/// Incremental bookkeeping of which hard constraints hold under the current
/// assignment.
pub trait HardTracker {
    fn is_sat(&self) -> bool;

    /// Normalized satisfaction measure in `[0, 1]`.
    fn admissibility(&self) -> f64;

    fn value(&self, id: VarId) -> BigUint;

    /// Assigns `value` to `var`, re-scores the affected constraints and
    /// returns the new admissibility.
    fn update(&mut self, var: Var, value: &BigUint) -> f64;

    fn model(&self) -> Model;

    fn set_model(&mut self, model: &Model);

    /// Draws a fresh random value for every variable.
    fn randomize(&mut self, rng: &mut Rng);

    /// Indices of the currently violated constraints.
    fn violated(&self) -> Vec<usize>;

    fn constraint_vars(&self, idx: usize) -> &[Var];
}

/// Tracks the numeric value of a single bit-vector objective.
pub trait ObjectiveTracker {
    /// Starts tracking `objective`; every variable of it reads as zero.
    fn initialize(&mut self, objective: &Expr);

    fn update_all(&mut self);

    fn update(&mut self, var: Var, value: &BigUint);

    /// Current value of the objective.
    fn score(&self) -> BigUint;

    /// Bit-width of the objective.
    fn width(&self) -> u32;

    fn model(&self) -> Model;

    fn set_model(&mut self, model: &Model);

    /// Variables of the objective in a fixed scan order.
    fn constants(&self) -> &[Var];
}
