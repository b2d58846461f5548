use num_bigint::BigUint;
use strum_macros::{Display, EnumIter};

use crate::arith;
use crate::config::MoveFamilies;
use crate::model::Var;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum MoveKind {
    Flip,
    Inc,
    Dec,
    Inv,
    UnaryMinus,
    Mul2,
    Mul3,
    Div2,
}

/// A candidate replacement value for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub kind: MoveKind,
    pub var: Var,
    pub value: BigUint,
    /// Bit index for `Flip`.
    pub bit: Option<u32>,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.bit {
            Some(j) => write!(f, "{}({}) on {} -> {}", self.kind, j, self.var.id, self.value),
            None => write!(f, "{} on {} -> {}", self.kind, self.var.id, self.value),
        }
    }
}

pub fn mk_flip(value: &BigUint, bit: u32) -> BigUint {
    arith::flip_bit(value, bit)
}

/// Increment for odd values, decrement for even ones.
pub fn mk_inc_or_dec(width: u32, value: &BigUint) -> (MoveKind, BigUint) {
    if arith::is_even(value) {
        (MoveKind::Dec, arith::dec(width, value))
    } else {
        (MoveKind::Inc, arith::inc(width, value))
    }
}

pub fn mk_inv(width: u32, value: &BigUint) -> (MoveKind, BigUint) {
    (MoveKind::Inv, arith::not(width, value))
}

/// Invert then increment, i.e. two's-complement negation.
pub fn mk_unary_minus(width: u32, value: &BigUint) -> (MoveKind, BigUint) {
    (MoveKind::UnaryMinus, arith::neg(width, value))
}

pub fn mk_mul2(width: u32, value: &BigUint) -> (MoveKind, BigUint) {
    (MoveKind::Mul2, arith::add(width, value, value))
}

/// The value added to its own double.
pub fn mk_mul3(width: u32, value: &BigUint) -> (MoveKind, BigUint) {
    let doubled = arith::add(width, value, value);
    (MoveKind::Mul3, arith::add(width, value, &doubled))
}

pub fn mk_div2(_width: u32, value: &BigUint) -> (MoveKind, BigUint) {
    (MoveKind::Div2, value >> 1u32)
}

pub type MoveGenerator = fn(u32, &BigUint) -> (MoveKind, BigUint);

/// Ordered set of word-level move generators, applied after the bit flips
/// to every bit-vector variable wider than one bit.
#[derive(Clone)]
pub struct MoveCatalog {
    generators: Vec<MoveGenerator>,
}

impl MoveCatalog {
    pub fn new(families: MoveFamilies) -> Self {
        let mut generators: Vec<MoveGenerator> = Vec::new();
        if families.enable_increment_decrement {
            generators.push(mk_inc_or_dec);
        }
        generators.push(mk_inv);
        if families.enable_unary_minus {
            generators.push(mk_unary_minus);
        }
        if families.enable_mul2_div2 {
            generators.push(mk_mul2);
            if families.enable_mul3 {
                generators.push(mk_mul3);
            }
            generators.push(mk_div2);
        }
        Self { generators }
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// All candidates for `var` at `current`, in scan order: one flip per
    /// bit, then the word-level moves.
    pub fn candidates(&self, var: Var, current: &BigUint) -> Vec<Move> {
        let width = var.width();
        let mut out: Vec<Move> = (0..width)
            .map(|j| Move {
                kind: MoveKind::Flip,
                var,
                value: mk_flip(current, j),
                bit: Some(j),
            })
            .collect();

        if var.sort.is_bv() && width > 1 {
            out.extend(self.generators.iter().map(|gen| {
                let (kind, value) = gen(width, current);
                Move {
                    kind,
                    var,
                    value,
                    bit: None,
                }
            }));
        }
        out
    }
}

impl Default for MoveCatalog {
    fn default() -> Self {
        Self::new(MoveFamilies::default())
    }
}
