//! A small bit-vector term language.
//!
//! Every term evaluates to a `BigUint` reduced to its width. Predicates and
//! boolean connectives are terms of width 1.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::arith;
use crate::model::{Model, Var};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Num { value: BigUint, width: u32 },
    Bool(bool),
    Var(Var),

    Not(Box<Expr>),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    UDiv(Box<Expr>, Box<Expr>),
    URem(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Shl(Box<Expr>, Box<Expr>),
    LShr(Box<Expr>, Box<Expr>),

    Concat(Box<Expr>, Box<Expr>),
    Extract { hi: u32, lo: u32, arg: Box<Expr> },
    ZeroExtend { extra: u32, arg: Box<Expr> },
    Ite(Box<Expr>, Box<Expr>, Box<Expr>),

    Eq(Box<Expr>, Box<Expr>),
    Ult(Box<Expr>, Box<Expr>),
    Ule(Box<Expr>, Box<Expr>),

    BoolNot(Box<Expr>),
    BoolAnd(Vec<Expr>),
    BoolOr(Vec<Expr>),
}

impl Expr {
    pub fn num(value: impl Into<BigUint>, width: u32) -> Self {
        Expr::Num {
            value: arith::truncate(&value.into(), width),
            width,
        }
    }

    pub fn var(var: Var) -> Self {
        Expr::Var(var)
    }

    /// Two's-complement negation, the objective transform used by minimize.
    pub fn negate(arg: Expr) -> Self {
        Expr::Neg(Box::new(arg))
    }

    pub fn plus(a: Expr, b: Expr) -> Self {
        Expr::Add(Box::new(a), Box::new(b))
    }

    pub fn minus(a: Expr, b: Expr) -> Self {
        Expr::Sub(Box::new(a), Box::new(b))
    }

    pub fn equals(a: Expr, b: Expr) -> Self {
        Expr::Eq(Box::new(a), Box::new(b))
    }

    pub fn ult(a: Expr, b: Expr) -> Self {
        Expr::Ult(Box::new(a), Box::new(b))
    }

    pub fn ule(a: Expr, b: Expr) -> Self {
        Expr::Ule(Box::new(a), Box::new(b))
    }

    pub fn ite(c: Expr, t: Expr, e: Expr) -> Self {
        Expr::Ite(Box::new(c), Box::new(t), Box::new(e))
    }

    pub fn width(&self) -> u32 {
        match self {
            Expr::Num { width, .. } => *width,
            Expr::Var(v) => v.width(),
            Expr::Not(a) | Expr::Neg(a) => a.width(),
            Expr::Add(a, _)
            | Expr::Sub(a, _)
            | Expr::Mul(a, _)
            | Expr::UDiv(a, _)
            | Expr::URem(a, _)
            | Expr::And(a, _)
            | Expr::Or(a, _)
            | Expr::Xor(a, _)
            | Expr::Shl(a, _)
            | Expr::LShr(a, _) => a.width(),
            Expr::Concat(a, b) => a.width().saturating_add(b.width()),
            Expr::Extract { hi, lo, .. } => hi - lo + 1,
            Expr::ZeroExtend { extra, arg } => arg.width().saturating_add(*extra),
            Expr::Ite(_, t, _) => t.width(),
            Expr::Bool(_)
            | Expr::Eq(..)
            | Expr::Ult(..)
            | Expr::Ule(..)
            | Expr::BoolNot(_)
            | Expr::BoolAnd(_)
            | Expr::BoolOr(_) => 1,
        }
    }

    /// True for terms that denote a truth value rather than a bit-vector.
    pub fn is_predicate(&self) -> bool {
        match self {
            Expr::Bool(_)
            | Expr::Eq(..)
            | Expr::Ult(..)
            | Expr::Ule(..)
            | Expr::BoolNot(_)
            | Expr::BoolAnd(_)
            | Expr::BoolOr(_) => true,
            Expr::Var(v) => !v.sort.is_bv(),
            Expr::Ite(_, t, _) => t.is_predicate(),
            _ => false,
        }
    }

    /// Value under `model`. Unassigned variables read as zero.
    pub fn eval(&self, model: &Model) -> BigUint {
        let w = self.width();
        match self {
            Expr::Num { value, .. } => value.clone(),
            Expr::Bool(b) => bit(*b),
            Expr::Var(v) => model.get(v.id).cloned().unwrap_or_default(),
            Expr::Not(a) => arith::not(w, &a.eval(model)),
            Expr::Neg(a) => arith::neg(w, &a.eval(model)),
            Expr::Add(a, b) => arith::add(w, &a.eval(model), &b.eval(model)),
            Expr::Sub(a, b) => arith::sub(w, &a.eval(model), &b.eval(model)),
            Expr::Mul(a, b) => arith::mul(w, &a.eval(model), &b.eval(model)),
            Expr::UDiv(a, b) => arith::udiv(w, &a.eval(model), &b.eval(model)),
            Expr::URem(a, b) => arith::urem(&a.eval(model), &b.eval(model)),
            Expr::And(a, b) => a.eval(model) & b.eval(model),
            Expr::Or(a, b) => a.eval(model) | b.eval(model),
            Expr::Xor(a, b) => a.eval(model) ^ b.eval(model),
            Expr::Shl(a, b) => arith::shl(w, &a.eval(model), &b.eval(model)),
            Expr::LShr(a, b) => arith::lshr(w, &a.eval(model), &b.eval(model)),
            Expr::Concat(a, b) => (a.eval(model) << b.width()) | b.eval(model),
            Expr::Extract { hi, lo, arg } => {
                arith::truncate(&(arg.eval(model) >> *lo), hi - lo + 1)
            }
            Expr::ZeroExtend { arg, .. } => arg.eval(model),
            Expr::Ite(c, t, e) => {
                if c.eval(model).is_zero() {
                    e.eval(model)
                } else {
                    t.eval(model)
                }
            }
            Expr::Eq(a, b) => bit(a.eval(model) == b.eval(model)),
            Expr::Ult(a, b) => bit(a.eval(model) < b.eval(model)),
            Expr::Ule(a, b) => bit(a.eval(model) <= b.eval(model)),
            Expr::BoolNot(a) => bit(a.eval(model).is_zero()),
            Expr::BoolAnd(args) => bit(args.iter().all(|a| !a.eval(model).is_zero())),
            Expr::BoolOr(args) => bit(args.iter().any(|a| !a.eval(model).is_zero())),
        }
    }

    pub fn holds(&self, model: &Model) -> bool {
        !self.eval(model).is_zero()
    }

    /// Free variables in order of first occurrence.
    pub fn vars(&self) -> Vec<Var> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut Vec<Var>) {
        match self {
            Expr::Num { .. } | Expr::Bool(_) => {}
            Expr::Var(v) => {
                if !out.iter().any(|seen| seen.id == v.id) {
                    out.push(*v);
                }
            }
            Expr::Not(a)
            | Expr::Neg(a)
            | Expr::BoolNot(a)
            | Expr::Extract { arg: a, .. }
            | Expr::ZeroExtend { arg: a, .. } => a.collect_vars(out),
            Expr::Add(a, b)
            | Expr::Sub(a, b)
            | Expr::Mul(a, b)
            | Expr::UDiv(a, b)
            | Expr::URem(a, b)
            | Expr::And(a, b)
            | Expr::Or(a, b)
            | Expr::Xor(a, b)
            | Expr::Shl(a, b)
            | Expr::LShr(a, b)
            | Expr::Concat(a, b)
            | Expr::Eq(a, b)
            | Expr::Ult(a, b)
            | Expr::Ule(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Expr::Ite(c, t, e) => {
                c.collect_vars(out);
                t.collect_vars(out);
                e.collect_vars(out);
            }
            Expr::BoolAnd(args) | Expr::BoolOr(args) => {
                for a in args {
                    a.collect_vars(out);
                }
            }
        }
    }
}

#[inline]
fn bit(b: bool) -> BigUint {
    if b {
        BigUint::one()
    } else {
        BigUint::zero()
    }
}
