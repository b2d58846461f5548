//! JSON problem files: declarations, hard constraints and an objective.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::arith;
use crate::bv::Expr;
use crate::error::{SlsError, SlsResult};
use crate::model::{Model, Signature, Sort};
use crate::optimizer::runner::Direction;
use crate::tracker::AssertionTracker;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub sort: Sort,
}

/// Surface syntax of a term, with variables referenced by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprSpec {
    /// Decimal or `0x`-prefixed hexadecimal value, and its width.
    Num(String, u32),
    Bool(bool),
    Var(String),

    Not(Box<ExprSpec>),
    Neg(Box<ExprSpec>),
    Add(Box<ExprSpec>, Box<ExprSpec>),
    Sub(Box<ExprSpec>, Box<ExprSpec>),
    Mul(Box<ExprSpec>, Box<ExprSpec>),
    Udiv(Box<ExprSpec>, Box<ExprSpec>),
    Urem(Box<ExprSpec>, Box<ExprSpec>),
    And(Box<ExprSpec>, Box<ExprSpec>),
    Or(Box<ExprSpec>, Box<ExprSpec>),
    Xor(Box<ExprSpec>, Box<ExprSpec>),
    Shl(Box<ExprSpec>, Box<ExprSpec>),
    Lshr(Box<ExprSpec>, Box<ExprSpec>),
    Concat(Box<ExprSpec>, Box<ExprSpec>),
    Extract { hi: u32, lo: u32, arg: Box<ExprSpec> },
    ZeroExtend { extra: u32, arg: Box<ExprSpec> },
    Ite(Box<ExprSpec>, Box<ExprSpec>, Box<ExprSpec>),

    Eq(Box<ExprSpec>, Box<ExprSpec>),
    Distinct(Box<ExprSpec>, Box<ExprSpec>),
    Ult(Box<ExprSpec>, Box<ExprSpec>),
    Ule(Box<ExprSpec>, Box<ExprSpec>),
    Ugt(Box<ExprSpec>, Box<ExprSpec>),
    Uge(Box<ExprSpec>, Box<ExprSpec>),

    BoolNot(Box<ExprSpec>),
    BoolAnd(Vec<ExprSpec>),
    BoolOr(Vec<ExprSpec>),
}

/// Widest bit-vector a problem file may declare or build.
pub const MAX_WIDTH: u32 = 1 << 16;

fn default_direction() -> Direction {
    Direction::Maximize
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemFile {
    pub variables: Vec<VarDecl>,
    #[serde(default)]
    pub assertions: Vec<ExprSpec>,
    pub objective: ExprSpec,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    #[serde(default)]
    pub initial: BTreeMap<String, String>,
}

/// A validated problem with names resolved.
#[derive(Debug, Clone)]
pub struct Problem {
    pub signature: Signature,
    pub assertions: Vec<Expr>,
    pub objective: Expr,
    pub direction: Direction,
    pub initial: Option<Model>,
}

impl Problem {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SlsResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> SlsResult<Self> {
        let file: ProblemFile = serde_json::from_str(content)?;
        Self::from_file(file)
    }

    pub fn from_file(file: ProblemFile) -> SlsResult<Self> {
        let mut signature = Signature::new();
        for decl in &file.variables {
            if decl.sort.width() == 0 {
                return invalid(format!("variable '{}' has width 0", decl.name));
            }
            if decl.sort.width() > MAX_WIDTH {
                return invalid(format!(
                    "variable '{}' is wider than {} bits",
                    decl.name, MAX_WIDTH
                ));
            }
            if signature.lookup(&decl.name).is_some() {
                return invalid(format!("variable '{}' declared twice", decl.name));
            }
            signature.declare(&decl.name, decl.sort);
        }

        let lowering = Lowering { sig: &signature };
        let mut assertions = Vec::with_capacity(file.assertions.len());
        for (i, spec) in file.assertions.iter().enumerate() {
            let e = lowering.lower(spec)?;
            if e.width() != 1 {
                return invalid(format!("assertion #{} is not boolean (width {})", i, e.width()));
            }
            assertions.push(e);
        }

        let objective = lowering.lower(&file.objective)?;
        if objective.is_predicate() {
            return invalid("objective must be a bit-vector term, not a predicate".to_string());
        }

        let initial = if file.initial.is_empty() {
            None
        } else {
            let mut model = signature.zero_model();
            for (name, text) in &file.initial {
                let var = signature
                    .lookup(name)
                    .ok_or_else(|| SlsError::Validation(format!("initial value for unknown variable '{}'", name)))?;
                let value = parse_value(text)?;
                if value > arith::max_value(var.width()) {
                    return invalid(format!("initial value {} does not fit '{}'", text, name));
                }
                model.set(var, value);
            }
            Some(model)
        };

        debug!(
            vars = signature.len(),
            assertions = assertions.len(),
            width = objective.width(),
            "Problem loaded"
        );

        Ok(Self {
            signature,
            assertions,
            objective,
            direction: file.direction,
            initial,
        })
    }

    pub fn hard_tracker(&self) -> AssertionTracker {
        AssertionTracker::new(&self.signature, self.assertions.clone())
    }
}

fn invalid<T>(msg: String) -> SlsResult<T> {
    Err(SlsError::Validation(msg))
}

fn check_width(op: &str, width: Option<u32>) -> SlsResult<()> {
    match width {
        Some(w) if w <= MAX_WIDTH => Ok(()),
        _ => invalid(format!("{}: result is wider than {} bits", op, MAX_WIDTH)),
    }
}

fn parse_value(text: &str) -> SlsResult<BigUint> {
    let t = text.trim();
    let parsed = match t.strip_prefix("0x") {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(t.as_bytes(), 10),
    };
    parsed.ok_or_else(|| SlsError::Validation(format!("invalid numeral '{}'", text)))
}

struct Lowering<'a> {
    sig: &'a Signature,
}

impl Lowering<'_> {
    fn lower(&self, spec: &ExprSpec) -> SlsResult<Expr> {
        use ExprSpec as S;
        Ok(match spec {
            S::Num(text, width) => {
                if *width == 0 {
                    return invalid(format!("numeral {} has width 0", text));
                }
                if *width > MAX_WIDTH {
                    return invalid(format!("numeral {} is wider than {} bits", text, MAX_WIDTH));
                }
                let value = parse_value(text)?;
                if value > arith::max_value(*width) {
                    return invalid(format!("numeral {} does not fit in {} bits", text, width));
                }
                Expr::num(value, *width)
            }
            S::Bool(b) => Expr::Bool(*b),
            S::Var(name) => Expr::var(
                self.sig
                    .lookup(name)
                    .ok_or_else(|| SlsError::Validation(format!("unknown variable '{}'", name)))?,
            ),
            S::Not(a) => Expr::Not(Box::new(self.lower(a)?)),
            S::Neg(a) => Expr::Neg(Box::new(self.lower(a)?)),
            S::Add(a, b) => self.same_width(a, b, "add", Expr::Add)?,
            S::Sub(a, b) => self.same_width(a, b, "sub", Expr::Sub)?,
            S::Mul(a, b) => self.same_width(a, b, "mul", Expr::Mul)?,
            S::Udiv(a, b) => self.same_width(a, b, "udiv", Expr::UDiv)?,
            S::Urem(a, b) => self.same_width(a, b, "urem", Expr::URem)?,
            S::And(a, b) => self.same_width(a, b, "and", Expr::And)?,
            S::Or(a, b) => self.same_width(a, b, "or", Expr::Or)?,
            S::Xor(a, b) => self.same_width(a, b, "xor", Expr::Xor)?,
            S::Shl(a, b) => self.same_width(a, b, "shl", Expr::Shl)?,
            S::Lshr(a, b) => self.same_width(a, b, "lshr", Expr::LShr)?,
            S::Concat(a, b) => {
                let (a, b) = (self.lower(a)?, self.lower(b)?);
                check_width("concat", a.width().checked_add(b.width()))?;
                Expr::Concat(Box::new(a), Box::new(b))
            }
            S::Extract { hi, lo, arg } => {
                let arg = self.lower(arg)?;
                if lo > hi || *hi >= arg.width() {
                    return invalid(format!(
                        "extract [{}:{}] out of range for width {}",
                        hi,
                        lo,
                        arg.width()
                    ));
                }
                Expr::Extract {
                    hi: *hi,
                    lo: *lo,
                    arg: Box::new(arg),
                }
            }
            S::ZeroExtend { extra, arg } => {
                let arg = self.lower(arg)?;
                check_width("zero_extend", arg.width().checked_add(*extra))?;
                Expr::ZeroExtend {
                    extra: *extra,
                    arg: Box::new(arg),
                }
            }
            S::Ite(c, t, e) => {
                let c = self.boolean(c, "ite condition")?;
                let (t, e) = self.pair(t, e, "ite")?;
                Expr::ite(c, t, e)
            }
            S::Eq(a, b) => self.same_width(a, b, "eq", Expr::Eq)?,
            S::Distinct(a, b) => {
                Expr::BoolNot(Box::new(self.same_width(a, b, "distinct", Expr::Eq)?))
            }
            S::Ult(a, b) => self.same_width(a, b, "ult", Expr::Ult)?,
            S::Ule(a, b) => self.same_width(a, b, "ule", Expr::Ule)?,
            S::Ugt(a, b) => self.same_width(b, a, "ugt", Expr::Ult)?,
            S::Uge(a, b) => self.same_width(b, a, "uge", Expr::Ule)?,
            S::BoolNot(a) => Expr::BoolNot(Box::new(self.boolean(a, "bool_not")?)),
            S::BoolAnd(args) => Expr::BoolAnd(
                args.iter()
                    .map(|a| self.boolean(a, "bool_and"))
                    .collect::<SlsResult<_>>()?,
            ),
            S::BoolOr(args) => Expr::BoolOr(
                args.iter()
                    .map(|a| self.boolean(a, "bool_or"))
                    .collect::<SlsResult<_>>()?,
            ),
        })
    }

    fn pair(&self, a: &ExprSpec, b: &ExprSpec, op: &str) -> SlsResult<(Expr, Expr)> {
        let a = self.lower(a)?;
        let b = self.lower(b)?;
        if a.width() != b.width() {
            return invalid(format!(
                "{}: operand widths differ ({} vs {})",
                op,
                a.width(),
                b.width()
            ));
        }
        Ok((a, b))
    }

    fn same_width(
        &self,
        a: &ExprSpec,
        b: &ExprSpec,
        op: &str,
        build: fn(Box<Expr>, Box<Expr>) -> Expr,
    ) -> SlsResult<Expr> {
        let (a, b) = self.pair(a, b, op)?;
        Ok(build(Box::new(a), Box::new(b)))
    }

    fn boolean(&self, spec: &ExprSpec, op: &str) -> SlsResult<Expr> {
        let e = self.lower(spec)?;
        if e.width() != 1 {
            return invalid(format!("{}: expected a boolean, got width {}", op, e.width()));
        }
        Ok(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEILING: &str = r#"{
        "variables": [{ "name": "x", "sort": { "bit_vec": 8 } }],
        "assertions": [{ "ult": [{ "var": "x" }, { "num": ["200", 8] }] }],
        "objective": { "var": "x" },
        "initial": { "x": "0x10" }
    }"#;

    #[test]
    fn test_parses_ceiling_problem() {
        let p = Problem::from_json(CEILING).unwrap();
        assert_eq!(p.signature.len(), 1);
        assert_eq!(p.assertions.len(), 1);
        assert_eq!(p.direction, Direction::Maximize);
        assert_eq!(p.objective.width(), 8);
        let x = p.signature.lookup("x").unwrap();
        assert_eq!(p.initial.unwrap().get(x.id), Some(&BigUint::from(16u32)));
    }

    #[test]
    fn test_rejects_width_mismatch() {
        let json = r#"{
            "variables": [{ "name": "x", "sort": { "bit_vec": 8 } }],
            "assertions": [{ "ult": [{ "var": "x" }, { "num": ["3", 4] }] }],
            "objective": { "var": "x" }
        }"#;
        let err = Problem::from_json(json).unwrap_err();
        assert!(matches!(err, SlsError::Validation(ref m) if m.contains("ult")));
    }

    #[test]
    fn test_rejects_predicate_objective() {
        let json = r#"{
            "variables": [{ "name": "b", "sort": "bool" }],
            "objective": { "var": "b" }
        }"#;
        assert!(matches!(
            Problem::from_json(json),
            Err(SlsError::Validation(_))
        ));
    }
}
