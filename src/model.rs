use fnv::FnvHashMap;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arith;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    Bool,
    BitVec(u32),
}

impl Sort {
    /// Booleans are treated as 1-bit values.
    #[inline]
    pub fn width(self) -> u32 {
        match self {
            Sort::Bool => 1,
            Sort::BitVec(w) => w,
        }
    }

    #[inline]
    pub fn is_bv(self) -> bool {
        matches!(self, Sort::BitVec(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Var {
    pub id: VarId,
    pub sort: Sort,
}

impl Var {
    #[inline]
    pub fn width(&self) -> u32 {
        self.sort.width()
    }
}

/// Declared variables, indexed densely by `VarId`.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    names: Vec<String>,
    sorts: Vec<Sort>,
    by_name: FnvHashMap<String, VarId>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable, or returns the existing one if the name is taken
    /// with the same sort.
    pub fn declare(&mut self, name: &str, sort: Sort) -> Option<Var> {
        if let Some(&id) = self.by_name.get(name) {
            return (self.sorts[id.index()] == sort).then_some(Var { id, sort });
        }
        let id = VarId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.sorts.push(sort);
        self.by_name.insert(name.to_string(), id);
        Some(Var { id, sort })
    }

    pub fn lookup(&self, name: &str) -> Option<Var> {
        self.by_name.get(name).map(|&id| Var {
            id,
            sort: self.sorts[id.index()],
        })
    }

    pub fn name(&self, id: VarId) -> &str {
        self.names.get(id.index()).map(String::as_str).unwrap_or("?")
    }

    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.sorts.iter().enumerate().map(|(i, &sort)| Var {
            id: VarId(i as u32),
            sort,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All declared variables set to zero.
    pub fn zero_model(&self) -> Model {
        let mut model = Model::new();
        for var in self.vars() {
            model.set(var, BigUint::zero());
        }
        model
    }
}

/// Assignment of fixed-width unsigned values to variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    values: FnvHashMap<VarId, BigUint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` reduced to the variable's width.
    pub fn set(&mut self, var: Var, value: BigUint) {
        self.values
            .insert(var.id, arith::truncate(&value, var.width()));
    }

    pub fn get(&self, id: VarId) -> Option<&BigUint> {
        self.values.get(&id)
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &BigUint)> {
        self.values.iter().map(|(&id, v)| (id, v))
    }

    /// Entries sorted by variable id, for stable output.
    pub fn sorted(&self) -> Vec<(VarId, &BigUint)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert_raw(&mut self, id: VarId, value: BigUint) {
        self.values.insert(id, value);
    }
}
