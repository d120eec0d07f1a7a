//! ledger.rs
//! Dense storage of every parameter value, indexed by `ParamId`.

use crate::compute::bytecode::Transfer;
use crate::store::{ParamId, Registry};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    values: Vec<f64>,
}

impl Ledger {
    pub fn new() -> Self { Self::default() }

    /// One slot per parameter, each holding its declared default.
    pub fn from_defaults(registry: &Registry) -> Self {
        Self { values: registry.meta.iter().map(|m| m.default).collect() }
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    #[inline(always)]
    pub fn get(&self, id: ParamId) -> Option<f64> {
        self.values.get(id.index()).copied()
    }

    #[inline(always)]
    pub fn set(&mut self, id: ParamId, value: f64) {
        let idx = id.index();
        if idx >= self.values.len() {
            self.values.resize(idx + 1, 0.0);
        }
        self.values[idx] = value;
    }

    /// Copies `source * scale` into `target`. A non-finite product is not
    /// written and comes back as the error.
    #[inline(always)]
    pub fn transfer(&mut self, t: &Transfer) -> Result<(), f64> {
        let value = self.values[t.source.index()] * t.scale;
        if !value.is_finite() {
            return Err(value);
        }
        self.values[t.target.index()] = value;
        Ok(())
    }

    /// The contiguous slot range `(start, count)` belonging to one calculator.
    pub fn slice_mut(&mut self, (start, count): (u32, u32)) -> &mut [f64] {
        &mut self.values[start as usize..(start + count) as usize]
    }
}
