//! The `Calculator` trait and the frame it computes against.
use super::schema::Schema;
use crate::error::DomainError;
use crate::store::Direction;
use smallvec::SmallVec;
use std::fmt;

/// A single-purpose computational unit.
///
/// `compute` must be a pure function of the declared inputs: the frame only
/// exposes this calculator's own parameters and refuses reads of outputs or
/// writes to inputs.
pub trait Calculator: fmt::Debug + Send + Sync {
    /// Short type name used in traces and descriptions.
    fn kind(&self) -> &'static str;
    fn schema(&self) -> Schema;
    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError>;
}

/// View over one calculator's slice of the ledger during a compute step.
pub struct Frame<'a> {
    schema: &'a Schema,
    values: &'a mut [f64],
    written: SmallVec<[bool; 16]>,
}

impl<'a> Frame<'a> {
    pub fn new(schema: &'a Schema, values: &'a mut [f64]) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values, written: SmallVec::from_elem(false, schema.len()) }
    }

    fn slot(&self, name: &str, direction: Direction) -> Option<usize> {
        self.schema
            .index_of(name)
            .filter(|&i| self.schema.params()[i].direction == direction)
    }

    pub fn input(&self, name: &str) -> Result<f64, DomainError> {
        self.slot(name, Direction::In)
            .map(|i| self.values[i])
            .ok_or_else(|| DomainError::UndeclaredInput(name.to_string()))
    }

    pub fn set(&mut self, name: &str, value: f64) -> Result<(), DomainError> {
        let i = self
            .slot(name, Direction::Out)
            .ok_or_else(|| DomainError::UndeclaredOutput(name.to_string()))?;
        if !value.is_finite() {
            return Err(DomainError::NonFinite { name: name.to_string(), value });
        }
        self.values[i] = value;
        self.written[i] = true;
        Ok(())
    }

    /// Input names and values as seen by this step, for error reports.
    pub fn inputs_snapshot(&self) -> Vec<(String, f64)> {
        self.schema
            .params()
            .iter()
            .zip(self.values.iter())
            .filter(|(p, _)| p.direction == Direction::In)
            .map(|(p, v)| (p.name.clone(), *v))
            .collect()
    }

    /// Fails on the first declared output the step did not write.
    pub fn ensure_complete(&self) -> Result<(), DomainError> {
        for (param, written) in self.schema.params().iter().zip(self.written.iter()) {
            if param.direction == Direction::Out && !written {
                return Err(DomainError::MissingOutput(param.name.clone()));
            }
        }
        Ok(())
    }
}
