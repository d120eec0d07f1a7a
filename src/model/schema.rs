//! Explicit per-calculator parameter schema.
use crate::analysis::units::ParsedUnit;
use crate::error::WiringError;
use crate::store::{Direction, ParamMeta, Unit};

/// Ordered list of the parameters a calculator declares.
///
/// Built with the `input`/`output` chain and validated once when the
/// calculator is added to a `Wiring`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    params: Vec<ParamMeta>,
}

impl Schema {
    pub fn new() -> Self { Self::default() }

    pub fn input(mut self, name: &str, default: f64, unit: Option<&str>, desc: &str) -> Self {
        self.params.push(ParamMeta {
            name: name.to_string(),
            direction: Direction::In,
            unit: unit.map(|u| Unit(u.to_string())),
            default,
            desc: desc.to_string(),
        });
        self
    }

    pub fn output(mut self, name: &str, unit: Option<&str>, desc: &str) -> Self {
        self.params.push(ParamMeta {
            name: name.to_string(),
            direction: Direction::Out,
            unit: unit.map(|u| Unit(u.to_string())),
            default: 0.0,
            desc: desc.to_string(),
        });
        self
    }

    pub fn params(&self) -> &[ParamMeta] { &self.params }
    pub fn len(&self) -> usize { self.params.len() }
    pub fn is_empty(&self) -> bool { self.params.is_empty() }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &ParamMeta> {
        self.params.iter().filter(|p| p.direction == Direction::In)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &ParamMeta> {
        self.params.iter().filter(|p| p.direction == Direction::Out)
    }

    pub fn validate(&self, owner: &str) -> Result<(), WiringError> {
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(WiringError::DuplicateParameter {
                    owner: owner.to_string(),
                    param: param.name.clone(),
                });
            }
            Self::validate_param(param).map_err(|e| match e {
                WiringError::InvalidUnit { unit, .. } => WiringError::InvalidUnit {
                    param: format!("{}.{}", owner, param.name),
                    unit,
                },
                WiringError::InvalidDefault { value, .. } => WiringError::InvalidDefault {
                    param: format!("{}.{}", owner, param.name),
                    value,
                },
                other => other,
            })?;
        }
        Ok(())
    }

    /// Checks one declaration: name present, unit parsable, default finite.
    pub fn validate_param(meta: &ParamMeta) -> Result<(), WiringError> {
        if meta.name.is_empty() || meta.name.contains('.') {
            return Err(WiringError::InvalidEndpoint { path: meta.name.clone(), role: "name" });
        }
        if let Some(unit) = &meta.unit {
            if ParsedUnit::from_str(&unit.0).is_err() {
                return Err(WiringError::InvalidUnit { param: meta.name.clone(), unit: unit.0.clone() });
            }
        }
        if !meta.default.is_finite() {
            return Err(WiringError::InvalidDefault { param: meta.name.clone(), value: meta.default });
        }
        Ok(())
    }
}
