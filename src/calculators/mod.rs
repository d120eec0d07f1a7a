//! Engineering calculators: heat exchanger (LMTD) and the hyperloop pod
//! sizing components.
mod aero;
mod battery;
mod capsule;
mod heat_exchanger;
mod inlet;
mod tube;

pub use aero::Aero;
pub use battery::Battery;
pub use capsule::PassengerCapsule;
pub use heat_exchanger::{lmtd, HeatExchanger};
pub use inlet::InletGeom;
pub use tube::TubeStructural;

use crate::error::DomainError;

pub(crate) fn positive(name: &str, value: f64) -> Result<f64, DomainError> {
    if value > 0.0 { Ok(value) } else { Err(DomainError::NotPositive { name: name.to_string(), value }) }
}

pub(crate) fn non_negative(name: &str, value: f64) -> Result<f64, DomainError> {
    if value >= 0.0 { Ok(value) } else { Err(DomainError::Negative { name: name.to_string(), value }) }
}

/// `min <= value < max`
pub(crate) fn in_range(name: &str, value: f64, min: f64, max: f64) -> Result<f64, DomainError> {
    if value >= min && value < max {
        Ok(value)
    } else {
        Err(DomainError::OutOfRange { name: name.to_string(), value, min, max })
    }
}

pub(crate) fn whole_number(name: &str, value: f64) -> Result<f64, DomainError> {
    if value.fract() == 0.0 { Ok(value) } else { Err(DomainError::NotWholeNumber { name: name.to_string(), value }) }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::error::DomainError;
    use crate::model::{Calculator, Frame};

    /// Runs a calculator on its schema defaults with `overrides` applied and
    /// returns a lookup over the resulting values.
    pub fn evaluate(calc: &dyn Calculator, overrides: &[(&str, f64)]) -> Result<Vec<(String, f64)>, DomainError> {
        let schema = calc.schema();
        let mut values: Vec<f64> = schema.params().iter().map(|p| p.default).collect();
        for (name, v) in overrides {
            let i = schema.index_of(name).unwrap_or_else(|| panic!("no parameter '{}'", name));
            values[i] = *v;
        }
        let mut frame = Frame::new(&schema, &mut values);
        calc.compute(&mut frame)?;
        frame.ensure_complete()?;
        Ok(schema.params().iter().map(|p| p.name.clone()).zip(values).collect())
    }

    pub fn get(values: &[(String, f64)], name: &str) -> f64 {
        values.iter().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap_or_else(|| panic!("no value '{}'", name))
    }
}
