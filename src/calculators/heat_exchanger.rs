//! Heat exchanger sizing with the Logarithmic Mean Temperature Difference
//! (LMTD) method.
//!
//! LMTD limitations: the method is restricted to single-pass exchangers and
//! needs all four terminal temperatures.
use super::{non_negative, positive};
use crate::error::DomainError;
use crate::model::{Calculator, Frame, Schema};

/// Logarithmic mean of two temperature differences.
///
/// `dT1 == dT2` is a removable singularity and returns `dT1`. Differences of
/// opposite sign, or a zero difference, leave the logarithm undefined.
pub fn lmtd(dt1: f64, dt2: f64) -> Result<f64, DomainError> {
    let defined = dt1.is_finite() && dt2.is_finite() && dt1 != 0.0 && dt2 != 0.0 && dt1.signum() == dt2.signum();
    if !defined {
        return Err(DomainError::InvalidLogArgument { dt1, dt2 });
    }
    if dt1 == dt2 {
        return Ok(dt1);
    }
    let diff = dt1 - dt2;
    // ln(dT1/dT2) without forming the ratio: ln_1p near 1, log difference
    // for wide spreads where the ratio would overflow.
    let x = diff / dt2;
    let log_ratio = if x.abs() < 0.5 { x.ln_1p() } else { dt1.abs().ln() - dt2.abs().ln() };
    Ok(diff / log_ratio)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeatExchanger;

impl Calculator for HeatExchanger {
    fn kind(&self) -> &'static str { "HeatExchanger" }

    fn schema(&self) -> Schema {
        Schema::new()
            .input("T_hot_in", 300.0, Some("K"), "hot stream inlet temperature")
            .input("T_hot_out", 360.0, Some("K"), "hot stream outlet temperature")
            .input("T_cold_in", 290.0, Some("K"), "cold stream inlet temperature")
            .input("T_cold_out", 320.0, Some("K"), "cold stream outlet temperature")
            .input("mass_flow_cold", 0.5, Some("kg/s"), "mass flow of the cold stream")
            .input("cp_cold", 4186.0, Some("J/kg*K"), "specific heat of the cold stream")
            .input("U", 500.0, Some("W/m^2*K"), "overall heat transfer coefficient")
            .output("dT1", Some("K"), "temperature change of the hot stream")
            .output("dT2", Some("K"), "temperature change of the cold stream")
            .output("LMTD", Some("K"), "logarithmic mean temperature difference")
            .output("q", Some("W"), "heat flow into the cold stream")
            .output("area_surface", Some("m^2"), "required heat transfer surface")
    }

    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
        let dt1 = frame.input("T_hot_out")? - frame.input("T_hot_in")?;
        let dt2 = frame.input("T_cold_out")? - frame.input("T_cold_in")?;
        let mass_flow = non_negative("mass_flow_cold", frame.input("mass_flow_cold")?)?;
        let cp = positive("cp_cold", frame.input("cp_cold")?)?;
        let u = positive("U", frame.input("U")?)?;

        let lmtd = lmtd(dt1, dt2)?;
        let q = mass_flow * cp * dt2;

        frame.set("dT1", dt1)?;
        frame.set("dT2", dt2)?;
        frame.set("LMTD", lmtd)?;
        frame.set("q", q)?;
        frame.set("area_surface", q.abs() / (u * lmtd.abs()))
    }
}
