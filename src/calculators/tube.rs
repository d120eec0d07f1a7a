use super::{in_range, non_negative, positive};
use crate::error::DomainError;
use crate::model::{Calculator, Frame, Schema};

/// Wall thickness of the low-pressure tube.
///
/// Sized against elastic buckling of a long thin cylinder under external
/// pressure, `P_cr = 2E/(1-ν²)·(t/D)³`, with `P_cr = sf·ΔP`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TubeStructural;

impl Calculator for TubeStructural {
    fn kind(&self) -> &'static str { "TubeStructural" }

    fn schema(&self) -> Schema {
        Schema::new()
            .input("radius_inner", 200.0, Some("cm"), "inner tube radius")
            .input("Ps_tube", 99.0, Some("Pa"), "static pressure in the tube")
            .input("Pa_ambient", 101325.0, Some("Pa"), "ambient pressure outside the tube")
            .input("modulus_elastic", 200e9, Some("Pa"), "Young's modulus of the tube wall")
            .input("poisson", 0.3, None, "Poisson's ratio of the tube wall")
            .input("safety_factor", 4.0, None, "buckling safety factor")
            .output("pressure_differential", Some("Pa"), "ambient minus tube pressure")
            .output("thickness", Some("cm"), "required wall thickness")
            .output("radius_outer", Some("cm"), "outer radius of tube")
    }

    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
        let r = positive("radius_inner", frame.input("radius_inner")?)?;
        let ps = non_negative("Ps_tube", frame.input("Ps_tube")?)?;
        let pa = frame.input("Pa_ambient")?;
        let e = positive("modulus_elastic", frame.input("modulus_elastic")?)?;
        let nu = in_range("poisson", frame.input("poisson")?, 0.0, 0.5)?;
        let sf = positive("safety_factor", frame.input("safety_factor")?)?;

        let dp = positive("pressure_differential", pa - ps)?;
        let thickness = 2.0 * r * (sf * dp * (1.0 - nu * nu) / (2.0 * e)).cbrt();

        frame.set("pressure_differential", dp)?;
        frame.set("thickness", thickness)?;
        frame.set("radius_outer", r + thickness)
    }
}
