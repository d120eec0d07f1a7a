use crate::assembly::{Blueprint, Wiring};
use crate::calculators::HeatExchanger;
use crate::error::EngineError;

/// A single heat exchanger exposed with all of its operating point as
/// boundary inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatExchangerLoop;

const INPUTS: [(&str, f64, Option<&str>); 7] = [
    ("T_hot_in", 300.0, Some("K")),
    ("T_hot_out", 360.0, Some("K")),
    ("T_cold_in", 290.0, Some("K")),
    ("T_cold_out", 320.0, Some("K")),
    ("mass_flow_cold", 0.5, Some("kg/s")),
    ("cp_cold", 4186.0, Some("J/kg*K")),
    ("U", 500.0, Some("W/m^2*K")),
];

const OUTPUTS: [(&str, Option<&str>); 3] = [("LMTD", Some("K")), ("q", Some("W")), ("area_surface", Some("m^2"))];

impl Blueprint for HeatExchangerLoop {
    fn name(&self) -> &str { "heat_exchanger" }

    fn configure(&self, w: &mut Wiring) -> Result<(), EngineError> {
        let hx = w.add("hx", HeatExchanger)?;
        for (name, default, unit) in INPUTS {
            let p = w.boundary_input(name, default, unit, "")?;
            w.connect(p, hx.port(name))?;
        }
        for (name, unit) in OUTPUTS {
            let p = w.boundary_output(name, unit, "")?;
            w.connect(hx.port(name), p)?;
        }
        w.workflow(&[hx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Assembly;
    use crate::error::DomainError;
    use crate::store::Lifecycle;

    #[test]
    fn test_loop_reports_lmtd() {
        let mut asm = Assembly::configure(&HeatExchangerLoop).unwrap();
        asm.run().unwrap();
        assert!((asm.output("LMTD").unwrap() - 30.0 / 2f64.ln()).abs() < 1e-12);
        assert!(asm.output("area_surface").unwrap() > 0.0);
    }

    #[test]
    fn test_loop_equal_differences() {
        let mut asm = Assembly::configure(&HeatExchangerLoop).unwrap();
        asm.set_input("T_hot_out", 330.0).unwrap();
        asm.run().unwrap();
        assert_eq!(asm.output("LMTD"), Some(30.0));
    }

    #[test]
    fn test_loop_domain_error_names_calculator() {
        let mut asm = Assembly::configure(&HeatExchangerLoop).unwrap();
        asm.set_input("T_cold_out", 290.0).unwrap();
        match asm.run().unwrap_err() {
            EngineError::Domain { calculator, inputs, source } => {
                assert_eq!(calculator, "hx");
                assert!(inputs.contains(&("T_cold_out".to_string(), 290.0)));
                assert_eq!(source, DomainError::InvalidLogArgument { dt1: 60.0, dt2: 0.0 });
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(asm.lifecycle(), Lifecycle::Failed);
    }
}
