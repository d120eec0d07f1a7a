use super::non_negative;
use crate::error::DomainError;
use crate::model::{Calculator, Frame, Schema};

/// cm² per m²
const CM2_PER_M2: f64 = 1.0e4;

/// Aerodynamic drag on the pod and the net propulsive force left over.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aero;

impl Calculator for Aero {
    fn kind(&self) -> &'static str { "Aero" }

    fn schema(&self) -> Schema {
        Schema::new()
            .input("coef_drag", 2.0, None, "capsule drag coefficient")
            .input("rho", 0.0012, Some("kg/m**3"), "air density (aero calcs)")
            .input("velocity_capsule", 310.0, Some("m/s"), "velocity of the pod")
            .input("gross_thrust", 1500.0, Some("N"), "thrust generated by the nozzle")
            .input("area_capsule", 20000.0, Some("cm**2"), "frontal area of the pod")
            .output("drag", Some("N"), "aerodynamic drag")
            .output("net_force", Some("N"), "net force with drag considerations")
            .output("power_drag", Some("W"), "power lost to drag")
    }

    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
        let cd = non_negative("coef_drag", frame.input("coef_drag")?)?;
        let rho = non_negative("rho", frame.input("rho")?)?;
        let v = frame.input("velocity_capsule")?;
        let thrust = frame.input("gross_thrust")?;
        let area = non_negative("area_capsule", frame.input("area_capsule")?)? / CM2_PER_M2;

        // Drag opposes the direction of travel.
        let drag = 0.5 * rho * v * v.abs() * cd * area;

        frame.set("drag", drag)?;
        frame.set("net_force", thrust - drag)?;
        frame.set("power_drag", drag * v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::testing::{evaluate, get};
    use rstest::rstest;

    #[test]
    fn test_default_drag() {
        let v = evaluate(&Aero, &[]).unwrap();
        let drag = 0.5 * 0.0012 * 310.0 * 310.0 * 2.0 * 2.0;
        assert!((get(&v, "drag") - drag).abs() < 1e-9);
        assert!((get(&v, "net_force") - (1500.0 - drag)).abs() < 1e-9);
        assert!((get(&v, "power_drag") - drag * 310.0).abs() < 1e-6);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-50.0)]
    fn test_drag_sign_follows_velocity(#[case] speed: f64) {
        let v = evaluate(&Aero, &[("velocity_capsule", speed)]).unwrap();
        assert!(get(&v, "drag") <= 0.0);
        assert!(get(&v, "power_drag") >= 0.0);
    }

    #[test]
    fn test_rejects_negative_density() {
        assert!(matches!(evaluate(&Aero, &[("rho", -1.0)]), Err(DomainError::Negative { .. })));
    }
}
