use super::positive;
use crate::error::DomainError;
use crate::model::{Calculator, Frame, Schema};

/// cm³ per m³
const CM3_PER_M3: f64 = 1.0e6;

/// Battery pack sized for one mission, packaged into the capsule
/// cross-section.
#[derive(Debug, Clone, Copy, Default)]
pub struct Battery;

impl Calculator for Battery {
    fn kind(&self) -> &'static str { "Battery" }

    fn schema(&self) -> Schema {
        Schema::new()
            .input("time_mission", 2100.0, Some("s"), "travel time for a single trip")
            .input("energy", 420.0, Some("kW*h"), "energy required from batteries")
            .input("area_cross_section", 16846.0, Some("cm**2"), "cross sectional area available for the pack")
            .input("specific_energy", 0.182, Some("kW*h/kg"), "pack energy per unit mass")
            .input("energy_density", 450.0, Some("kW*h/m**3"), "pack energy per unit volume")
            .output("power", Some("kW"), "average power over the mission")
            .output("mass", Some("kg"), "pack mass")
            .output("volume", Some("cm**3"), "pack volume")
            .output("length", Some("cm"), "pack length at the capsule cross-section")
    }

    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
        let time = positive("time_mission", frame.input("time_mission")?)?;
        let energy = super::non_negative("energy", frame.input("energy")?)?;
        let area = positive("area_cross_section", frame.input("area_cross_section")?)?;
        let specific = positive("specific_energy", frame.input("specific_energy")?)?;
        let density = positive("energy_density", frame.input("energy_density")?)?;

        let volume = energy / density * CM3_PER_M3;

        frame.set("power", energy * 3600.0 / time)?;
        frame.set("mass", energy / specific)?;
        frame.set("volume", volume)?;
        frame.set("length", volume / area)
    }
}
