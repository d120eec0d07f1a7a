//! Compressor inlet geometry.
//!
//! The front face is an annulus between hub and tip carrying `area_in`. At the
//! back, the flow `area_out` wraps around the passenger capsule (plus its
//! wall) as a bypass annulus.
use super::{in_range, non_negative, positive};
use crate::error::DomainError;
use crate::model::{Calculator, Frame, Schema};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, Default)]
pub struct InletGeom;

impl Calculator for InletGeom {
    fn kind(&self) -> &'static str { "InletGeom" }

    fn schema(&self) -> Schema {
        Schema::new()
            .input("area_in", 7000.0, Some("cm**2"), "flow area required at the front of the inlet")
            .input("area_out", 8000.0, Some("cm**2"), "flow area required at the back of the inlet")
            .input("hub_to_tip", 0.4, None, "hub to tip ratio for the compressor")
            .input("area_passenger_capsule", 16846.0, Some("cm**2"), "cross sectional area of the passenger capsule")
            .input("thickness_wall", 5.0, Some("cm"), "thickness of the inlet wall")
            .output("radius_tip_front", Some("cm"), "tip radius at the front of the inlet")
            .output("radius_hub_front", Some("cm"), "hub radius at the front of the inlet")
            .output("radius_back_inner", Some("cm"), "inner radius of the back of the inlet")
            .output("radius_back_outer", Some("cm"), "outer radius of the back of the inlet")
            .output("area_bypass", Some("cm**2"), "area available to move compressed air around the passenger capsule")
            .output("area_frontal", Some("cm**2"), "total frontal area of the pod")
    }

    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
        let area_in = positive("area_in", frame.input("area_in")?)?;
        let area_out = positive("area_out", frame.input("area_out")?)?;
        let h = in_range("hub_to_tip", frame.input("hub_to_tip")?, 0.0, 1.0)?;
        let area_capsule = positive("area_passenger_capsule", frame.input("area_passenger_capsule")?)?;
        let wall = non_negative("thickness_wall", frame.input("thickness_wall")?)?;

        let tip_front = (area_in / (PI * (1.0 - h * h))).sqrt();
        let hub_front = h * tip_front;
        let back_inner = (area_capsule / PI).sqrt() + wall;
        let back_outer = (area_out / PI + back_inner * back_inner).sqrt();
        let bypass = PI * (back_outer * back_outer - back_inner * back_inner);
        let frontal = PI * (tip_front.max(back_outer) + wall).powi(2);

        frame.set("radius_tip_front", tip_front)?;
        frame.set("radius_hub_front", hub_front)?;
        frame.set("radius_back_inner", back_inner)?;
        frame.set("radius_back_outer", back_outer)?;
        frame.set("area_bypass", bypass)?;
        frame.set("area_frontal", frontal)
    }
}
