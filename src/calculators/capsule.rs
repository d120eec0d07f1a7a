use super::{in_range, positive, whole_number};
use crate::error::DomainError;
use crate::model::{Calculator, Frame, Schema};
use std::f64::consts::PI;

/// Passenger capsule sized from its seating layout. The cross-section is
/// elliptical with `width` and `height` as its axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassengerCapsule;

impl Calculator for PassengerCapsule {
    fn kind(&self) -> &'static str { "PassengerCapsule" }

    fn schema(&self) -> Schema {
        Schema::new()
            .input("n_rows", 14.0, None, "number of rows of seats in the pod")
            .input("length_row", 150.0, Some("cm"), "length of each row of seats")
            .input("width", 130.0, Some("cm"), "inner width of the capsule")
            .input("height", 165.0, Some("cm"), "inner height of the capsule")
            .input("length_margin", 300.0, Some("cm"), "length added for nose, tail and doors")
            .output("length_capsule", Some("cm"), "overall capsule length")
            .output("area_cross_section", Some("cm**2"), "cross sectional area of the passenger capsule")
            .output("volume", Some("cm**3"), "enclosed capsule volume")
    }

    fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
        let n_rows = whole_number("n_rows", frame.input("n_rows")?)?;
        let n_rows = in_range("n_rows", n_rows, 1.0, f64::INFINITY)?;
        let length_row = positive("length_row", frame.input("length_row")?)?;
        let width = positive("width", frame.input("width")?)?;
        let height = positive("height", frame.input("height")?)?;
        let margin = super::non_negative("length_margin", frame.input("length_margin")?)?;

        let length = n_rows * length_row + margin;
        let area = PI / 4.0 * width * height;

        frame.set("length_capsule", length)?;
        frame.set("area_cross_section", area)?;
        frame.set("volume", area * length)
    }
}
