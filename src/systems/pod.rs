use crate::assembly::{Blueprint, Wiring};
use crate::calculators::{Aero, Battery, InletGeom, PassengerCapsule, TubeStructural};
use crate::error::EngineError;

/// Overall hyperloop pod geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pod;

impl Blueprint for Pod {
    fn name(&self) -> &str { "pod" }

    fn configure(&self, w: &mut Wiring) -> Result<(), EngineError> {
        let capsule = w.add("capsule", PassengerCapsule)?;
        let tube = w.add("tube", TubeStructural)?;
        let inlet = w.add("inlet", InletGeom)?;
        let battery = w.add("battery", Battery)?;
        let aero = w.add("aero", Aero)?;

        // Inputs
        let area_inlet_in = w.boundary_input("area_inlet_in", 7000.0, Some("cm**2"), "flow area required at the front of the inlet")?;
        let area_inlet_out = w.boundary_input("area_inlet_out", 8000.0, Some("cm**2"), "flow area required at the back of the inlet")?;
        let time_mission = w.boundary_input("time_mission", 2100.0, Some("s"), "travel time for a single trip")?;
        let radius_tube_inner = w.boundary_input("radius_tube_inner", 200.0, Some("cm"), "inner tube radius")?;
        let rho_air = w.boundary_input("rho_air", 0.0012, Some("kg/m**3"), "air density (aero calcs)")?;
        let f_net = w.boundary_input("F_net", 1500.0, Some("N"), "thrust generated by the nozzle")?;
        let energy = w.boundary_input("energy", 420.0, Some("kW*h"), "energy required from batteries")?;
        let ps_tube = w.boundary_input("Ps_tube", 99.0, Some("Pa"), "static pressure in the tube")?;
        let speed_max = w.boundary_input("speed_max", 310.0, Some("m/s"), "maximum velocity of the pod")?;
        let hub_to_tip = w.boundary_input("hub_to_tip", 0.4, None, "hub to tip ratio for the compressor")?;
        let coef_drag = w.boundary_input("coef_drag", 2.0, None, "capsule drag coefficient")?;
        let n_rows = w.boundary_input("n_rows", 14.0, None, "number of rows of seats in the pod")?;
        let length_row = w.boundary_input("length_row", 150.0, Some("cm"), "length of each row of seats")?;

        // Outputs
        let radius_inlet_back_outer = w.boundary_output("radius_inlet_back_outer", Some("cm"), "outer radius of the back of the inlet")?;
        let area_compressor_bypass = w.boundary_output(
            "area_compressor_bypass",
            Some("cm**2"),
            "area available to move compressed air around the passenger capsule",
        )?;
        let area_cross_section = w.boundary_output("area_cross_section", Some("cm**2"), "cross sectional area of the passenger capsule")?;
        let radius_tube_outer = w.boundary_output("radius_tube_outer", Some("cm"), "outer radius of tube")?;
        let net_force = w.boundary_output("net_force", Some("N"), "net force with drag considerations")?;

        w.connect(n_rows, capsule.port("n_rows"))?;
        w.connect(length_row, capsule.port("length_row"))?;

        w.connect(radius_tube_inner, tube.port("radius_inner"))?;
        w.connect(ps_tube, tube.port("Ps_tube"))?;

        w.connect(area_inlet_in, inlet.port("area_in"))?;
        w.connect(area_inlet_out, inlet.port("area_out"))?;
        w.connect(hub_to_tip, inlet.port("hub_to_tip"))?;

        w.connect(time_mission, battery.port("time_mission"))?;
        w.connect(energy, battery.port("energy"))?;

        w.connect(coef_drag, aero.port("coef_drag"))?;
        w.connect(rho_air, aero.port("rho"))?;
        w.connect(speed_max, aero.port("velocity_capsule"))?;
        w.connect(f_net, aero.port("gross_thrust"))?;

        w.connect(capsule.port("area_cross_section"), inlet.port("area_passenger_capsule"))?;
        w.connect(capsule.port("area_cross_section"), battery.port("area_cross_section"))?;
        w.connect(inlet.port("area_frontal"), aero.port("area_capsule"))?;

        w.connect(capsule.port("area_cross_section"), area_cross_section)?;
        w.connect(tube.port("radius_outer"), radius_tube_outer)?;
        w.connect(inlet.port("radius_back_outer"), radius_inlet_back_outer)?;
        w.connect(inlet.port("area_bypass"), area_compressor_bypass)?;
        // Not consumed yet; eventually feeds the mission analysis.
        w.connect(aero.port("net_force"), net_force)?;

        w.workflow(&[capsule, tube, inlet, battery, aero])
    }
}
