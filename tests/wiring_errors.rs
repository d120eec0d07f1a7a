use hyperloop_core::calculators::{Aero, Battery, InletGeom, PassengerCapsule, TubeStructural};
use hyperloop_core::{Assembly, Blueprint, EngineError, UnitMismatchError, Wiring, WiringError};

fn wiring_error(result: Result<Assembly, EngineError>) -> WiringError {
    match result {
        Err(EngineError::Wiring(e)) => e,
        Err(other) => panic!("expected a wiring error, got {}", other),
        Ok(_) => panic!("expected a wiring error, got an assembly"),
    }
}

struct DoubleFeed;

impl Blueprint for DoubleFeed {
    fn name(&self) -> &str { "double_feed" }
    fn configure(&self, w: &mut Wiring) -> Result<(), EngineError> {
        let capsule = w.add("capsule", PassengerCapsule)?;
        let battery = w.add("battery", Battery)?;
        let inlet = w.add("inlet", InletGeom)?;
        w.connect(capsule.port("area_cross_section"), battery.port("area_cross_section"))?;
        w.connect(inlet.port("area_bypass"), battery.port("area_cross_section"))?;
        Ok(())
    }
}

#[test]
fn duplicate_target_fails_at_configure() {
    let err = wiring_error(Assembly::configure(&DoubleFeed));
    assert_eq!(
        err,
        WiringError::DuplicateTarget {
            target: "battery.area_cross_section".into(),
            existing: "capsule.area_cross_section".into(),
            attempted: "inlet.area_bypass".into(),
        }
    );
}

#[test]
fn out_of_order_workflow_is_rejected() {
    let mut w = Wiring::new("backwards");
    let capsule = w.add("capsule", PassengerCapsule).unwrap();
    let inlet = w.add("inlet", InletGeom).unwrap();
    let aero = w.add("aero", Aero).unwrap();
    w.connect(capsule.port("area_cross_section"), inlet.port("area_passenger_capsule")).unwrap();
    w.connect(inlet.port("area_frontal"), aero.port("area_capsule")).unwrap();
    w.workflow(&[capsule, aero, inlet]).unwrap();

    assert_eq!(
        wiring_error(Assembly::from_wiring(w)),
        WiringError::OrderViolation {
            upstream: "inlet".into(),
            downstream: "aero".into(),
            binding: "inlet.area_frontal -> aero.area_capsule".into(),
        }
    );
}

#[test]
fn incomplete_and_repeated_workflows_are_rejected() {
    let mut w = Wiring::new("partial");
    let capsule = w.add("capsule", PassengerCapsule).unwrap();
    w.add("tube", TubeStructural).unwrap();
    w.workflow(&[capsule]).unwrap();
    assert_eq!(wiring_error(Assembly::from_wiring(w)), WiringError::MissingFromWorkflow("tube".into()));

    let mut w = Wiring::new("repeated");
    let capsule = w.add("capsule", PassengerCapsule).unwrap();
    w.workflow(&[capsule, capsule]).unwrap();
    assert_eq!(wiring_error(Assembly::from_wiring(w)), WiringError::DuplicateInWorkflow("capsule".into()));
}

#[test]
fn cycle_is_rejected() {
    let mut w = Wiring::new("loop");
    let capsule = w.add("capsule", PassengerCapsule).unwrap();
    let tube = w.add("tube", TubeStructural).unwrap();
    w.connect(capsule.port("length_capsule"), tube.port("radius_inner")).unwrap();
    w.connect(tube.port("radius_outer"), capsule.port("length_row")).unwrap();
    assert!(matches!(wiring_error(Assembly::from_wiring(w)), WiringError::Cycle(_)));
}

#[test]
fn unit_mismatch_is_rejected_at_connect() {
    let mut w = Wiring::new("units");
    let capsule = w.add("capsule", PassengerCapsule).unwrap();
    let tube = w.add("tube", TubeStructural).unwrap();
    let err = w.connect(capsule.port("area_cross_section"), tube.port("radius_inner")).unwrap_err();
    assert_eq!(
        err,
        EngineError::UnitMismatch(UnitMismatchError {
            from: "capsule.area_cross_section".into(),
            from_unit: "cm**2".into(),
            to: "tube.radius_inner".into(),
            to_unit: "cm".into(),
        })
    );
}

#[test]
fn equivalent_unit_spellings_connect() {
    let mut w = Wiring::new("spellings");
    let battery = w.add("battery", Battery).unwrap();
    let area = w.boundary_input("area", 100.0, Some("cm^2"), "").unwrap();
    w.connect(area, battery.port("area_cross_section")).unwrap();
    let out = w.boundary_output("length", Some("cm"), "").unwrap();
    w.connect(battery.port("length"), out).unwrap();

    let mut asm = Assembly::from_wiring(w).unwrap();
    asm.run().unwrap();
    let volume = asm.value("battery.volume").unwrap();
    assert!((asm.output("length").unwrap() - volume / 100.0).abs() < 1e-9);
}

#[test]
fn derived_order_follows_bindings() {
    let mut w = Wiring::new("derived");
    let aero = w.add("aero", Aero).unwrap();
    let inlet = w.add("inlet", InletGeom).unwrap();
    let capsule = w.add("capsule", PassengerCapsule).unwrap();
    w.add("tube", TubeStructural).unwrap();
    w.connect(inlet.port("area_frontal"), aero.port("area_capsule")).unwrap();
    w.connect(capsule.port("area_cross_section"), inlet.port("area_passenger_capsule")).unwrap();

    let asm = Assembly::from_wiring(w).unwrap();
    assert_eq!(asm.order(), vec!["capsule", "inlet", "aero", "tube"]);
}
