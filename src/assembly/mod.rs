//! Assemblies: validated, compiled sets of calculators and bindings.
//!
//! An `Assembly` is produced once from a `Wiring` (usually by a `Blueprint`)
//! and can then be run any number of times. Every run re-executes every
//! calculator in the validated order against a scratch copy of the ledger;
//! the copy replaces the live ledger only if the whole run succeeds.
mod wiring;

pub use wiring::Wiring;

use crate::analysis::validation;
use crate::compute::{Compiler, Engine, Ledger, Program};
use crate::display::trace;
use crate::error::EngineError;
use crate::store::{CalcId, Direction, Lifecycle, ParamId, Parameter, Registry};

/// A declarative recipe for an assembly: the `configure` step.
pub trait Blueprint: Send + Sync {
    fn name(&self) -> &str;
    fn configure(&self, wiring: &mut Wiring) -> Result<(), EngineError>;
}

#[derive(Debug, Clone)]
pub struct Assembly {
    name: String,
    registry: Registry,
    program: Program,
    order: Vec<CalcId>,
    ledger: Ledger,
    lifecycle: Lifecycle,
    runs: u64,
    last_error: Option<EngineError>,
}

impl Assembly {
    /// Runs the blueprint's `configure` on a fresh wiring and validates it.
    pub fn configure(blueprint: &dyn Blueprint) -> Result<Self, EngineError> {
        let mut wiring = Wiring::new(blueprint.name());
        blueprint.configure(&mut wiring)?;
        Self::from_wiring(wiring)
    }

    pub fn from_wiring(wiring: Wiring) -> Result<Self, EngineError> {
        let Wiring { registry, workflow, .. } = &wiring;
        let order = validation::validate(wiring.name(), registry, workflow.as_deref())?;
        let program = Compiler::new(registry).compile(&order);
        let ledger = Ledger::from_defaults(registry);

        log::info!(
            "configured '{}': {} calculators, {} bindings, order [{}]",
            wiring.name(),
            registry.calc_count(),
            registry.bindings.len(),
            order.iter().map(|c| registry.calc_names[c.index()].as_str()).collect::<Vec<_>>().join(" -> ")
        );

        let name = wiring.name().to_string();
        Ok(Self {
            name,
            registry: wiring.registry,
            program,
            order,
            ledger,
            lifecycle: Lifecycle::Ready,
            runs: 0,
            last_error: None,
        })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn lifecycle(&self) -> Lifecycle { self.lifecycle }
    /// Number of successful runs.
    pub fn runs(&self) -> u64 { self.runs }
    pub fn last_error(&self) -> Option<&EngineError> { self.last_error.as_ref() }
    pub fn registry(&self) -> &Registry { &self.registry }

    /// Calculator names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.order.iter().map(|c| self.registry.calc_names[c.index()].as_str()).collect()
    }

    fn boundary_id(&self, name: &str, direction: Direction) -> Option<ParamId> {
        self.registry
            .boundary_named(name)
            .filter(|id| self.registry.meta[id.index()].direction == direction)
    }

    pub fn set_input(&mut self, name: &str, value: f64) -> Result<(), EngineError> {
        let id = self.boundary_id(name, Direction::In).ok_or_else(|| EngineError::UnknownInput(name.to_string()))?;
        if !value.is_finite() {
            return Err(EngineError::InvalidInput { name: name.to_string(), value });
        }
        self.ledger.set(id, value);
        Ok(())
    }

    pub fn input(&self, name: &str) -> Option<f64> {
        self.boundary_id(name, Direction::In).and_then(|id| self.ledger.get(id))
    }

    /// Last committed value of a boundary output.
    pub fn output(&self, name: &str) -> Option<f64> {
        self.boundary_id(name, Direction::Out).and_then(|id| self.ledger.get(id))
    }

    /// Any parameter by path: `"tube.thickness"` or a boundary name.
    pub fn value(&self, path: &str) -> Option<f64> {
        self.registry.resolve_path(path).and_then(|id| self.ledger.get(id))
    }

    fn parameter(&self, id: ParamId) -> Parameter {
        let meta = &self.registry.meta[id.index()];
        Parameter {
            name: meta.name.clone(),
            direction: meta.direction,
            value: self.ledger.get(id).unwrap_or(meta.default),
            unit: meta.unit.clone(),
            default: meta.default,
        }
    }

    pub fn boundary_inputs(&self) -> Vec<Parameter> {
        self.registry.boundary_with(Direction::In).map(|id| self.parameter(id)).collect()
    }

    pub fn boundary_outputs(&self) -> Vec<Parameter> {
        self.registry.boundary_with(Direction::Out).map(|id| self.parameter(id)).collect()
    }

    /// Executes every calculator in order and returns the boundary outputs.
    ///
    /// On failure the assembly becomes `Failed` and keeps the values of the
    /// last good run.
    pub fn run(&mut self) -> Result<Vec<Parameter>, EngineError> {
        let mut scratch = self.ledger.clone();
        match Engine::run(&self.program, &self.registry, &mut scratch) {
            Ok(()) => {
                self.ledger = scratch;
                self.runs += 1;
                self.lifecycle = Lifecycle::Ready;
                self.last_error = None;
                log::info!("'{}' run #{} complete", self.name, self.runs);
                Ok(self.boundary_outputs())
            }
            Err(e) => {
                log::warn!("'{}' run failed: {}", self.name, e);
                self.lifecycle = Lifecycle::Failed;
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Audit trace of a parameter back to the boundary inputs and defaults.
    pub fn trace(&self, path: &str) -> Option<String> {
        self.registry
            .resolve_path(path)
            .map(|id| trace::format_trace(&self.registry, &self.ledger, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::{HeatExchanger, PassengerCapsule};
    use crate::error::{DomainError, WiringError};

    struct SingleHx;

    impl Blueprint for SingleHx {
        fn name(&self) -> &str { "single_hx" }
        fn configure(&self, w: &mut Wiring) -> Result<(), EngineError> {
            let hx = w.add("hx", HeatExchanger)?;
            let t_hot_in = w.boundary_input("T_hot_in", 300.0, Some("K"), "")?;
            let lmtd = w.boundary_output("LMTD", Some("K"), "")?;
            w.connect(t_hot_in, hx.port("T_hot_in"))?;
            w.connect(hx.port("LMTD"), lmtd)?;
            w.workflow(&[hx])
        }
    }

    #[test]
    fn test_failed_run_keeps_last_good_outputs() {
        let mut asm = Assembly::configure(&SingleHx).unwrap();
        assert_eq!(asm.lifecycle(), Lifecycle::Ready);
        assert_eq!(asm.output("LMTD"), Some(0.0));

        asm.run().unwrap();
        let good = asm.output("LMTD").unwrap();
        assert!(good > 0.0);

        // Hot stream now cools while the cold stream heats: opposite signs.
        asm.set_input("T_hot_in", 400.0).unwrap();
        let err = asm.run().unwrap_err();
        assert!(matches!(err.domain(), Some(DomainError::InvalidLogArgument { .. })));
        assert_eq!(asm.lifecycle(), Lifecycle::Failed);
        assert_eq!(asm.output("LMTD"), Some(good));
        assert_eq!(asm.value("hx.LMTD"), Some(good));
        assert_eq!(asm.last_error(), Some(&err));
        assert_eq!(asm.runs(), 1);

        // Recovery
        asm.set_input("T_hot_in", 300.0).unwrap();
        asm.run().unwrap();
        assert_eq!(asm.lifecycle(), Lifecycle::Ready);
        assert_eq!(asm.output("LMTD"), Some(good));
        assert!(asm.last_error().is_none());
        assert_eq!(asm.runs(), 2);
    }

    #[test]
    fn test_set_input_validation() {
        let mut asm = Assembly::configure(&SingleHx).unwrap();
        assert_eq!(asm.set_input("LMTD", 1.0), Err(EngineError::UnknownInput("LMTD".into())));
        assert_eq!(asm.set_input("nope", 1.0), Err(EngineError::UnknownInput("nope".into())));
        assert!(matches!(asm.set_input("T_hot_in", f64::NAN), Err(EngineError::InvalidInput { .. })));
        assert_eq!(asm.input("T_hot_in"), Some(300.0));
    }

    #[test]
    fn test_derived_order_when_no_workflow() {
        let mut w = Wiring::new("derived");
        w.add("hx", HeatExchanger).unwrap();
        let asm = Assembly::from_wiring(w).unwrap();
        assert_eq!(asm.order(), vec!["hx"]);
    }

    #[test]
    fn test_empty_and_unconnected_boundary_rejected() {
        let w = Wiring::new("empty");
        assert_eq!(
            Assembly::from_wiring(w).unwrap_err(),
            EngineError::Wiring(WiringError::Empty("empty".into()))
        );

        let mut w = Wiring::new("dangling");
        w.add("hx", HeatExchanger).unwrap();
        w.boundary_output("LMTD", Some("K"), "").unwrap();
        assert_eq!(
            Assembly::from_wiring(w).unwrap_err(),
            EngineError::Wiring(WiringError::UnconnectedBoundary("LMTD".into()))
        );
    }

    #[test]
    fn test_overflowing_conversion_fails_the_run() {
        let mut w = Wiring::new("scaled");
        let capsule = w.add("capsule", PassengerCapsule).unwrap();
        let row = w.boundary_input("length_row", 150.0, Some("cm"), "").unwrap();
        let len_m = w.boundary_output("length_m", Some("m"), "").unwrap();
        w.connect(row, capsule.port("length_row")).unwrap();
        w.connect_scaled(capsule.port("length_capsule"), len_m, 1.0e10).unwrap();
        let mut asm = Assembly::from_wiring(w).unwrap();
        asm.run().unwrap();
        let good = asm.output("length_m");

        asm.set_input("length_row", 1.0e300).unwrap();
        let err = asm.run().unwrap_err();
        assert!(matches!(err, EngineError::NonFiniteTransfer { ref to, .. } if to == "length_m"));
        assert_eq!(asm.lifecycle(), Lifecycle::Failed);
        assert_eq!(asm.output("length_m"), good);
    }

    #[test]
    fn test_clones_hold_independent_state() {
        let mut a = Assembly::configure(&SingleHx).unwrap();
        let mut b = a.clone();
        b.set_input("T_hot_in", 290.0).unwrap();
        a.run().unwrap();
        b.run().unwrap();
        assert_eq!(a.input("T_hot_in"), Some(300.0));
        assert_ne!(a.output("LMTD"), b.output("LMTD"));
    }
}
