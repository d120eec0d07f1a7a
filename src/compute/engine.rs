use crate::compute::bytecode::{Program, Transfer};
use crate::compute::ledger::Ledger;
use crate::error::EngineError;
use crate::model::Frame;
use crate::store::Registry;

pub struct Engine;

impl Engine {
    /// Executes the program against the provided ledger.
    ///
    /// Stops at the first failing calculator; the ledger is then partially
    /// written, so callers run against a scratch copy and commit on success.
    pub fn run(program: &Program, registry: &Registry, ledger: &mut Ledger) -> Result<(), EngineError> {
        Self::validate_memory_layout(program, ledger)?;

        for step in &program.steps {
            for transfer in &step.transfers {
                Self::apply(registry, ledger, transfer)?;
            }

            let idx = step.calc.index();
            let name = &registry.calc_names[idx];
            let mut frame = Frame::new(&registry.schemas[idx], ledger.slice_mut(registry.param_ranges[idx]));

            let outcome = registry.calcs[idx]
                .compute(&mut frame)
                .and_then(|_| frame.ensure_complete());

            if let Err(source) = outcome {
                return Err(EngineError::Domain {
                    calculator: name.clone(),
                    inputs: frame.inputs_snapshot(),
                    source,
                });
            }
            log::debug!("computed '{}' ({})", name, registry.calcs[idx].kind());
        }

        for transfer in &program.exports {
            Self::apply(registry, ledger, transfer)?;
        }
        Ok(())
    }

    fn apply(registry: &Registry, ledger: &mut Ledger, transfer: &Transfer) -> Result<(), EngineError> {
        ledger.transfer(transfer).map_err(|value| EngineError::NonFiniteTransfer {
            from: registry.path(transfer.source),
            to: registry.path(transfer.target),
            value,
        })
    }

    /// The ledger must hold exactly the slots the program was compiled for.
    fn validate_memory_layout(program: &Program, ledger: &Ledger) -> Result<(), EngineError> {
        if ledger.len() != program.param_count {
            return Err(EngineError::LayoutMismatch { expected: program.param_count, actual: ledger.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::bytecode::Compiler;
    use crate::error::DomainError;
    use crate::model::{Calculator, Schema};
    use crate::store::{Binding, CalcId, ParamId};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Halve;

    impl Calculator for Halve {
        fn kind(&self) -> &'static str { "Halve" }
        fn schema(&self) -> Schema {
            Schema::new().input("x", 8.0, None, "").output("half", None, "")
        }
        fn compute(&self, frame: &mut Frame<'_>) -> Result<(), DomainError> {
            let x = frame.input("x")?;
            if x < 0.0 {
                return Err(DomainError::Negative { name: "x".into(), value: x });
            }
            frame.set("half", x / 2.0)
        }
    }

    fn chain() -> (Registry, Vec<CalcId>) {
        let mut reg = Registry::new();
        let a = reg.add_calculator("a", Arc::new(Halve)).unwrap();
        let b = reg.add_calculator("b", Arc::new(Halve)).unwrap();
        let source = reg.lookup(a, "half").unwrap();
        let target = reg.lookup(b, "x").unwrap();
        reg.add_binding(Binding { source, target, scale: Some(10.0) });
        (reg, vec![a, b])
    }

    #[test]
    fn test_engine_runs_chain_with_scaled_transfer() {
        let (reg, order) = chain();
        let program = Compiler::new(&reg).compile(&order);
        let mut ledger = Ledger::from_defaults(&reg);

        Engine::run(&program, &reg, &mut ledger).unwrap();
        // a.half = 4, b.x = 40, b.half = 20
        assert_eq!(ledger.get(ParamId::new(1)), Some(4.0));
        assert_eq!(ledger.get(ParamId::new(2)), Some(40.0));
        assert_eq!(ledger.get(ParamId::new(3)), Some(20.0));
    }

    #[test]
    fn test_engine_reports_failing_calculator_with_inputs() {
        let (reg, order) = chain();
        let program = Compiler::new(&reg).compile(&order);
        let mut ledger = Ledger::from_defaults(&reg);
        ledger.set(ParamId::new(0), -2.0);

        let err = Engine::run(&program, &reg, &mut ledger).unwrap_err();
        match err {
            EngineError::Domain { calculator, inputs, source } => {
                assert_eq!(calculator, "a");
                assert_eq!(inputs, vec![("x".to_string(), -2.0)]);
                assert!(matches!(source, DomainError::Negative { .. }));
            }
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_engine_rejects_overflowing_transfer() {
        let (reg, order) = chain();
        let program = Compiler::new(&reg).compile(&order);
        let mut ledger = Ledger::from_defaults(&reg);
        ledger.set(ParamId::new(0), 1.0e308);

        let result = Engine::run(&program, &reg, &mut ledger);
        assert_eq!(
            result,
            Err(EngineError::NonFiniteTransfer { from: "a.half".into(), to: "b.x".into(), value: f64::INFINITY })
        );
        // b.x keeps its default
        assert_eq!(ledger.get(ParamId::new(2)), Some(8.0));
    }

    #[test]
    fn test_engine_detects_layout_mismatch() {
        let (reg, order) = chain();
        let program = Compiler::new(&reg).compile(&order);
        let mut ledger = Ledger::new();
        ledger.set(ParamId::new(1), 0.0);

        let result = Engine::run(&program, &reg, &mut ledger);
        assert_eq!(result, Err(EngineError::LayoutMismatch { expected: 4, actual: 2 }));
    }
}
