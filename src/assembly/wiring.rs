//! The declaration phase of an assembly.
use crate::analysis::units;
use crate::error::{EngineError, WiringError};
use crate::model::Calculator;
use crate::store::{Binding, CalcId, Direction, Lifecycle, Owner, ParamId, ParamMeta, Port, Registry, Unit};
use std::sync::Arc;

/// Collects calculators, boundary parameters, bindings and the workflow
/// order. Every declaration is checked on the spot; whole-graph checks run
/// when the wiring is turned into an `Assembly`.
#[derive(Debug, Clone)]
pub struct Wiring {
    name: String,
    pub(crate) registry: Registry,
    pub(crate) workflow: Option<Vec<CalcId>>,
}

impl Wiring {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), registry: Registry::new(), workflow: None }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.registry.is_empty() { Lifecycle::Unconfigured } else { Lifecycle::Configured }
    }

    pub fn add<C: Calculator + 'static>(&mut self, name: &str, calc: C) -> Result<CalcId, EngineError> {
        self.add_shared(name, Arc::new(calc))
    }

    pub fn add_shared(&mut self, name: &str, calc: Arc<dyn Calculator>) -> Result<CalcId, EngineError> {
        let id = self.registry.add_calculator(name, calc)?;
        log::debug!("{}: added calculator '{}'", self.name, name);
        Ok(id)
    }

    pub fn boundary_input(&mut self, name: &str, default: f64, unit: Option<&str>, desc: &str) -> Result<ParamId, EngineError> {
        Ok(self.registry.add_boundary(ParamMeta {
            name: name.to_string(),
            direction: Direction::In,
            unit: unit.map(|u| Unit(u.to_string())),
            default,
            desc: desc.to_string(),
        })?)
    }

    pub fn boundary_output(&mut self, name: &str, unit: Option<&str>, desc: &str) -> Result<ParamId, EngineError> {
        Ok(self.registry.add_boundary(ParamMeta {
            name: name.to_string(),
            direction: Direction::Out,
            unit: unit.map(|u| Unit(u.to_string())),
            default: 0.0,
            desc: desc.to_string(),
        })?)
    }

    /// Resolves a calculator parameter by name.
    pub fn param(&self, calc: CalcId, name: &str) -> Result<ParamId, EngineError> {
        Ok(self.registry.lookup(calc, name)?)
    }

    fn resolve(&self, port: Port) -> Result<ParamId, WiringError> {
        match port {
            Port::Param(id) if self.registry.owns_param(id) => Ok(id),
            Port::Param(id) => Err(WiringError::InvalidEndpoint { path: format!("#{}", id.index()), role: "endpoint" }),
            Port::Named(calc, name) => self.registry.lookup(calc, &name),
        }
    }

    /// Binds `source -> target` with unit checking.
    pub fn connect(&mut self, source: impl Into<Port>, target: impl Into<Port>) -> Result<(), EngineError> {
        self.bind(source.into(), target.into(), None)
    }

    /// Binds `source -> target` through an explicit conversion factor
    /// (`target = source * factor`). Units are not compared.
    pub fn connect_scaled(&mut self, source: impl Into<Port>, target: impl Into<Port>, factor: f64) -> Result<(), EngineError> {
        self.bind(source.into(), target.into(), Some(factor))
    }

    fn bind(&mut self, source: Port, target: Port, scale: Option<f64>) -> Result<(), EngineError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        let reg = &self.registry;
        let (s_meta, t_meta) = (&reg.meta[source.index()], &reg.meta[target.index()]);
        let (s_owner, t_owner) = (reg.owners[source.index()], reg.owners[target.index()]);

        // Sources: calculator outputs or boundary inputs.
        let source_ok = matches!(
            (s_owner, s_meta.direction),
            (Owner::Calculator(_), Direction::Out) | (Owner::Boundary, Direction::In)
        );
        if !source_ok {
            return Err(WiringError::InvalidEndpoint { path: reg.path(source), role: "source" }.into());
        }
        // Targets: calculator inputs or boundary outputs.
        let target_ok = matches!(
            (t_owner, t_meta.direction),
            (Owner::Calculator(_), Direction::In) | (Owner::Boundary, Direction::Out)
        );
        if !target_ok {
            return Err(WiringError::InvalidEndpoint { path: reg.path(target), role: "target" }.into());
        }
        if s_owner == Owner::Boundary && t_owner == Owner::Boundary {
            return Err(WiringError::BoundaryPassthrough { from: reg.path(source), to: reg.path(target) }.into());
        }

        if let Some(existing) = reg.incoming(target) {
            return Err(WiringError::DuplicateTarget {
                target: reg.path(target),
                existing: reg.path(existing.source),
                attempted: reg.path(source),
            }
            .into());
        }
        if s_owner == Owner::Boundary {
            if let Some(existing) = reg.outgoing(source).first() {
                return Err(WiringError::BoundaryFanOut { name: reg.path(source), existing: reg.path(existing.target) }.into());
            }
        }

        match scale {
            Some(factor) if !factor.is_finite() || factor == 0.0 => {
                return Err(WiringError::InvalidScale { target: reg.path(target), factor }.into());
            }
            Some(_) => {}
            None => units::check_binding(
                &reg.path(source),
                s_meta.unit.as_ref(),
                &reg.path(target),
                t_meta.unit.as_ref(),
            )?,
        }

        log::debug!("{}: bound {} -> {}", self.name, reg.path(source), reg.path(target));
        self.registry.add_binding(Binding { source, target, scale });
        Ok(())
    }

    /// Declares the execution order. Validated against the bindings when the
    /// assembly is configured.
    pub fn workflow(&mut self, order: &[CalcId]) -> Result<(), EngineError> {
        for &calc in order {
            self.registry.check_calc(calc)?;
        }
        self.workflow = Some(order.to_vec());
        Ok(())
    }
}
