use crate::store::{Binding, CalcId, Owner, ParamId, Registry};
use smallvec::SmallVec;

/// A value copy along one binding, executed right before the consuming step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    pub source: ParamId,
    pub target: ParamId,
    pub scale: f64,
}

impl From<&Binding> for Transfer {
    fn from(b: &Binding) -> Self {
        Self { source: b.source, target: b.target, scale: b.scale.unwrap_or(1.0) }
    }
}

/// One calculator invocation plus the transfers that feed its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub calc: CalcId,
    pub transfers: SmallVec<[Transfer; 4]>,
}

/// The linear execution tape of an assembly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub steps: Vec<Step>,
    /// Calculator outputs copied to boundary outputs after the last step.
    pub exports: Vec<Transfer>,
    pub param_count: usize,
}

pub struct Compiler<'a> {
    registry: &'a Registry,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Compiles the wiring into a linear program following `order`.
    ///
    /// Each binding becomes a transfer attached to the step of the
    /// calculator that consumes it, so a step only ever reads values that
    /// earlier steps (or the caller) produced.
    pub fn compile(&self, order: &[CalcId]) -> Program {
        let mut position = vec![usize::MAX; self.registry.calc_count()];
        for (pos, calc) in order.iter().enumerate() {
            position[calc.index()] = pos;
        }

        let mut steps: Vec<Step> = order
            .iter()
            .map(|&calc| Step { calc, transfers: SmallVec::new() })
            .collect();
        let mut exports = Vec::new();

        for binding in &self.registry.bindings {
            match self.registry.owners[binding.target.index()] {
                Owner::Calculator(calc) => steps[position[calc.index()]].transfers.push(binding.into()),
                Owner::Boundary => exports.push(binding.into()),
            }
        }

        Program { steps, exports, param_count: self.registry.param_count() }
    }
}
