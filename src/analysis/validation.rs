//! Configure-time checks run once over a finished wiring.
use super::topology::DependencyGraph;
use crate::error::WiringError;
use crate::store::{CalcId, Direction, Registry};

/// Checks the wiring as a whole and returns the execution order.
///
/// Local checks (unit match, binding direction, single writer) already ran
/// in `Wiring::connect`; what remains needs the complete graph.
pub fn validate(name: &str, registry: &Registry, workflow: Option<&[CalcId]>) -> Result<Vec<CalcId>, WiringError> {
    if registry.calc_count() == 0 {
        return Err(WiringError::Empty(name.to_string()));
    }

    check_boundary(registry)?;

    let graph = DependencyGraph::build(registry);
    match workflow {
        Some(order) => {
            check_workflow(registry, order)?;
            graph.check_order(registry, order)?;
            Ok(order.to_vec())
        }
        None => graph.derive_order(registry),
    }
}

/// Every boundary parameter must be connected to exactly one calculator
/// parameter. Fan-out and double-binding were refused while wiring, so only
/// the missing case is left.
fn check_boundary(registry: &Registry) -> Result<(), WiringError> {
    for &id in &registry.boundary {
        let connected = match registry.meta[id.index()].direction {
            Direction::In => !registry.outgoing(id).is_empty(),
            Direction::Out => registry.incoming(id).is_some(),
        };
        if !connected {
            return Err(WiringError::UnconnectedBoundary(registry.path(id)));
        }
    }
    Ok(())
}

fn check_workflow(registry: &Registry, order: &[CalcId]) -> Result<(), WiringError> {
    let mut seen = vec![false; registry.calc_count()];
    for &calc in order {
        registry.check_calc(calc)?;
        if std::mem::replace(&mut seen[calc.index()], true) {
            return Err(WiringError::DuplicateInWorkflow(registry.calc_names[calc.index()].clone()));
        }
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(WiringError::MissingFromWorkflow(registry.calc_names[missing].clone()));
    }
    Ok(())
}
