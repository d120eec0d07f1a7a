use crate::analysis::topology::DependencyGraph;
use crate::assembly::Assembly;
use crate::store::{Lifecycle, Parameter};
use serde::Serialize;
use std::fmt::Write;

/// Serializable summary of an assembly after a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub system: String,
    pub lifecycle: Lifecycle,
    pub runs: u64,
    pub inputs: Vec<Parameter>,
    pub outputs: Vec<Parameter>,
}

impl RunReport {
    pub fn from_assembly(assembly: &Assembly) -> Self {
        Self {
            system: assembly.name().to_string(),
            lifecycle: assembly.lifecycle(),
            runs: assembly.runs(),
            inputs: assembly.boundary_inputs(),
            outputs: assembly.boundary_outputs(),
        }
    }
}

/// Aligned `name  value  unit` table.
pub fn format_table(params: &[Parameter]) -> String {
    let width = params.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for p in params {
        let unit = p.unit.as_ref().map(|u| u.0.as_str()).unwrap_or("");
        let _ = writeln!(out, "  {:<width$}  {:>14.6}  {}", p.name, p.value, unit, width = width);
    }
    out
}

/// Human-readable structure of an assembly: boundary parameters, calculators
/// and execution order.
pub fn describe(assembly: &Assembly) -> String {
    let registry = assembly.registry();
    let mut out = String::new();
    let _ = writeln!(out, "{}", assembly.name());
    let _ = writeln!(out, "inputs:");
    out.push_str(&format_table(&assembly.boundary_inputs()));
    let _ = writeln!(out, "outputs:");
    for p in assembly.boundary_outputs() {
        let unit = p.unit.as_ref().map(|u| u.0.as_str()).unwrap_or("-");
        let _ = writeln!(out, "  {} [{}]", p.name, unit);
    }
    let _ = writeln!(out, "calculators:");
    let graph = DependencyGraph::build(registry);
    for (i, (name, calc)) in registry.calc_names.iter().zip(registry.calcs.iter()).enumerate() {
        let upstream: Vec<&str> = graph
            .upstream_of(registry.calc_id(i))
            .into_iter()
            .map(|c| registry.calc_names[c.index()].as_str())
            .collect();
        if upstream.is_empty() {
            let _ = writeln!(out, "  {} ({})", name, calc.kind());
        } else {
            let _ = writeln!(out, "  {} ({}) <- {}", name, calc.kind(), upstream.join(", "));
        }
    }
    let _ = writeln!(out, "order: {}", assembly.order().join(" -> "));
    out
}
