use crate::compute::Ledger;
use crate::store::{CalcId, Direction, Owner, ParamId, Registry};
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the provenance of `target` as an indented tree: each line is one
/// parameter with its current value, walking upstream through bindings and
/// calculators until boundary inputs or schema defaults are reached.
pub fn format_trace(registry: &Registry, ledger: &Ledger, target: ParamId) -> String {
    let mut tracer = Tracer {
        registry,
        ledger,
        visited_at_level: HashMap::new(),
        calcs_seen: HashMap::new(),
        output: String::new(),
    };

    if target.index() < registry.param_count() {
        let _ = writeln!(tracer.output, "AUDIT TRACE for '{}':", registry.path(target));
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_param(target, 1, "");
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid parameter ID {:?}", target);
    }
    tracer.output
}

struct Tracer<'a> {
    registry: &'a Registry,
    ledger: &'a Ledger,
    visited_at_level: HashMap<ParamId, usize>,
    calcs_seen: HashMap<CalcId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_param(&mut self, id: ParamId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&id) {
            let _ = writeln!(self.output, "{}-> {} (Ref to L{})", prefix, self.registry.path(id), first_seen);
            return;
        }
        self.visited_at_level.insert(id, level);

        let meta = &self.registry.meta[id.index()];
        let header = format!("[L{}] {} {}", level, self.registry.path(id), self.format_value(id));

        if let Some(binding) = self.registry.incoming(id).copied() {
            let scale = binding.scale.map(|f| format!(" x {}", f)).unwrap_or_default();
            let _ = writeln!(self.output, "{}{} <- {}{}", prefix, header, self.registry.path(binding.source), scale);
            let stem = self.build_child_stem(prefix);
            self.trace_param(binding.source, level + 1, &format!("{}`--", stem));
            return;
        }

        match (self.registry.owners[id.index()], meta.direction) {
            (Owner::Boundary, Direction::In) => {
                let _ = writeln!(self.output, "{}{} -> Boundary input (default {})", prefix, header, meta.default);
            }
            (Owner::Calculator(_), Direction::In) => {
                let _ = writeln!(self.output, "{}{} -> Default({})", prefix, header, meta.default);
            }
            (Owner::Calculator(calc), Direction::Out) => {
                let kind = self.registry.calcs[calc.index()].kind();
                if let Some(&first_seen) = self.calcs_seen.get(&calc) {
                    let _ = writeln!(self.output, "{}{} = {}(...) (inputs at L{})", prefix, header, kind, first_seen);
                    return;
                }
                self.calcs_seen.insert(calc, level);
                let _ = writeln!(self.output, "{}{} = {}", prefix, header, kind);
                let inputs: Vec<ParamId> = self
                    .registry
                    .calc_params(calc)
                    .filter(|p| self.registry.meta[p.index()].direction == Direction::In)
                    .collect();
                self.recurse_children(prefix, &inputs, level);
            }
            (Owner::Boundary, Direction::Out) => {
                let _ = writeln!(self.output, "{}{} -> (unbound)", prefix, header);
            }
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &[ParamId], level: usize) {
        let stem = self.build_child_stem(prefix);
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            self.trace_param(child, level + 1, &format!("{}{}", stem, connector));
        }
    }

    fn format_value(&self, id: ParamId) -> String {
        let unit = self.registry.meta[id.index()].unit.as_ref();
        match (self.ledger.get(id), unit) {
            (Some(v), Some(u)) => format!("[{:.3} {}]", v, u),
            (Some(v), None) => format!("[{:.3}]", v),
            (None, _) => "[?]".to_string(),
        }
    }

    fn build_child_stem(&self, current_prefix: &str) -> String {
        current_prefix.replace("`--", "   ").replace("|--", "|  ")
    }
}
