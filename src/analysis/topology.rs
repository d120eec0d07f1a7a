use crate::error::WiringError;
use crate::store::{CalcId, Owner, Registry};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;

/// Calculator-level dependency graph. An edge `a -> b` exists for every
/// binding from an output of `a` to an input of `b`; the edge weight is the
/// binding index.
pub struct DependencyGraph {
    graph: DiGraph<CalcId, u32>,
}

impl DependencyGraph {
    pub fn build(registry: &Registry) -> Self {
        let mut graph = DiGraph::with_capacity(registry.calc_count(), registry.bindings.len());
        for i in 0..registry.calc_count() {
            graph.add_node(registry.calc_id(i));
        }
        for (idx, binding) in registry.bindings.iter().enumerate() {
            if let (Owner::Calculator(from), Owner::Calculator(to)) =
                (registry.owners[binding.source.index()], registry.owners[binding.target.index()])
            {
                graph.add_edge(NodeIndex::new(from.index()), NodeIndex::new(to.index()), idx as u32);
            }
        }
        Self { graph }
    }

    /// Fails with the calculator where petgraph closed a cycle.
    pub fn check_acyclic(&self, registry: &Registry) -> Result<(), WiringError> {
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| {
                let calc = self.graph[cycle.node_id()];
                WiringError::Cycle(registry.calc_names[calc.index()].clone())
            })
    }

    /// Returns a topological order using Kahn's Algorithm. Among ready
    /// calculators, declaration order wins, so the result is stable.
    pub fn derive_order(&self, registry: &Registry) -> Result<Vec<CalcId>, WiringError> {
        self.check_acyclic(registry)?;

        let count = self.graph.node_count();
        let mut in_degree: Vec<usize> = (0..count)
            .map(|i| self.graph.neighbors_directed(NodeIndex::new(i), petgraph::Incoming).count())
            .collect();
        let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(count);

        while let Some(node) = queue.pop_front() {
            order.push(self.graph[NodeIndex::new(node)]);
            let mut children: Vec<usize> = self
                .graph
                .neighbors_directed(NodeIndex::new(node), petgraph::Outgoing)
                .map(|n| n.index())
                .collect();
            children.sort_unstable();
            for child in children {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    // Keep the queue sorted so ties resolve by declaration order.
                    let pos = queue.iter().position(|&q| q > child).unwrap_or(queue.len());
                    queue.insert(pos, child);
                }
            }
        }

        Ok(order)
    }

    /// Verifies that every binding runs from an earlier to a later
    /// calculator in `order`.
    pub fn check_order(&self, registry: &Registry, order: &[CalcId]) -> Result<(), WiringError> {
        self.check_acyclic(registry)?;

        let mut position = vec![usize::MAX; registry.calc_count()];
        for (pos, calc) in order.iter().enumerate() {
            position[calc.index()] = pos;
        }

        for edge in self.graph.raw_edges() {
            let from = self.graph[edge.source()];
            let to = self.graph[edge.target()];
            if position[from.index()] >= position[to.index()] {
                let binding = &registry.bindings[edge.weight as usize];
                return Err(WiringError::OrderViolation {
                    upstream: registry.calc_names[from.index()].clone(),
                    downstream: registry.calc_names[to.index()].clone(),
                    binding: format!("{} -> {}", registry.path(binding.source), registry.path(binding.target)),
                });
            }
        }
        Ok(())
    }

    /// Calculators feeding `calc` directly.
    pub fn upstream_of(&self, calc: CalcId) -> Vec<CalcId> {
        let mut ups: Vec<CalcId> = self
            .graph
            .neighbors_directed(NodeIndex::new(calc.index()), petgraph::Incoming)
            .map(|n| self.graph[n])
            .collect();
        ups.sort_unstable();
        ups.dedup();
        ups
    }
}
