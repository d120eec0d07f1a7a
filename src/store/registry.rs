use super::types::*;
use crate::error::WiringError;
use crate::model::{Calculator, Schema};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Tags handed out to registries; 0 is reserved for untagged ids.
static NEXT_TAG: AtomicU32 = AtomicU32::new(1);

/// Arena holding every calculator, parameter and binding of one assembly.
///
/// Parameters of a calculator occupy a contiguous range so a compute step can
/// be handed a single slice of the ledger.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    // Calculators (columnar)
    pub calc_names: Vec<String>,
    pub calcs: Vec<Arc<dyn Calculator>>,
    pub schemas: Vec<Schema>,
    pub param_ranges: Vec<(u32, u32)>, // (start, count)

    // Parameters (columnar)
    pub owners: Vec<Owner>,
    pub meta: Vec<ParamMeta>,

    // Bindings. `incoming` holds at most one binding index per target.
    pub bindings: Vec<Binding>,
    pub incoming: Vec<Option<u32>>,

    // Downstream traversal helpers (linked list of outgoing bindings)
    pub first_out: Vec<u32>,
    pub next_out: Vec<u32>,

    // Boundary parameters in declaration order
    pub boundary: Vec<ParamId>,

    used_names: HashSet<String>,
    tag: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self { tag: NEXT_TAG.fetch_add(1, Ordering::Relaxed), ..Self::default() }
    }
    pub fn calc_count(&self) -> usize { self.calcs.len() }
    pub fn param_count(&self) -> usize { self.meta.len() }

    pub fn is_empty(&self) -> bool {
        self.calcs.is_empty() && self.boundary.is_empty()
    }

    /// Reserves a top-level name. Calculator and boundary names share one
    /// namespace so dotted paths stay unambiguous.
    fn claim_name(&mut self, name: &str) -> Result<(), WiringError> {
        if !self.used_names.insert(name.to_string()) {
            return Err(WiringError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn push_param(&mut self, owner: Owner, meta: ParamMeta) -> ParamId {
        let id = ParamId::tagged(self.meta.len(), self.tag);
        self.owners.push(owner);
        self.meta.push(meta);
        self.incoming.push(None);
        self.first_out.push(u32::MAX);
        id
    }

    pub fn add_calculator(&mut self, name: &str, calc: Arc<dyn Calculator>) -> Result<CalcId, WiringError> {
        let schema = calc.schema();
        schema.validate(name)?;
        self.claim_name(name)?;

        let id = self.calc_id(self.calcs.len());
        let start = self.meta.len() as u32;
        for meta in schema.params() {
            self.push_param(Owner::Calculator(id), meta.clone());
        }
        self.param_ranges.push((start, schema.len() as u32));
        self.calc_names.push(name.to_string());
        self.calcs.push(calc);
        self.schemas.push(schema);
        Ok(id)
    }

    pub fn add_boundary(&mut self, meta: ParamMeta) -> Result<ParamId, WiringError> {
        Schema::validate_param(&meta)?;
        self.claim_name(&meta.name)?;
        let id = self.push_param(Owner::Boundary, meta);
        self.boundary.push(id);
        Ok(id)
    }

    pub fn add_binding(&mut self, binding: Binding) {
        let idx = self.bindings.len() as u32;
        self.bindings.push(binding);
        self.incoming[binding.target.index()] = Some(idx);

        let s_idx = binding.source.index();
        self.next_out.push(self.first_out[s_idx]);
        self.first_out[s_idx] = idx;
    }

    pub fn calc_id(&self, idx: usize) -> CalcId { CalcId::tagged(idx, self.tag) }

    /// Rejects handles issued by another registry as well as out-of-range ones.
    pub fn check_calc(&self, id: CalcId) -> Result<(), WiringError> {
        if id.registry() == self.tag && id.index() < self.calcs.len() {
            Ok(())
        } else {
            Err(WiringError::UnknownCalculator(id.index()))
        }
    }

    pub fn owns_param(&self, id: ParamId) -> bool {
        id.registry() == self.tag && id.index() < self.meta.len()
    }

    pub fn lookup(&self, calc: CalcId, name: &str) -> Result<ParamId, WiringError> {
        self.check_calc(calc)?;
        let (start, _) = self.param_ranges[calc.index()];
        self.schemas[calc.index()]
            .index_of(name)
            .map(|i| ParamId::tagged(start as usize + i, self.tag))
            .ok_or_else(|| WiringError::UnknownParameter {
                calculator: self.calc_names[calc.index()].clone(),
                param: name.to_string(),
            })
    }

    pub fn boundary_named(&self, name: &str) -> Option<ParamId> {
        self.boundary.iter().copied().find(|id| self.meta[id.index()].name == name)
    }

    /// Resolves `"calc.param"` or a bare boundary name.
    pub fn resolve_path(&self, path: &str) -> Option<ParamId> {
        match path.split_once('.') {
            Some((calc, param)) => {
                let idx = self.calc_names.iter().position(|n| n == calc)?;
                self.lookup(self.calc_id(idx), param).ok()
            }
            None => self.boundary_named(path),
        }
    }

    /// Dotted display path of a parameter.
    pub fn path(&self, id: ParamId) -> String {
        let meta = &self.meta[id.index()];
        match self.owners[id.index()] {
            Owner::Calculator(c) => format!("{}.{}", self.calc_names[c.index()], meta.name),
            Owner::Boundary => meta.name.clone(),
        }
    }

    pub fn incoming(&self, id: ParamId) -> Option<&Binding> {
        self.incoming[id.index()].map(|b| &self.bindings[b as usize])
    }

    /// Bindings leaving `id`, most recent first.
    pub fn outgoing(&self, id: ParamId) -> Vec<&Binding> {
        let mut out = Vec::new();
        let mut edge = self.first_out[id.index()];
        while edge != u32::MAX {
            out.push(&self.bindings[edge as usize]);
            edge = self.next_out[edge as usize];
        }
        out
    }

    pub fn calc_params(&self, calc: CalcId) -> impl Iterator<Item = ParamId> {
        let (start, count) = self.param_ranges[calc.index()];
        let tag = self.tag;
        (start..start + count).map(move |i| ParamId::tagged(i as usize, tag))
    }

    pub fn boundary_with(&self, direction: Direction) -> impl Iterator<Item = ParamId> + '_ {
        self.boundary.iter().copied().filter(move |id| self.meta[id.index()].direction == direction)
    }
}
