use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a parameter in the assembly-wide arena, tagged with the
/// registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct ParamId {
    index: u32,
    registry: u32,
}

impl ParamId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.index as usize }
    /// An untagged id, for addressing ledger slots directly.
    pub fn new(idx: usize) -> Self { Self::tagged(idx, 0) }
    pub(crate) fn tagged(idx: usize, registry: u32) -> Self { Self { index: idx as u32, registry } }
    pub(crate) fn registry(&self) -> u32 { self.registry }
}

/// Handle to a calculator registered in a `Wiring`. Only valid with the
/// wiring (or its assembly) that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CalcId {
    index: u32,
    registry: u32,
}

impl CalcId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.index as usize }
    /// An untagged handle; no registry accepts it.
    pub fn new(idx: usize) -> Self { Self::tagged(idx, 0) }
    pub(crate) fn tagged(idx: usize, registry: u32) -> Self { Self { index: idx as u32, registry } }
    pub(crate) fn registry(&self) -> u32 { self.registry }

    /// Names one of this calculator's parameters. Resolved (and rejected if
    /// unknown) when handed to `Wiring::connect`.
    pub fn port(self, name: &str) -> Port {
        Port::Named(self, name.to_string())
    }
}

/// A binding endpoint: either an already-resolved parameter or a
/// calculator handle plus parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Port {
    Param(ParamId),
    Named(CalcId, String),
}

impl From<ParamId> for Port {
    fn from(id: ParamId) -> Self { Port::Param(id) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit(pub String);

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Declared shape of a parameter. Fixed for the lifetime of the assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamMeta {
    pub name: String,
    pub direction: Direction,
    pub unit: Option<Unit>,
    pub default: f64,
    pub desc: String,
}

/// Who owns a parameter slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Calculator(CalcId),
    Boundary,
}

/// A directed edge `source -> target`. `scale` is an explicit conversion
/// factor; bindings without one are unit-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub source: ParamId,
    pub target: ParamId,
    pub scale: Option<f64>,
}

/// A parameter together with its current value, as handed out to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub direction: Direction,
    pub value: f64,
    pub unit: Option<Unit>,
    pub default: f64,
}

/// Lifecycle of a wiring/assembly pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Lifecycle {
    Unconfigured,
    Configured,
    Ready,
    Failed,
}
