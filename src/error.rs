//! Error taxonomy for wiring, unit checking and calculation.
//!
//! Every fallible public API returns `Result<T, EngineError>`. The three
//! specific kinds (`DomainError`, `WiringError`, `UnitMismatchError`) stay
//! matchable through the umbrella variants.

use thiserror::Error;

/// Invalid numeric input to a calculation, or a calculator breaking its
/// declared contract (reading/writing parameters it did not declare).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("logarithm argument dT1/dT2 is not positive (dT1={dt1}, dT2={dt2})")]
    InvalidLogArgument { dt1: f64, dt2: f64 },
    #[error("'{name}' must be positive, got {value}")]
    NotPositive { name: String, value: f64 },
    #[error("'{name}' must not be negative, got {value}")]
    Negative { name: String, value: f64 },
    #[error("'{name}' must lie in [{min}, {max}), got {value}")]
    OutOfRange { name: String, value: f64, min: f64, max: f64 },
    #[error("'{name}' must be a whole number, got {value}")]
    NotWholeNumber { name: String, value: f64 },
    #[error("'{name}' evaluated to a non-finite value ({value})")]
    NonFinite { name: String, value: f64 },
    #[error("'{0}' is not a declared input")]
    UndeclaredInput(String),
    #[error("'{0}' is not a declared output")]
    UndeclaredOutput(String),
    #[error("output '{0}' was not written")]
    MissingOutput(String),
}

/// Structural problems in the binding graph, detected while wiring or at
/// configure time, always before the first run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WiringError {
    #[error("assembly '{0}' declares no calculators")]
    Empty(String),
    #[error("name '{0}' is already in use")]
    DuplicateName(String),
    #[error("'{owner}' declares parameter '{param}' twice")]
    DuplicateParameter { owner: String, param: String },
    #[error("unknown calculator handle #{0}")]
    UnknownCalculator(usize),
    #[error("'{calculator}' has no parameter named '{param}'")]
    UnknownParameter { calculator: String, param: String },
    #[error("'{param}' declares an unparsable unit '{unit}'")]
    InvalidUnit { param: String, unit: String },
    #[error("'{param}' declares a non-finite default ({value})")]
    InvalidDefault { param: String, value: f64 },
    #[error("'{path}' cannot be the {role} of a binding")]
    InvalidEndpoint { path: String, role: &'static str },
    #[error("'{target}' is already bound from '{existing}'; second binding from '{attempted}' rejected")]
    DuplicateTarget { target: String, existing: String, attempted: String },
    #[error("boundary input '{name}' already feeds '{existing}'")]
    BoundaryFanOut { name: String, existing: String },
    #[error("boundary '{from}' cannot bind directly to boundary '{to}'")]
    BoundaryPassthrough { from: String, to: String },
    #[error("invalid conversion factor {factor} on binding to '{target}'")]
    InvalidScale { target: String, factor: f64 },
    #[error("boundary parameter '{0}' is not connected")]
    UnconnectedBoundary(String),
    #[error("workflow omits calculator '{0}'")]
    MissingFromWorkflow(String),
    #[error("workflow lists calculator '{0}' more than once")]
    DuplicateInWorkflow(String),
    #[error("dependency cycle through calculator '{0}'")]
    Cycle(String),
    #[error("'{downstream}' is scheduled before '{upstream}' but consumes '{binding}'")]
    OrderViolation { upstream: String, downstream: String, binding: String },
}

/// A binding between parameters whose units differ canonically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unit mismatch: '{from}' [{from_unit}] -> '{to}' [{to_unit}]")]
pub struct UnitMismatchError {
    pub from: String,
    pub from_unit: String,
    pub to: String,
    pub to_unit: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Wiring(#[from] WiringError),
    #[error(transparent)]
    UnitMismatch(#[from] UnitMismatchError),
    #[error("calculator '{calculator}' failed: {source} [inputs: {}]", format_snapshot(.inputs))]
    Domain {
        calculator: String,
        inputs: Vec<(String, f64)>,
        source: DomainError,
    },
    #[error("binding '{from}' -> '{to}' produced a non-finite value ({value})")]
    NonFiniteTransfer { from: String, to: String, value: f64 },
    #[error("'{0}' is not a boundary input")]
    UnknownInput(String),
    #[error("invalid value {value} for boundary input '{name}'")]
    InvalidInput { name: String, value: f64 },
    #[error("ledger holds {actual} values but the program addresses {expected}")]
    LayoutMismatch { expected: usize, actual: usize },
}

impl EngineError {
    /// The domain error behind a failed run, if that is what this is.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn wiring(&self) -> Option<&WiringError> {
        match self {
            EngineError::Wiring(e) => Some(e),
            _ => None,
        }
    }
}

fn format_snapshot(inputs: &[(String, f64)]) -> String {
    inputs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(", ")
}
