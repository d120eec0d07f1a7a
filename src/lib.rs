//! Deterministic data-flow evaluator for engineering sizing models.
//!
//! Calculators declare unit-tagged parameters and a pure compute step; a
//! [`Wiring`] binds them together and is validated into an [`Assembly`],
//! which compiles to a linear program over a flat value ledger.

pub mod analysis;
pub mod assembly;
pub mod calculators;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod scenarios;
pub mod store;
pub mod systems;

pub use assembly::{Assembly, Blueprint, Wiring};
pub use config::{ConfigError, RunConfig};
pub use error::{DomainError, EngineError, UnitMismatchError, WiringError};
pub use model::{Calculator, Frame, Schema};
pub use store::{CalcId, Direction, Lifecycle, ParamId, Parameter, Port, Unit};
