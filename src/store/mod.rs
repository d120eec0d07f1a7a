//! Arena storage for calculators, parameters and bindings.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{Binding, CalcId, Direction, Lifecycle, Owner, ParamId, ParamMeta, Parameter, Port, Unit};
