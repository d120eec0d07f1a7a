//! Calculator contract and parameter schemas.
pub mod calculator;
pub mod schema;

pub use calculator::{Calculator, Frame};
pub use schema::Schema;
