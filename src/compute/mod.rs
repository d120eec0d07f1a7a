//! Compiles a validated wiring into a linear program and executes it.
pub mod bytecode;
pub mod engine;
pub mod ledger;

pub use bytecode::{Compiler, Program, Step, Transfer};
pub use engine::Engine;
pub use ledger::Ledger;
