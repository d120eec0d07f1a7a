pub mod report;
pub mod trace;

pub use report::{describe, format_table, RunReport};
pub use trace::format_trace;
