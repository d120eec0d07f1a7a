//! Static analysis of a wiring: unit canonicalization, dependency topology
//! and configure-time validation.
pub mod topology;
pub mod units;
pub mod validation;
