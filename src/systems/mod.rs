//! Built-in assemblies, addressable by name from the CLI.
mod heat_exchanger;
mod pod;

pub use heat_exchanger::HeatExchangerLoop;
pub use pod::Pod;

use crate::assembly::Blueprint;

pub const NAMES: [&str; 2] = ["pod", "heat_exchanger"];

pub fn by_name(name: &str) -> Option<Box<dyn Blueprint>> {
    match name {
        "pod" => Some(Box::new(Pod)),
        "heat_exchanger" => Some(Box::new(HeatExchangerLoop)),
        _ => None,
    }
}
