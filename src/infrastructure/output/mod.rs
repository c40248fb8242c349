//! Output service implementations

pub mod yaml_output;

pub use yaml_output::*;
