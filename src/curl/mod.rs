//! Curl capture domain
//!
//! Parses curl command lines into a structured [`ParsedRequest`] and strips
//! sensitive or noisy headers before a command is documented.

pub mod parser;
pub mod sanitizer;
pub mod types;

pub use parser::CurlParser;
pub use sanitizer::sanitize;
pub use types::*;
