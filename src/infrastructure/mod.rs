//! Infrastructure layer - concrete implementations of domain ports

pub mod openapi;
pub mod output;
pub mod shell;

pub use openapi::FileDocumentLoader;
pub use output::YamlOutputService;
pub use shell::*;
