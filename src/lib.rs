//! Turn a captured curl command and its JSON response into an OpenAPI 3.0 document.
//!
//! The crate is layered: [`curl`] captures requests, [`generation`] infers
//! schemas and assembles and merges documents, [`application`] wires the use
//! case together and [`infrastructure`] holds the shell and file adapters.
#![deny(unsafe_code)]

pub mod application;
pub mod curl;
pub mod generation;
pub mod infrastructure;
