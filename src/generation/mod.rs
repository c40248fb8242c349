//! Generation domain module - schema inference and document assembly
//!
//! Takes a [`ParsedRequest`](crate::curl::ParsedRequest) and an example
//! response, infers schemas for the request body, query string and response,
//! and wires them into a single-operation OpenAPI 3.0 [`Document`] that can be
//! merged into an existing one.

pub mod document;
pub mod errors;
pub mod merge;
pub mod parameters;
pub mod schema;
pub mod traits;
pub mod types;
pub mod utils;

pub use document::*;
pub use errors::*;
pub use merge::*;
pub use parameters::{generate_operation_id, generate_parameters};
pub use schema::{MAX_DEPTH, infer_schema};
pub use traits::*;
pub use types::*;
