//! Port interfaces for the generation domain

use async_trait::async_trait;
use std::path::Path;

use crate::generation::{Document, GenerationError};

/// Loads a previously written OpenAPI document
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load the document at `source`. Read and parse failures surface as
    /// [`GenerationError::MergeError`].
    async fn load(&self, source: &Path) -> Result<Document, GenerationError>;

    /// Whether there is anything at `source` to load
    async fn exists(&self, source: &Path) -> bool;
}
