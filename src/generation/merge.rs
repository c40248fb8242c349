//! Merging a generated document into an existing one

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::errors::GenerationError;
use super::traits::DocumentLoader;
use super::types::Document;

/// Merge `new` into `existing`.
///
/// Fails without merging anything if any operationId of `new` already appears
/// anywhere in `existing`. Otherwise paths and component schemas from `new`
/// replace same-named entries of `existing` wholesale; every other top-level
/// field of `existing` is kept.
pub fn merge_documents(new: Document, existing: Document) -> Result<Document, GenerationError> {
    for (new_path, new_method, operation_id) in new.operation_ids() {
        if let Some((existing_path, existing_method, _)) = existing
            .operation_ids()
            .find(|(_, _, existing_id)| *existing_id == operation_id)
        {
            return Err(GenerationError::DuplicateOperationId {
                operation_id: operation_id.to_string(),
                existing_path: existing_path.to_string(),
                existing_method: existing_method.to_string(),
                new_path: new_path.to_string(),
                new_method: new_method.to_string(),
            });
        }
    }

    let mut merged = existing;
    for (path, item) in new.paths {
        debug!(%path, replaced = merged.paths.contains_key(&path), "Merging path");
        merged.paths.insert(path, item);
    }
    merged.components.schemas.extend(new.components.schemas);
    Ok(merged)
}

/// Merges generated documents into documents loaded through a [`DocumentLoader`]
pub struct DocumentMerger {
    loader: Arc<dyn DocumentLoader>,
}

impl DocumentMerger {
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self { loader }
    }

    /// Load the document at `existing_path` and merge `new` into it
    pub async fn merge_with_existing(
        &self,
        new: Document,
        existing_path: &Path,
    ) -> Result<Document, GenerationError> {
        let existing = self.loader.load(existing_path).await?;
        let merged = merge_documents(new, existing)?;
        info!(
            path = %existing_path.display(),
            paths = merged.paths.len(),
            schemas = merged.components.schemas.len(),
            "Merged with existing document"
        );
        Ok(merged)
    }
}
