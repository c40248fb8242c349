//! File-based OpenAPI document loader

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::generation::{Document, DocumentLoader, GenerationError};

/// Loads previously written OpenAPI documents from local files
pub struct FileDocumentLoader;

impl FileDocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse document text, choosing the format from the file extension.
/// Unknown extensions try JSON first, then YAML.
pub fn parse_document(source: &Path, content: &str) -> Result<Document, GenerationError> {
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => {
            serde_json::from_str(content).map_err(|e| GenerationError::merge_error(source, e))
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(content).map_err(|e| GenerationError::merge_error(source, e))
        }
        _ => serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|e| GenerationError::merge_error(source, e)),
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn load(&self, source: &Path) -> Result<Document, GenerationError> {
        let content = fs::read_to_string(source)
            .await
            .map_err(|e| GenerationError::merge_error(source, e))?;
        debug!(path = %source.display(), bytes = content.len(), "Read existing document");

        parse_document(source, &content)
    }

    async fn exists(&self, source: &Path) -> bool {
        fs::try_exists(source).await.unwrap_or(false)
    }
}
