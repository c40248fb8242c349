//! YAML file output service implementation

use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::application::{ApplicationError, OutputService};
use crate::generation::Document;

/// Output service that writes documents as YAML files
pub struct YamlOutputService;

impl YamlOutputService {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlOutputService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputService for YamlOutputService {
    async fn write_document(
        &self,
        document: &Document,
        path: &Path,
    ) -> Result<(), ApplicationError> {
        let content = serde_yaml::to_string(document).map_err(|e| {
            ApplicationError::OutputError(format!("Failed to serialize document: {e}"))
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                ApplicationError::OutputError(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = fs::File::create(path).await.map_err(|e| {
            ApplicationError::OutputError(format!(
                "Failed to create file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.write_all(content.as_bytes()).await.map_err(|e| {
            ApplicationError::OutputError(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.flush().await.map_err(|e| {
            ApplicationError::OutputError(format!("Failed to flush file {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), bytes = content.len(), "Wrote OpenAPI document");
        Ok(())
    }
}
