//! Port interfaces for the application layer

use async_trait::async_trait;
use std::path::Path;

/// Service for writing generated documents to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Serialize `document` and write it to `path`, replacing any previous content
    async fn write_document(
        &self,
        document: &crate::generation::Document,
        path: &Path,
    ) -> Result<(), crate::application::ApplicationError>;
}
