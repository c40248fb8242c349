//! OpenAPI document loading implementations

pub mod file_loader;

pub use file_loader::{FileDocumentLoader, parse_document};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::DocumentLoader;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with_suffix(suffix: &str, content: &str) -> NamedTempFile {
        let mut temp_file = Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        temp_file
            .write_all(content.as_bytes())
            .expect("Failed to write temp file");
        temp_file.flush().expect("Failed to flush temp file");
        temp_file
    }

    #[tokio::test]
    async fn test_file_loader_json() {
        let temp_file = temp_with_suffix(
            ".json",
            r#"{
                "openapi": "3.0.1",
                "info": { "title": "Test API", "version": "2.0.0" },
                "paths": { "/a": { "get": { "operationId": "get_a" } } }
            }"#,
        );

        let doc = FileDocumentLoader::new()
            .load(temp_file.path())
            .await
            .unwrap();
        assert_eq!(doc.openapi, "3.0.1");
        assert_eq!(doc.info.title, "Test API");
        assert_eq!(doc.paths["/a"]["get"]["operationId"], "get_a");
    }

    #[tokio::test]
    async fn test_file_loader_yaml() {
        let temp_file = temp_with_suffix(
            ".yaml",
            "openapi: 3.0.0\ninfo:\n  title: Test API\n  version: 1.0.0\npaths: {}\n",
        );

        let doc = FileDocumentLoader::new()
            .load(temp_file.path())
            .await
            .unwrap();
        assert_eq!(doc.info.title, "Test API");
        assert!(doc.paths.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_extension_falls_back_to_yaml() {
        let temp_file = temp_with_suffix(".txt", "paths:\n  /x:\n    get:\n      operationId: x\n");

        let doc = FileDocumentLoader::new()
            .load(temp_file.path())
            .await
            .unwrap();
        assert!(doc.paths.contains_key("/x"));
    }

    #[tokio::test]
    async fn test_file_loader_not_found() {
        let missing = std::path::Path::new("/nonexistent/file.yaml");
        assert!(!FileDocumentLoader::new().exists(missing).await);

        let err = FileDocumentLoader::new()
            .load(std::path::Path::new("/nonexistent/file.yaml"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MERGE_ERROR");
    }

    #[tokio::test]
    async fn test_file_loader_unparseable() {
        let temp_file = temp_with_suffix(".json", "{ not json");
        let err = FileDocumentLoader::new()
            .load(temp_file.path())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MERGE_ERROR");
        assert!(err.details().is_some());
    }
}
