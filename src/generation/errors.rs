//! Error types for the generation domain

use serde_json::{Value as JsonValue, json};
use std::path::PathBuf;
use thiserror::Error;

/// Boxed lower-level cause of a failed merge
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while parsing requests, inferring schemas or merging documents
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error(
        "Duplicate operationId '{operation_id}': already defined at {existing_method} {existing_path}, \
         generated again for {new_method} {new_path}"
    )]
    DuplicateOperationId {
        operation_id: String,
        existing_path: String,
        existing_method: String,
        new_path: String,
        new_method: String,
    },

    #[error("Failed to merge with existing document {}: {source}", .path.display())]
    MergeError {
        path: PathBuf,
        #[source]
        source: BoxedCause,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GenerationError {
    pub fn malformed_input<S: Into<String>>(msg: S) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn merge_error<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        Self::MergeError {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Stable machine-readable code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::MalformedInput(_) => "MALFORMED_INPUT",
            GenerationError::DuplicateOperationId { .. } => "DUPLICATE_OPERATION_ID",
            GenerationError::MergeError { .. } => "MERGE_ERROR",
            GenerationError::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Structured payload describing the failure, when there is one
    pub fn details(&self) -> Option<JsonValue> {
        match self {
            GenerationError::DuplicateOperationId {
                operation_id,
                existing_path,
                existing_method,
                new_path,
                new_method,
            } => Some(json!({
                "operationId": operation_id,
                "existing": { "path": existing_path, "method": existing_method },
                "new": { "path": new_path, "method": new_method },
            })),
            GenerationError::MergeError { path, source } => Some(json!({
                "path": path.display().to_string(),
                "cause": source.to_string(),
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_duplicate_operation_id_code_and_details() {
        let error = GenerationError::DuplicateOperationId {
            operation_id: "get_users".into(),
            existing_path: "/users".into(),
            existing_method: "get".into(),
            new_path: "/v2/users".into(),
            new_method: "get".into(),
        };
        assert_eq!(error.code(), "DUPLICATE_OPERATION_ID");
        assert!(error.to_string().contains("get_users"));
        assert!(error.to_string().contains("get /v2/users"));

        let details = error.details().unwrap();
        assert_eq!(details["operationId"], "get_users");
        assert_eq!(details["existing"]["path"], "/users");
        assert_eq!(details["new"]["path"], "/v2/users");
    }

    #[test]
    fn test_merge_error_wraps_cause() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = GenerationError::merge_error("swagger.yaml", io_error);
        assert_eq!(error.code(), "MERGE_ERROR");
        assert!(error.to_string().contains("swagger.yaml"));
        assert!(error.to_string().contains("denied"));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(error.details().unwrap()["cause"], "denied");
    }

    #[test]
    fn test_malformed_input_has_no_details() {
        let error = GenerationError::malformed_input("not curl");
        assert_eq!(error.code(), "MALFORMED_INPUT");
        assert_eq!(error.to_string(), "Malformed input: not curl");
        assert!(error.details().is_none());
    }
}
