//! Data Transfer Objects for application layer

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::application::ValidationError;
use crate::generation::{Document, OpenApiOptions};

pub const DEFAULT_OUTPUT_PATH: &str = "swagger.yaml";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the curl command text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurlSource {
    Inline(String),
    File(PathBuf),
}

/// Where the example response comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSource {
    Inline(String),
    File(PathBuf),
    /// Run the curl command and use its stdout
    Execute,
}

/// Request to document one captured curl call
#[derive(Debug, Clone)]
pub struct GenerateDocumentRequest {
    pub curl: Option<String>,
    pub curl_file: Option<PathBuf>,
    pub response: Option<String>,
    pub response_file: Option<PathBuf>,
    pub options: OpenApiOptions,
    pub timeout: Duration,
    /// Strip credential headers before parsing
    pub sanitize: bool,
}

impl Default for GenerateDocumentRequest {
    fn default() -> Self {
        Self {
            curl: None,
            curl_file: None,
            response: None,
            response_file: None,
            options: OpenApiOptions::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sanitize: true,
        }
    }
}

impl GenerateDocumentRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let curl_sources = usize::from(self.curl.is_some()) + usize::from(self.curl_file.is_some());
        if curl_sources != 1 {
            return Err(ValidationError::CurlSource(curl_sources));
        }

        let response_sources =
            usize::from(self.response.is_some()) + usize::from(self.response_file.is_some());
        if response_sources > 1 {
            return Err(ValidationError::ResponseSource(response_sources));
        }

        if self.timeout.is_zero() {
            return Err(ValidationError::ZeroTimeout);
        }

        if self
            .options
            .output_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ValidationError::EmptyOutputPath);
        }

        Ok(())
    }

    pub fn curl_source(&self) -> Result<CurlSource, ValidationError> {
        match (&self.curl, &self.curl_file) {
            (Some(text), None) => Ok(CurlSource::Inline(text.clone())),
            (None, Some(path)) => Ok(CurlSource::File(path.clone())),
            (None, None) => Err(ValidationError::CurlSource(0)),
            (Some(_), Some(_)) => Err(ValidationError::CurlSource(2)),
        }
    }

    pub fn response_source(&self) -> ResponseSource {
        match (&self.response, &self.response_file) {
            (Some(text), _) => ResponseSource::Inline(text.clone()),
            (None, Some(path)) => ResponseSource::File(path.clone()),
            (None, None) => ResponseSource::Execute,
        }
    }

    pub fn output_path(&self) -> &Path {
        self.options
            .output_path
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_OUTPUT_PATH))
    }
}

/// Outcome of a generate run
#[derive(Debug, Clone, Serialize)]
pub struct GenerateDocumentResponse {
    pub output_path: PathBuf,
    pub path: String,
    pub method: String,
    pub operation_id: String,
    /// Whether the document was merged into an existing one
    pub merged: bool,
    #[serde(skip)]
    pub document: Document,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateDocumentRequest {
        GenerateDocumentRequest {
            curl: Some("curl https://x.io".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
        assert_eq!(request().output_path(), Path::new("swagger.yaml"));
        assert_eq!(request().response_source(), ResponseSource::Execute);
    }

    #[test]
    fn test_exactly_one_curl_source() {
        let mut req = request();
        req.curl_file = Some("cmd.txt".into());
        assert_eq!(req.validate(), Err(ValidationError::CurlSource(2)));

        req.curl = None;
        req.curl_file = None;
        assert_eq!(req.validate(), Err(ValidationError::CurlSource(0)));
    }

    #[test]
    fn test_at_most_one_response_source() {
        let mut req = request();
        req.response = Some("{}".into());
        req.response_file = Some("resp.json".into());
        assert_eq!(req.validate(), Err(ValidationError::ResponseSource(2)));
    }

    #[test]
    fn test_zero_timeout_and_empty_output() {
        let mut req = request();
        req.timeout = Duration::ZERO;
        assert_eq!(req.validate(), Err(ValidationError::ZeroTimeout));

        let mut req = request();
        req.options.output_path = Some(PathBuf::new());
        assert_eq!(req.validate(), Err(ValidationError::EmptyOutputPath));
    }
}
