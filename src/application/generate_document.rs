//! Use case: document a captured curl call as an OpenAPI operation

use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::application::{
    ApplicationError, CurlSource, GenerateDocumentRequest, GenerateDocumentResponse,
    OutputService, ResponseSource,
};
use crate::curl::{CurlParser, sanitize};
use crate::generation::{DocumentGenerator, DocumentLoader, DocumentMerger, GenerationError};
use crate::infrastructure::shell::CommandExecutor;

/// Parses the command, obtains an example response, generates the document,
/// optionally merges it into an existing one and writes the result
pub struct GenerateDocumentUseCase {
    parser: CurlParser,
    executor: Arc<dyn CommandExecutor>,
    loader: Arc<dyn DocumentLoader>,
    output: Arc<dyn OutputService>,
}

impl GenerateDocumentUseCase {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        loader: Arc<dyn DocumentLoader>,
        output: Arc<dyn OutputService>,
    ) -> Self {
        Self {
            parser: CurlParser::new(),
            executor,
            loader,
            output,
        }
    }

    pub async fn execute(
        &self,
        request: GenerateDocumentRequest,
    ) -> Result<GenerateDocumentResponse, ApplicationError> {
        request.validate()?;

        let raw_command = match request.curl_source()? {
            CurlSource::Inline(text) => text,
            CurlSource::File(path) => tokio::fs::read_to_string(&path).await?,
        };
        let command = if request.sanitize {
            sanitize(&raw_command)
        } else {
            raw_command.trim().to_string()
        };
        debug!(%command, "Parsing curl command");

        let parsed = self.parser.parse(&command)?;
        info!(method = %parsed.method, url = %parsed.url, "Parsed curl command");

        let response = match request.response_source() {
            ResponseSource::Inline(text) => parse_response(&text, "inline response")?,
            ResponseSource::File(path) => {
                let text = tokio::fs::read_to_string(&path).await?;
                parse_response(&text, &path.display().to_string())?
            }
            // The unsanitized command carries the credentials the call needs
            ResponseSource::Execute => self.run_command(raw_command.trim(), request.timeout).await?,
        };

        let generator = DocumentGenerator::new(request.options.clone());
        let mut document = generator.generate(&parsed, &response)?;

        let mut merged = false;
        if let Some(append_path) = &request.options.append_path {
            if self.loader.exists(append_path).await {
                document = DocumentMerger::new(self.loader.clone())
                    .merge_with_existing(document, append_path)
                    .await?;
                merged = true;
            } else {
                warn!(
                    path = %append_path.display(),
                    "Existing document not found, writing generated document without merging"
                );
            }
        }

        let output_path = request.output_path().to_path_buf();
        self.output.write_document(&document, &output_path).await?;

        let (path, operation_id) = generator.resolve_operation(&parsed);
        info!(
            output = %output_path.display(),
            %operation_id,
            merged,
            "OpenAPI document generated"
        );

        Ok(GenerateDocumentResponse {
            output_path,
            path,
            method: parsed.method.to_lowercase(),
            operation_id,
            merged,
            document,
        })
    }

    async fn run_command(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<JsonValue, ApplicationError> {
        let result = self.executor.execute(command, timeout).await?;
        if !result.is_success() {
            return Err(ApplicationError::CommandFailed {
                exit_code: result.exit_code,
                stderr: result.stderr.trim().to_string(),
            });
        }
        parse_response(&result.stdout, "command output")
    }
}

fn parse_response(text: &str, origin: &str) -> Result<JsonValue, ApplicationError> {
    serde_json::from_str(text).map_err(|e| {
        GenerationError::malformed_input(format!("{origin} is not valid JSON: {e}")).into()
    })
}
