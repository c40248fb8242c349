//! curl2openapi CLI entrypoint
//! Parses command-line arguments and dispatches to the generate use case.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use curl2openapi::{
    application::{
        ApplicationError, DEFAULT_OUTPUT_PATH, DEFAULT_TIMEOUT_SECS, GenerateDocumentRequest,
        GenerateDocumentUseCase,
    },
    curl::sanitize,
    generation::OpenApiOptions,
    infrastructure::{FileDocumentLoader, ShellCommandExecutor, YamlOutputService},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "curl2openapi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Document a curl call as an OpenAPI operation
    Generate(GenerateArgs),
    /// Print the curl command with credential and browser headers removed
    Sanitize {
        #[command(flatten)]
        source: CurlArgs,
    },
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct CurlArgs {
    /// Curl command text
    #[arg(long)]
    curl: Option<String>,
    /// File holding the curl command
    #[arg(long)]
    curl_file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    source: CurlArgs,
    /// Example JSON response; the curl command is executed when no response is given
    #[arg(long, conflicts_with = "response_file")]
    response: Option<String>,
    /// File holding the example JSON response
    #[arg(long)]
    response_file: Option<PathBuf>,
    /// Explicit operationId
    #[arg(long)]
    operation_name: Option<String>,
    /// Path template, e.g. /users/{id} or /users/:id
    #[arg(long)]
    url_template: Option<String>,
    /// Comma separated operation tags
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
    /// Operation summary
    #[arg(long)]
    summary: Option<String>,
    /// Where to write the YAML document
    #[arg(long, short, env = "CURL2OPENAPI_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// Existing document to merge the generated operation into
    #[arg(long)]
    append: Option<PathBuf>,
    /// Seconds to wait for the executed curl command
    #[arg(long, env = "CURL2OPENAPI_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
    /// Keep credential and browser headers
    #[arg(long)]
    no_sanitize: bool,
}

impl From<GenerateArgs> for GenerateDocumentRequest {
    fn from(args: GenerateArgs) -> Self {
        GenerateDocumentRequest {
            curl: args.source.curl,
            curl_file: args.source.curl_file,
            response: args.response,
            response_file: args.response_file,
            options: OpenApiOptions {
                operation_name: args.operation_name,
                url_template: args.url_template,
                tags: args
                    .tags
                    .into_iter()
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect(),
                output_path: Some(args.output),
                append_path: args.append,
                summary: args.summary,
            },
            timeout: Duration::from_secs(args.timeout_secs),
            sanitize: !args.no_sanitize,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let env_file = dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = env_file {
        debug!(path = %path.display(), "Loaded environment file");
    }

    match cli.command {
        Commands::Generate(args) => generate(args).await?,
        Commands::Sanitize { source } => {
            let command = read_curl(&source).await?;
            println!("{}", sanitize(&command));
        }
    }

    Ok(())
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let request = GenerateDocumentRequest::from(args);
    let use_case = GenerateDocumentUseCase::new(
        Arc::new(ShellCommandExecutor::new()),
        Arc::new(FileDocumentLoader::new()),
        Arc::new(YamlOutputService::new()),
    );

    match use_case.execute(request).await {
        Ok(response) => {
            info!(
                "Documented {} {} as '{}' in {}",
                response.method.to_uppercase(),
                response.path,
                response.operation_id,
                response.output_path.display()
            );
            Ok(())
        }
        Err(err) => {
            let code = err.code();
            report(&err);
            Err(err).with_context(|| format!("Failed to generate OpenAPI document ({code})"))
        }
    }
}

fn report(err: &ApplicationError) {
    match err.details() {
        Some(details) => error!(code = err.code(), %details, "{err}"),
        None => error!(code = err.code(), "{err}"),
    }
}

async fn read_curl(source: &CurlArgs) -> anyhow::Result<String> {
    match (&source.curl, &source.curl_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read curl command from {}", path.display())),
        (None, None) => anyhow::bail!("Either --curl or --curl-file is required"),
    }
}
