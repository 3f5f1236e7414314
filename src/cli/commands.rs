//! CLI command implementations
//!
//! Both commands boot the same way: load config, set the log level, load
//! every schema. A schema defect stops the boot before any request is read.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::access::{Role, Usage};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::schema::SchemaLoader;
use crate::validation::{Options, Validator};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_response};

/// One line of `validate` input
#[derive(Debug, Deserialize)]
pub struct ValidationRequest {
    /// Name of a loaded schema
    pub schema: String,
    pub usage: Usage,
    pub role: Role,
    /// Handed to default providers
    #[serde(default)]
    pub args: Value,
    pub document: Value,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Check { config } => check(&config),
        Command::Validate { config } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            validate(&config, stdin.lock(), &mut stdout.lock())
        }
    }
}

/// Load config and schemas.
pub fn boot(config_path: &Path) -> CliResult<(Config, SchemaLoader)> {
    log_event(Event::BootStart);

    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);
    let schema_dir = config.schema_path();
    let dir_text = schema_dir.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("schema_dir", dir_text.as_str())]);

    let mut loader = SchemaLoader::new(&schema_dir);
    if let Err(e) = loader.load_all() {
        let error = e.to_string();
        log_event_with_fields(Event::SchemaLoadFailed, &[("error", error.as_str())]);
        return Err(e.into());
    }

    let count = loader.schema_count().to_string();
    log_event_with_fields(Event::SchemasLoaded, &[("count", count.as_str())]);

    Ok((config, loader))
}

/// `fieldguard check`: print every loaded schema with its fields
pub fn check(config_path: &Path) -> CliResult<()> {
    let (_config, loader) = boot(config_path)?;
    write_response(&mut io::stdout().lock(), schema_summary(&loader))
}

/// Summarize loaded schemas as JSON
pub fn schema_summary(loader: &SchemaLoader) -> Value {
    let schemas: Vec<Value> = loader
        .names()
        .into_iter()
        .filter_map(|name| loader.get(name).map(|schema| (name, schema)))
        .map(|(name, schema)| {
            let fields: Vec<Value> = schema
                .rules()
                .iter()
                .map(|rule| {
                    json!({
                        "path": rule.path().as_str(),
                        "type": rule.descriptor().to_string(),
                        "required": rule.is_required(),
                        "rights": rule.rights(),
                    })
                })
                .collect();
            json!({ "name": name, "fields": fields })
        })
        .collect();

    json!({ "schemas": schemas })
}

/// `fieldguard validate`: serve requests from `input` until EOF
pub fn validate<R: BufRead, W: Write>(config_path: &Path, input: R, out: &mut W) -> CliResult<()> {
    let (_config, loader) = boot(config_path)?;
    let metrics = MetricsRegistry::new();
    serve(&loader, &metrics, input, out)
}

/// Answer each request line with one response line.
pub fn serve<R: BufRead, W: Write>(
    loader: &SchemaLoader,
    metrics: &MetricsRegistry,
    input: R,
    out: &mut W,
) -> CliResult<()> {
    log_event(Event::Serving);

    for request in read_requests(input) {
        match request.and_then(|value| handle_request(loader, metrics, value)) {
            Ok(data) => write_response(out, data)?,
            Err(e) => {
                metrics.increment_requests_rejected();
                Logger::warn(Event::RequestRejected.as_str(), &[("error", e.message())]);
                write_error(out, e.code_str(), e.message())?;
            }
        }
    }

    let snapshot = metrics.snapshot().to_fields();
    let fields: Vec<(&str, &str)> = snapshot.iter().map(|(k, v)| (*k, v.as_str())).collect();
    log_event_with_fields(Event::ShutdownComplete, &fields);

    Ok(())
}

/// Validate one decoded request
pub fn handle_request(loader: &SchemaLoader, metrics: &MetricsRegistry, request: Value) -> CliResult<Value> {
    let request: ValidationRequest = serde_json::from_value(request)
        .map_err(|e| CliError::request_error(format!("Invalid request: {}", e)))?;

    let schema = loader
        .require(&request.schema)
        .map_err(|e| CliError::request_error(e.to_string()))?;

    let options = Options::new(request.usage, request.role).with_args(request.args);
    let result = Validator::new(schema)
        .with_metrics(metrics)
        .validate(&request.document, &options);

    let mut data = json!({
        "document": result.document,
        "errors": result.errors,
    });
    if !result.faults.is_empty() {
        data["faults"] = result.faults.iter().map(|f| Value::String(f.to_string())).collect();
    }

    Ok(data)
}
