//! Validation orchestrator
//!
//! For every rule of the schema:
//! 1. Read the field; null, an empty sequence or a missing field is absent
//! 2. Absent: on Init a required field is an error and a default is written;
//!    otherwise the field is skipped
//! 3. Present: type check, then value check, then rights check; the first
//!    failure is the field's only error
//! 4. A field that passes everything is copied to the output: flat dot-path
//!    key on Set, nested on Init and Get
//!
//! A failing field never stops the pass. Errors follow schema order, but
//! callers must not rely on ordering across fields.

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::ValidationError;
use super::options::Options;
use super::type_check::check_type;
use super::value_check::check_value;
use crate::access::Usage;
use crate::observability::{Event, Logger, MetricsRegistry, Severity};
use crate::path;
use crate::schema::{FieldRule, Schema, SchemaError};
use crate::value::is_absent;

/// Outcome of one validation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Fields that passed every check, plus applied defaults
    pub document: Value,
    /// One entry per failed field
    pub errors: Vec<ValidationError>,
    /// Output writes the engine could not perform
    #[serde(skip)]
    pub faults: Vec<SchemaError>,
}

impl ValidationResult {
    /// True when no field failed and no fault occurred
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.faults.is_empty()
    }
}

enum FieldOutcome {
    Skipped,
    Accepted,
    Defaulted,
    Rejected(ValidationError),
    Fault(SchemaError),
}

/// Validates documents against one schema.
///
/// Holds only shared references, so one schema and one metrics registry
/// can serve any number of threads.
pub struct Validator<'a> {
    schema: &'a Schema,
    metrics: Option<&'a MetricsRegistry>,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            metrics: None,
        }
    }

    /// Count outcomes in `metrics`
    pub fn with_metrics(mut self, metrics: &'a MetricsRegistry) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Validates `document`, returning the sanitized output and all errors.
    pub fn validate(&self, document: &Value, options: &Options) -> ValidationResult {
        let mut output = Value::Object(Map::new());
        let mut errors = Vec::new();
        let mut faults = Vec::new();
        let mut accepted = 0u64;
        let mut defaulted = 0u64;

        for rule in self.schema.rules() {
            match validate_field(rule, document, options, &mut output) {
                FieldOutcome::Skipped => {}
                FieldOutcome::Accepted => accepted += 1,
                FieldOutcome::Defaulted => {
                    defaulted += 1;
                    Logger::trace(Event::DefaultApplied.as_str(), &[("field", rule.path().as_str())]);
                }
                FieldOutcome::Rejected(err) => {
                    Logger::trace(
                        Event::FieldRejected.as_str(),
                        &[("field", err.field.as_str()), ("kind", err.kind.as_str())],
                    );
                    errors.push(err);
                }
                FieldOutcome::Fault(fault) => {
                    Logger::error(
                        Event::EngineFault.as_str(),
                        &[("code", fault.code().code()), ("message", fault.message())],
                    );
                    faults.push(fault);
                }
            }
        }

        if let Some(metrics) = self.metrics {
            metrics.increment_documents_validated();
            if errors.is_empty() && faults.is_empty() {
                metrics.increment_documents_clean();
            }
            metrics.add_fields_accepted(accepted);
            metrics.add_fields_rejected(errors.len() as u64);
            metrics.add_defaults_applied(defaulted);
            metrics.add_engine_faults(faults.len() as u64);
        }

        if Logger::enabled(Severity::Trace) {
            let error_count = errors.len().to_string();
            Logger::trace(
                Event::ValidationComplete.as_str(),
                &[("usage", options.usage.as_str()), ("errors", error_count.as_str())],
            );
        }

        ValidationResult {
            document: output,
            errors,
            faults,
        }
    }
}

/// Validates `document` against `schema` without metrics.
pub fn validate(schema: &Schema, document: &Value, options: &Options) -> ValidationResult {
    Validator::new(schema).validate(document, options)
}

fn validate_field(rule: &FieldRule, document: &Value, options: &Options, output: &mut Value) -> FieldOutcome {
    let field = rule.path().as_str();

    let value = match path::read(document, rule.path()) {
        Some(value) if !is_absent(value) => value,
        _ => return absent_field(rule, options, output),
    };

    if let Err(err) = check_type(field, rule.descriptor(), value) {
        return FieldOutcome::Rejected(err);
    }

    if let Err(err) = check_value(rule, value) {
        return FieldOutcome::Rejected(err);
    }

    if !rule.rights().allows(options.usage, options.role) {
        return FieldOutcome::Rejected(ValidationError::insufficient_rights(field));
    }

    let written = match options.usage {
        Usage::Set => path::write_flat(output, field, value.clone()),
        Usage::Init | Usage::Get => path::write(output, rule.path(), value.clone()),
    };

    match written {
        Ok(()) => FieldOutcome::Accepted,
        Err(e) => FieldOutcome::Fault(SchemaError::malformed_path(field, &e)),
    }
}

fn absent_field(rule: &FieldRule, options: &Options, output: &mut Value) -> FieldOutcome {
    if options.usage != Usage::Init {
        return FieldOutcome::Skipped;
    }

    if rule.is_required() {
        return FieldOutcome::Rejected(ValidationError::required(rule.path().as_str()));
    }

    match rule.default_provider() {
        Some(provider) => match path::write(output, rule.path(), provider.provide(&options.args)) {
            Ok(()) => FieldOutcome::Defaulted,
            Err(e) => FieldOutcome::Fault(SchemaError::malformed_path(rule.path().as_str(), &e)),
        },
        None => FieldOutcome::Skipped,
    }
}
