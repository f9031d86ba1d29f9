use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::error;

use crate::errors::{HarnessError, SchemaViolation};
use crate::observability::metrics::try_metrics;

/// JSON schema validation with compiled schemas cached by their serialized form.
#[derive(Default)]
pub struct SchemaValidator {
    compiled: Mutex<HashMap<String, Arc<JSONSchema>>>,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(&self, schema: &Value) -> Result<Arc<JSONSchema>, HarnessError> {
        let key = schema.to_string();
        let mut compiled = self.compiled.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(schema) = compiled.get(&key) {
            return Ok(schema.clone());
        }
        let schema = JSONSchema::compile(schema).map(Arc::new).map_err(|e| HarnessError::Validation {
            message: format!("invalid schema: {}", e),
            violations: Vec::new(),
        })?;
        compiled.insert(key, schema.clone());
        Ok(schema)
    }

    /// Every violation of `schema` by `data`, empty when it conforms.
    pub fn errors(&self, data: &Value, schema: &Value) -> Result<Vec<SchemaViolation>, HarnessError> {
        let compiled = self.compile(schema)?;
        let violations = match compiled.validate(data) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| SchemaViolation {
                    instance_path: err.instance_path.to_string(),
                    schema_path: err.schema_path.to_string(),
                    message: err.to_string(),
                })
                .collect(),
        };
        if !violations.is_empty() {
            if let Some(metrics) = try_metrics() {
                metrics.schema_validation_failures.inc();
            }
        }
        Ok(violations)
    }

    /// True when `data` conforms. Violations and schema errors are logged.
    pub fn validate(&self, data: &Value, schema: &Value) -> bool {
        match self.errors(data, schema) {
            Ok(violations) if violations.is_empty() => true,
            Ok(violations) => {
                for v in &violations {
                    error!("schema violation at '{}': {}", v.instance_path, v.message);
                }
                false
            }
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    pub fn assert_schema(&self, data: &Value, schema: &Value, message: Option<&str>) -> Result<(), HarnessError> {
        let violations = self.errors(data, schema)?;
        if violations.is_empty() {
            return Ok(());
        }
        let details = serde_json::to_string_pretty(&violations).unwrap_or_default();
        Err(HarnessError::Validation {
            message: format!(
                "{}\nErrors: {}",
                message.unwrap_or("Schema validation failed"),
                details
            ),
            violations,
        })
    }
}
