//! # Validator Module
//!
//! Two checks live here:
//!
//! - [`validate`] interprets an [`InputSchema`] against a request body and returns
//!   every field-level [`Violation`]. The dispatcher runs it before any service
//!   call and answers `400` when it fails.
//! - [`ResponseContracts`] holds the per-route, per-status JSON Schemas compiled
//!   with `jsonschema`, and checks outgoing bodies according to the configured
//!   [`ResponseValidation`] mode.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::routes::RouteMeta;
use crate::schema::{json_type_name, InputSchema};

/// Pseudo field name used when the payload as a whole is unacceptable.
pub const BODY_FIELD: &str = "$body";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent or `null`
    Missing,
    WrongType,
    /// String shorter than the declared minimum length
    TooShort,
    /// The payload is not a JSON object
    NotAnObject,
    /// The raw body could not be parsed as JSON
    MalformedJson,
}

/// One unmet expectation in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Violation {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check `payload` against `schema`.
///
/// An absent payload is treated as an empty object, so every required field is
/// reported missing. Fields the schema does not mention are ignored.
pub fn validate(payload: Option<&Value>, schema: &InputSchema) -> Result<(), Vec<Violation>> {
    let empty = serde_json::Map::new();
    let object = match payload {
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(vec![Violation::new(
                BODY_FIELD,
                ViolationKind::NotAnObject,
                format!("request body must be an object, got {}", json_type_name(other)),
            )]);
        }
    };

    let mut violations = Vec::new();
    let declared = schema
        .required
        .iter()
        .map(|(name, spec)| (name, spec, true))
        .chain(schema.optional.iter().map(|(name, spec)| (name, spec, false)));

    for (name, spec, required) in declared {
        let value = match object.get(name.as_str()) {
            None | Some(Value::Null) => {
                if required {
                    violations.push(Violation::new(
                        name.as_str(),
                        ViolationKind::Missing,
                        format!("required field '{name}' is missing"),
                    ));
                }
                continue;
            }
            Some(value) => value,
        };

        if !spec.ty.matches(value) {
            violations.push(Violation::new(
                name.as_str(),
                ViolationKind::WrongType,
                format!(
                    "field '{name}' must be of type {}, got {}",
                    spec.ty,
                    json_type_name(value)
                ),
            ));
            continue;
        }

        if let (Some(min), Some(s)) = (spec.min_length, value.as_str()) {
            if s.chars().count() < min {
                violations.push(Violation::new(
                    name.as_str(),
                    ViolationKind::TooShort,
                    format!("field '{name}' must be at least {min} character(s) long"),
                ));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        debug!(violations = violations.len(), "Request body rejected");
        Err(violations)
    }
}

/// What to do when an outgoing body breaks its declared contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseValidation {
    /// Skip the check
    Off,
    /// Log the violation and send the response anyway
    #[default]
    Warn,
    /// Treat the violation as an internal fault
    Enforce,
}

impl FromStr for ResponseValidation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(ResponseValidation::Off),
            "warn" => Ok(ResponseValidation::Warn),
            "enforce" => Ok(ResponseValidation::Enforce),
            other => Err(anyhow!("unknown response validation mode '{other}'")),
        }
    }
}

/// Precompiled output schemas, keyed by handler name and status code.
pub struct ResponseContracts {
    validators: HashMap<(String, u16), jsonschema::Validator>,
}

impl ResponseContracts {
    /// Compile every declared output schema of `routes`.
    ///
    /// # Errors
    ///
    /// Fails if any declared schema is not a valid JSON Schema document.
    pub fn compile(routes: &[RouteMeta]) -> anyhow::Result<Self> {
        let mut validators = HashMap::new();
        for route in routes {
            for (status, schema) in &route.responses {
                let validator = jsonschema::validator_for(schema).map_err(|e| {
                    anyhow!(
                        "invalid {} response schema for '{}': {}",
                        status,
                        route.handler_name,
                        e
                    )
                })?;
                validators.insert((route.handler_name.clone(), *status), validator);
            }
        }
        debug!(compiled = validators.len(), "Response contracts compiled");
        Ok(Self { validators })
    }

    /// Check `body` against the contract declared for `handler_name` at `status`.
    ///
    /// A status with no declared contract is itself a violation.
    pub fn check(&self, handler_name: &str, status: u16, body: &Value) -> Result<(), Vec<String>> {
        let Some(validator) = self.validators.get(&(handler_name.to_string(), status)) else {
            return Err(vec![format!(
                "no response contract declared for status {status}"
            )]);
        };
        let errors: Vec<String> = validator.iter_errors(body).map(|e| e.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
