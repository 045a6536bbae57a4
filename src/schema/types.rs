use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Primitive JSON types a field may be declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// JSON Schema name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the JSON type of `value`, for violation messages.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declared expectation for a single body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub ty: FieldType,
    /// Minimum character count; only meaningful for strings
    pub min_length: Option<usize>,
}

impl FieldSpec {
    #[must_use]
    pub const fn of(ty: FieldType) -> Self {
        Self {
            ty,
            min_length: None,
        }
    }

    #[must_use]
    pub const fn string() -> Self {
        Self::of(FieldType::String)
    }

    #[must_use]
    pub const fn non_empty_string() -> Self {
        Self {
            ty: FieldType::String,
            min_length: Some(1),
        }
    }

    fn to_json_schema(self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(self.ty.as_str()));
        if let Some(min) = self.min_length {
            schema.insert("minLength".to_string(), json!(min));
        }
        Value::Object(schema)
    }
}

/// Input contract of one operation.
///
/// Fields are kept in declaration order so violations come back in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    pub required: Vec<(String, FieldSpec)>,
    pub optional: Vec<(String, FieldSpec)>,
}

impl InputSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn required(mut self, name: &str, spec: FieldSpec) -> Self {
        self.required.push((name.to_string(), spec));
        self
    }

    #[must_use]
    pub fn optional(mut self, name: &str, spec: FieldSpec) -> Self {
        self.optional.push((name.to_string(), spec));
        self
    }

    /// Render as a JSON Schema object, as printed by `itemrouter routes`.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .required
            .iter()
            .chain(self.optional.iter())
            .map(|(name, spec)| (name.clone(), spec.to_json_schema()))
            .collect();
        let required: Vec<&str> = self.required.iter().map(|(n, _)| n.as_str()).collect();
        json!({
            "type": "object",
            "required": required,
            "properties": properties,
        })
    }
}

/// Output contracts keyed by status code.
pub type Responses = BTreeMap<u16, Value>;
