// Contracts for the item routes.

use serde_json::{json, Value};

use super::types::{FieldSpec, InputSchema};

/// Body of `POST /items`.
#[must_use]
pub fn create_item_input() -> InputSchema {
    InputSchema::new().required("name", FieldSpec::non_empty_string())
}

/// Body of `PUT /items/{id}`.
///
/// `name` is required here as well: the service always overwrites the name, so a
/// body without one is rejected rather than treated as a partial update.
#[must_use]
pub fn update_item_input() -> InputSchema {
    InputSchema::new().required("name", FieldSpec::non_empty_string())
}

#[must_use]
pub fn item_schema() -> Value {
    json!({
        "type": "object",
        "required": ["id", "name"],
        "properties": {
            "id": {"type": "string", "minLength": 1},
            "name": {"type": "string", "minLength": 1}
        }
    })
}

#[must_use]
pub fn item_list_schema() -> Value {
    json!({
        "type": "array",
        "items": item_schema()
    })
}

/// `{ "message": string }`, used by delete confirmations and every 404.
#[must_use]
pub fn message_schema() -> Value {
    json!({
        "type": "object",
        "required": ["message"],
        "properties": {
            "message": {"type": "string"}
        }
    })
}

#[must_use]
pub fn validation_error_schema() -> Value {
    json!({
        "type": "object",
        "required": ["message", "violations"],
        "properties": {
            "message": {"type": "string"},
            "violations": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["field", "kind", "message"],
                    "properties": {
                        "field": {"type": "string"},
                        "kind": {"type": "string"},
                        "message": {"type": "string"}
                    }
                }
            }
        }
    })
}
