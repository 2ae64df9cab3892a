//! # JSON Schema Export
//!
//! Renders a [`Descriptor`] as a JSON Schema (draft 2020-12). Every
//! document [`crate::json::to_json`] produces for a value of that shape
//! validates against it, with one exception: non-finite floats have no
//! JSON form and are written as `null`.
//!
//! Object fields are nullable because an absent field encodes as `null`.
//! Dicts with non-string keys are arrays of pairs, or `{}` when empty.

use crate::descriptor::Descriptor;
use serde_json::{json, Map, Value as Json};

const DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// JSON Schema document for `descriptor`, with the `$schema` dialect set
#[must_use]
pub fn json_schema(descriptor: &Descriptor) -> Json {
    let mut schema = node(descriptor);
    if let Json::Object(map) = &mut schema {
        map.insert("$schema".to_string(), Json::String(DIALECT.to_string()));
    }
    schema
}

fn node(descriptor: &Descriptor) -> Json {
    match descriptor {
        Descriptor::Bool => json!({"type": "boolean"}),
        Descriptor::String => json!({"type": "string"}),
        Descriptor::Int => json!({"type": "integer"}),
        Descriptor::Float => json!({"type": "number"}),
        Descriptor::Null => json!({"type": "null"}),
        Descriptor::List { of } => json!({"type": "array", "items": node(of)}),
        Descriptor::Dict { key, value } if **key == Descriptor::String => json!({
            "type": "object",
            "additionalProperties": node(value),
        }),
        Descriptor::Dict { key, value } => json!({
            "anyOf": [
                {
                    "type": "array",
                    "items": {
                        "type": "array",
                        "prefixItems": [node(key), node(value)],
                        "minItems": 2,
                        "maxItems": 2,
                    },
                },
                {"type": "object", "maxProperties": 0},
            ],
        }),
        Descriptor::Optional { of } => json!({"anyOf": [node(of), {"type": "null"}]}),
        Descriptor::Result { ok, error } => json!({
            "oneOf": [
                single_key("ok", node(ok)),
                single_key("error", node(error)),
            ],
        }),
        Descriptor::Object { fields } => {
            let properties: Map<String, Json> = fields
                .iter()
                .map(|(name, shape)| (name.clone(), nullable(shape)))
                .collect();
            let required: Vec<&str> = fields.iter().map(|(name, _)| name.as_str()).collect();
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            })
        }
        Descriptor::Enum { variants } => {
            let cases: Vec<Json> = variants
                .iter()
                .map(|(tag, shape)| {
                    json!({
                        "type": "object",
                        "properties": {
                            "tag": {"const": tag},
                            "value": node(shape),
                        },
                        "required": ["tag"],
                    })
                })
                .collect();
            json!({"oneOf": cases})
        }
    }
}

/// Schema of an object field, which also admits the `null` of an absent field
fn nullable(shape: &Descriptor) -> Json {
    match shape {
        Descriptor::Null | Descriptor::Optional { .. } => node(shape),
        _ => json!({"anyOf": [node(shape), {"type": "null"}]}),
    }
}

fn single_key(key: &str, schema: Json) -> Json {
    json!({
        "type": "object",
        "properties": {key: schema},
        "required": [key],
        "additionalProperties": false,
    })
}
