//! # JSON Text Form
//!
//! Maps structured values to and from JSON, the text form a request
//! dispatcher exchanges with clients. Parsing uses simd-json with a
//! serde_json fallback; output uses serde_json.
//!
//! JSON has no tags for optionals, results or enums, so lifting a document
//! into a [`Value`] is directed by the target [`Descriptor`]:
//!
//! | Shape      | JSON                                   |
//! |------------|----------------------------------------|
//! | `Optional` | `null` when absent, the value otherwise |
//! | `Result`   | `{"ok": v}` or `{"error": v}`          |
//! | `Enum`     | `{"tag": t, "value": v}`               |
//! | `Dict`     | object for string keys, else `[[k, v], ..]` |
//! | `Object`   | object, fields in declared order       |
//!
//! Nested optionals cannot be told apart in JSON and collapse to the outer
//! one.

use crate::descriptor::Descriptor;
use crate::error::{both, collect_all, DecodeError, DecodeErrors, Error, PathSegment, Result};
use crate::value::Value;
use serde_json::{Map, Number, Value as Json};

const OK_KEY: &str = "ok";
const ERROR_KEY: &str = "error";
const TAG_KEY: &str = "tag";
const PAYLOAD_KEY: &str = "value";

/// Parse JSON bytes using simd-json
///
/// Falls back to serde_json if simd-json fails (e.g., on non-SIMD platforms),
/// which also yields the more precise error message.
///
/// Nesting is checked on the raw bytes before either parser runs, since
/// both build the tree recursively.
///
/// # Errors
///
/// Returns `Error::TooDeep` when arrays and objects nest deeper than
/// `max_depth`, and `Error::Syntax` for malformed input.
pub fn parse_json(bytes: &[u8], max_depth: usize) -> Result<Json> {
    check_depth(bytes, max_depth)?;
    let mut scratch = bytes.to_vec();

    let json = match simd_json::serde::from_slice::<Json>(&mut scratch) {
        Ok(json) => json,
        Err(_) => serde_json::from_slice::<Json>(bytes).map_err(|e| Error::Syntax {
            reason: e.to_string(),
        })?,
    };
    Ok(json)
}

/// Reject documents whose arrays and objects nest deeper than `max_depth`
///
/// Single pass over the bytes; brackets inside strings are skipped.
/// Malformed input is left for the parser to report.
fn check_depth(bytes: &[u8], max_depth: usize) -> Result<()> {
    let mut level = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for &byte in bytes {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                level += 1;
                if level > max_depth {
                    return Err(Error::TooDeep { limit: max_depth });
                }
            }
            b']' | b'}' => level = level.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Serialize a structured value to JSON
///
/// Non-finite floats have no JSON form and become `null`.
#[must_use]
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::String(s) => Json::String(s.clone()),
        Value::Int(i) => Json::Number(Number::from(*i)),
        Value::Float(x) => Number::from_f64(*x).map_or(Json::Null, Json::Number),
        Value::Null | Value::Optional(None) => Json::Null,
        Value::List(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Dict(entries) => {
            if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
                let map: Map<String, Json> = entries
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), to_json(v))))
                    .collect();
                Json::Object(map)
            } else {
                Json::Array(
                    entries
                        .iter()
                        .map(|(k, v)| Json::Array(vec![to_json(k), to_json(v)]))
                        .collect(),
                )
            }
        }
        Value::Optional(Some(inner)) => to_json(inner),
        Value::Result(Ok(inner)) => single(OK_KEY, to_json(inner)),
        Value::Result(Err(inner)) => single(ERROR_KEY, to_json(inner)),
        Value::Object(fields) => Json::Object(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), to_json(v)))
                .collect(),
        ),
        Value::Enum(tag, payload) => {
            let mut map = Map::new();
            map.insert(TAG_KEY.to_string(), Json::String(tag.clone()));
            map.insert(PAYLOAD_KEY.to_string(), to_json(payload));
            Json::Object(map)
        }
    }
}

fn single(key: &str, value: Json) -> Json {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Json::Object(map)
}

/// Serialize a structured value to JSON text
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String> {
    let json = to_json(value);
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

/// Shape label of a JSON node, in the descriptor vocabulary
fn json_label(json: &Json) -> &'static str {
    match json {
        Json::Null => "Null",
        Json::Bool(_) => "Bool",
        Json::Number(n) if n.is_i64() => "Int",
        Json::Number(n) if n.is_u64() => "Int out of range",
        Json::Number(_) => "Float",
        Json::String(_) => "String",
        Json::Array(_) => "List",
        Json::Object(_) => "Object",
    }
}

fn mismatch(descriptor: &Descriptor, json: &Json) -> DecodeErrors {
    DecodeError::mismatch(descriptor.label(), json_label(json)).into()
}

/// Lift a JSON document into a structured value shaped by `descriptor`
///
/// Every mismatch is reported, located with the same paths the codecs
/// use. Object keys that the descriptor does not declare are dropped;
/// declared keys missing from the document are left out, so the object
/// codec reports them as missing fields.
///
/// # Errors
///
/// Returns the accumulated shape mismatches.
pub fn from_json(json: &Json, descriptor: &Descriptor) -> std::result::Result<Value, DecodeErrors> {
    match (descriptor, json) {
        (Descriptor::Bool, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (Descriptor::String, Json::String(s)) => Ok(Value::String(s.clone())),
        (Descriptor::Int, Json::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(|| mismatch(descriptor, json)),
        (Descriptor::Float, Json::Number(n)) => n.as_f64().map(Value::Float).ok_or_else(|| mismatch(descriptor, json)),
        (Descriptor::Null, Json::Null) => Ok(Value::Null),
        (Descriptor::List { of }, Json::Array(items)) => collect_all(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| from_json(item, of).map_err(|e| e.at(PathSegment::Index(i)))),
        )
        .map(Value::List),
        (Descriptor::Dict { key, value }, Json::Object(map)) => collect_all(map.iter().enumerate().map(|(i, (k, v))| {
            both(
                from_json(&Json::String(k.clone()), key).map_err(|e| e.at(PathSegment::DictKey(i))),
                from_json(v, value).map_err(|e| e.at(PathSegment::DictValue(i))),
            )
        }))
        .map(Value::Dict),
        (Descriptor::Dict { key, value }, Json::Array(pairs)) => collect_all(pairs.iter().enumerate().map(|(i, pair)| match pair {
            Json::Array(kv) if kv.len() == 2 => both(
                from_json(&kv[0], key).map_err(|e| e.at(PathSegment::DictKey(i))),
                from_json(&kv[1], value).map_err(|e| e.at(PathSegment::DictValue(i))),
            ),
            other => Err(DecodeErrors::from(DecodeError::mismatch("Pair", json_label(other))).at(PathSegment::Index(i))),
        }))
        .map(Value::Dict),
        (Descriptor::Optional { .. }, Json::Null) => Ok(Value::none()),
        (Descriptor::Optional { of }, other) => from_json(other, of).map(Value::some),
        (Descriptor::Result { ok, error }, Json::Object(map)) if map.len() == 1 => {
            if let Some(inner) = map.get(OK_KEY) {
                from_json(inner, ok).map(Value::ok)
            } else if let Some(inner) = map.get(ERROR_KEY) {
                from_json(inner, error).map(Value::err)
            } else {
                Err(mismatch(descriptor, json))
            }
        }
        (Descriptor::Object { fields }, Json::Object(map)) => collect_all(fields.iter().filter_map(|(name, shape)| {
            map.get(name).map(|v| {
                from_json(v, shape)
                    .map(|lifted| (name.clone(), lifted))
                    .map_err(|e| e.at(PathSegment::Field(name.clone())))
            })
        }))
        .map(Value::Object),
        (Descriptor::Enum { variants }, Json::Object(map)) => {
            let Some(Json::String(tag)) = map.get(TAG_KEY) else {
                return Err(mismatch(descriptor, json));
            };
            let Some((_, shape)) = variants.iter().find(|(t, _)| t == tag) else {
                return Err(DecodeError::unknown_tag(&descriptor.tags(), tag.clone()).into());
            };
            let payload = map.get(PAYLOAD_KEY).unwrap_or(&Json::Null);
            from_json(payload, shape).map(|v| Value::variant(tag.clone(), v))
        }
        _ => Err(mismatch(descriptor, json)),
    }
}
