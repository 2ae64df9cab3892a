//! # Type Descriptors
//!
//! Shape-only schema counterpart of [`Value`]. Every codec carries one,
//! and every value the codec produces or accepts is congruent with it.
//!
//! Descriptors serialize with `serde` so external tooling can export them
//! directly; [`crate::schema`] turns them into JSON Schema documents.

use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// Structural type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Descriptor {
    /// Boolean
    Bool,
    /// String
    String,
    /// Integer
    Int,
    /// Float
    Float,
    /// Null / unit
    Null,
    /// List of the element descriptor
    List {
        /// Element shape
        of: Box<Descriptor>,
    },
    /// Dict from key shape to value shape
    Dict {
        /// Key shape
        key: Box<Descriptor>,
        /// Value shape
        value: Box<Descriptor>,
    },
    /// Optional inner shape
    Optional {
        /// Shape of the present value
        of: Box<Descriptor>,
    },
    /// Result with ok and error shapes
    Result {
        /// Shape of the ok side
        ok: Box<Descriptor>,
        /// Shape of the error side
        error: Box<Descriptor>,
    },
    /// Object with named fields in declaration order
    Object {
        /// `(name, shape)` pairs
        fields: Vec<(String, Descriptor)>,
    },
    /// Enum with tagged variants in declaration order
    Enum {
        /// `(tag, payload shape)` pairs
        variants: Vec<(String, Descriptor)>,
    },
}

impl Descriptor {
    /// List descriptor
    #[must_use]
    pub fn list(of: Self) -> Self {
        Self::List { of: Box::new(of) }
    }

    /// Dict descriptor
    #[must_use]
    pub fn dict(key: Self, value: Self) -> Self {
        Self::Dict {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Optional descriptor
    #[must_use]
    pub fn optional(of: Self) -> Self {
        Self::Optional { of: Box::new(of) }
    }

    /// Result descriptor
    #[must_use]
    pub fn result(ok: Self, error: Self) -> Self {
        Self::Result {
            ok: Box::new(ok),
            error: Box::new(error),
        }
    }

    /// Expected-shape label, same vocabulary as [`crate::ValueKind::label`]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Null => "Null",
            Self::List { .. } => "List",
            Self::Dict { .. } => "Dict",
            Self::Optional { .. } => "Optional",
            Self::Result { .. } => "Result",
            Self::Object { .. } => "Object",
            Self::Enum { .. } => "Enum",
        }
    }

    /// Check that `value` is structurally congruent with this descriptor
    ///
    /// Object fields also accept `Null`, which is what an absent field
    /// encodes to. Enum values must carry a declared tag.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Bool(_))
            | (Self::String, Value::String(_))
            | (Self::Int, Value::Int(_))
            | (Self::Float, Value::Float(_))
            | (Self::Null, Value::Null)
            | (Self::Optional { .. }, Value::Optional(None)) => true,
            (Self::List { of }, Value::List(items)) => items.iter().all(|v| of.accepts(v)),
            (Self::Dict { key, value }, Value::Dict(entries)) => entries
                .iter()
                .all(|(k, v)| key.accepts(k) && value.accepts(v)),
            (Self::Optional { of }, Value::Optional(Some(inner))) => of.accepts(inner),
            (Self::Result { ok, .. }, Value::Result(Ok(inner))) => ok.accepts(inner),
            (Self::Result { error, .. }, Value::Result(Err(inner))) => error.accepts(inner),
            (Self::Object { fields }, Value::Object(values)) => {
                fields.len() == values.len()
                    && fields.iter().zip(values).all(|((name, shape), (key, v))| {
                        name == key && (v.is_null() || shape.accepts(v))
                    })
            }
            (Self::Enum { variants }, Value::Enum(tag, payload)) => variants
                .iter()
                .find(|(t, _)| t == tag)
                .is_some_and(|(_, shape)| shape.accepts(payload)),
            _ => false,
        }
    }

    /// Declared tags of an enum descriptor, in declaration order
    ///
    /// Empty for every other shape.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        match self {
            Self::Enum { variants } => variants.iter().map(|(t, _)| t.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List { of } => write!(f, "List<{of}>"),
            Self::Dict { key, value } => write!(f, "Dict<{key}, {value}>"),
            Self::Optional { of } => write!(f, "Optional<{of}>"),
            Self::Result { ok, error } => write!(f, "Result<{ok}, {error}>"),
            Self::Object { fields } => {
                f.write_str("{")?;
                for (i, (name, shape)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {shape}")?;
                }
                f.write_str("}")
            }
            Self::Enum { variants } => {
                for (i, (tag, shape)) in variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{tag}({shape})")?;
                }
                Ok(())
            }
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Descriptor {
        Descriptor::Object {
            fields: vec![
                ("name".to_string(), Descriptor::String),
                ("age".to_string(), Descriptor::Int),
            ],
        }
    }

    #[test]
    fn test_accepts_primitives() {
        assert!(Descriptor::Int.accepts(&Value::Int(3)));
        assert!(!Descriptor::Int.accepts(&Value::Float(3.0)));
        assert!(Descriptor::Null.accepts(&Value::Null));
    }

    #[test]
    fn test_accepts_object_in_order() {
        let ok = Value::object([("name", Value::String("Ada".into())), ("age", Value::Int(36))]);
        let swapped = Value::object([("age", Value::Int(36)), ("name", Value::String("Ada".into()))]);
        let absent = Value::object([("name", Value::String("Ada".into())), ("age", Value::Null)]);

        assert!(person().accepts(&ok));
        assert!(!person().accepts(&swapped));
        assert!(person().accepts(&absent));
    }

    #[test]
    fn test_accepts_enum_and_result() {
        let door = Descriptor::Enum {
            variants: vec![
                ("Open".to_string(), Descriptor::Null),
                ("Close".to_string(), Descriptor::Null),
            ],
        };
        assert!(door.accepts(&Value::variant("Open", Value::Null)));
        assert!(!door.accepts(&Value::variant("Ajar", Value::Null)));
        assert_eq!(door.tags(), vec!["Open", "Close"]);

        let res = Descriptor::result(Descriptor::Int, Descriptor::String);
        assert!(res.accepts(&Value::ok(Value::Int(1))));
        assert!(res.accepts(&Value::err(Value::String("bad".into()))));
        assert!(!res.accepts(&Value::err(Value::Int(1))));
    }

    #[test]
    fn test_display() {
        let shape = Descriptor::dict(Descriptor::String, Descriptor::list(Descriptor::optional(Descriptor::Int)));
        assert_eq!(shape.to_string(), "Dict<String, List<Optional<Int>>>");
        assert_eq!(person().to_string(), "{name: String, age: Int}");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(Descriptor::list(Descriptor::Bool)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "list", "of": {"type": "bool"}}));
    }
}
