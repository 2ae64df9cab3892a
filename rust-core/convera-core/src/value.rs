//! # Structured Value Model
//!
//! The tagged-union runtime value every codec produces and consumes.
//!
//! A [`Value`] carries no schema of its own: the tag of an `Enum` or the
//! side of a `Result` only means something relative to the codec that
//! produced it. Its shape-only counterpart lives in [`crate::descriptor`].

use std::fmt;

/// Shape tag of a [`Value`], without its payload
///
/// Used to label the observed side of a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `true` / `false`
    Bool,
    /// UTF-8 text
    String,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Unit / absence of data
    Null,
    /// Ordered sequence
    List,
    /// Key-value pairs
    Dict,
    /// Present-or-absent wrapper
    Optional,
    /// Ok-or-error wrapper
    Result,
    /// Named fields
    Object,
    /// Tagged variant
    Enum,
}

impl ValueKind {
    /// Label used in diagnostics (e.g. `"expected Int, got String"`)
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Null => "Null",
            Self::List => "List",
            Self::Dict => "Dict",
            Self::Optional => "Optional",
            Self::Result => "Result",
            Self::Object => "Object",
            Self::Enum => "Enum",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured value exchanged between codecs and the outside world
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// String value
    String(String),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// Null value
    Null,
    /// Ordered list of values
    List(Vec<Value>),
    /// Key-value pairs, keys are themselves structured values
    Dict(Vec<(Value, Value)>),
    /// Explicit present (`Some`) or absent (`None`) value
    Optional(Option<Box<Value>>),
    /// Ok or error side of a result
    Result(Result<Box<Value>, Box<Value>>),
    /// Named fields in declaration order, names unique within one object
    Object(Vec<(String, Value)>),
    /// Variant tag and its payload
    Enum(String, Box<Value>),
}

impl Value {
    /// Shape tag of this value
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Null => ValueKind::Null,
            Self::List(_) => ValueKind::List,
            Self::Dict(_) => ValueKind::Dict,
            Self::Optional(_) => ValueKind::Optional,
            Self::Result(_) => ValueKind::Result,
            Self::Object(_) => ValueKind::Object,
            Self::Enum(..) => ValueKind::Enum,
        }
    }

    /// Present optional wrapping `inner`
    #[must_use]
    pub fn some(inner: Self) -> Self {
        Self::Optional(Some(Box::new(inner)))
    }

    /// Absent optional
    #[must_use]
    pub const fn none() -> Self {
        Self::Optional(None)
    }

    /// Ok side of a result
    #[must_use]
    pub fn ok(inner: Self) -> Self {
        Self::Result(Ok(Box::new(inner)))
    }

    /// Error side of a result
    #[must_use]
    pub fn err(inner: Self) -> Self {
        Self::Result(Err(Box::new(inner)))
    }

    /// Enum value with the given tag and payload
    #[must_use]
    pub fn variant(tag: impl Into<String>, payload: Self) -> Self {
        Self::Enum(tag.into(), Box::new(payload))
    }

    /// Object from `(name, value)` pairs
    #[must_use]
    pub fn object<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Self)>,
        S: Into<String>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a field of an `Object` value
    ///
    /// Returns the first field with that name, `None` for missing fields
    /// and for non-object values.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Object(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Get as str if String variant
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if Int variant
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if Float variant
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as bool if Bool variant
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check if value is Null
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Null => f.write_str("null"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} => {v}")?;
                }
                f.write_str("}")
            }
            Self::Optional(None) => f.write_str("none"),
            Self::Optional(Some(inner)) => write!(f, "some({inner})"),
            Self::Result(Ok(inner)) => write!(f, "ok({inner})"),
            Self::Result(Err(inner)) => write!(f, "error({inner})"),
            Self::Object(fields) => {
                f.write_str("{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Enum(tag, payload) => write!(f, "{tag}({payload})"),
        }
    }
}
