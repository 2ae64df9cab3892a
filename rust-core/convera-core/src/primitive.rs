//! # Primitive Codecs
//!
//! Atomic codecs for the base types. Each one wraps its Rust value in the
//! matching [`Value`] tag and decodes only that tag.

use crate::codec::{expected, Codec};
use crate::descriptor::Descriptor;
use crate::value::Value;

/// Codec for `String` values
#[must_use]
pub fn string() -> Codec<String> {
    Codec::from_parts(
        |s: &String, _| Ok(Value::String(s.clone())),
        |value| match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(expected(&Descriptor::String, other)),
        },
        Descriptor::String,
    )
}

/// Codec for `bool` values
#[must_use]
pub fn bool() -> Codec<bool> {
    Codec::from_parts(
        |b: &bool, _| Ok(Value::Bool(*b)),
        |value| match value {
            Value::Bool(b) => Ok(*b),
            other => Err(expected(&Descriptor::Bool, other)),
        },
        Descriptor::Bool,
    )
}

/// Codec for `f64` values
///
/// Only `Float` decodes; an `Int` is a mismatch, not a widening.
#[must_use]
pub fn float() -> Codec<f64> {
    Codec::from_parts(
        |x: &f64, _| Ok(Value::Float(*x)),
        |value| match value {
            Value::Float(x) => Ok(*x),
            other => Err(expected(&Descriptor::Float, other)),
        },
        Descriptor::Float,
    )
}

/// Codec for `i64` values
#[must_use]
pub fn int() -> Codec<i64> {
    Codec::from_parts(
        |i: &i64, _| Ok(Value::Int(*i)),
        |value| match value {
            Value::Int(i) => Ok(*i),
            other => Err(expected(&Descriptor::Int, other)),
        },
        Descriptor::Int,
    )
}

/// Codec for the unit value, exchanged as `Null`
#[must_use]
pub fn null() -> Codec<()> {
    Codec::from_parts(
        |(): &(), _| Ok(Value::Null),
        |value| match value {
            Value::Null => Ok(()),
            other => Err(expected(&Descriptor::Null, other)),
        },
        Descriptor::Null,
    )
}
