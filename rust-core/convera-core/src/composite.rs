//! # Composite Codecs
//!
//! Codecs parametrized by one or more inner codecs: sequences, optional
//! values, results and key-value maps.
//!
//! `list` and `dict` decode every element even after a failure, so the
//! caller sees all bad elements at once, each located by index.

use crate::codec::{expected, Codec};
use crate::descriptor::Descriptor;
use crate::error::{both, collect_all, EncodeError, PathSegment};
use crate::value::Value;
use std::collections::HashMap;
use std::hash::Hash;

/// Codec for `Vec<T>`, exchanged as `List`
#[must_use]
pub fn list<T: 'static>(of: Codec<T>) -> Codec<Vec<T>> {
    let descriptor = Descriptor::list(of.descriptor().clone());
    let shape = descriptor.clone();
    let encoder = of.clone();
    Codec::from_parts(
        move |items: &Vec<T>, mode| {
            items
                .iter()
                .map(|item| encoder.encode_with(item, mode))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        },
        move |value| match value {
            Value::List(items) => collect_all(items.iter().enumerate().map(|(i, item)| {
                of.decode(item).map_err(|e| e.at(PathSegment::Index(i)))
            })),
            other => Err(expected(&shape, other)),
        },
        descriptor,
    )
}

/// Codec for `Option<T>`, exchanged as `Optional`
///
/// `None` encodes to an explicit absent optional rather than being omitted.
#[must_use]
pub fn optional<T: 'static>(of: Codec<T>) -> Codec<Option<T>> {
    let descriptor = Descriptor::optional(of.descriptor().clone());
    let shape = descriptor.clone();
    let encoder = of.clone();
    Codec::from_parts(
        move |value: &Option<T>, mode| match value {
            Some(inner) => encoder.encode_with(inner, mode).map(Value::some),
            None => Ok(Value::none()),
        },
        move |value| match value {
            Value::Optional(None) => Ok(None),
            Value::Optional(Some(inner)) => of.decode(inner).map(Some),
            other => Err(expected(&shape, other)),
        },
        descriptor,
    )
}

/// Codec for `Result<T, E>`, exchanged as `Result`
#[must_use]
pub fn result<T: 'static, E: 'static>(ok: Codec<T>, error: Codec<E>) -> Codec<Result<T, E>> {
    let descriptor = Descriptor::result(ok.descriptor().clone(), error.descriptor().clone());
    let shape = descriptor.clone();
    let (ok_encoder, error_encoder) = (ok.clone(), error.clone());
    Codec::from_parts(
        move |value: &Result<T, E>, mode| match value {
            Ok(inner) => ok_encoder.encode_with(inner, mode).map(Value::ok),
            Err(inner) => error_encoder.encode_with(inner, mode).map(Value::err),
        },
        move |value| match value {
            Value::Result(Ok(inner)) => ok.decode(inner).map(Ok),
            Value::Result(Err(inner)) => error.decode(inner).map(Err),
            other => Err(expected(&shape, other)),
        },
        descriptor,
    )
}

/// Codec for `HashMap<K, V>`, exchanged as `Dict`
///
/// Entry order carries no meaning. When two decoded keys collide, the
/// later entry wins. Key and value failures of every entry are reported
/// together, at `DictKey(i)` and `DictValue(i)` respectively.
#[must_use]
pub fn dict<K, V>(key: Codec<K>, value: Codec<V>) -> Codec<HashMap<K, V>>
where
    K: Eq + Hash + 'static,
    V: 'static,
{
    let descriptor = Descriptor::dict(key.descriptor().clone(), value.descriptor().clone());
    let shape = descriptor.clone();
    let (key_encoder, value_encoder) = (key.clone(), value.clone());
    Codec::from_parts(
        move |map: &HashMap<K, V>, mode| {
            map.iter()
                .map(|(k, v)| {
                    Ok::<_, EncodeError>((
                        key_encoder.encode_with(k, mode)?,
                        value_encoder.encode_with(v, mode)?,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Dict)
        },
        move |input| match input {
            Value::Dict(entries) => {
                let decoded = collect_all(entries.iter().enumerate().map(|(i, (k, v))| {
                    both(
                        key.decode(k).map_err(|e| e.at(PathSegment::DictKey(i))),
                        value.decode(v).map_err(|e| e.at(PathSegment::DictValue(i))),
                    )
                }))?;
                Ok(decoded.into_iter().collect())
            }
            other => Err(expected(&shape, other)),
        },
        descriptor,
    )
}
