//! # Enum Codec
//!
//! Codec for a closed sum type, dispatching on a string tag to one codec
//! per variant. The tag-to-variant index is built once, when the codec is
//! constructed.
//!
//! Each variant codec handles the whole sum type; usually it is an
//! [`object`](crate::object::object) codec whose accessors return `None`
//! for the other variants.

use crate::codec::{expected, Codec, EncodeMode};
use crate::descriptor::Descriptor;
use crate::error::{DecodeError, EncodeError};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pair a tag with the codec of its variant
pub fn variant<T>(tag: impl Into<String>, codec: Codec<T>) -> (String, Codec<T>) {
    (tag.into(), codec)
}

/// Codec for a sum type
///
/// `tag_of` names the variant of an instance; `variants` lists every
/// variant in declaration order. Tags should be unique; when they are not,
/// the first declaration wins.
///
/// Encoding an instance whose tag has no variant yields `Null` at that
/// position (with a warning) from [`Codec::encode`], and
/// [`EncodeError::UnknownVariant`] from [`Codec::try_encode`].
#[must_use]
pub fn enumeration<T, G>(tag_of: G, variants: Vec<(String, Codec<T>)>) -> Codec<T>
where
    T: 'static,
    G: Fn(&T) -> &str + Send + Sync + 'static,
{
    let mut index: HashMap<String, usize> = HashMap::with_capacity(variants.len());
    for (position, (tag, _)) in variants.iter().enumerate() {
        if index.contains_key(tag) {
            warn!(tag = %tag, "duplicate enum tag, the first declaration wins");
        } else {
            index.insert(tag.clone(), position);
        }
    }

    let descriptor = Descriptor::Enum {
        variants: variants
            .iter()
            .map(|(tag, codec)| (tag.clone(), codec.descriptor().clone()))
            .collect(),
    };
    debug!(variants = variants.len(), "enum codec built");

    let shape = descriptor.clone();
    let known: Vec<String> = variants.iter().map(|(tag, _)| tag.clone()).collect();
    let variants = Arc::new((index, variants));
    let encoding = Arc::clone(&variants);

    Codec::from_parts(
        move |instance: &T, mode| {
            let (index, variants) = &*encoding;
            let tag = tag_of(instance);
            match index.get(tag) {
                Some(&position) => {
                    let (tag, codec) = &variants[position];
                    let payload = codec.encode_with(instance, mode)?;
                    Ok(Value::variant(tag.clone(), payload))
                }
                None => match mode {
                    EncodeMode::Lenient => {
                        warn!(tag = %tag, "no variant declared for enum tag, encoding as null");
                        Ok(Value::Null)
                    }
                    EncodeMode::Strict => Err(EncodeError::UnknownVariant {
                        tag: tag.to_string(),
                        known: known.clone(),
                    }),
                },
            }
        },
        move |value| {
            let (index, variants) = &*variants;
            match value {
                Value::Enum(tag, payload) => match index.get(tag) {
                    Some(&position) => variants[position].1.decode(payload),
                    None => {
                        let tags: Vec<&str> = variants.iter().map(|(t, _)| t.as_str()).collect();
                        Err(DecodeError::unknown_tag(&tags, tag.clone()).into())
                    }
                },
                other => Err(expected(&shape, other)),
            }
        },
        descriptor,
    )
}
