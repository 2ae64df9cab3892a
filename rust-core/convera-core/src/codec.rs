//! # Codecs
//!
//! A [`Codec<T>`] pairs an encoder (`T` → [`Value`]), a decoder
//! ([`Value`] → `T` or [`DecodeErrors`]) and the [`Descriptor`] of every
//! value it exchanges. Codecs are built once by composition and are
//! immutable afterwards: cloning one only bumps reference counts, and the
//! same codec can serve any number of threads.
//!
//! ## Facade
//!
//! [`encode`], [`decode`] and [`type_descriptor`] are the only operations
//! a request dispatcher needs; they forward to the matching methods.

use crate::descriptor::Descriptor;
use crate::error::{DecodeError, DecodeErrors, EncodeError};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// How an encoder reacts to an enum tag with no declared variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EncodeMode {
    /// Degrade the offending position to `Null`
    Lenient,
    /// Fail with [`EncodeError::UnknownVariant`]
    Strict,
}

pub(crate) type EncodeFn<T> = dyn Fn(&T, EncodeMode) -> Result<Value, EncodeError> + Send + Sync;
pub(crate) type DecodeFn<T> = dyn Fn(&Value) -> Result<T, DecodeErrors> + Send + Sync;

/// Paired encoder, decoder and type descriptor for `T`
pub struct Codec<T> {
    encoder: Arc<EncodeFn<T>>,
    decoder: Arc<DecodeFn<T>>,
    descriptor: Descriptor,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            encoder: Arc::clone(&self.encoder),
            decoder: Arc::clone(&self.decoder),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Codec<T> {
    /// Build a codec from hand-written encode and decode functions
    ///
    /// The caller is responsible for keeping both functions congruent with
    /// `descriptor`.
    pub fn new<E, D>(encode: E, decode: D, descriptor: Descriptor) -> Self
    where
        E: Fn(&T) -> Value + Send + Sync + 'static,
        D: Fn(&Value) -> Result<T, DecodeErrors> + Send + Sync + 'static,
    {
        Self::from_parts(move |value: &T, _| Ok(encode(value)), decode, descriptor)
    }

    pub(crate) fn from_parts<E, D>(encode: E, decode: D, descriptor: Descriptor) -> Self
    where
        E: Fn(&T, EncodeMode) -> Result<Value, EncodeError> + Send + Sync + 'static,
        D: Fn(&Value) -> Result<T, DecodeErrors> + Send + Sync + 'static,
    {
        Self {
            encoder: Arc::new(encode),
            decoder: Arc::new(decode),
            descriptor,
        }
    }

    /// Encode `value` into a structured value
    ///
    /// Never fails. An enum instance whose tag has no declared variant is
    /// encoded as `Null` at its position; use [`Codec::try_encode`] to get
    /// an error instead.
    pub fn encode(&self, value: &T) -> Value {
        // Lenient encoders never return an error.
        (self.encoder)(value, EncodeMode::Lenient).unwrap_or(Value::Null)
    }

    /// Encode `value`, rejecting enum tags without a declared variant
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnknownVariant`] for the first such tag met.
    pub fn try_encode(&self, value: &T) -> Result<Value, EncodeError> {
        (self.encoder)(value, EncodeMode::Strict)
    }

    pub(crate) fn encode_with(&self, value: &T, mode: EncodeMode) -> Result<Value, EncodeError> {
        (self.encoder)(value, mode)
    }

    /// Decode a structured value
    ///
    /// # Errors
    ///
    /// Returns every mismatch found, each located by its path.
    pub fn decode(&self, value: &Value) -> Result<T, DecodeErrors> {
        (self.decoder)(value)
    }

    /// Structural type descriptor of every value this codec exchanges
    #[must_use]
    pub const fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Codec for `U` through total conversions to and from `T`
    ///
    /// ```ignore
    /// struct UserId(i64);
    /// let user_id = int().map(UserId, |id: &UserId| id.0);
    /// ```
    #[must_use]
    pub fn map<U, I, F>(self, into: I, from: F) -> Codec<U>
    where
        U: 'static,
        I: Fn(T) -> U + Send + Sync + 'static,
        F: Fn(&U) -> T + Send + Sync + 'static,
    {
        let descriptor = self.descriptor.clone();
        let inner = self.clone();
        Codec::from_parts(
            move |value: &U, mode| inner.encode_with(&from(value), mode),
            move |value| self.decode(value).map(&into),
            descriptor,
        )
    }

    /// Like [`Codec::map`], but decoding may reject a `T`
    ///
    /// A rejection becomes a `Mismatch` error at the root whose expected
    /// label is this codec's descriptor label and whose found label is the
    /// rejection message.
    #[must_use]
    pub fn try_map<U, I, F>(self, into: I, from: F) -> Codec<U>
    where
        U: 'static,
        I: Fn(T) -> Result<U, String> + Send + Sync + 'static,
        F: Fn(&U) -> T + Send + Sync + 'static,
    {
        let descriptor = self.descriptor.clone();
        let label = descriptor.label();
        let inner = self.clone();
        Codec::from_parts(
            move |value: &U, mode| inner.encode_with(&from(value), mode),
            move |value| {
                let decoded = self.decode(value)?;
                into(decoded).map_err(|reason| DecodeError::mismatch(label, reason).into())
            },
            descriptor,
        )
    }
}

/// Mismatch error for `found` against a required `descriptor`
pub(crate) fn expected(descriptor: &Descriptor, found: &Value) -> DecodeErrors {
    DecodeError::mismatch(descriptor.label(), found.kind().label()).into()
}

/// Encode `value` with `codec`
pub fn encode<T: 'static>(codec: &Codec<T>, value: &T) -> Value {
    codec.encode(value)
}

/// Decode `value` with `codec`
///
/// # Errors
///
/// Returns the accumulated decode errors.
pub fn decode<T: 'static>(codec: &Codec<T>, value: &Value) -> Result<T, DecodeErrors> {
    codec.decode(value)
}

/// Type descriptor of `codec`, independent of any value
pub fn type_descriptor<T: 'static>(codec: &Codec<T>) -> Descriptor {
    codec.descriptor().clone()
}
