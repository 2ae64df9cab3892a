//! # Object Codec Builder
//!
//! Assembles a codec for a record type field by field, without reflection.
//!
//! ```ignore
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! let person = object(|name, age| Person { name, age })
//!     .field("name", |p: &Person| Some(&p.name), string())
//!     .field("age", |p: &Person| Some(&p.age), int())
//!     .build();
//! ```
//!
//! Every `field` call consumes the builder and returns one whose
//! positional accumulator is a tuple one element longer. `build` only
//! compiles when the constructor takes exactly the accumulated tuple, so
//! arity and field types are checked by the compiler.
//!
//! The finalized decoder looks every declared field up, decodes all of
//! them even when some fail, and calls the constructor only when all
//! succeeded.

use crate::codec::{expected, Codec, EncodeMode, EncodeFn};
use crate::descriptor::Descriptor;
use crate::error::{both, DecodeError, DecodeErrors, PathSegment};
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Tuple that can grow by one element
///
/// Implemented for tuples of up to 15 elements, so an object can have up
/// to 16 fields.
pub trait Push<X> {
    /// Tuple with `X` appended
    type Output;

    /// Append `x`
    fn push(self, x: X) -> Self::Output;
}

macro_rules! impl_push {
    ($($t:ident),*) => {
        impl<$($t,)* X> Push<X> for ($($t,)*) {
            type Output = ($($t,)* X,);

            #[allow(non_snake_case, clippy::unused_unit)]
            fn push(self, x: X) -> Self::Output {
                let ($($t,)*) = self;
                ($($t,)* x,)
            }
        }
    };
}

impl_push!();
impl_push!(A);
impl_push!(A, B);
impl_push!(A, B, C);
impl_push!(A, B, C, D);
impl_push!(A, B, C, D, E);
impl_push!(A, B, C, D, E, F);
impl_push!(A, B, C, D, E, F, G);
impl_push!(A, B, C, D, E, F, G, H);
impl_push!(A, B, C, D, E, F, G, H, I);
impl_push!(A, B, C, D, E, F, G, H, I, J);
impl_push!(A, B, C, D, E, F, G, H, I, J, K);
impl_push!(A, B, C, D, E, F, G, H, I, J, K, L);
impl_push!(A, B, C, D, E, F, G, H, I, J, K, L, M);
impl_push!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
impl_push!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);

/// Constructor taking positional arguments collected as a tuple
///
/// Implemented for every `Fn(A, B, ..) -> R` of up to 16 parameters.
pub trait Construct<Args> {
    /// Constructed type
    type Output;

    /// Call the constructor with the collected arguments
    fn construct(&self, args: Args) -> Self::Output;
}

macro_rules! impl_construct {
    ($($t:ident),*) => {
        impl<Func, R, $($t),*> Construct<($($t,)*)> for Func
        where
            Func: Fn($($t),*) -> R,
        {
            type Output = R;

            #[allow(non_snake_case)]
            fn construct(&self, args: ($($t,)*)) -> R {
                let ($($t,)*) = args;
                self($($t),*)
            }
        }
    };
}

impl_construct!();
impl_construct!(A);
impl_construct!(A, B);
impl_construct!(A, B, C);
impl_construct!(A, B, C, D);
impl_construct!(A, B, C, D, E);
impl_construct!(A, B, C, D, E, F);
impl_construct!(A, B, C, D, E, F, G);
impl_construct!(A, B, C, D, E, F, G, H);
impl_construct!(A, B, C, D, E, F, G, H, I);
impl_construct!(A, B, C, D, E, F, G, H, I, J);
impl_construct!(A, B, C, D, E, F, G, H, I, J, K);
impl_construct!(A, B, C, D, E, F, G, H, I, J, K, L);
impl_construct!(A, B, C, D, E, F, G, H, I, J, K, L, M);
impl_construct!(A, B, C, D, E, F, G, H, I, J, K, L, M, N);
impl_construct!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O);
impl_construct!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);

type FieldsDecoder<F> = dyn Fn(&[(String, Value)]) -> Result<F, DecodeErrors> + Send + Sync;

/// In-progress object codec
///
/// `T` is the record type, `C` its constructor and `F` the tuple of field
/// values collected so far. Not `Clone`: a partially built object cannot
/// be forked into two continuations.
#[must_use = "an object builder does nothing until `build` is called"]
pub struct ObjectBuilder<T, C, F> {
    constructor: C,
    fields: Vec<(String, Descriptor)>,
    encoders: Vec<(String, Arc<EncodeFn<T>>)>,
    decoder: Arc<FieldsDecoder<F>>,
}

/// Start an object codec with the record's positional constructor
pub fn object<T, C>(constructor: C) -> ObjectBuilder<T, C, ()> {
    ObjectBuilder {
        constructor,
        fields: Vec::new(),
        encoders: Vec::new(),
        decoder: Arc::new(|_: &[(String, Value)]| Ok::<_, DecodeErrors>(())),
    }
}

impl<T: 'static, C, F: 'static> ObjectBuilder<T, C, F> {
    /// Append a field
    ///
    /// `accessor` returns the field of an instance, or `None` when the field
    /// is absent on that instance, which encodes as `Null`. The field's
    /// position in the object matches the position of the decoded value in
    /// the constructor's parameter list.
    pub fn field<V, A>(
        self,
        name: impl Into<String>,
        accessor: A,
        codec: Codec<V>,
    ) -> ObjectBuilder<T, C, F::Output>
    where
        V: 'static,
        A: Fn(&T) -> Option<&V> + Send + Sync + 'static,
        F: Push<V>,
    {
        let name = name.into();
        if self.fields.iter().any(|(declared, _)| *declared == name) {
            warn!(field = %name, "duplicate object field, the first declaration wins on decode");
        }

        let mut fields = self.fields;
        fields.push((name.clone(), codec.descriptor().clone()));

        let field_encoder = codec.clone();
        let encode: Arc<EncodeFn<T>> = Arc::new(move |instance: &T, mode: EncodeMode| {
            accessor(instance).map_or(Ok(Value::Null), |v| field_encoder.encode_with(v, mode))
        });
        let mut encoders = self.encoders;
        encoders.push((name.clone(), encode));

        let previous = self.decoder;
        let label = codec.descriptor().label();
        let decoder: Arc<FieldsDecoder<F::Output>> =
            Arc::new(move |values: &[(String, Value)]| {
                let current = match values.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => codec
                        .decode(value)
                        .map_err(|e| e.at(PathSegment::Field(name.clone()))),
                    None => Err(DecodeError::missing_field(name.clone(), label).into()),
                };
                both(previous(values), current).map(|(collected, v)| collected.push(v))
            });

        ObjectBuilder {
            constructor: self.constructor,
            fields,
            encoders,
            decoder,
        }
    }

    /// Number of fields declared so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True before the first `field` call
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finalize into a codec
    ///
    /// Only available once the declared fields match the constructor's
    /// parameters in number, order and type.
    pub fn build(self) -> Codec<T>
    where
        C: Construct<F, Output = T> + Send + Sync + 'static,
    {
        debug!(fields = self.fields.len(), "object codec built");

        let descriptor = Descriptor::Object {
            fields: self.fields,
        };
        let shape = descriptor.clone();
        let encoders = self.encoders;
        let decoder = self.decoder;
        let constructor = self.constructor;

        Codec::from_parts(
            move |instance: &T, mode| {
                encoders
                    .iter()
                    .map(|(name, encode)| encode(instance, mode).map(|v| (name.clone(), v)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Object)
            },
            move |value| match value {
                Value::Object(values) => decoder(values.as_slice()).map(|args| constructor.construct(args)),
                other => Err(expected(&shape, other)),
            },
            descriptor,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::{list, optional};
    use crate::error::ErrorKind;
    use crate::primitive::{bool, int, string};

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        age: i64,
        email: Option<String>,
    }

    fn person() -> Codec<Person> {
        object(|name, age, email| Person { name, age, email })
            .field("name", |p: &Person| Some(&p.name), string())
            .field("age", |p: &Person| Some(&p.age), int())
            .field("email", |p: &Person| Some(&p.email), optional(string()))
            .build()
    }

    fn ada() -> Person {
        Person {
            name: "Ada".into(),
            age: 36,
            email: None,
        }
    }

    #[test]
    fn test_encode_in_declared_order() {
        let value = person().encode(&ada());
        assert_eq!(
            value,
            Value::object([
                ("name", Value::String("Ada".into())),
                ("age", Value::Int(36)),
                ("email", Value::none()),
            ])
        );
    }

    #[test]
    fn test_round_trip() {
        let codec = person();
        assert_eq!(codec.decode(&codec.encode(&ada())), Ok(ada()));
    }

    #[test]
    fn test_descriptor_lists_fields() {
        let expected = Descriptor::Object {
            fields: vec![
                ("name".to_string(), Descriptor::String),
                ("age".to_string(), Descriptor::Int),
                ("email".to_string(), Descriptor::optional(Descriptor::String)),
            ],
        };
        assert_eq!(person().descriptor(), &expected);
    }

    #[test]
    fn test_missing_field_located() {
        let input = Value::object([("name", Value::String("Ada".into())), ("email", Value::none())]);
        let err = person().decode(&input).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().kind, ErrorKind::MissingField);
        assert_eq!(err.first().path(), vec![PathSegment::Field("age".into())]);
    }

    #[test]
    fn test_all_field_errors_reported() {
        let input = Value::object([("name", Value::Int(1)), ("age", Value::String("x".into()))]);
        let err = person().decode(&input).unwrap_err();
        let paths: Vec<String> = err.iter().map(DecodeError::location).collect();
        assert_eq!(paths, vec!["$.name", "$.age", "$.email"]);
    }

    #[test]
    fn test_field_order_in_input_is_irrelevant() {
        let input = Value::object([
            ("email", Value::some(Value::String("a@b.c".into()))),
            ("age", Value::Int(36)),
            ("name", Value::String("Ada".into())),
            ("extra", Value::Bool(true)),
        ]);
        let decoded = person().decode(&input).unwrap();
        assert_eq!(decoded.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_non_object_fails_at_root() {
        let err = person().decode(&Value::List(vec![])).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.first().expected, "Object");
        assert!(err.first().path().is_empty());
    }

    #[test]
    fn test_absent_accessor_encodes_null() {
        #[derive(Debug, PartialEq)]
        struct Flag {
            on: bool,
            note: Option<String>,
        }

        let codec = object(|on, note| Flag { on, note: Some(note) })
            .field("on", |f: &Flag| Some(&f.on), bool())
            .field("note", |f: &Flag| f.note.as_ref(), string())
            .build();

        let value = codec.encode(&Flag { on: true, note: None });
        assert_eq!(value.field("note"), Some(&Value::Null));
        assert!(codec.descriptor().accepts(&value));

        let err = codec.decode(&value).unwrap_err();
        assert_eq!(err.first().location(), "$.note");

        let present = Flag {
            on: false,
            note: Some("hi".into()),
        };
        assert_eq!(codec.decode(&codec.encode(&present)), Ok(present));
    }

    #[test]
    fn test_nested_object_paths() {
        #[derive(Debug, Clone, PartialEq)]
        struct Team {
            members: Vec<Person>,
        }

        let team = object(|members| Team { members })
            .field("members", |t: &Team| Some(&t.members), list(person()))
            .build();

        let input = Value::object([(
            "members",
            Value::List(vec![person().encode(&ada()), Value::object([("name", Value::Null)])]),
        )]);
        let err = team.decode(&input).unwrap_err();
        let paths: Vec<String> = err.iter().map(DecodeError::location).collect();
        assert_eq!(paths, vec!["$.members[1].name", "$.members[1].age", "$.members[1].email"]);
    }

    #[test]
    fn test_empty_object() {
        #[derive(Debug, PartialEq)]
        struct Unit;

        let codec = object(|| Unit).build();
        assert_eq!(codec.encode(&Unit), Value::Object(vec![]));
        assert_eq!(codec.decode(&Value::Object(vec![])), Ok(Unit));
    }

    #[test]
    fn test_builder_len() {
        let builder = object(|name: String| name).field("name", |s: &String| Some(s), string());
        assert_eq!(builder.len(), 1);
        assert!(!builder.is_empty());
    }
}
