//! # Convera Core
//!
//! Composable, bidirectional codecs between typed Rust values and a
//! language-neutral structured value model, for request dispatchers that
//! exchange data with typed handlers.
//!
//! ## Architecture
//!
//! A [`Codec<T>`] bundles an encoder (`T` to [`Value`]), a decoder
//! ([`Value`] to `T`, reporting every problem it finds) and a
//! [`Descriptor`] of the shape it produces. Codecs for primitives are
//! provided; composite, object and enum codecs are assembled from them.
//!
//! ```
//! use convera_core::{int, list, object, optional, string, Codec, Value};
//!
//! #[derive(Debug, PartialEq)]
//! struct Person {
//!     name: String,
//!     tags: Vec<i64>,
//!     email: Option<String>,
//! }
//!
//! let codec: Codec<Person> = object(|name, tags, email| Person { name, tags, email })
//!     .field("name", |p: &Person| Some(&p.name), string())
//!     .field("tags", |p: &Person| Some(&p.tags), list(int()))
//!     .field("email", |p: &Person| Some(&p.email), optional(string()))
//!     .build();
//!
//! let ada = Person { name: "Ada".into(), tags: vec![1], email: None };
//! let value = codec.encode(&ada);
//! assert_eq!(value.field("name"), Some(&Value::String("Ada".into())));
//! assert_eq!(codec.decode(&value), Ok(ada));
//! ```
//!
//! ## Modules
//!
//! - `value` - Structured value model
//! - `descriptor` - Shape descriptors
//! - `codec` - The codec triple, `map` / `try_map`, facade functions
//! - `primitive` - String, bool, float, int and null codecs
//! - `composite` - List, optional, result and dict codecs
//! - `object` - Typed object codec builder
//! - `enumeration` - Tagged sum type codecs
//! - `json` - JSON text form with simd-json parsing
//! - `body` - Request body decoding and rejection responses
//! - `schema` - JSON Schema export of descriptors
//! - `telemetry` - Tracing subscriber setup
//! - `error` - Error types and handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod body;
pub mod codec;
pub mod composite;
pub mod descriptor;
pub mod enumeration;
pub mod error;
pub mod json;
pub mod object;
pub mod primitive;
pub mod schema;
pub mod telemetry;
pub mod value;

pub use body::{decode_body, encode_body, BodyConfig, ErrorReport, Rejection};
pub use codec::{decode, encode, type_descriptor, Codec};
pub use composite::{dict, list, optional, result};
pub use descriptor::Descriptor;
pub use enumeration::{enumeration, variant};
pub use error::{
    DecodeError, DecodeErrors, EncodeError, Error, ErrorKind, PathSegment, Result,
};
pub use json::{from_json, parse_json, to_json, to_json_string};
pub use object::{object, ObjectBuilder};
pub use primitive::{bool, float, int, null, string};
pub use schema::json_schema;
pub use telemetry::{init_tracing, LogConfig};
pub use value::{Value, ValueKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
