//! # Request Body Boundary
//!
//! Helpers a request dispatcher calls to turn a raw body into a typed
//! value, to serialize a typed result, and to turn failures into a
//! response.
//!
//! ## Pipeline
//!
//! 1. Size check against [`BodyConfig::max_body_size`]
//! 2. JSON parse (simd-json) with a nesting limit
//! 3. Descriptor-directed lift into a [`Value`](crate::value::Value)
//! 4. Codec decode

use crate::codec::Codec;
use crate::error::{DecodeError, Error, Result};
use crate::json::{from_json, parse_json, to_json_string};
use serde::Serialize;
use tracing::{debug, warn};

/// Which decode errors a rejection carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorReport {
    /// Only the first error
    First,
    /// Every error found
    #[default]
    All,
}

/// Body handling configuration
#[derive(Debug, Clone)]
pub struct BodyConfig {
    /// Max request body size in bytes
    pub max_body_size: usize,
    /// Max JSON nesting depth
    pub max_depth: usize,
    /// Decode errors to include in rejections
    pub report: ErrorReport,
    /// Pretty-print encoded bodies
    pub pretty: bool,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            max_depth: 128,
            report: ErrorReport::All,
            pretty: false,
        }
    }
}

impl BodyConfig {
    /// Set max body size
    #[must_use]
    pub const fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.max_body_size = bytes;
        self
    }

    /// Set max nesting depth
    #[must_use]
    pub const fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set error reporting
    #[must_use]
    pub const fn with_report(mut self, report: ErrorReport) -> Self {
        self.report = report;
        self
    }

    /// Enable or disable pretty output
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Decode a JSON request body into `T`
///
/// # Errors
///
/// - `Error::PayloadTooLarge` when the body exceeds the configured size
/// - `Error::Syntax` / `Error::TooDeep` when the body is not acceptable JSON
/// - `Error::Decode` with every shape mismatch found
pub fn decode_body<T: 'static>(codec: &Codec<T>, body: &[u8], config: &BodyConfig) -> Result<T> {
    let result = lift(codec, body, config);
    match &result {
        Ok(_) => debug!(bytes = body.len(), shape = %codec.descriptor(), "body decoded"),
        Err(e) => warn!(bytes = body.len(), error = %e, "body rejected"),
    }
    result
}

fn lift<T: 'static>(codec: &Codec<T>, body: &[u8], config: &BodyConfig) -> Result<T> {
    if body.len() > config.max_body_size {
        return Err(Error::PayloadTooLarge {
            limit: config.max_body_size,
            actual: body.len(),
        });
    }
    let json = parse_json(body, config.max_depth)?;
    let value = from_json(&json, codec.descriptor())?;
    Ok(codec.decode(&value)?)
}

/// Encode `value` as a JSON response body
///
/// Encoding is strict: an enum instance without a declared variant fails
/// instead of producing `null`.
///
/// # Errors
///
/// Returns `Error::Encode` or `Error::Json` on failure.
pub fn encode_body<T: 'static>(codec: &Codec<T>, value: &T, config: &BodyConfig) -> Result<String> {
    let encoded = codec.try_encode(value)?;
    to_json_string(&encoded, config.pretty)
}

#[derive(Serialize)]
struct RejectionBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<&'a DecodeError>>,
}

/// Response for a body that could not be accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// HTTP status code
    pub status: u16,
    /// JSON response body
    pub body: String,
}

impl Rejection {
    /// Build the response for `error`
    ///
    /// Oversized bodies map to 413, malformed JSON and decode failures to
    /// 400, anything else to 500.
    #[must_use]
    pub fn from_error(error: &Error, report: ErrorReport) -> Self {
        let (status, payload) = match error {
            Error::PayloadTooLarge { .. } => (413, RejectionBody {
                error: error.to_string(),
                details: None,
            }),
            Error::Syntax { .. } | Error::TooDeep { .. } => (400, RejectionBody {
                error: error.to_string(),
                details: None,
            }),
            Error::Decode(errors) => {
                let details = match report {
                    ErrorReport::First => vec![errors.first()],
                    ErrorReport::All => errors.iter().collect(),
                };
                (400, RejectionBody {
                    error: errors.summary(),
                    details: Some(details),
                })
            }
            Error::Encode(_) | Error::Json(_) => (500, RejectionBody {
                error: "Internal Server Error".to_string(),
                details: None,
            }),
        };

        let body = serde_json::to_string(&payload)
            .unwrap_or_else(|_| r#"{"error":"Internal Server Error"}"#.to_string());
        Self { status, body }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::{list, optional};
    use crate::object::object;
    use crate::primitive::{int, string};
    use serde_json::json;

    #[derive(Debug, PartialEq)]
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

    fn body_json(rejection: &Rejection) -> serde_json::Value {
        serde_json::from_str(&rejection.body).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = BodyConfig::default();
        assert_eq!(config.max_body_size, 1024 * 1024);
        assert_eq!(config.max_depth, 128);
        assert_eq!(config.report, ErrorReport::All);
        assert!(!config.pretty);
    }

    #[test]
    fn test_decode_body() {
        let body = br#"{"name": "Ada", "age": 36, "email": null}"#;
        let decoded = decode_body(&person(), body, &BodyConfig::default()).unwrap();
        assert_eq!(
            decoded,
            Person {
                name: "Ada".into(),
                age: 36,
                email: None,
            }
        );
    }

    #[test]
    fn test_encode_body() {
        let ada = Person {
            name: "Ada".into(),
            age: 36,
            email: Some("ada@example.com".into()),
        };
        let body = encode_body(&person(), &ada, &BodyConfig::default()).unwrap();
        assert_eq!(body, r#"{"name":"Ada","age":36,"email":"ada@example.com"}"#);
        let decoded = decode_body(&person(), body.as_bytes(), &BodyConfig::default()).unwrap();
        assert_eq!(decoded, ada);
    }

    #[test]
    fn test_payload_too_large() {
        let config = BodyConfig::default().with_max_body_size(8);
        let err = decode_body(&person(), br#"{"name": "Ada"}"#, &config).unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { limit: 8, actual: 15 }));

        let rejection = Rejection::from_error(&err, ErrorReport::All);
        assert_eq!(rejection.status, 413);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = decode_body(&person(), b"{name", &BodyConfig::default()).unwrap_err();
        let rejection = Rejection::from_error(&err, ErrorReport::All);
        assert_eq!(rejection.status, 400);
        assert!(body_json(&rejection)["error"].as_str().unwrap().starts_with("Malformed JSON"));
    }

    #[test]
    fn test_deeply_nested_body_rejected() {
        let levels = 100_000;
        let body = format!("{}{}", "[".repeat(levels), "]".repeat(levels));
        let err = decode_body(&list(int()), body.as_bytes(), &BodyConfig::default()).unwrap_err();
        assert!(matches!(err, Error::TooDeep { limit: 128 }));

        let rejection = Rejection::from_error(&err, ErrorReport::All);
        assert_eq!(rejection.status, 400);
    }

    #[test]
    fn test_decode_failures_reported() {
        let body = br#"{"name": 7, "email": false}"#;
        let err = decode_body(&person(), body, &BodyConfig::default()).unwrap_err();

        let all = body_json(&Rejection::from_error(&err, ErrorReport::All));
        assert_eq!(
            all["details"],
            json!([
                {"kind": "MISMATCH", "expected": "String", "found": "Int", "path": [{"field": "name"}]},
                {"kind": "MISMATCH", "expected": "String", "found": "Bool", "path": [{"field": "email"}]}
            ])
        );
        assert_eq!(all["error"], "expected String, got Int at $.name (and 1 more)");

        let first = body_json(&Rejection::from_error(&err, ErrorReport::First));
        assert_eq!(first["details"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_missing_field_reported() {
        let body = br#"{"name": "Ada", "email": null}"#;
        let err = decode_body(&person(), body, &BodyConfig::default()).unwrap_err();
        let rejection = Rejection::from_error(&err, ErrorReport::All);
        assert_eq!(rejection.status, 400);
        assert_eq!(body_json(&rejection)["details"][0]["kind"], "MISSING_FIELD");
    }

    #[test]
    fn test_encode_error_is_internal() {
        let err = Error::Encode(crate::error::EncodeError::UnknownVariant {
            tag: "X".into(),
            known: vec![],
        });
        let rejection = Rejection::from_error(&err, ErrorReport::All);
        assert_eq!(rejection.status, 500);
        assert_eq!(body_json(&rejection), json!({"error": "Internal Server Error"}));
    }
}
