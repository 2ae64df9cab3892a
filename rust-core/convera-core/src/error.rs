//! # Error Handling
//!
//! Decode failures, strict-encode failures, and the crate-level error
//! used by the JSON and body boundary modules.
//! Uses `thiserror` for ergonomic error definitions.
//!
//! Decoding never stops at the first problem: composite decoders collect
//! every [`DecodeError`] they meet into one [`DecodeErrors`] collection.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Result type alias for convera boundary operations
pub type Result<T> = std::result::Result<T, Error>;

/// Category of a decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Observed shape differs from the required one
    Mismatch,
    /// Declared object field not present
    MissingField,
    /// Enum tag not among the declared variants
    UnknownTag,
}

/// One step of the location of a decode failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Object field by name
    Field(String),
    /// List element by position
    Index(usize),
    /// Key of the dict entry at this position
    DictKey(usize),
    /// Value of the dict entry at this position
    DictValue(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{name}"),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::DictKey(i) => write!(f, "[{i}].key"),
            Self::DictValue(i) => write!(f, "[{i}].value"),
        }
    }
}

/// Render a trail (innermost segment first) as `$.field[0]`
fn render_path(trail: &[PathSegment]) -> String {
    let mut out = String::from("$");
    for segment in trail.iter().rev() {
        out.push_str(&segment.to_string());
    }
    out
}

fn serialize_trail<S: Serializer>(trail: &[PathSegment], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(trail.iter().rev())
}

/// A single located decode failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("expected {expected}, got {found} at {}", render_path(.trail))]
pub struct DecodeError {
    /// Failure category
    pub kind: ErrorKind,
    /// Expected-shape label (e.g. `"Int"`, `"Open/Close"`)
    pub expected: String,
    /// Observed-shape label, or the unmatched tag for unknown variants
    pub found: String,
    /// Location, innermost segment first so nesting only appends
    #[serde(rename = "path", serialize_with = "serialize_trail")]
    trail: Vec<PathSegment>,
}

impl DecodeError {
    /// Shape mismatch at the root
    pub fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Mismatch,
            expected: expected.into(),
            found: found.into(),
            trail: Vec::new(),
        }
    }

    /// Declared field `name` was not found; `expected` labels its shape
    pub fn missing_field(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::MissingField,
            expected: expected.into(),
            found: "nothing".to_string(),
            trail: vec![PathSegment::Field(name.into())],
        }
    }

    /// Enum tag `found` is not one of `known`
    pub fn unknown_tag(known: &[&str], found: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::UnknownTag,
            expected: known.join("/"),
            found: found.into(),
            trail: Vec::new(),
        }
    }

    /// Location from the root of the decoded value
    #[must_use]
    pub fn path(&self) -> Vec<PathSegment> {
        self.trail.iter().rev().cloned().collect()
    }

    /// Path rendered as `$.field[0]`
    #[must_use]
    pub fn location(&self) -> String {
        render_path(&self.trail)
    }
}

/// Non-empty collection of decode failures
///
/// Composite decoders merge the collections of their parts, so one
/// decode reports every problem it found.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", summarize(.errors))]
#[serde(transparent)]
pub struct DecodeErrors {
    errors: Vec<DecodeError>,
}

fn summarize(errors: &[DecodeError]) -> String {
    match errors {
        [] => "no decode errors".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

impl DecodeErrors {
    /// Collection holding exactly one error
    #[must_use]
    pub fn single(error: DecodeError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    /// Append every error of `other`, keeping order
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self
    }

    /// Prefix every error's path with `segment`
    #[must_use]
    pub fn at(mut self, segment: PathSegment) -> Self {
        for error in &mut self.errors {
            error.trail.push(segment.clone());
        }
        self
    }

    /// First error in the collection
    #[must_use]
    pub fn first(&self) -> &DecodeError {
        // The collection is never empty: every constructor starts from one error.
        &self.errors[0]
    }

    /// Iterate over all errors
    pub fn iter(&self) -> std::slice::Iter<'_, DecodeError> {
        self.errors.iter()
    }

    /// Number of errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Never true: every constructor starts from one error
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line human readable summary
    #[must_use]
    pub fn summary(&self) -> String {
        summarize(&self.errors)
    }
}

impl From<DecodeError> for DecodeErrors {
    fn from(error: DecodeError) -> Self {
        Self::single(error)
    }
}

impl<'a> IntoIterator for &'a DecodeErrors {
    type Item = &'a DecodeError;
    type IntoIter = std::slice::Iter<'a, DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Combine two partial decode results, keeping every error
///
/// Succeeds only when both sides succeeded.
pub(crate) fn both<A, B>(
    left: std::result::Result<A, DecodeErrors>,
    right: std::result::Result<B, DecodeErrors>,
) -> std::result::Result<(A, B), DecodeErrors> {
    match (left, right) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(a), Err(b)) => Err(a.merge(b)),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    }
}

/// Collect every partial result, keeping all errors
///
/// Switches to error accumulation on the first failure but still visits
/// the remaining items so their errors are reported too.
pub(crate) fn collect_all<T, I>(results: I) -> std::result::Result<Vec<T>, DecodeErrors>
where
    I: IntoIterator<Item = std::result::Result<T, DecodeErrors>>,
{
    results
        .into_iter()
        .fold(Ok(Vec::new()), |acc, next| match (acc, next) {
            (Ok(mut items), Ok(item)) => {
                items.push(item);
                Ok(items)
            }
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => Err(e),
            (Err(a), Err(b)) => Err(a.merge(b)),
        })
}

/// Failure of strict encoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The enum tag computed for an instance has no declared variant
    #[error("no variant declared for tag {tag:?} (known: {})", .known.join("/"))]
    UnknownVariant {
        /// Tag computed for the instance
        tag: String,
        /// Declared tags
        known: Vec<String>,
    },
}

/// Core error types for the convera boundary modules
#[derive(Error, Debug)]
pub enum Error {
    /// Body could not be parsed as JSON
    #[error("Malformed JSON: {reason}")]
    Syntax {
        /// Parser message
        reason: String,
    },

    /// JSON document nested deeper than allowed
    #[error("JSON nesting exceeds maximum depth of {limit}")]
    TooDeep {
        /// Configured depth limit
        limit: usize,
    },

    /// Structured value did not decode
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeErrors),

    /// Value could not be encoded strictly
    #[error("Encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Request payload too large
    #[error("Payload too large: limit={limit} bytes, received={actual} bytes")]
    PayloadTooLarge {
        /// Max allowed size
        limit: usize,
        /// Actual size
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::mismatch("Int", "String");
        assert_eq!(err.to_string(), "expected Int, got String at $");

        let err = DecodeErrors::single(DecodeError::mismatch("Int", "Null"))
            .at(PathSegment::Index(2))
            .at(PathSegment::Field("scores".into()));
        assert_eq!(err.first().location(), "$.scores[2]");
    }

    #[test]
    fn test_missing_field() {
        let err = DecodeError::missing_field("age", "Int");
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert_eq!(err.path(), vec![PathSegment::Field("age".into())]);
        assert_eq!(err.to_string(), "expected Int, got nothing at $.age");
    }

    #[test]
    fn test_unknown_tag_lists_known() {
        let err = DecodeError::unknown_tag(&["Open", "Close"], "Unknown");
        assert_eq!(err.expected, "Open/Close");
        assert_eq!(err.found, "Unknown");
    }

    #[test]
    fn test_merge_keeps_order() {
        let a = DecodeErrors::single(DecodeError::mismatch("Int", "Bool"));
        let b = DecodeErrors::single(DecodeError::mismatch("String", "Null"));
        let merged = a.merge(b);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.first().expected, "Int");
        assert_eq!(merged.summary(), "expected Int, got Bool at $ (and 1 more)");
    }

    #[test]
    fn test_both() {
        let ok: std::result::Result<i32, DecodeErrors> = Ok(1);
        let bad = || -> std::result::Result<i32, DecodeErrors> {
            Err(DecodeError::mismatch("Int", "Null").into())
        };
        assert_eq!(both(ok.clone(), ok.clone()), Ok((1, 1)));
        assert_eq!(both(bad(), ok).unwrap_err().len(), 1);
        assert_eq!(both(bad(), bad()).unwrap_err().len(), 2);
    }

    #[test]
    fn test_collect_all_visits_everything() {
        let results: Vec<std::result::Result<i32, DecodeErrors>> = vec![
            Ok(1),
            Err(DecodeError::mismatch("Int", "Null").into()),
            Ok(3),
            Err(DecodeError::mismatch("Int", "Bool").into()),
        ];
        let err = collect_all(results).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.iter().map(|e| e.found.as_str()).collect::<Vec<_>>(), vec!["Null", "Bool"]);

        let ok: Vec<std::result::Result<i32, DecodeErrors>> = vec![Ok(1), Ok(2)];
        assert_eq!(collect_all(ok), Ok(vec![1, 2]));
    }

    #[test]
    fn test_errors_serialize() {
        let errs = DecodeErrors::single(DecodeError::missing_field("age", "Int"));
        let json = serde_json::to_value(&errs).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "kind": "MISSING_FIELD",
                "expected": "Int",
                "found": "nothing",
                "path": [{"field": "age"}]
            }])
        );
    }

    #[test]
    fn test_nested_path_serializes_outermost_first() {
        let errs = DecodeErrors::single(DecodeError::mismatch("String", "Null"))
            .at(PathSegment::Field("name".into()))
            .at(PathSegment::Index(1))
            .at(PathSegment::Field("members".into()));
        let first = errs.first();
        assert_eq!(
            first.path(),
            vec![
                PathSegment::Field("members".into()),
                PathSegment::Index(1),
                PathSegment::Field("name".into()),
            ]
        );
        assert_eq!(first.location(), "$.members[1].name");
        assert_eq!(
            serde_json::to_value(first).unwrap()["path"],
            serde_json::json!([{"field": "members"}, {"index": 1}, {"field": "name"}])
        );
        assert!(!errs.is_empty());
    }

    #[test]
    fn test_payload_too_large() {
        let err = Error::PayloadTooLarge {
            limit: 10,
            actual: 20,
        };
        assert!(err.to_string().contains("limit=10"));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::UnknownVariant {
            tag: "Ajar".into(),
            known: vec!["Open".into(), "Close".into()],
        };
        assert_eq!(err.to_string(), r#"no variant declared for tag "Ajar" (known: Open/Close)"#);
    }
}
