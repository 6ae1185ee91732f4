//! JSON decoding of movie list payloads with classified failures.
//!
//! # Design
//! Decoding runs in two passes. The payload is first parsed into a
//! `serde_json::Value` and walked against the known schema, which lets every
//! failure carry the exact field path where it happened. Integral floats such
//! as `1.0` are rewritten to integers during the walk. The validated value is
//! then bound to `MovieListPage` with serde. Unknown keys are never looked at,
//! so they are ignored at every level.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::types::MovieListPage;

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a JSON document, e.g. `results[1].title`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Why a payload could not be decoded into a `MovieListPage`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload was empty or contained only whitespace.
    #[error("request returned no data")]
    NoData,

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON at line {line}, column {column}: {message}")]
    Corrupted {
        line: usize,
        column: usize,
        message: String,
    },

    /// A structurally required key is absent.
    #[error("key `{key}` was not found at {path}")]
    KeyNotFound { key: String, path: FieldPath },

    /// A value has the wrong JSON type.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    /// A value is JSON `null` where one was required.
    #[error("no value found at {path}: expected {expected}")]
    ValueNotFound {
        path: FieldPath,
        expected: &'static str,
    },

    #[error("decoding failed: {message}")]
    Unknown { message: String },
}

impl DecodeError {
    /// The field path the failure refers to, if it has one.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            DecodeError::KeyNotFound { path, .. }
            | DecodeError::TypeMismatch { path, .. }
            | DecodeError::ValueNotFound { path, .. } => Some(path),
            DecodeError::NoData | DecodeError::Corrupted { .. } | DecodeError::Unknown { .. } => {
                None
            }
        }
    }

    fn from_syntax(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Syntax | serde_json::error::Category::Eof => {
                DecodeError::Corrupted {
                    line: err.line(),
                    column: err.column(),
                    message: err.to_string(),
                }
            }
            _ => DecodeError::Unknown {
                message: err.to_string(),
            },
        }
    }

    fn from_binding(err: serde_json::Error) -> Self {
        let message = err.to_string();
        match missing_field_name(&message) {
            Some(key) => DecodeError::KeyNotFound {
                key: key.to_string(),
                path: FieldPath::root(),
            },
            None => DecodeError::Unknown { message },
        }
    }
}

/// Extract `x` from serde's "missing field `x`" message.
fn missing_field_name(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// Decode a movie list payload.
///
/// Every failure is logged at `warn` with its field path before it is
/// returned.
pub fn decode_movie_list_page(payload: &[u8]) -> Result<MovieListPage, DecodeError> {
    let result = decode(payload);
    if let Err(err) = &result {
        match err.path() {
            Some(path) => warn!(path = %path, "failed to decode movie list: {err}"),
            None => warn!("failed to decode movie list: {err}"),
        }
    }
    result
}

/// True when the payload carries no content at all.
pub fn is_blank(payload: &[u8]) -> bool {
    payload.iter().all(u8::is_ascii_whitespace)
}

fn decode(payload: &[u8]) -> Result<MovieListPage, DecodeError> {
    if is_blank(payload) {
        return Err(DecodeError::NoData);
    }
    let mut value: Value = serde_json::from_slice(payload).map_err(DecodeError::from_syntax)?;
    validate_page(&mut value)?;
    serde_json::from_value(value).map_err(DecodeError::from_binding)
}

fn validate_page(value: &mut Value) -> Result<(), DecodeError> {
    let root = FieldPath::root();
    let page = match value {
        Value::Object(page) => page,
        other => return Err(mismatch(root, "object", other)),
    };

    for key in ["page", "total_results", "total_pages"] {
        normalize_integer(page, key, &root)?;
    }

    let results_path = root.key("results");
    match page.get("results") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Array(entries)) => {
            for (i, entry) in entries.iter().enumerate() {
                validate_entry(entry, &results_path.index(i))?;
            }
            Ok(())
        }
        Some(other) => Err(mismatch(results_path, "array", other)),
    }
}

fn validate_entry(value: &Value, path: &FieldPath) -> Result<(), DecodeError> {
    if value.is_null() {
        return Err(DecodeError::ValueNotFound {
            path: path.clone(),
            expected: "object",
        });
    }
    let entry = expect_object(value, path)?;
    for key in ["title", "poster_path", "overview"] {
        match entry.get(key) {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(other) => return Err(mismatch(path.key(key), "string", other)),
        }
    }
    Ok(())
}

fn expect_object<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| mismatch(path.clone(), "object", value))
}

/// Accept any integer in `i64` range, rewriting an integral float in place.
fn normalize_integer(
    object: &mut Map<String, Value>,
    key: &str,
    parent: &FieldPath,
) -> Result<(), DecodeError> {
    let Some(value) = object.get_mut(key) else {
        return Ok(());
    };
    if value.is_null() || value.is_i64() {
        return Ok(());
    }
    match value.as_f64().and_then(integral_f64) {
        Some(n) => {
            *value = Value::from(n);
            Ok(())
        }
        None => Err(mismatch(parent.key(key), "integer", value)),
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn mismatch(path: FieldPath, expected: &'static str, found: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        path,
        expected,
        found: json_kind(found),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(n) if n.is_u64() => "integer beyond 64-bit range",
        Value::Number(_) => "fractional number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
