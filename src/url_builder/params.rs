//! Query parameter model and serialization
//!
//! Parameters are opaque key/value pairs kept in insertion order. Values are
//! scalars (string, number, boolean) and are stringified before encoding.
//!
//! Serialization rules:
//! - keys and values are percent-encoded; only `A-Z a-z 0-9 - _ . ~` pass
//!   through and a space becomes `%20`
//! - a key ending in `64` has its value sent as unpadded URL-safe Base64
//!   of its UTF-8 bytes instead
//! - pairs are joined with `&` in insertion order

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::fmt;

use crate::error::UrlError;

/// Suffix marking a parameter whose value is Base64 encoded
pub const BASE64_SUFFIX: &str = "64";

/// A scalar parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Infer a value from untyped text such as a command-line argument.
    ///
    /// Integers and `true`/`false` become typed values; anything else is a
    /// string. The rendered text is unchanged either way.
    pub fn infer(text: &str) -> Self {
        // Only take the integer when it prints back identically ("007", "+5" stay text)
        if let Ok(i) = text.parse::<i64>() {
            if i.to_string() == text {
                return ParamValue::Int(i);
            }
        }
        match text {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => ParamValue::Str(text.to_string()),
        }
    }

    /// Build a value from JSON, rejecting anything that is not a scalar.
    pub fn from_json(key: &str, value: serde_json::Value) -> Result<Self, UrlError> {
        use serde_json::Value;

        match value {
            Value::String(s) => Ok(ParamValue::Str(s)),
            Value::Bool(b) => Ok(ParamValue::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ParamValue::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(ParamValue::UInt(u))
                } else {
                    n.as_f64()
                        .map(ParamValue::Float)
                        .ok_or_else(|| UrlError::invalid_type(key, "number"))
                }
            }
            Value::Null => Err(UrlError::invalid_type(key, "null")),
            Value::Array(_) => Err(UrlError::invalid_type(key, "array")),
            Value::Object(_) => Err(UrlError::invalid_type(key, "object")),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::UInt(u) => write!(f, "{}", u),
            ParamValue::Float(v) if v.is_nan() => f.write_str("NaN"),
            ParamValue::Float(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            ParamValue::Float(v) => f.write_str(&format_float(*v)),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Render a finite float the way JavaScript's `Number#toString` does.
///
/// Integral values drop the decimal point (`2.0` -> `2`), `-0` prints as `0`,
/// and magnitudes at or above `1e21` or below `1e-6` use exponent notation
/// with an explicit sign (`1e+21`, `1.5e-7`).
fn format_float(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }

    let magnitude = v.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", v);
        match exp.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => exp,
        }
    } else {
        format!("{}", v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        // Go through the f32's shortest decimal form so widening adds no digits
        ParamValue::Float(v.to_string().parse().unwrap_or(v as f64))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

/// Insertion-ordered parameter list
///
/// Keys are not deduplicated; inserting the same key twice emits it twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build from a JSON object, keeping the document's key order.
    pub fn from_json_object(
        object: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, UrlError> {
        let mut params = ParameterMap::new();
        for (key, value) in object {
            let value = ParamValue::from_json(&key, value)?;
            params.entries.push((key, value));
        }
        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = ParameterMap::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Serialized `key=value&...` string, without a leading `?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString(String);

impl QueryString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a key names a Base64-variant parameter (`txt64`, `mark64`, ...)
pub fn is_base64_variant(key: &str) -> bool {
    key.ends_with(BASE64_SUFFIX)
}

/// Encode a single value according to its key.
pub fn encode_value(key: &str, value: &ParamValue) -> String {
    let text = value.to_string();
    if is_base64_variant(key) {
        // The URL-safe alphabet needs no further escaping
        URL_SAFE_NO_PAD.encode(text.as_bytes())
    } else {
        urlencoding::encode(&text).into_owned()
    }
}

/// Serialize parameters into a canonical query string.
///
/// An empty map yields an empty string.
pub fn serialize(params: &ParameterMap) -> QueryString {
    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), encode_value(key, value)))
        .collect();

    tracing::debug!(params = pairs.len(), "Serialized query parameters");

    QueryString(pairs.join("&"))
}
