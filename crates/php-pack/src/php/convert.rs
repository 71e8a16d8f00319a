//! Conversion from [`PhpValue`] to `serde_json::Value`.
//!
//! The JSON shapes mirror what consumers of the format expect: arrays become
//! objects with stringified keys, objects become `{"class", "data"}` wrappers,
//! custom payloads surface either their re-decoded value or the captured
//! error, and reference markers become `["reference", kind, index]` triples.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde_json::{Map, Value as JsonValue};

use super::decoder::decode_php_value;
use super::error::PhpDecodeError;
use crate::{PhpRefKind, PhpValue};

/// Data URI prefix for byte payloads that are not valid UTF-8.
pub const BIN_URI_START: &str = "data:application/octet-stream;base64,";

/// Converts `&PhpValue` to `serde_json::Value`.
pub fn php_to_json(value: &PhpValue) -> JsonValue {
    php_to_json_owned(value.clone())
}

/// Converts an owned `PhpValue` to `serde_json::Value`.
pub fn php_to_json_owned(value: PhpValue) -> JsonValue {
    match value {
        PhpValue::Null => JsonValue::Null,
        PhpValue::Bool(b) => JsonValue::Bool(b),
        PhpValue::Int(n) => JsonValue::from(n),
        PhpValue::Float(f) => float_to_json(f),
        PhpValue::Str(bytes) => JsonValue::String(bytes_to_json_string(bytes)),
        PhpValue::Array(pairs) => JsonValue::Object(pairs_to_map(pairs)),
        PhpValue::Object { class, fields } => {
            let mut map = Map::new();
            map.insert(
                "class".to_owned(),
                JsonValue::String(bytes_to_json_string(class)),
            );
            map.insert("data".to_owned(), JsonValue::Object(pairs_to_map(fields)));
            JsonValue::Object(map)
        }
        PhpValue::Custom {
            class,
            data,
            parsed,
        } => {
            let mut map = Map::new();
            map.insert(
                "custom".to_owned(),
                JsonValue::String(bytes_to_json_string(class)),
            );
            map.insert(
                "data".to_owned(),
                JsonValue::String(bytes_to_json_string(data)),
            );
            match *parsed {
                Ok(inner) => map.insert("parsed".to_owned(), php_to_json_owned(inner)),
                Err(err) => map.insert("error".to_owned(), JsonValue::String(err.to_string())),
            };
            JsonValue::Object(map)
        }
        PhpValue::Ref { kind, index } => {
            let kind = match kind {
                PhpRefKind::Value => "value",
                PhpRefKind::Object => "object",
            };
            JsonValue::Array(vec![
                JsonValue::String("reference".to_owned()),
                JsonValue::String(kind.to_owned()),
                JsonValue::from(index),
            ])
        }
    }
}

/// Decodes one PHP-serialized value and renders it as JSON in a single step.
pub fn decode_json_from_php_bytes(data: &[u8]) -> Result<JsonValue, PhpDecodeError> {
    Ok(php_to_json_owned(decode_php_value(data)?))
}

fn pairs_to_map(pairs: Vec<(PhpValue, PhpValue)>) -> Map<String, JsonValue> {
    let mut map = Map::new();
    for (key, value) in pairs {
        // Duplicate keys resolve last-write-wins; insertion order is kept.
        map.insert(key_to_string(key), php_to_json_owned(value));
    }
    map
}

fn key_to_string(key: PhpValue) -> String {
    match key {
        PhpValue::Int(n) => n.to_string(),
        PhpValue::Str(bytes) => bytes_to_json_string(bytes),
        other => php_to_json_owned(other).to_string(),
    }
}

/// Non-finite doubles have no JSON number form; they render as strings.
fn float_to_json(f: f64) -> JsonValue {
    if f.is_nan() {
        return JsonValue::String("NaN".to_owned());
    }
    if f.is_infinite() {
        let text = if f.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        };
        return JsonValue::String(text.to_owned());
    }
    serde_json::Number::from_f64(f)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Byte payloads embed as text when they are valid UTF-8 and as a base64
/// data URI otherwise, so no byte sequence is lost.
fn bytes_to_json_string(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let mut out = String::from(BIN_URI_START);
            BASE64_STANDARD.encode_string(err.into_bytes(), &mut out);
            out
        }
    }
}
