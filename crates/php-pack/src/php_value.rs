//! [`PhpValue`] — generic value tree produced by the decoder.

use crate::php::PhpDecodeError;

/// Distinguishes the two back-reference tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhpRefKind {
    /// `R` — reference to the Nth previously serialized value.
    Value,
    /// `r` — reference to the Nth previously serialized object.
    Object,
}

/// A decoded PHP value.
///
/// String payloads and class names are kept as raw bytes: the wire length
/// prefix counts bytes, not characters, so payloads need not be valid UTF-8.
/// Conversion to text happens at presentation time (see [`crate::php_to_json`]).
#[derive(Debug, Clone, PartialEq)]
pub enum PhpValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Vec<u8>),
    /// Ordered key/value pairs. PHP arrays are ordered maps with
    /// heterogeneous keys; duplicates are kept as decoded.
    Array(Vec<(PhpValue, PhpValue)>),
    Object {
        class: Vec<u8>,
        fields: Vec<(PhpValue, PhpValue)>,
    },
    /// `C`-tagged payload: the raw bytes plus the outcome of re-decoding
    /// them as a fresh top-level value. A failed re-decode is carried as
    /// data, it never aborts the enclosing document.
    Custom {
        class: Vec<u8>,
        data: Vec<u8>,
        parsed: Box<Result<PhpValue, PhpDecodeError>>,
    },
    /// `R`/`r` back-reference marker. The target index is carried verbatim
    /// and never resolved against previously decoded values.
    Ref { kind: PhpRefKind, index: i64 },
}

impl PhpValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PhpValue::Null)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, PhpValue::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PhpValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PhpValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PhpValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Raw string payload bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PhpValue::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// String payload as text, when it happens to be valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::Str(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}
