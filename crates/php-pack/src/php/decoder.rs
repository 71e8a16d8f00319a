//! Recursive-descent decoder for PHP's `serialize()` output.

use super::constants::{PhpTag, MAX_NESTING_DEPTH};
use super::error::PhpDecodeError;
use crate::{PhpRefKind, PhpValue};

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

/// Preallocation cap for pair vectors; the element count comes from the wire.
const PAIRS_PREALLOC_CAP: usize = 1024;

/// PHP serialize decoder.
///
/// Wraps a byte buffer with a cursor and decodes exactly one value per
/// [`decode`](PhpDecoder::decode) call. Bytes after the first complete value
/// are left unread; [`position`](PhpDecoder::position) reports the consumed
/// prefix. The decoder holds no state across calls beyond its configuration,
/// so decoding the same buffer twice yields structurally equal trees.
pub struct PhpDecoder {
    data: Vec<u8>,
    x: usize,
    depth: usize,
    /// Nesting depth cap for arrays, objects and nested custom payloads.
    pub max_depth: usize,
}

impl Default for PhpDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhpDecoder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            x: 0,
            depth: 0,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Decodes one top-level value from `data`.
    ///
    /// Trailing bytes are informational, never an error.
    pub fn decode(&mut self, data: &[u8]) -> Result<PhpValue, PhpDecodeError> {
        self.data = data.to_vec();
        self.x = 0;
        self.depth = 0;
        #[cfg(feature = "tracing")]
        debug!(data_len = self.data.len(), "decoding php value");
        self.read_any()
    }

    /// Number of bytes consumed by the last [`decode`](PhpDecoder::decode) call.
    pub fn position(&self) -> usize {
        self.x
    }

    fn read_any(&mut self) -> Result<PhpValue, PhpDecodeError> {
        if self.depth > self.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, "nesting depth cap hit");
            return Err(PhpDecodeError::TooDeep(self.x));
        }
        let pos = self.x;
        let tag = self.u8()?;
        // Tag selection consumes the tag byte plus its `:`/`;` separator.
        self.skip(1);
        match tag {
            PhpTag::INT => self.read_int(),
            PhpTag::BOOL => self.read_bool(),
            PhpTag::FLOAT => self.read_float(),
            PhpTag::NULL => Ok(PhpValue::Null),
            PhpTag::STR => self.read_str(),
            PhpTag::ARR => self.read_arr(),
            PhpTag::OBJ => self.read_obj(),
            PhpTag::CUSTOM => self.read_custom(),
            PhpTag::REF_VALUE => self.read_ref(PhpRefKind::Value),
            PhpTag::REF_OBJECT => self.read_ref(PhpRefKind::Object),
            _ => Err(PhpDecodeError::UnknownTag { tag, pos }),
        }
    }

    fn read_int(&mut self) -> Result<PhpValue, PhpDecodeError> {
        Ok(PhpValue::Int(self.int_payload()?))
    }

    fn read_bool(&mut self) -> Result<PhpValue, PhpDecodeError> {
        let payload = self.until(b';')?;
        // serialize() emits `0` or `1`; anything that is not `1` reads false.
        Ok(PhpValue::Bool(payload == b"1"))
    }

    fn read_float(&mut self) -> Result<PhpValue, PhpDecodeError> {
        let pos = self.x;
        let payload = self.until(b';')?;
        let text =
            std::str::from_utf8(&payload).map_err(|_| PhpDecodeError::MalformedNumber(pos))?;
        // serialize() spells the IEEE specials in upper case.
        let value = match text {
            "NAN" => f64::NAN,
            "INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            _ => text
                .parse::<f64>()
                .map_err(|_| PhpDecodeError::MalformedNumber(pos))?,
        };
        Ok(PhpValue::Float(value))
    }

    fn read_str(&mut self) -> Result<PhpValue, PhpDecodeError> {
        let len = self.length()?;
        self.skip(1); // opening quote
        let bytes = self.take(len)?;
        self.skip(2); // `";`
        Ok(PhpValue::Str(bytes))
    }

    fn read_arr(&mut self) -> Result<PhpValue, PhpDecodeError> {
        let count = self.length()?;
        self.skip(1); // `{`
        let pairs = self.read_pairs(count)?;
        self.skip(1); // `}`
        Ok(PhpValue::Array(pairs))
    }

    fn read_obj(&mut self) -> Result<PhpValue, PhpDecodeError> {
        let class = self.class_name()?;
        let count = self.length()?;
        self.skip(1); // `{`
        let fields = self.read_pairs(count)?;
        self.skip(1); // `}`
        Ok(PhpValue::Object { class, fields })
    }

    fn read_custom(&mut self) -> Result<PhpValue, PhpDecodeError> {
        let class = self.class_name()?;
        let len = self.length()?;
        self.skip(1); // `{`
        let data = self.take(len)?;
        self.skip(1); // `}`
        let parsed = self.decode_nested(&data);
        #[cfg(feature = "tracing")]
        if let Err(err) = &parsed {
            debug!(%err, "custom payload did not re-decode");
        }
        Ok(PhpValue::Custom {
            class,
            data,
            parsed: Box::new(parsed),
        })
    }

    fn read_ref(&mut self, kind: PhpRefKind) -> Result<PhpValue, PhpDecodeError> {
        let index = self.int_payload()?;
        Ok(PhpValue::Ref { kind, index })
    }

    /// Re-decodes a `C` payload as a fresh top-level value. The sub-decoder
    /// continues at the current depth so stacked custom payloads cannot
    /// bypass the nesting cap.
    fn decode_nested(&self, data: &[u8]) -> Result<PhpValue, PhpDecodeError> {
        let mut sub = PhpDecoder {
            data: data.to_vec(),
            x: 0,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        };
        sub.read_any()
    }

    fn read_pairs(&mut self, count: usize) -> Result<Vec<(PhpValue, PhpValue)>, PhpDecodeError> {
        self.depth += 1;
        let mut pairs = Vec::with_capacity(count.min(PAIRS_PREALLOC_CAP));
        for _ in 0..count {
            let key = self.read_any()?;
            let value = self.read_any()?;
            pairs.push((key, value));
        }
        self.depth -= 1;
        Ok(pairs)
    }

    /// Reads a `<namelen>:"<name>":` class-name field.
    fn class_name(&mut self) -> Result<Vec<u8>, PhpDecodeError> {
        let len = self.length()?;
        self.skip(1); // opening quote
        let name = self.take(len)?;
        self.skip(2); // `":`
        Ok(name)
    }

    /// Reads a `;`-terminated signed integer payload.
    fn int_payload(&mut self) -> Result<i64, PhpDecodeError> {
        let pos = self.x;
        let payload = self.until(b';')?;
        std::str::from_utf8(&payload)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(PhpDecodeError::MalformedNumber(pos))
    }

    /// Reads a `:`-terminated non-negative length field.
    fn length(&mut self) -> Result<usize, PhpDecodeError> {
        let pos = self.x;
        let field = self.until(b':')?;
        std::str::from_utf8(&field)
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or(PhpDecodeError::MalformedLength(pos))
    }

    fn u8(&mut self) -> Result<u8, PhpDecodeError> {
        let byte = *self
            .data
            .get(self.x)
            .ok_or(PhpDecodeError::Truncated(self.x))?;
        self.x += 1;
        Ok(byte)
    }

    /// Advances past structural delimiter bytes. Length prefixes are
    /// authoritative, so delimiters are not inspected; the skip clamps at
    /// end of input.
    fn skip(&mut self, n: usize) {
        self.x = (self.x + n).min(self.data.len());
    }

    /// Copies exactly `n` payload bytes. `n` comes from the wire, so the
    /// bound check must not overflow.
    fn take(&mut self, n: usize) -> Result<Vec<u8>, PhpDecodeError> {
        let end = self
            .x
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(PhpDecodeError::Truncated(self.x))?;
        let bytes = self.data[self.x..end].to_vec();
        self.x = end;
        Ok(bytes)
    }

    /// Copies bytes up to `delim` and consumes the delimiter as well.
    fn until(&mut self, delim: u8) -> Result<Vec<u8>, PhpDecodeError> {
        match self.data[self.x..].iter().position(|&b| b == delim) {
            Some(offset) => {
                let bytes = self.data[self.x..self.x + offset].to_vec();
                self.x += offset + 1;
                Ok(bytes)
            }
            None => Err(PhpDecodeError::Truncated(self.data.len())),
        }
    }
}

/// Decodes one PHP-serialized value from `data`.
pub fn decode_php_value(data: &[u8]) -> Result<PhpValue, PhpDecodeError> {
    let mut decoder = PhpDecoder::new();
    decoder.decode(data)
}
