//! Decoder for PHP's `serialize()` format.
//!
//! Decodes the length-prefixed, tagged-type textual format produced by PHP's
//! built-in `serialize()` into a generic [`PhpValue`] tree, suitable for
//! in-memory inspection or re-emission as JSON via [`php_to_json`]. This is a
//! one-way decoder: there is no encoder.
//!
//! String payloads are byte-exact. The wire declares byte lengths, not
//! character counts, so payloads that are not valid UTF-8 decode losslessly
//! into raw byte buffers and only get escaped at JSON-rendering time.
//!
//! # Example
//!
//! ```rust
//! use php_pack::{decode_php_value, PhpValue};
//!
//! let value = decode_php_value(br#"a:1:{s:3:"key";i:42;}"#).unwrap();
//! if let PhpValue::Array(pairs) = &value {
//!     assert_eq!(pairs[0].1, PhpValue::Int(42));
//! }
//! ```

mod php_value;

pub mod php;

pub use php::{
    decode_json_from_php_bytes, decode_php_value, php_to_json, php_to_json_owned, PhpDecodeError,
    PhpDecoder,
};
pub use php_value::{PhpRefKind, PhpValue};

#[cfg(test)]
mod tests {
    use super::{decode_php_value, PhpDecodeError, PhpDecoder, PhpRefKind, PhpValue};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TEST_F64_3_14: f64 = 314.0 / 100.0;

    #[test]
    fn scalar_smoke() {
        assert_eq!(decode_php_value(b"N;").unwrap(), PhpValue::Null);
        assert_eq!(decode_php_value(b"b:1;").unwrap(), PhpValue::Bool(true));
        assert_eq!(decode_php_value(b"b:0;").unwrap(), PhpValue::Bool(false));
        assert_eq!(decode_php_value(b"i:42;").unwrap(), PhpValue::Int(42));
        assert_eq!(
            decode_php_value(b"d:3.14;").unwrap(),
            PhpValue::Float(TEST_F64_3_14)
        );
    }

    #[test]
    fn string_byte_length_is_authoritative() {
        // One euro sign, three UTF-8 bytes.
        let value = decode_php_value("s:3:\"€\";".as_bytes()).unwrap();
        assert_eq!(value.as_str(), Some("€"));
        // Embedded `";` does not terminate a counted payload.
        let value = decode_php_value(b"s:8:\"ab\";cd\";\";").unwrap();
        assert_eq!(value.as_bytes(), Some(b"ab\";cd\";".as_slice()));
    }

    #[test]
    fn array_pairs_in_order() {
        let value = decode_php_value(b"a:2:{i:0;s:1:\"a\";i:1;s:1:\"b\";}").unwrap();
        assert_eq!(
            value,
            PhpValue::Array(vec![
                (PhpValue::Int(0), PhpValue::Str(b"a".to_vec())),
                (PhpValue::Int(1), PhpValue::Str(b"b".to_vec())),
            ])
        );
    }

    #[test]
    fn custom_failure_is_captured_not_propagated() {
        let value = decode_php_value(b"C:4:\"Foo2\":5:{x:1;}").unwrap();
        match value {
            PhpValue::Custom { class, parsed, .. } => {
                assert_eq!(class, b"Foo2".to_vec());
                assert_eq!(
                    *parsed,
                    Err(PhpDecodeError::UnknownTag { tag: b'x', pos: 0 })
                );
            }
            other => panic!("expected Custom, got {other:?}"),
        }
    }

    #[test]
    fn references_pass_through_unresolved() {
        assert_eq!(
            decode_php_value(b"r:1;").unwrap(),
            PhpValue::Ref {
                kind: PhpRefKind::Object,
                index: 1
            }
        );
        assert_eq!(
            decode_php_value(b"R:3;").unwrap(),
            PhpValue::Ref {
                kind: PhpRefKind::Value,
                index: 3
            }
        );
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut decoder = PhpDecoder::new();
        assert_eq!(decoder.decode(b"i:42;i:43;").unwrap(), PhpValue::Int(42));
        assert_eq!(decoder.position(), 5);
    }

    // Test-only oracle encoder: builds an encoding and the tree it must
    // decode to, side by side.
    fn random_value(rng: &mut StdRng, depth: usize) -> (String, PhpValue) {
        let variants = if depth >= 3 { 5 } else { 9 };
        match rng.gen_range(0..variants) {
            0 => ("N;".to_owned(), PhpValue::Null),
            1 => {
                let b = rng.gen_bool(0.5);
                (format!("b:{};", i32::from(b)), PhpValue::Bool(b))
            }
            2 => {
                let n: i64 = rng.gen_range(-1_000_000..1_000_000);
                (format!("i:{n};"), PhpValue::Int(n))
            }
            3 => {
                let f = rng.gen_range(-1_000_000i32..1_000_000) as f64 / 1000.0;
                (format!("d:{f};"), PhpValue::Float(f))
            }
            4 => {
                let len = rng.gen_range(0..10);
                let charset = b"ab;:\"{}0 ";
                let s: String = (0..len)
                    .map(|_| charset[rng.gen_range(0..charset.len())] as char)
                    .collect();
                (
                    format!("s:{}:\"{s}\";", s.len()),
                    PhpValue::Str(s.into_bytes()),
                )
            }
            5 => {
                let index: i64 = rng.gen_range(1..100);
                let (tag, kind) = if rng.gen_bool(0.5) {
                    ('R', PhpRefKind::Value)
                } else {
                    ('r', PhpRefKind::Object)
                };
                (format!("{tag}:{index};"), PhpValue::Ref { kind, index })
            }
            6 => {
                let (inner_enc, inner_value) = random_value(rng, depth + 1);
                (
                    format!("C:3:\"Box\":{}:{{{inner_enc}}}", inner_enc.len()),
                    PhpValue::Custom {
                        class: b"Box".to_vec(),
                        data: inner_enc.into_bytes(),
                        parsed: Box::new(Ok(inner_value)),
                    },
                )
            }
            7 => {
                let count = rng.gen_range(0..3);
                let mut enc = format!("a:{count}:{{");
                let mut pairs = Vec::new();
                for i in 0..count {
                    let key = PhpValue::Int(i);
                    enc.push_str(&format!("i:{i};"));
                    let (value_enc, value) = random_value(rng, depth + 1);
                    enc.push_str(&value_enc);
                    pairs.push((key, value));
                }
                enc.push('}');
                (enc, PhpValue::Array(pairs))
            }
            _ => {
                let count = rng.gen_range(0..3);
                let mut enc = format!("O:8:\"stdClass\":{count}:{{");
                let mut fields = Vec::new();
                for i in 0..count {
                    let name = format!("p{i}");
                    enc.push_str(&format!("s:{}:\"{name}\";", name.len()));
                    let (value_enc, value) = random_value(rng, depth + 1);
                    enc.push_str(&value_enc);
                    fields.push((PhpValue::Str(name.into_bytes()), value));
                }
                enc.push('}');
                (
                    enc,
                    PhpValue::Object {
                        class: b"stdClass".to_vec(),
                        fields,
                    },
                )
            }
        }
    }

    #[test]
    fn randomized_oracle_roundtrip_matrix() {
        let mut rng = StdRng::seed_from_u64(0x9b5a_11ce);
        for _ in 0..500 {
            let (encoded, expected) = random_value(&mut rng, 0);
            let decoded = decode_php_value(encoded.as_bytes())
                .unwrap_or_else(|e| panic!("decode failed for {encoded:?}: {e}"));
            assert_eq!(decoded, expected, "mismatch for {encoded:?}");
        }
    }
}
