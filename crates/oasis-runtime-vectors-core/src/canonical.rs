//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements the deterministic encoding used by the runtime SDK:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats, no tags
//!
//! The canonical encoding is what gets signed, so the same transaction must
//! produce identical bytes on every platform and in every implementation.

use ciborium::value::{Integer, Value};

use crate::error::CoreError;

/// Types that have a canonical CBOR representation.
pub trait ToCbor {
    /// Build the CBOR value tree for this item.
    fn to_cbor_value(&self) -> Value;
}

/// Types that can be rebuilt from a decoded CBOR value.
pub trait FromCbor: Sized {
    /// Parse the item from a CBOR value tree.
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError>;
}

/// Encode an item to canonical CBOR bytes.
pub fn encode_canonical<T: ToCbor + ?Sized>(item: &T) -> Result<Vec<u8>, CoreError> {
    encode_value_canonical(&item.to_cbor_value())
}

/// Encode a CBOR value to canonical bytes.
///
/// This function ensures:
/// - Map keys are sorted by encoded byte comparison
/// - Integers use smallest encoding
/// - Definite lengths only
pub fn encode_value_canonical(value: &Value) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    encode_value(&mut buf, value)?;
    Ok(buf)
}

/// Decode an item from CBOR bytes, rejecting trailing data.
pub fn decode_canonical<T: FromCbor>(bytes: &[u8]) -> Result<T, CoreError> {
    let value = decode_value(bytes)?;
    T::from_cbor_value(&value)
}

/// Decode raw CBOR bytes into a value tree.
pub fn decode_value(bytes: &[u8]) -> Result<Value, CoreError> {
    let mut cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(&mut cursor).map_err(|e| CoreError::Decoding(e.to_string()))?;
    if cursor.position() as usize != bytes.len() {
        return Err(CoreError::Decoding("trailing bytes after CBOR item".into()));
    }
    Ok(value)
}

/// Recursively encode a CBOR value.
fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CoreError> {
    match value {
        Value::Integer(i) => encode_integer(buf, *i)?,
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::Text(s) => encode_text(buf, s),
        Value::Array(arr) => encode_array(buf, arr)?,
        Value::Map(entries) => encode_map(buf, entries)?,
        Value::Bool(b) => buf.push(if *b { 0xf5 } else { 0xf4 }),
        Value::Null => buf.push(0xf6),
        Value::Float(_) => {
            return Err(CoreError::Encoding(
                "floats not supported in canonical encoding".into(),
            ))
        }
        _ => return Err(CoreError::Encoding("unsupported CBOR value type".into())),
    }
    Ok(())
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: Integer) -> Result<(), CoreError> {
    let n: i128 = i.into();
    if n >= 0 {
        let n = u64::try_from(n).map_err(|_| CoreError::Encoding("integer overflow".into()))?;
        encode_uint(buf, 0, n);
    } else {
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = u64::try_from(-1 - n)
            .map_err(|_| CoreError::Encoding("integer overflow".into()))?;
        encode_uint(buf, 1, abs);
    }
    Ok(())
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) -> Result<(), CoreError> {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value(buf, item)?;
    }
    Ok(())
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map(buf: &mut Vec<u8>, entries: &[(Value, Value)]) -> Result<(), CoreError> {
    let mut sorted = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key_bytes = Vec::new();
        encode_value(&mut key_bytes, k)?;
        sorted.push((key_bytes, v));
    }
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    if sorted.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(CoreError::Encoding("duplicate map key".into()));
    }

    encode_uint(buf, 5, sorted.len() as u64);
    for (key_bytes, value) in sorted {
        buf.extend_from_slice(&key_bytes);
        encode_value(buf, value)?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Value construction helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Build a map with text keys. Entry order is irrelevant, the encoder sorts.
pub(crate) fn text_map(entries: Vec<(&str, Value)>) -> Value {
    Value::Map(
        entries
            .into_iter()
            .map(|(k, v)| (Value::Text(k.to_string()), v))
            .collect(),
    )
}

pub(crate) fn uint(n: u64) -> Value {
    Value::Integer(n.into())
}

// ─────────────────────────────────────────────────────────────────────────────
// Value extraction helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only view over a CBOR map with text keys.
pub(crate) struct MapReader<'a> {
    entries: &'a [(Value, Value)],
    what: &'static str,
}

impl<'a> MapReader<'a> {
    pub(crate) fn new(value: &'a Value, what: &'static str) -> Result<Self, CoreError> {
        match value {
            Value::Map(entries) => Ok(Self { entries, what }),
            _ => Err(CoreError::Decoding(format!("{what}: expected map"))),
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.entries
            .iter()
            .find(|(k, _)| matches!(k, Value::Text(s) if s == key))
            .map(|(_, v)| v)
    }

    pub(crate) fn required(&self, key: &str) -> Result<&'a Value, CoreError> {
        self.get(key)
            .ok_or_else(|| CoreError::Decoding(format!("{}: missing field '{key}'", self.what)))
    }

    /// Reject keys not in `known`, mirroring `deny_unknown_fields`.
    pub(crate) fn deny_unknown(&self, known: &[&str]) -> Result<(), CoreError> {
        for (k, _) in self.entries {
            match k {
                Value::Text(s) if known.contains(&s.as_str()) => {}
                other => {
                    return Err(CoreError::Decoding(format!(
                        "{}: unknown field {other:?}",
                        self.what
                    )))
                }
            }
        }
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

pub(crate) fn as_bytes<'a>(value: &'a Value, what: &str) -> Result<&'a [u8], CoreError> {
    match value {
        Value::Bytes(b) => Ok(b),
        _ => Err(CoreError::Decoding(format!("{what}: expected byte string"))),
    }
}

pub(crate) fn as_text<'a>(value: &'a Value, what: &str) -> Result<&'a str, CoreError> {
    match value {
        Value::Text(s) => Ok(s),
        _ => Err(CoreError::Decoding(format!("{what}: expected text string"))),
    }
}

pub(crate) fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], CoreError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(CoreError::Decoding(format!("{what}: expected array"))),
    }
}

pub(crate) fn as_u64(value: &Value, what: &str) -> Result<u64, CoreError> {
    match value {
        Value::Integer(i) => {
            let n: i128 = (*i).into();
            u64::try_from(n)
                .map_err(|_| CoreError::Decoding(format!("{what}: integer out of range")))
        }
        _ => Err(CoreError::Decoding(format!("{what}: expected integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_encoding() {
        let mut buf = Vec::new();

        // 0-23: single byte
        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        // 24-255: two bytes
        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        // 256-65535: three bytes
        buf.clear();
        encode_uint(&mut buf, 0, 2000);
        assert_eq!(buf, vec![0x19, 0x07, 0xd0]);

        buf.clear();
        encode_uint(&mut buf, 0, u64::MAX);
        assert_eq!(buf, vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_text_keys_sorted_length_first() {
        let value = text_map(vec![
            ("call", uint(1)),
            ("v", uint(1)),
            ("ai", uint(2)),
        ]);
        let bytes = encode_value_canonical(&value).unwrap();

        // Shorter keys sort first because the length is part of the header byte.
        assert_eq!(
            bytes,
            vec![0xa3, 0x61, b'v', 0x01, 0x62, b'a', b'i', 0x02, 0x64, b'c', b'a', b'l', b'l', 0x01]
        );
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let value = text_map(vec![("a", uint(1)), ("a", uint(2))]);
        assert!(matches!(
            encode_value_canonical(&value),
            Err(CoreError::Encoding(_))
        ));
    }

    #[test]
    fn test_floats_rejected() {
        assert!(encode_value_canonical(&Value::Float(1.5)).is_err());
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert!(decode_value(&[0x01, 0x02]).is_err());
        assert!(decode_value(&[0x01]).is_ok());
    }

    #[test]
    fn test_map_reader() {
        let value = text_map(vec![("id", uint(7)), ("data", Value::Bytes(vec![1]))]);
        let map = MapReader::new(&value, "test").unwrap();
        assert_eq!(as_u64(map.required("id").unwrap(), "id").unwrap(), 7);
        assert!(map.get("tokens").is_none());
        assert!(map.deny_unknown(&["id", "data"]).is_ok());
        assert!(map.deny_unknown(&["id"]).is_err());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_map_encoding_ignores_entry_order(
                entries in proptest::collection::btree_map("[a-z_]{1,12}", any::<u64>(), 0..8),
            ) {
                let forward: Vec<(&str, Value)> =
                    entries.iter().map(|(k, v)| (k.as_str(), uint(*v))).collect();
                let backward: Vec<(&str, Value)> =
                    entries.iter().rev().map(|(k, v)| (k.as_str(), uint(*v))).collect();

                let a = encode_value_canonical(&text_map(forward)).unwrap();
                let b = encode_value_canonical(&text_map(backward)).unwrap();
                prop_assert_eq!(&a, &b);

                // ciborium decodes what we emit.
                let decoded = decode_value(&a).unwrap();
                prop_assert_eq!(encode_value_canonical(&decoded).unwrap(), a);
            }

            #[test]
            fn test_uint_encoding_is_shortest(n in any::<u64>()) {
                let bytes = encode_value_canonical(&uint(n)).unwrap();
                let expected_len = match n {
                    0..=23 => 1,
                    24..=0xff => 2,
                    0x100..=0xffff => 3,
                    0x1_0000..=0xffff_ffff => 5,
                    _ => 9,
                };
                prop_assert_eq!(bytes.len(), expected_len);
            }
        }
    }
}
