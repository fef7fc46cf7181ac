//! Strong type definitions for runtime values.
//!
//! All identifiers and amounts are newtypes to prevent misuse at compile time.

use ciborium::value::Value;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::canonical::{as_array, as_bytes, as_u64, text_map, uint, FromCbor, MapReader, ToCbor};
use crate::error::CoreError;

/// A 32-byte runtime identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace(pub [u8; 32]);

impl Namespace {
    /// Create a new Namespace from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.to_hex())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A non-negative token amount.
///
/// Encoded in CBOR as a minimal big-endian byte string (zero is empty) and in
/// JSON as a decimal string.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(pub u128);

impl Quantity {
    /// Minimal big-endian representation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let bytes = self.0.to_be_bytes();
        let skip = bytes.iter().take_while(|&&b| b == 0).count();
        bytes[skip..].to_vec()
    }

    /// Parse a minimal big-endian representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() > 16 {
            return Err(CoreError::Decoding("quantity exceeds 128 bits".into()));
        }
        if bytes.first() == Some(&0) {
            return Err(CoreError::Decoding("quantity has leading zero bytes".into()));
        }
        let mut buf = [0u8; 16];
        buf[16 - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(u128::from_be_bytes(buf)))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Quantity {
    fn from(n: u64) -> Self {
        Self(n.into())
    }
}

impl From<u128> for Quantity {
    fn from(n: u128) -> Self {
        Self(n)
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({})", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>().map(Self).map_err(D::Error::custom)
    }
}

/// Token denomination. Opaque to this crate, carried verbatim.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denomination(pub String);

impl Denomination {
    /// Maximum length of a denomination in bytes.
    pub const MAX_LENGTH: usize = 32;

    /// The native denomination (empty string).
    pub const NATIVE: &'static str = "";

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        self.0 == Self::NATIVE
    }
}

impl From<&str> for Denomination {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Denomination({:?})", self.0)
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "<native>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// An amount in a given denomination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseUnits {
    pub amount: Quantity,
    pub denomination: Denomination,
}

impl BaseUnits {
    pub fn new(amount: impl Into<Quantity>, denomination: impl Into<Denomination>) -> Self {
        Self {
            amount: amount.into(),
            denomination: denomination.into(),
        }
    }
}

impl ToCbor for BaseUnits {
    fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::Bytes(self.amount.to_bytes()),
            Value::Bytes(self.denomination.0.as_bytes().to_vec()),
        ])
    }
}

impl FromCbor for BaseUnits {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        match as_array(value, "base units")? {
            [amount, denomination] => {
                let amount = Quantity::from_bytes(as_bytes(amount, "base units amount")?)?;
                let denomination = String::from_utf8(
                    as_bytes(denomination, "base units denomination")?.to_vec(),
                )
                .map_err(|e| CoreError::Decoding(format!("denomination: {e}")))?;
                Ok(Self {
                    amount,
                    denomination: Denomination(denomination),
                })
            }
            _ => Err(CoreError::Decoding(
                "base units: expected 2-element array".into(),
            )),
        }
    }
}

impl fmt::Display for BaseUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.denomination)
    }
}

fn is_zero_u64(n: &u64) -> bool {
    *n == 0
}

fn is_zero_u32(n: &u32) -> bool {
    *n == 0
}

/// Transaction fee.
///
/// The default value (zero amount, native denomination, no gas) is legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Amount of base units paid as fee for the transaction.
    pub amount: BaseUnits,
    /// Maximum amount of gas paid for.
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub gas: u64,
    /// Maximum amount of emitted consensus messages paid for.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub consensus_messages: u32,
}

impl Fee {
    pub fn new(amount: BaseUnits, gas: u64) -> Self {
        Self {
            amount,
            gas,
            consensus_messages: 0,
        }
    }
}

impl ToCbor for Fee {
    fn to_cbor_value(&self) -> Value {
        let mut entries = vec![("amount", self.amount.to_cbor_value())];
        if self.gas != 0 {
            entries.push(("gas", uint(self.gas)));
        }
        if self.consensus_messages != 0 {
            entries.push(("consensus_messages", uint(self.consensus_messages.into())));
        }
        text_map(entries)
    }
}

impl FromCbor for Fee {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "fee")?;
        map.deny_unknown(&["amount", "gas", "consensus_messages"])?;

        let amount = BaseUnits::from_cbor_value(map.required("amount")?)?;
        let gas = match map.get("gas") {
            Some(v) => as_u64(v, "fee gas")?,
            None => 0,
        };
        let consensus_messages = match map.get("consensus_messages") {
            Some(v) => u32::try_from(as_u64(v, "fee consensus_messages")?)
                .map_err(|_| CoreError::Decoding("consensus_messages out of range".into()))?,
            None => 0,
        };

        Ok(Self {
            amount,
            gas,
            consensus_messages,
        })
    }
}
