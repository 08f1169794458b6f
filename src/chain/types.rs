//! Chain Primitive Types
//!
//! Addresses, transaction hashes and the hex helpers shared by the ABI codec
//! and the JSON-RPC client.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 digest (the pre-standard padding used by Ethereum)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// Encode bytes as a `0x`-prefixed lowercase hex string
pub fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Decode a hex string, with or without the `0x` prefix
pub fn decode_hex(s: &str) -> Result<Vec<u8>, HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }

    let nibble = |c: u8| -> Result<u8, HexError> {
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'a'..=b'f' => Ok(c - b'a' + 10),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => Err(HexError::InvalidChar(c as char)),
        }
    };

    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| -> Result<u8, HexError> { Ok(nibble(pair[0])? << 4 | nibble(pair[1])?) })
        .collect()
}

/// Format an integer as a JSON-RPC quantity (`0x`-prefixed, no leading zeros)
pub fn encode_quantity(value: u128) -> String {
    format!("0x{:x}", value)
}

/// Parse a JSON-RPC quantity such as `0x1a`
pub fn decode_quantity(s: &str) -> Result<u128, HexError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if digits.is_empty() {
        return Ok(0);
    }

    u128::from_str_radix(digits, 16).map_err(|_| HexError::InvalidQuantity(s.to_string()))
}

/// Hex parsing errors
#[derive(Debug, Error, PartialEq)]
pub enum HexError {
    #[error("Odd number of hex digits: {0}")]
    OddLength(usize),

    #[error("Invalid hex character: {0:?}")]
    InvalidChar(char),

    #[error("Expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

// ============================================
// Address
// ============================================

/// A 20-byte account or contract address.
///
/// Equality is byte-wise, so checksum-cased and lowercase spellings of the
/// same address compare equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, HexError> {
        let array: [u8; 20] = bytes.try_into().map_err(|_| HexError::InvalidLength {
            expected: 20,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex spelling
    pub fn to_lower_hex(&self) -> String {
        encode_hex(&self.0)
    }

    /// EIP-55 mixed-case checksum spelling
    pub fn to_checksum(&self) -> String {
        let lower = hex_digits(&self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

fn hex_digits(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl FromStr for Address {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s.trim())?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

// ============================================
// Transaction hash
// ============================================

/// A 32-byte transaction hash
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s.trim())?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HexError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_hex(&self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", encode_hex(&self.0))
    }
}

// ============================================
// Amount
// ============================================

/// An on-chain integer amount in the smallest currency unit.
///
/// Serialized as a decimal string: JSON numbers lose precision past 2^53.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(pub u128);

impl Amount {
    pub fn get(&self) -> u128 {
        self.0
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serialize/deserialize through the string forms above
macro_rules! impl_string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_string_serde!(Address);
impl_string_serde!(TxHash);
impl_string_serde!(Amount);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_prefixes() {
        assert_eq!(decode_hex("0x0aff").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(decode_hex("0AFF").unwrap(), vec![0x0a, 0xff]);
        assert_eq!(encode_hex(&[0x0a, 0xff]), "0x0aff");
        assert_eq!(decode_hex("0x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_hex_errors() {
        assert_eq!(decode_hex("0xabc"), Err(HexError::OddLength(3)));
        assert_eq!(decode_hex("zz"), Err(HexError::InvalidChar('z')));
    }

    #[test]
    fn test_quantity() {
        assert_eq!(encode_quantity(0), "0x0");
        assert_eq!(encode_quantity(255), "0xff");
        assert_eq!(decode_quantity("0x1a").unwrap(), 26);
        assert_eq!(decode_quantity("0x").unwrap(), 0);
        assert!(decode_quantity("0xnope").is_err());
    }

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            encode_hex(&keccak256(b"")),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_address_checksum() {
        let vectors = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in vectors {
            let address: Address = expected.to_lowercase().parse().unwrap();
            assert_eq!(address.to_checksum(), expected);
        }
    }

    #[test]
    fn test_address_case_insensitive_equality() {
        let mixed: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let lower: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(mixed, lower);
    }

    #[test]
    fn test_address_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert_eq!(
            err,
            HexError::InvalidLength {
                expected: 20,
                actual: 2
            }
        );
    }

    #[test]
    fn test_address_serde() {
        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed\"");

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }

    #[test]
    fn test_amount_serializes_as_string() {
        let wei = Amount(1_500_000_000_000_000_000);
        let json = serde_json::to_string(&wei).unwrap();
        assert_eq!(json, "\"1500000000000000000\"");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), wei);
        assert!(serde_json::from_str::<Amount>("\"-1\"").is_err());
    }

    #[test]
    fn test_tx_hash_parse() {
        let s = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";
        let hash: TxHash = s.parse().unwrap();
        assert_eq!(hash.to_string(), s);
        assert!("0x88df".parse::<TxHash>().is_err());
    }
}
