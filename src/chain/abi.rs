//! Contract ABI Codec
//!
//! The slice of the Solidity ABI the dashboard needs: function selectors,
//! head/tail encoding of call arguments, and decoding of return data made of
//! `address`, unsigned integers, `string`, dynamic arrays and tuples.
//!
//! Integers are carried as `u128`. Every amount and timestamp the campaign
//! contracts return fits comfortably; a word with any of its upper 16 bytes
//! set is reported as [`AbiError::Overflow`] rather than silently truncated.

use thiserror::Error;

use super::types::{keccak256, Address};

const WORD: usize = 32;

/// Selector of the standard `Error(string)` revert payload
pub const REVERT_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// ABI parameter types understood by the decoder
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    Address,
    /// Any `uintN`; decoded into a `u128`
    Uint,
    String,
    Array(Box<ParamType>),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    fn is_dynamic(&self) -> bool {
        match self {
            ParamType::String | ParamType::Array(_) => true,
            ParamType::Tuple(items) => items.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Size of the inline (head) encoding of a static type
    fn head_size(&self) -> usize {
        match self {
            ParamType::Tuple(items) if !self.is_dynamic() => {
                items.iter().map(ParamType::head_size).sum()
            }
            _ => WORD,
        }
    }
}

/// A decoded or to-be-encoded ABI value
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Address(Address),
    Uint(u128),
    String(String),
    Array(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        match self {
            Token::String(_) | Token::Array(_) => true,
            Token::Tuple(items) => items.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    fn head_size(&self) -> usize {
        match self {
            Token::Tuple(items) if !self.is_dynamic() => items.iter().map(Token::head_size).sum(),
            _ => WORD,
        }
    }

    pub fn into_address(self) -> Result<Address, AbiError> {
        match self {
            Token::Address(a) => Ok(a),
            other => Err(AbiError::UnexpectedToken {
                expected: "address",
                found: other.kind(),
            }),
        }
    }

    pub fn into_uint(self) -> Result<u128, AbiError> {
        match self {
            Token::Uint(v) => Ok(v),
            other => Err(AbiError::UnexpectedToken {
                expected: "uint",
                found: other.kind(),
            }),
        }
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            Token::String(s) => Ok(s),
            other => Err(AbiError::UnexpectedToken {
                expected: "string",
                found: other.kind(),
            }),
        }
    }

    pub fn into_array(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Token::Array(items) => Ok(items),
            other => Err(AbiError::UnexpectedToken {
                expected: "array",
                found: other.kind(),
            }),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<Token>, AbiError> {
        match self {
            Token::Tuple(items) => Ok(items),
            other => Err(AbiError::UnexpectedToken {
                expected: "tuple",
                found: other.kind(),
            }),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::Tuple(_) => "tuple",
        }
    }
}

/// ABI encoding/decoding errors
#[derive(Debug, Error, PartialEq)]
pub enum AbiError {
    #[error("Return data too short: need {needed} bytes at offset {offset}, have {available}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Integer does not fit in 128 bits")]
    Overflow,

    #[error("Address word has non-zero padding")]
    InvalidAddress,

    #[error("String is not valid UTF-8")]
    InvalidUtf8,

    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Expected {expected} return values, found {found}")]
    UnexpectedArity { expected: usize, found: usize },
}

// ============================================
// Encoding
// ============================================

/// First four bytes of the keccak-256 hash of a canonical signature,
/// e.g. `addTier(string,uint256)`
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Selector followed by the encoded arguments
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend(encode(args));
    data
}

/// Encode a sequence of tokens as a tuple (head section followed by tails)
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens.iter().map(Token::head_size).sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
            tail.extend(encode_token(token));
        } else {
            head.extend(encode_token(token));
        }
    }

    head.extend(tail);
    head
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(address) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(address.as_bytes());
            word.to_vec()
        }
        Token::Uint(value) => uint_word(*value).to_vec(),
        Token::String(s) => {
            let bytes = s.as_bytes();
            let mut out = uint_word(bytes.len() as u128).to_vec();
            out.extend_from_slice(bytes);
            let padding = (WORD - bytes.len() % WORD) % WORD;
            out.extend(std::iter::repeat(0u8).take(padding));
            out
        }
        Token::Array(items) => {
            let mut out = uint_word(items.len() as u128).to_vec();
            out.extend(encode(items));
            out
        }
        Token::Tuple(items) => encode(items),
    }
}

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

// ============================================
// Decoding
// ============================================

/// Decode return data laid out as a tuple of `types`
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    decode_params(types, data, 0)
}

/// Decode return data expected to hold exactly one value
pub fn decode_single(ty: &ParamType, data: &[u8]) -> Result<Token, AbiError> {
    let mut tokens = decode(std::slice::from_ref(ty), data)?;
    match tokens.len() {
        1 => Ok(tokens.remove(0)),
        found => Err(AbiError::UnexpectedArity { expected: 1, found }),
    }
}

/// Extract the message from an `Error(string)` revert payload
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&REVERT_SELECTOR[..])?;
    decode_single(&ParamType::String, payload)
        .and_then(Token::into_string)
        .ok()
}

/// Offsets inside an enclosure are relative to its start (`base`)
fn decode_params(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut cursor = base;

    for ty in types {
        if ty.is_dynamic() {
            let offset = read_usize(data, cursor)?;
            let at = base.checked_add(offset).ok_or(AbiError::Overflow)?;
            tokens.push(decode_at(ty, data, at)?);
            cursor += WORD;
        } else {
            tokens.push(decode_at(ty, data, cursor)?);
            cursor += ty.head_size();
        }
    }

    Ok(tokens)
}

fn decode_at(ty: &ParamType, data: &[u8], at: usize) -> Result<Token, AbiError> {
    match ty {
        ParamType::Address => {
            let word = read_word(data, at)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::InvalidAddress);
            }
            Address::from_slice(&word[12..])
                .map(Token::Address)
                .map_err(|_| AbiError::InvalidAddress)
        }
        ParamType::Uint => read_u128(data, at).map(Token::Uint),
        ParamType::String => {
            let len = read_usize(data, at)?;
            let bytes = slice(data, at + WORD, len)?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|_| AbiError::InvalidUtf8)
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, at)?;
            let start = at + WORD;
            // Every element occupies at least one word of head
            let available = data.len().saturating_sub(start) / WORD;
            if len > available {
                return Err(AbiError::OutOfBounds {
                    offset: start,
                    needed: len.saturating_mul(WORD),
                    available: data.len().saturating_sub(start),
                });
            }
            let types = vec![(**inner).clone(); len];
            decode_params(&types, data, start).map(Token::Array)
        }
        ParamType::Tuple(items) => decode_params(items, data, at).map(Token::Tuple),
    }
}

fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], AbiError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(AbiError::OutOfBounds {
            offset,
            needed: len,
            available: data.len().saturating_sub(offset),
        })
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    slice(data, offset, WORD)
}

fn read_u128(data: &[u8], offset: usize) -> Result<u128, AbiError> {
    let word = read_word(data, offset)?;
    if word[..16].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow);
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

fn read_usize(data: &[u8], offset: usize) -> Result<usize, AbiError> {
    let value = read_u128(data, offset)?;
    usize::try_from(value).map_err(|_| AbiError::Overflow)
}
