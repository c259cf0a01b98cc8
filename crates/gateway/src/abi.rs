//! Solidity ABI calldata for the token factory

use sha3::{Digest, Keccak256};

pub const CREATE_TOKEN_SIGNATURE: &str = "createToken(string,string,uint256)";

const WORD: usize = 32;

/// First 4 bytes of keccak256 over the canonical signature
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Arguments of `createToken(string name, string symbol, uint256 k)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTokenCall {
    pub name: String,
    pub symbol: String,
    pub k: u128,
}

impl CreateTokenCall {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, k: u128) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            k,
        }
    }

    /// Raw calldata bytes: selector, head (two offsets + k), then both string tails
    pub fn encode(&self) -> Vec<u8> {
        let name_tail = encode_dynamic(self.name.as_bytes());
        let symbol_tail = encode_dynamic(self.symbol.as_bytes());

        let head_len = 3 * WORD;
        let name_offset = head_len as u128;
        let symbol_offset = (head_len + name_tail.len()) as u128;

        let mut out = Vec::with_capacity(4 + head_len + name_tail.len() + symbol_tail.len());
        out.extend_from_slice(&function_selector(CREATE_TOKEN_SIGNATURE));
        out.extend_from_slice(&encode_uint(name_offset));
        out.extend_from_slice(&encode_uint(symbol_offset));
        out.extend_from_slice(&encode_uint(self.k));
        out.extend_from_slice(&name_tail);
        out.extend_from_slice(&symbol_tail);
        out
    }

    /// 0x-prefixed hex calldata
    pub fn encode_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode()))
    }
}

/// Calldata for `createToken(name, symbol, k)`, 0x-prefixed
pub fn encode_create_token(name: &str, symbol: &str, k: u128) -> String {
    CreateTokenCall::new(name, symbol, k).encode_hex()
}

/// Big-endian uint256 word
fn encode_uint(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 16..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Length word followed by the bytes, right-padded to a word boundary
fn encode_dynamic(bytes: &[u8]) -> Vec<u8> {
    let padded_len = bytes.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded_len);
    out.extend_from_slice(&encode_uint(bytes.len() as u128));
    out.extend_from_slice(bytes);
    out.resize(WORD + padded_len, 0);
    out
}
