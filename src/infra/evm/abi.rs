//! Just enough Solidity ABI for `getProduct(bytes32)`.
//!
//! Return layout `(string name, string color, string material, uint256 price,
//! uint256 year)`: five head words (three offsets, two integers) followed by
//! the length-prefixed, zero-padded string tails.

use crate::crypto::keccak256;
use crate::domain::model::{Fingerprint, ProductAttributes};
use crate::error::LedgerError;
use primitive_types::U256;

pub const GET_PRODUCT_SIGNATURE: &str = "getProduct(bytes32)";

const WORD: usize = 32;
const HEAD_WORDS: usize = 5;

pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for `getProduct(fingerprint)`.
pub fn get_product_calldata(fingerprint: &Fingerprint) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + WORD);
    data.extend_from_slice(&selector(GET_PRODUCT_SIGNATURE));
    data.extend_from_slice(fingerprint.as_bytes());
    data
}

fn word(data: &[u8], index: usize) -> Result<&[u8], LedgerError> {
    let start = index * WORD;
    data.get(start..start + WORD)
        .ok_or_else(|| LedgerError::Decode(format!("missing word {} ({} bytes)", index, data.len())))
}

fn word_at(data: &[u8], offset: usize) -> Result<U256, LedgerError> {
    data.get(offset..offset + WORD)
        .map(U256::from_big_endian)
        .ok_or_else(|| LedgerError::Decode(format!("offset {} past end of data", offset)))
}

fn to_usize(v: U256, what: &str) -> Result<usize, LedgerError> {
    if v > U256::from(u32::MAX) {
        return Err(LedgerError::Decode(format!("{} {} is out of range", what, v)));
    }
    Ok(v.as_usize())
}

fn read_string(data: &[u8], head_index: usize, field: &str) -> Result<String, LedgerError> {
    let offset = to_usize(U256::from_big_endian(word(data, head_index)?), "string offset")?;
    let len = to_usize(word_at(data, offset)?, "string length")?;
    let start = offset + WORD;
    let bytes = data
        .get(start..start + len)
        .ok_or_else(|| LedgerError::Decode(format!("`{}` runs past end of data", field)))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|_| LedgerError::Decode(format!("`{}` is not valid UTF-8", field)))
}

fn read_uint(data: &[u8], head_index: usize, field: &str, max: u64) -> Result<u64, LedgerError> {
    let v = U256::from_big_endian(word(data, head_index)?);
    if v > U256::from(max) {
        return Err(LedgerError::Decode(format!("`{}` value {} does not fit", field, v)));
    }
    Ok(v.as_u64())
}

pub fn decode_product(data: &[u8]) -> Result<ProductAttributes, LedgerError> {
    if data.len() < HEAD_WORDS * WORD {
        return Err(LedgerError::Decode(format!(
            "expected at least {} bytes of return data, got {}",
            HEAD_WORDS * WORD,
            data.len()
        )));
    }
    Ok(ProductAttributes {
        name: read_string(data, 0, "name")?,
        color: read_string(data, 1, "color")?,
        material: read_string(data, 2, "material")?,
        price: read_uint(data, 3, "price", u64::MAX)?,
        year: read_uint(data, 4, "year", u64::from(u32::MAX))? as u32,
    })
}

fn uint_word(v: u64) -> [u8; WORD] {
    let mut w = [0u8; WORD];
    w[WORD - 8..].copy_from_slice(&v.to_be_bytes());
    w
}

/// ABI-encodes a `getProduct` return value. Mirrors [`decode_product`]; used
/// to emulate a node.
pub fn encode_product_return(attrs: &ProductAttributes) -> Vec<u8> {
    let strings = [&attrs.name, &attrs.color, &attrs.material];
    let mut head = Vec::with_capacity(HEAD_WORDS * WORD);
    let mut tail = Vec::new();
    for s in strings {
        head.extend_from_slice(&uint_word((HEAD_WORDS * WORD + tail.len()) as u64));
        tail.extend_from_slice(&uint_word(s.len() as u64));
        tail.extend_from_slice(s.as_bytes());
        let pad = (WORD - s.len() % WORD) % WORD;
        tail.extend(std::iter::repeat(0u8).take(pad));
    }
    head.extend_from_slice(&uint_word(attrs.price));
    head.extend_from_slice(&uint_word(u64::from(attrs.year)));
    head.extend_from_slice(&tail);
    head
}
