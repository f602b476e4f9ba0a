//! bcrypt's own base64 flavour: alphabet `./A-Za-z0-9`, no padding, length-delimited.

use crate::error::{BcryptError, Result};

// BCrypt's custom base64 alphabet
const BCRYPT_BASE64: &[u8; 64] = b"./ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Reverse lookup for the 7-bit ASCII range; `-1` marks symbols outside the alphabet.
const BASE64_INDEX: [i8; 128] = {
    let mut index = [-1i8; 128];
    let mut i = 0;
    while i < BCRYPT_BASE64.len() {
        index[BCRYPT_BASE64[i] as usize] = i as i8;
        i += 1;
    }
    index
};

fn symbol(bits: u8) -> char {
    BCRYPT_BASE64[usize::from(bits & 0x3f)] as char
}

fn index_of(byte: u8) -> Option<u8> {
    match BASE64_INDEX.get(usize::from(byte)) {
        Some(&i) if i >= 0 => Some(i as u8),
        _ => None,
    }
}

/// Encodes the first `len` bytes of `input`.
///
/// A trailing group of one or two bytes produces two or three symbols; nothing is padded.
pub fn encode(input: &[u8], len: usize) -> Result<String> {
    if len == 0 || len > input.len() {
        return Err(BcryptError::InvalidArgumentType(format!(
            "illegal base64 length {len} for {} input bytes",
            input.len()
        )));
    }

    Ok(encode_all(&input[..len]))
}

pub(crate) fn encode_all(input: &[u8]) -> String {
    let mut output = String::with_capacity((input.len() * 4).div_ceil(3));
    for chunk in input.chunks(3) {
        let b1 = u32::from(chunk[0]);
        let b2 = chunk.get(1).map(|&b| u32::from(b)).unwrap_or(0);
        let b3 = chunk.get(2).map(|&b| u32::from(b)).unwrap_or(0);

        let triple = (b1 << 16) | (b2 << 8) | b3;

        output.push(symbol((triple >> 18) as u8));
        output.push(symbol((triple >> 12) as u8));
        if chunk.len() > 1 {
            output.push(symbol((triple >> 6) as u8));
        }
        if chunk.len() > 2 {
            output.push(symbol(triple as u8));
        }
    }
    output
}

/// Decodes up to `len` bytes from `input`.
///
/// Decoding stops quietly at the first symbol outside the alphabet (or at the end of input)
/// and returns whatever was decoded so far.
pub fn decode(input: &str, len: usize) -> Result<Vec<u8>> {
    if len == 0 {
        return Err(BcryptError::InvalidArgumentType(
            "illegal base64 length 0".to_string(),
        ));
    }

    Ok(decode_bytes(input.as_bytes(), len))
}

pub(crate) fn decode_bytes(input: &[u8], len: usize) -> Vec<u8> {
    // `len` is only an upper bound; four symbols never yield more than three bytes.
    let mut output = Vec::with_capacity(len.min(input.len() / 4 * 3 + 2));
    let mut groups = input.chunks(4);

    while output.len() < len {
        let Some(group) = groups.next() else { break };
        let (Some(c1), Some(c2)) = (
            group.first().copied().and_then(index_of),
            group.get(1).copied().and_then(index_of),
        ) else {
            break;
        };
        output.push((c1 << 2) | ((c2 & 0x30) >> 4));

        if output.len() >= len {
            break;
        }
        let Some(c3) = group.get(2).copied().and_then(index_of) else {
            break;
        };
        output.push(((c2 & 0x0f) << 4) | ((c3 & 0x3c) >> 2));

        if output.len() >= len {
            break;
        }
        let Some(c4) = group.get(3).copied().and_then(index_of) else {
            break;
        };
        output.push(((c3 & 0x03) << 6) | c4);
    }
    output
}
