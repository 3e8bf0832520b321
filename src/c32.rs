//! c32check encoding
//!
//! Stacks addresses use a Crockford-style base32 alphabet with a 4-byte
//! double-SHA-256 checksum appended to the payload. Leading zero bytes are
//! kept as leading `0` digits so that payload length survives a round trip.

use crate::crypto::sha256d;
use crate::error::StacksError;

pub const C32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const CHECKSUM_LEN: usize = 4;

/// Maps one input character to its 5-bit value. Decoding is
/// case-insensitive and accepts the usual Crockford look-alikes.
fn c32_digit(c: u8) -> Option<u8> {
    let normalized = match c.to_ascii_uppercase() {
        b'O' => b'0',
        b'I' | b'L' => b'1',
        other => other,
    };
    C32_ALPHABET
        .iter()
        .position(|d| *d == normalized)
        .map(|p| p as u8)
}

pub fn c32_encode(input: &[u8]) -> String {
    let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 8 / 5 + 1);
    let mut carry: u16 = 0;
    let mut carry_bits = 0u32;

    for byte in input.iter().rev() {
        carry |= u16::from(*byte) << carry_bits;
        carry_bits += 8;
        while carry_bits >= 5 {
            digits.push(C32_ALPHABET[(carry & 0x1f) as usize]);
            carry >>= 5;
            carry_bits -= 5;
        }
    }
    if carry_bits > 0 {
        digits.push(C32_ALPHABET[(carry & 0x1f) as usize]);
    }

    while digits.last() == Some(&C32_ALPHABET[0]) {
        digits.pop();
    }
    for _ in input.iter().take_while(|b| **b == 0) {
        digits.push(C32_ALPHABET[0]);
    }

    digits.reverse();
    digits.into_iter().map(char::from).collect()
}

pub fn c32_decode(input: &str) -> Result<Vec<u8>, StacksError> {
    if !input.is_ascii() {
        return Err(StacksError::InvalidAddress(
            "c32 string must be ASCII".to_string(),
        ));
    }

    let values = input
        .bytes()
        .map(|c| {
            c32_digit(c).ok_or_else(|| {
                StacksError::InvalidAddress(format!("Invalid c32 character '{}'", char::from(c)))
            })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    let mut bytes: Vec<u8> = Vec::with_capacity(values.len() * 5 / 8 + 1);
    let mut carry: u16 = 0;
    let mut carry_bits = 0u32;

    for value in values.iter().rev() {
        carry |= u16::from(*value) << carry_bits;
        carry_bits += 5;
        if carry_bits >= 8 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
            carry_bits -= 8;
        }
    }
    if carry_bits > 0 {
        bytes.push(carry as u8);
    }

    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    for _ in values.iter().take_while(|v| **v == 0) {
        bytes.push(0);
    }

    bytes.reverse();
    Ok(bytes)
}

fn checksum(version: u8, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut data = Vec::with_capacity(payload.len() + 1);
    data.push(version);
    data.extend_from_slice(payload);
    let digest = sha256d(&data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Encodes `version` as one c32 digit followed by the c32 form of
/// `payload || checksum`.
pub fn c32check_encode(version: u8, payload: &[u8]) -> Result<String, StacksError> {
    if version >= 32 {
        return Err(StacksError::InvalidAddress(format!(
            "Version {} does not fit in one c32 digit",
            version
        )));
    }

    let mut data = payload.to_vec();
    data.extend_from_slice(&checksum(version, payload));

    let mut out = String::with_capacity(data.len() * 2);
    out.push(char::from(C32_ALPHABET[version as usize]));
    out.push_str(&c32_encode(&data));
    Ok(out)
}

pub fn c32check_decode(input: &str) -> Result<(u8, Vec<u8>), StacksError> {
    let mut chars = input.bytes();
    let version = chars
        .next()
        .and_then(c32_digit)
        .ok_or_else(|| StacksError::InvalidAddress(format!("Invalid c32check string '{}'", input)))?;

    let data = c32_decode(&input[1..])?;
    if data.len() < CHECKSUM_LEN {
        return Err(StacksError::InvalidAddress(format!(
            "c32check payload too short in '{}'",
            input
        )));
    }

    let (payload, expected) = data.split_at(data.len() - CHECKSUM_LEN);
    if checksum(version, payload) != expected {
        return Err(StacksError::InvalidAddress(format!(
            "Checksum mismatch in '{}'",
            input
        )));
    }

    Ok((version, payload.to_vec()))
}
