// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-width little-endian hex decoders.
//!
//! The JU-Control API transmits register contents as hex-digit strings in
//! little-endian byte order. These helpers reverse the byte pairs and parse
//! the result; every helper checks the exact input length first.

use crate::error::CodecError;

/// Length of a 32-bit counter register in hex digits.
pub const U32_HEX_LEN: usize = 8;
/// Length of a 16-bit register in hex digits.
pub const U16_HEX_LEN: usize = 4;
/// Total length of the structured regeneration register, separator included.
pub const REGENERATION_HEX_LEN: usize = 66;

/// Offset of the regeneration counter inside the post-separator payload.
const REGENERATION_OFFSET: usize = 60;

fn check_len(raw: &str, expected: usize) -> Result<(), CodecError> {
    if raw.len() == expected {
        Ok(())
    } else {
        Err(CodecError::InvalidLength {
            expected,
            actual: raw.len(),
        })
    }
}

fn check_hex(raw: &str) -> Result<(), CodecError> {
    if raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(CodecError::InvalidHex(raw.to_string()))
    }
}

/// Reassembles `raw` from its byte pairs in reverse order.
///
/// Callers must have validated that `raw` is ASCII hex of even length.
fn reverse_pairs(raw: &str) -> String {
    raw.as_bytes()
        .rchunks(2)
        .flat_map(|pair| pair.iter().map(|&b| char::from(b)))
        .collect()
}

/// Decodes an 8-digit little-endian hex string into a `u32`.
///
/// The four byte pairs `b0 b1 b2 b3` are reassembled as `b3 b2 b1 b0`.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::codec::byte_swap_reverse;
///
/// assert_eq!(byte_swap_reverse("12345678").unwrap(), 0x7856_3412);
/// assert_eq!(byte_swap_reverse("01000000").unwrap(), 1);
/// assert!(byte_swap_reverse("123456").is_err());
/// ```
///
/// # Errors
///
/// Returns `CodecError::InvalidLength` unless `raw` has exactly 8 characters,
/// and `CodecError::InvalidHex` if it contains non-hex characters.
pub fn byte_swap_reverse(raw: &str) -> Result<u32, CodecError> {
    check_len(raw, U32_HEX_LEN)?;
    check_hex(raw)?;
    u32::from_str_radix(&reverse_pairs(raw), 16).map_err(|_| CodecError::InvalidHex(raw.to_string()))
}

/// Decodes a 4-digit little-endian hex string into a `u16`.
///
/// # Examples
///
/// ```
/// use jucontrol_lib::codec::swap_u16;
///
/// assert_eq!(swap_u16("1400").unwrap(), 0x0014);
/// assert!(swap_u16("14").is_err());
/// ```
///
/// # Errors
///
/// Returns `CodecError::InvalidLength` unless `raw` has exactly 4 characters,
/// and `CodecError::InvalidHex` if it contains non-hex characters.
pub fn swap_u16(raw: &str) -> Result<u16, CodecError> {
    check_len(raw, U16_HEX_LEN)?;
    check_hex(raw)?;
    u16::from_str_radix(&reverse_pairs(raw), 16).map_err(|_| CodecError::InvalidHex(raw.to_string()))
}

/// Extracts the regeneration counter from the structured register.
///
/// The register is 66 characters long and holds a single `:`. The counter is
/// the little-endian byte pair at characters 60..64 of the payload following
/// the separator.
///
/// # Errors
///
/// Returns `CodecError::InvalidLength` for any total length other than 66,
/// `CodecError::MissingSeparator` unless exactly one `:` is present,
/// `CodecError::InvalidLength` if the separator is not the first character,
/// and `CodecError::InvalidHex` if the counter bytes are not hex digits.
pub fn regeneration_count(raw: &str) -> Result<u16, CodecError> {
    check_len(raw, REGENERATION_HEX_LEN)?;

    let separators = raw.matches(':').count();
    let Some((_, payload)) = raw.split_once(':').filter(|_| separators == 1) else {
        return Err(CodecError::MissingSeparator(separators));
    };

    check_len(payload, REGENERATION_HEX_LEN - 1)?;

    let counter = payload
        .get(REGENERATION_OFFSET..REGENERATION_OFFSET + U16_HEX_LEN)
        .ok_or_else(|| CodecError::InvalidHex(payload.to_string()))?;
    swap_u16(counter)
}
