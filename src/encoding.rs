//! # Checksummed Textual Encodings
//!
//! The wire format is binary; humans and JSON-RPC payloads are not. At the
//! boundary, two families of values get a textual form:
//!
//! - **Address family** — a 20-byte value plus a 4-byte checksum, base-58.
//! - **ID family** — a 32-byte value (transaction, asset, blockchain IDs)
//!   plus a 4-byte checksum, base-58.
//!
//! The two are distinguished by decoded length alone — there is no tag
//! byte. The checksum is the last [`CHECKSUM_LENGTH`] bytes of SHA-256
//! over the payload, so a single corrupted character fails loudly with
//! [`EncodingError::ChecksumMismatch`] instead of silently decoding to a
//! different address. That property is the entire reason this module
//! exists; base-58 without a checksum is just a typo amplifier.
//!
//! These helpers are invoked only at construction and serialization
//! boundaries. Nothing inside the codec or the UTXO algebra touches
//! strings.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants::CHECKSUM_LENGTH;

/// Errors from decoding a checksummed textual value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The string is not valid base-58.
    #[error("invalid base-58 in {field}: {reason}")]
    InvalidBase58 {
        /// The field being decoded.
        field: &'static str,
        /// What the base-58 decoder objected to.
        reason: String,
    },

    /// The decoded payload is too short to even contain a checksum.
    #[error("{field} too short: {len} bytes cannot hold a {CHECKSUM_LENGTH}-byte checksum")]
    TooShort {
        /// The field being decoded.
        field: &'static str,
        /// Decoded byte length.
        len: usize,
    },

    /// The trailing checksum does not match the payload.
    #[error("checksum mismatch in {field}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The field being decoded.
        field: &'static str,
        /// Hex of the checksum recomputed from the payload.
        expected: String,
        /// Hex of the checksum found in the string.
        actual: String,
    },

    /// The payload has the wrong length for the value family expected.
    #[error("wrong payload length for {field}: expected {expected} bytes, got {got}")]
    WrongLength {
        /// The field being decoded.
        field: &'static str,
        /// Expected payload length (checksum excluded).
        expected: usize,
        /// Actual payload length.
        got: usize,
    },
}

/// Computes the 4-byte checksum of a payload: the last bytes of SHA-256.
fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha256::digest(payload);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LENGTH..]);
    out
}

/// Encodes `payload ‖ checksum(payload)` as base-58.
pub fn encode_checked(payload: &[u8]) -> String {
    let mut buf = Vec::with_capacity(payload.len() + CHECKSUM_LENGTH);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&checksum(payload));
    bs58::encode(buf).into_string()
}

/// Decodes a checksummed base-58 string of any payload length.
///
/// Used for variable-length payloads (serialized UTXOs at the RPC
/// boundary). Fixed-size identifiers go through [`decode_checked`],
/// which additionally pins the length.
pub fn decode_checked_raw(s: &str, field: &'static str) -> Result<Vec<u8>, EncodingError> {
    let raw = bs58::decode(s)
        .into_vec()
        .map_err(|e| EncodingError::InvalidBase58 {
            field,
            reason: e.to_string(),
        })?;

    if raw.len() < CHECKSUM_LENGTH {
        return Err(EncodingError::TooShort {
            field,
            len: raw.len(),
        });
    }

    let (payload, actual) = raw.split_at(raw.len() - CHECKSUM_LENGTH);
    let expected = checksum(payload);
    if actual != expected {
        return Err(EncodingError::ChecksumMismatch {
            field,
            expected: hex::encode(expected),
            actual: hex::encode(actual),
        });
    }

    Ok(payload.to_vec())
}

/// Decodes a checksummed base-58 string, verifying checksum and length.
///
/// `expected_len` is the payload length (checksum excluded) — 20 for the
/// address family, 32 for the ID family. The checksum is verified before
/// the length so corruption is always reported as corruption.
pub fn decode_checked(
    s: &str,
    expected_len: usize,
    field: &'static str,
) -> Result<Vec<u8>, EncodingError> {
    let payload = decode_checked_raw(s, field)?;

    if payload.len() != expected_len {
        return Err(EncodingError::WrongLength {
            field,
            expected: expected_len,
            got: payload.len(),
        });
    }

    Ok(payload)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
