//! # Identifier Newtypes
//!
//! Fixed-size byte identifiers used throughout the codec: 20-byte
//! [`Address`]es, 32-byte [`TxId`]/[`AssetId`]/[`BlockchainId`]s, and the
//! 36-byte composite [`UtxoId`]. Each is its own type — a transaction ID
//! and an asset ID are both 32 bytes, but confusing one for the other is
//! exactly the kind of bug a type system is for.
//!
//! All identifiers order by raw bytes. That ordering is load-bearing:
//! the ownership descriptor's canonical address sort and the UTXO set's
//! deterministic iteration both ride on it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ADDRESS_LENGTH, ID_LENGTH};
use crate::encoding::{decode_checked, encode_checked, EncodingError};

/// Errors from constructing an identifier out of loose bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// The slice has the wrong length for the identifier type.
    #[error("invalid length for {field}: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// The identifier being constructed.
        field: &'static str,
        /// Required byte length.
        expected: usize,
        /// Actual slice length.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte address: the first 20 bytes of SHA-256 over a public key.
///
/// Addresses appear inside ownership descriptors and as keys of the UTXO
/// set's secondary index. `Display` is plain hex (cheap, log-friendly);
/// the human boundary form is the checksummed base-58 from
/// [`to_string_checked`](Self::to_string_checked).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw address bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Constructs an address from a slice, validating the length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, IdError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            slice.try_into().map_err(|_| IdError::InvalidLength {
                field: "address",
                expected: ADDRESS_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Hex form, 40 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The checksummed base-58 textual form (address family).
    pub fn to_string_checked(&self) -> String {
        encode_checked(&self.0)
    }

    /// Parses the checksummed base-58 textual form.
    ///
    /// A corrupted string fails with [`EncodingError::ChecksumMismatch`];
    /// it never decodes to a different address.
    pub fn from_string_checked(s: &str) -> Result<Self, EncodingError> {
        let bytes = decode_checked(s, ADDRESS_LENGTH, "address")?;
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", &self.to_hex()[..8])
    }
}

// ---------------------------------------------------------------------------
// 32-byte identifiers
// ---------------------------------------------------------------------------

macro_rules! define_id32 {
    ($name:ident, $field:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name([u8; ID_LENGTH]);

        impl $name {
            /// Wraps raw identifier bytes.
            pub fn from_bytes(bytes: [u8; ID_LENGTH]) -> Self {
                Self(bytes)
            }

            /// Constructs the identifier from a slice, validating the length.
            pub fn try_from_slice(slice: &[u8]) -> Result<Self, IdError> {
                let bytes: [u8; ID_LENGTH] =
                    slice.try_into().map_err(|_| IdError::InvalidLength {
                        field: $field,
                        expected: ID_LENGTH,
                        got: slice.len(),
                    })?;
                Ok(Self(bytes))
            }

            /// The all-zero identifier. Placeholder value for tests and
            /// genesis-style references.
            pub fn zero() -> Self {
                Self([0u8; ID_LENGTH])
            }

            /// The raw bytes.
            pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
                &self.0
            }

            /// Hex form, 64 characters.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// The checksummed base-58 textual form (ID family).
            pub fn to_string_checked(&self) -> String {
                encode_checked(&self.0)
            }

            /// Parses the checksummed base-58 textual form.
            pub fn from_string_checked(s: &str) -> Result<Self, EncodingError> {
                let bytes = decode_checked(s, ID_LENGTH, $field)?;
                let mut arr = [0u8; ID_LENGTH];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), &self.to_hex()[..8])
            }
        }
    };
}

define_id32!(
    TxId,
    "tx_id",
    "A 32-byte transaction identifier: SHA-256 of the transaction's unsigned bytes."
);
define_id32!(
    AssetId,
    "asset_id",
    "A 32-byte asset identifier: the ID of the transaction that created the asset."
);
define_id32!(
    BlockchainId,
    "blockchain_id",
    "A 32-byte blockchain identifier, distinguishing the platform chain from the contract chain."
);

// ---------------------------------------------------------------------------
// UtxoId
// ---------------------------------------------------------------------------

/// The canonical identity of a UTXO: originating transaction ID plus the
/// index of the output within that transaction.
///
/// Its byte form is the concatenation `tx_id ‖ output_index`, which is
/// also its sort order — so UTXOs produced by the same transaction sit
/// adjacent in any ordered iteration.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UtxoId {
    tx_id: TxId,
    output_index: u32,
}

impl UtxoId {
    /// Builds the identity of output `output_index` of transaction `tx_id`.
    pub fn new(tx_id: TxId, output_index: u32) -> Self {
        Self {
            tx_id,
            output_index,
        }
    }

    /// The originating transaction.
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// The output's position within that transaction.
    pub fn output_index(&self) -> u32 {
        self.output_index
    }

    /// The canonical byte form: `tx_id ‖ output_index`, big-endian index.
    pub fn to_bytes(&self) -> [u8; ID_LENGTH + 4] {
        let mut out = [0u8; ID_LENGTH + 4];
        out[..ID_LENGTH].copy_from_slice(self.tx_id.as_bytes());
        out[ID_LENGTH..].copy_from_slice(&self.output_index.to_be_bytes());
        out
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_id.to_hex(), self.output_index)
    }
}

impl fmt::Debug for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UtxoId({}:{})", &self.tx_id.to_hex()[..8], self.output_index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
