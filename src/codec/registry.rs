//! The polymorphic wire type registry.
//!
//! Inputs, outputs, transactions, and credentials are polymorphic on the
//! wire: a 4-byte big-endian identifier announces which concrete variant
//! follows. [`WireType`] is the total mapping from identifier to variant —
//! an explicit, exhaustive match rather than a chain of if/else casts, so
//! the compiler enforces that every registered identifier has exactly one
//! owner and anything else is rejected with a typed error.
//!
//! Pure dispatch, no side effects. Containers that hold a polymorphic
//! value keep the identifier alongside it so re-serialization reproduces
//! the original bytes exactly.

use std::fmt;

use crate::codec::CodecError;
use crate::constants::{
    BASE_TX_TYPE_ID, CREDENTIAL_TYPE_ID, TRANSFER_INPUT_TYPE_ID, TRANSFER_OUTPUT_TYPE_ID,
};

/// The concrete variants the protocol currently registers.
///
/// One variant per wire identifier. Extending the protocol means adding a
/// variant here and letting the compiler point at every match that needs
/// a new arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// The standard transaction envelope.
    BaseTx,
    /// An amount-carrying input.
    TransferInput,
    /// An amount-carrying output with an ownership descriptor.
    TransferOutput,
    /// A signature bundle attached to one input.
    Credential,
}

impl WireType {
    /// Resolves a 4-byte wire identifier to its owning variant.
    ///
    /// Total over every identifier the protocol defines; anything else
    /// fails with [`CodecError::UnknownTypeId`] naming the field being
    /// decoded. Never falls back to a default — a guessed variant parses
    /// foreign money into the wrong shape.
    pub fn from_wire(type_id: u32, field: &'static str) -> Result<Self, CodecError> {
        match type_id {
            BASE_TX_TYPE_ID => Ok(Self::BaseTx),
            TRANSFER_INPUT_TYPE_ID => Ok(Self::TransferInput),
            TRANSFER_OUTPUT_TYPE_ID => Ok(Self::TransferOutput),
            CREDENTIAL_TYPE_ID => Ok(Self::Credential),
            other => Err(CodecError::UnknownTypeId {
                field,
                type_id: other,
            }),
        }
    }

    /// The 4-byte identifier this variant writes to the wire.
    pub fn id(self) -> u32 {
        match self {
            Self::BaseTx => BASE_TX_TYPE_ID,
            Self::TransferInput => TRANSFER_INPUT_TYPE_ID,
            Self::TransferOutput => TRANSFER_OUTPUT_TYPE_ID,
            Self::Credential => CREDENTIAL_TYPE_ID,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseTx => write!(f, "BaseTx"),
            Self::TransferInput => write!(f, "TransferInput"),
            Self::TransferOutput => write!(f, "TransferOutput"),
            Self::Credential => write!(f, "Credential"),
        }
    }
}
