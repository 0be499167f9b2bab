//! # Outputs
//!
//! Amount-bearing outputs and their transferable wrapper. The wire order
//! of [`TransferOutput`] is the one everyone gets wrong on the first try:
//! the **amount comes first**, then the inherited ownership fields —
//! amount-bearing types prepend their amount to the descriptor bytes,
//! they don't append it.

use serde::{Deserialize, Serialize};

use crate::codec::{ByteReader, ByteWriter, CodecError, WireType};
use crate::constants::ID_LENGTH;
use crate::ids::AssetId;
use crate::ownership::OutputOwners;

// ---------------------------------------------------------------------------
// TransferOutput
// ---------------------------------------------------------------------------

/// An amount transferable under an ownership descriptor.
///
/// Wire layout (after the 4-byte type identifier):
/// `amount(8) ‖ locktime(8) ‖ threshold(4) ‖ count(4) ‖ addresses(20·n)`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TransferOutput {
    /// Value transferable under this authorization, in the asset's
    /// smallest unit. Integer only — no floating point near money.
    pub amount: u64,
    /// Who may spend this output, and under what threshold/locktime.
    pub owners: OutputOwners,
}

impl TransferOutput {
    /// Creates an output of `amount` spendable by `owners`.
    pub fn new(amount: u64, owners: OutputOwners) -> Self {
        Self { amount, owners }
    }

    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u64(self.amount);
        self.owners.write(w);
    }

    fn read_body(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let amount = r.read_u64("transfer_output.amount")?;
        let owners = OutputOwners::read(r)?;
        Ok(Self { amount, owners })
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A polymorphic output, tagged by its wire type identifier.
///
/// Currently the protocol registers one output variant; new ones slot in
/// as additional arms, and the registry rejects everything else.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Output {
    /// An amount with an ownership descriptor.
    Transfer(TransferOutput),
}

impl Output {
    /// The wire type identifier this variant serializes under.
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Transfer(_) => WireType::TransferOutput,
        }
    }

    /// The carried amount. Every registered output variant carries one
    /// today; variants that don't would return `None`.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::Transfer(out) => Some(out.amount),
        }
    }

    /// The ownership descriptor embedded in this output.
    pub fn owners(&self) -> &OutputOwners {
        match self {
            Self::Transfer(out) => &out.owners,
        }
    }

    /// Writes `type_id(4) ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_u32(self.wire_type().id());
        match self {
            Self::Transfer(out) => out.write_body(w),
        }
    }

    /// Reads `type_id(4) ‖ body`, dispatching through the registry.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let type_id = r.read_u32("output.type_id")?;
        match WireType::from_wire(type_id, "output.type_id")? {
            WireType::TransferOutput => Ok(Self::Transfer(TransferOutput::read_body(r)?)),
            other => Err(CodecError::UnknownTypeId {
                field: "output.type_id",
                type_id: other.id(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TransferableOutput
// ---------------------------------------------------------------------------

/// An output bound to the asset it denominates.
///
/// Wire layout: `asset_id(32) ‖ output`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TransferableOutput {
    /// The asset this output is denominated in.
    pub asset_id: AssetId,
    /// The output itself, type identifier included on the wire.
    pub output: Output,
}

impl TransferableOutput {
    /// Binds `output` to `asset_id`.
    pub fn new(asset_id: AssetId, output: Output) -> Self {
        Self { asset_id, output }
    }

    /// Writes `asset_id(32) ‖ type_id(4) ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_bytes(self.asset_id.as_bytes());
        self.output.write(w);
    }

    /// Reads `asset_id(32) ‖ type_id(4) ‖ body`.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let bytes: [u8; ID_LENGTH] = r.read_array("transferable_output.asset_id")?;
        let asset_id = AssetId::from_bytes(bytes);
        let output = Output::read(r)?;
        Ok(Self { asset_id, output })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
