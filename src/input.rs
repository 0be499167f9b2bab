//! # Inputs
//!
//! Amount-bearing inputs and their transferable wrapper. An input never
//! embeds the UTXO it spends — that linkage lives in
//! [`TransferableInput`], which names the prior transaction, output
//! index, and asset explicitly.
//!
//! Signature slots are positional: each [`SigIdx`] pairs the slot number
//! with the address expected to sign there, and the remote verifier
//! checks signatures positionally against the ownership descriptor's
//! address list. Only the slot number travels on the wire; the address
//! is client-side bookkeeping so the signer knows which key to use.

use serde::{Deserialize, Serialize};

use crate::codec::{ByteReader, ByteWriter, CodecError, WireType};
use crate::constants::ID_LENGTH;
use crate::ids::{Address, AssetId, TxId, UtxoId};

// ---------------------------------------------------------------------------
// SigIdx
// ---------------------------------------------------------------------------

/// A signer slot: which position in the credential, and which address is
/// expected to fill it.
///
/// Wire form is the 4-byte `index` alone. The `address` is carried in
/// memory so signing can route each slot to the right key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SigIdx {
    /// 0-based position within the ownership descriptor's address list.
    pub index: u32,
    /// The address expected to sign at this position.
    pub address: Address,
}

impl SigIdx {
    /// Pairs slot `index` with the `address` expected there.
    pub fn new(index: u32, address: Address) -> Self {
        Self { index, address }
    }
}

// ---------------------------------------------------------------------------
// TransferInput
// ---------------------------------------------------------------------------

/// An amount-consuming input.
///
/// Wire layout (after the 4-byte type identifier):
/// `amount(8) ‖ count(4) ‖ index(4)·n`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TransferInput {
    /// The full amount of the consumed output. Inputs always spend a
    /// prior output entirely; change goes back out as a new output.
    pub amount: u64,
    /// Signature slots, in the order the credential's signatures must
    /// appear.
    pub sig_indices: Vec<SigIdx>,
}

impl TransferInput {
    /// Creates an input consuming `amount` with the given signer slots.
    pub fn new(amount: u64, sig_indices: Vec<SigIdx>) -> Self {
        Self {
            amount,
            sig_indices,
        }
    }

    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u64(self.amount);
        w.write_u32(self.sig_indices.len() as u32);
        for sig_idx in &self.sig_indices {
            w.write_u32(sig_idx.index);
        }
    }

    fn read_body(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let amount = r.read_u64("transfer_input.amount")?;
        let count = r.read_u32("transfer_input.sig_index_count")? as usize;
        let mut sig_indices = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            let index = r.read_u32("transfer_input.sig_indices")?;
            // Addresses are not on the wire; decoded inputs carry the
            // zero address until a UTXO set or caller re-binds them.
            sig_indices.push(SigIdx::new(index, Address::from_bytes([0u8; 20])));
        }
        Ok(Self {
            amount,
            sig_indices,
        })
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A polymorphic input, tagged by its wire type identifier.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Input {
    /// An amount with positional signer slots.
    Transfer(TransferInput),
}

impl Input {
    /// The wire type identifier this variant serializes under.
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Transfer(_) => WireType::TransferInput,
        }
    }

    /// The consumed amount.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Self::Transfer(input) => Some(input.amount),
        }
    }

    /// The signature slots, in credential order.
    pub fn sig_indices(&self) -> &[SigIdx] {
        match self {
            Self::Transfer(input) => &input.sig_indices,
        }
    }

    /// Writes `type_id(4) ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_u32(self.wire_type().id());
        match self {
            Self::Transfer(input) => input.write_body(w),
        }
    }

    /// Reads `type_id(4) ‖ body`, dispatching through the registry.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let type_id = r.read_u32("input.type_id")?;
        match WireType::from_wire(type_id, "input.type_id")? {
            WireType::TransferInput => Ok(Self::Transfer(TransferInput::read_body(r)?)),
            other => Err(CodecError::UnknownTypeId {
                field: "input.type_id",
                type_id: other.id(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// TransferableInput
// ---------------------------------------------------------------------------

/// An input plus the exact prior output it consumes.
///
/// Wire layout: `tx_id(32) ‖ output_index(4) ‖ asset_id(32) ‖ input`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct TransferableInput {
    /// The transaction that produced the consumed output.
    pub tx_id: TxId,
    /// The output's index within that transaction.
    pub output_index: u32,
    /// The asset being consumed.
    pub asset_id: AssetId,
    /// The input itself, type identifier included on the wire.
    pub input: Input,
}

impl TransferableInput {
    /// Builds an input consuming output `output_index` of `tx_id`.
    pub fn new(tx_id: TxId, output_index: u32, asset_id: AssetId, input: Input) -> Self {
        Self {
            tx_id,
            output_index,
            asset_id,
            input,
        }
    }

    /// The identity of the UTXO this input consumes.
    pub fn utxo_id(&self) -> UtxoId {
        UtxoId::new(self.tx_id, self.output_index)
    }

    /// Writes `tx_id(32) ‖ output_index(4) ‖ asset_id(32) ‖ type_id(4) ‖ body`.
    pub fn write(&self, w: &mut ByteWriter) {
        w.write_bytes(self.tx_id.as_bytes());
        w.write_u32(self.output_index);
        w.write_bytes(self.asset_id.as_bytes());
        self.input.write(w);
    }

    /// Reads the full transferable input.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let tx_bytes: [u8; ID_LENGTH] = r.read_array("transferable_input.tx_id")?;
        let output_index = r.read_u32("transferable_input.output_index")?;
        let asset_bytes: [u8; ID_LENGTH] = r.read_array("transferable_input.asset_id")?;
        let input = Input::read(r)?;
        Ok(Self {
            tx_id: TxId::from_bytes(tx_bytes),
            output_index,
            asset_id: AssetId::from_bytes(asset_bytes),
            input,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADDRESS_LENGTH, TRANSFER_INPUT_TYPE_ID};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LENGTH])
    }

    fn sample() -> Input {
        Input::Transfer(TransferInput::new(
            500,
            vec![SigIdx::new(0, addr(1)), SigIdx::new(2, addr(3))],
        ))
    }

    fn encode(input: &Input) -> Vec<u8> {
        let mut w = ByteWriter::new();
        input.write(&mut w);
        w.into_bytes()
    }

    #[test]
    fn wire_layout() {
        let bytes = encode(&sample());
        // type_id(4) ‖ amount(8) ‖ count(4) ‖ index(4)·2
        assert_eq!(bytes.len(), 4 + 8 + 4 + 8);
        assert_eq!(&bytes[..4], &TRANSFER_INPUT_TYPE_ID.to_be_bytes());
        assert_eq!(&bytes[4..12], &500u64.to_be_bytes());
        assert_eq!(&bytes[12..16], &2u32.to_be_bytes());
        assert_eq!(&bytes[16..20], &0u32.to_be_bytes());
        assert_eq!(&bytes[20..24], &2u32.to_be_bytes());
    }

    #[test]
    fn addresses_are_not_serialized() {
        // Two inputs differing only in SigIdx addresses encode identically.
        let a = Input::Transfer(TransferInput::new(1, vec![SigIdx::new(0, addr(1))]));
        let b = Input::Transfer(TransferInput::new(1, vec![SigIdx::new(0, addr(9))]));
        assert_eq!(encode(&a), encode(&b));
    }

    #[test]
    fn input_wire_roundtrip() {
        let input = sample();
        let bytes = encode(&input);
        let mut r = ByteReader::new(&bytes);
        let back = Input::read(&mut r).unwrap();
        r.finish("input").unwrap();

        // Amounts and slot numbers survive; addresses are client-side
        // and decode as zero.
        assert_eq!(back.amount(), Some(500));
        let indices: Vec<u32> = back.sig_indices().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(encode(&back), bytes, "re-encoding must be byte-identical");
    }

    #[test]
    fn unknown_type_id_rejected() {
        let mut w = ByteWriter::new();
        w.write_u32(0xBEEF);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(
            Input::read(&mut r),
            Err(CodecError::UnknownTypeId { field: "input.type_id", .. })
        ));
    }

    #[test]
    fn output_type_id_in_input_position_rejected() {
        let mut w = ByteWriter::new();
        w.write_u32(crate::constants::TRANSFER_OUTPUT_TYPE_ID);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(Input::read(&mut r).is_err());
    }

    #[test]
    fn truncated_input_is_an_offset_error() {
        let bytes = encode(&sample());
        let mut r = ByteReader::new(&bytes[..6]);
        assert!(matches!(Input::read(&mut r), Err(CodecError::Offset { .. })));
    }

    #[test]
    fn transferable_input_roundtrip() {
        let t = TransferableInput::new(
            TxId::from_bytes([0xAA; ID_LENGTH]),
            3,
            AssetId::from_bytes([0xBB; ID_LENGTH]),
            sample(),
        );
        let mut w = ByteWriter::new();
        t.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = ByteReader::new(&bytes);
        let back = TransferableInput::read(&mut r).unwrap();
        r.finish("transferable_input").unwrap();

        assert_eq!(back.tx_id, t.tx_id);
        assert_eq!(back.output_index, 3);
        assert_eq!(back.asset_id, t.asset_id);
        assert_eq!(back.utxo_id(), UtxoId::new(t.tx_id, 3));

        let mut w2 = ByteWriter::new();
        back.write(&mut w2);
        assert_eq!(w2.into_bytes(), bytes);
    }

    #[test]
    fn empty_sig_indices_roundtrip() {
        let input = Input::Transfer(TransferInput::new(1, Vec::new()));
        let bytes = encode(&input);
        let mut r = ByteReader::new(&bytes);
        let back = Input::read(&mut r).unwrap();
        assert!(back.sig_indices().is_empty());
    }
}
