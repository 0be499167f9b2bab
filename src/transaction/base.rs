//! The base transaction envelope: network and chain binding, outputs,
//! inputs, and an optional memo. Construction validates the size limits
//! up front so a transaction that exists is a transaction the codec can
//! carry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::codec::{ByteReader, ByteWriter, CodecError, WireType};
use crate::constants::{
    CODEC_VERSION, ID_LENGTH, MAX_MEMO_LENGTH, MAX_TX_INPUTS, MAX_TX_OUTPUTS,
};
use crate::ids::{AssetId, BlockchainId, TxId};
use crate::input::TransferableInput;
use crate::output::TransferableOutput;

/// Errors from assembling a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// The memo exceeds the protocol limit.
    #[error("memo of {len} bytes exceeds the {max}-byte limit")]
    MemoTooLong {
        /// Bytes supplied.
        len: usize,
        /// The protocol limit.
        max: usize,
    },

    /// Too many inputs for one envelope.
    #[error("{count} inputs exceeds the limit of {max}")]
    TooManyInputs {
        /// Inputs supplied.
        count: usize,
        /// The protocol limit.
        max: usize,
    },

    /// Too many outputs for one envelope.
    #[error("{count} outputs exceeds the limit of {max}")]
    TooManyOutputs {
        /// Outputs supplied.
        count: usize,
        /// The protocol limit.
        max: usize,
    },
}

// ---------------------------------------------------------------------------
// BaseTx
// ---------------------------------------------------------------------------

/// The standard value-moving transaction.
///
/// Wire layout (inside the unsigned envelope, after codec version and
/// type identifier):
/// `network_id(4) ‖ blockchain_id(32) ‖ n_outputs(4)+outputs ‖
/// n_inputs(4)+inputs ‖ memo_len(4)+memo`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BaseTx {
    /// The network this transaction targets. Replay across networks dies
    /// here.
    network_id: u32,
    /// The chain within that network.
    blockchain_id: BlockchainId,
    /// Newly created outputs.
    outputs: Vec<TransferableOutput>,
    /// Consumed prior outputs.
    inputs: Vec<TransferableInput>,
    /// Free-form annotation, at most [`MAX_MEMO_LENGTH`] bytes. Carried
    /// verbatim, hashed into the transaction ID, never interpreted.
    memo: Vec<u8>,
}

impl BaseTx {
    /// Assembles a base transaction, enforcing the envelope limits.
    pub fn new(
        network_id: u32,
        blockchain_id: BlockchainId,
        outputs: Vec<TransferableOutput>,
        inputs: Vec<TransferableInput>,
        memo: Vec<u8>,
    ) -> Result<Self, TransactionError> {
        if memo.len() > MAX_MEMO_LENGTH {
            return Err(TransactionError::MemoTooLong {
                len: memo.len(),
                max: MAX_MEMO_LENGTH,
            });
        }
        if inputs.len() > MAX_TX_INPUTS {
            return Err(TransactionError::TooManyInputs {
                count: inputs.len(),
                max: MAX_TX_INPUTS,
            });
        }
        if outputs.len() > MAX_TX_OUTPUTS {
            return Err(TransactionError::TooManyOutputs {
                count: outputs.len(),
                max: MAX_TX_OUTPUTS,
            });
        }
        Ok(Self {
            network_id,
            blockchain_id,
            outputs,
            inputs,
            memo,
        })
    }

    /// The target network.
    pub fn network_id(&self) -> u32 {
        self.network_id
    }

    /// The target chain.
    pub fn blockchain_id(&self) -> &BlockchainId {
        &self.blockchain_id
    }

    /// The created outputs.
    pub fn outputs(&self) -> &[TransferableOutput] {
        &self.outputs
    }

    /// The consumed inputs.
    pub fn inputs(&self) -> &[TransferableInput] {
        &self.inputs
    }

    /// The memo bytes.
    pub fn memo(&self) -> &[u8] {
        &self.memo
    }

    fn write_body(&self, w: &mut ByteWriter) {
        w.write_u32(self.network_id);
        w.write_bytes(self.blockchain_id.as_bytes());
        w.write_u32(self.outputs.len() as u32);
        for output in &self.outputs {
            output.write(w);
        }
        w.write_u32(self.inputs.len() as u32);
        for input in &self.inputs {
            input.write(w);
        }
        w.write_u32(self.memo.len() as u32);
        w.write_bytes(&self.memo);
    }

    fn read_body(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let network_id = r.read_u32("base_tx.network_id")?;
        let chain_bytes: [u8; ID_LENGTH] = r.read_array("base_tx.blockchain_id")?;

        let n_outputs = r.read_u32("base_tx.output_count")? as usize;
        if n_outputs > MAX_TX_OUTPUTS {
            return Err(CodecError::FieldTooLong {
                field: "base_tx.output_count",
                len: n_outputs,
                max: MAX_TX_OUTPUTS,
            });
        }
        let mut outputs = Vec::with_capacity(n_outputs);
        for _ in 0..n_outputs {
            outputs.push(TransferableOutput::read(r)?);
        }

        let n_inputs = r.read_u32("base_tx.input_count")? as usize;
        if n_inputs > MAX_TX_INPUTS {
            return Err(CodecError::FieldTooLong {
                field: "base_tx.input_count",
                len: n_inputs,
                max: MAX_TX_INPUTS,
            });
        }
        let mut inputs = Vec::with_capacity(n_inputs);
        for _ in 0..n_inputs {
            inputs.push(TransferableInput::read(r)?);
        }

        let memo_len = r.read_u32("base_tx.memo_len")? as usize;
        if memo_len > MAX_MEMO_LENGTH {
            return Err(CodecError::FieldTooLong {
                field: "base_tx.memo_len",
                len: memo_len,
                max: MAX_MEMO_LENGTH,
            });
        }
        let memo = r.read_bytes(memo_len, "base_tx.memo")?.to_vec();

        Ok(Self {
            network_id,
            blockchain_id: BlockchainId::from_bytes(chain_bytes),
            outputs,
            inputs,
            memo,
        })
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A polymorphic unsigned transaction, tagged by its wire type identifier.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Transaction {
    /// The standard envelope.
    Base(BaseTx),
}

impl Transaction {
    /// The wire type identifier this variant serializes under.
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Base(_) => WireType::BaseTx,
        }
    }

    /// The inner base transaction.
    pub fn base(&self) -> &BaseTx {
        match self {
            Self::Base(tx) => tx,
        }
    }

    /// The canonical unsigned serialization:
    /// `codec_version(2) ‖ type_id(4) ‖ body`.
    ///
    /// This is the exact byte string that gets hashed for the
    /// transaction ID and for signing.
    pub fn unsigned_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(128);
        w.write_u16(CODEC_VERSION);
        w.write_u32(self.wire_type().id());
        match self {
            Self::Base(tx) => tx.write_body(&mut w),
        }
        w.into_bytes()
    }

    /// Parses an unsigned serialization, consuming the whole buffer.
    pub fn from_unsigned_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(bytes);
        let tx = Self::read(&mut r)?;
        r.finish("transaction")?;
        Ok(tx)
    }

    /// Reads an unsigned transaction from an open reader, leaving any
    /// trailing bytes (credentials, for a signed envelope) in place.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let version = r.read_u16("transaction.codec_version")?;
        if version != CODEC_VERSION {
            return Err(CodecError::UnsupportedCodecVersion {
                field: "transaction.codec_version",
                version,
            });
        }
        let type_id = r.read_u32("transaction.type_id")?;
        match WireType::from_wire(type_id, "transaction.type_id")? {
            WireType::BaseTx => Ok(Self::Base(BaseTx::read_body(r)?)),
            other => Err(CodecError::UnknownTypeId {
                field: "transaction.type_id",
                type_id: other.id(),
            }),
        }
    }

    /// The transaction's identity: SHA-256 over the unsigned bytes.
    ///
    /// Credentials never influence the ID, so signing does not move it.
    pub fn tx_id(&self) -> TxId {
        let digest = Sha256::digest(self.unsigned_bytes());
        let mut bytes = [0u8; ID_LENGTH];
        bytes.copy_from_slice(&digest);
        TxId::from_bytes(bytes)
    }

    /// Total consumed per asset, summed with saturation.
    pub fn input_total(&self) -> HashMap<AssetId, u64> {
        let mut totals: HashMap<AssetId, u64> = HashMap::new();
        for input in self.base().inputs() {
            let amount = input.input.amount().unwrap_or(0);
            let entry = totals.entry(input.asset_id).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        totals
    }

    /// Total created per asset, summed with saturation.
    pub fn output_total(&self) -> HashMap<AssetId, u64> {
        let mut totals: HashMap<AssetId, u64> = HashMap::new();
        for output in self.base().outputs() {
            let amount = output.output.amount().unwrap_or(0);
            let entry = totals.entry(output.asset_id).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
        totals
    }

    /// How much of `asset_id` the transaction consumes without
    /// recreating — the fee the validator collects. Saturates at zero
    /// rather than underflowing when outputs exceed inputs.
    pub fn burn(&self, asset_id: &AssetId) -> u64 {
        let consumed = self.input_total().get(asset_id).copied().unwrap_or(0);
        let created = self.output_total().get(asset_id).copied().unwrap_or(0);
        consumed.saturating_sub(created)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADDRESS_LENGTH, BASE_TX_TYPE_ID, NETWORK_ID_LOCAL};
    use crate::ids::Address;
    use crate::input::{Input, SigIdx, TransferInput};
    use crate::output::{Output, TransferOutput};
    use crate::ownership::OutputOwners;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LENGTH])
    }

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; ID_LENGTH])
    }

    fn output(amount: u64, owner: Address) -> TransferableOutput {
        TransferableOutput::new(
            asset(0xEE),
            Output::Transfer(TransferOutput::new(
                amount,
                OutputOwners::new(0, 1, vec![owner]),
            )),
        )
    }

    fn input(amount: u64, tx_byte: u8) -> TransferableInput {
        TransferableInput::new(
            TxId::from_bytes([tx_byte; ID_LENGTH]),
            0,
            asset(0xEE),
            Input::Transfer(TransferInput::new(amount, vec![SigIdx::new(0, addr(1))])),
        )
    }

    fn sample() -> Transaction {
        Transaction::Base(
            BaseTx::new(
                NETWORK_ID_LOCAL,
                BlockchainId::from_bytes([0x0C; ID_LENGTH]),
                vec![output(90, addr(2)), output(9, addr(1))],
                vec![input(100, 0xA1)],
                b"lunch".to_vec(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn unsigned_bytes_layout() {
        let bytes = sample().unsigned_bytes();
        assert_eq!(&bytes[..2], &CODEC_VERSION.to_be_bytes());
        assert_eq!(&bytes[2..6], &BASE_TX_TYPE_ID.to_be_bytes());
        assert_eq!(&bytes[6..10], &NETWORK_ID_LOCAL.to_be_bytes());
        assert_eq!(&bytes[10..42], &[0x0C; 32]);
        // Output count follows the chain ID.
        assert_eq!(&bytes[42..46], &2u32.to_be_bytes());
        // The memo rides at the very end.
        assert_eq!(&bytes[bytes.len() - 5..], b"lunch");
    }

    #[test]
    fn unsigned_roundtrip_is_byte_identical() {
        let tx = sample();
        let bytes = tx.unsigned_bytes();
        let back = Transaction::from_unsigned_bytes(&bytes).unwrap();
        assert_eq!(back.base().network_id(), NETWORK_ID_LOCAL);
        assert_eq!(back.base().outputs().len(), 2);
        assert_eq!(back.base().inputs().len(), 1);
        assert_eq!(back.base().memo(), b"lunch");
        assert_eq!(back.unsigned_bytes(), bytes);
    }

    #[test]
    fn tx_id_is_sha256_of_unsigned_bytes() {
        let tx = sample();
        let digest = Sha256::digest(tx.unsigned_bytes());
        assert_eq!(tx.tx_id().as_bytes(), digest.as_slice());
    }

    #[test]
    fn tx_id_changes_with_any_field() {
        let base = sample();
        let mut memo_differs = base.clone();
        if let Transaction::Base(ref mut tx) = memo_differs {
            tx.memo = b"dinner".to_vec();
        }
        assert_ne!(base.tx_id(), memo_differs.tx_id());
    }

    #[test]
    fn memo_limit_enforced() {
        let err = BaseTx::new(
            NETWORK_ID_LOCAL,
            BlockchainId::zero(),
            vec![],
            vec![],
            vec![0u8; MAX_MEMO_LENGTH + 1],
        )
        .unwrap_err();
        assert_eq!(
            err,
            TransactionError::MemoTooLong {
                len: MAX_MEMO_LENGTH + 1,
                max: MAX_MEMO_LENGTH,
            }
        );
        // Exactly at the limit is fine.
        assert!(BaseTx::new(
            NETWORK_ID_LOCAL,
            BlockchainId::zero(),
            vec![],
            vec![],
            vec![0u8; MAX_MEMO_LENGTH],
        )
        .is_ok());
    }

    #[test]
    fn input_and_output_limits_enforced() {
        let inputs: Vec<TransferableInput> =
            (0..=MAX_TX_INPUTS).map(|i| input(1, i as u8)).collect();
        let err = BaseTx::new(
            NETWORK_ID_LOCAL,
            BlockchainId::zero(),
            vec![],
            inputs,
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::TooManyInputs { .. }));

        let outputs: Vec<TransferableOutput> =
            (0..=MAX_TX_OUTPUTS).map(|_| output(1, addr(1))).collect();
        let err = BaseTx::new(
            NETWORK_ID_LOCAL,
            BlockchainId::zero(),
            outputs,
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::TooManyOutputs { .. }));
    }

    #[test]
    fn oversized_memo_rejected_at_decode_too() {
        // A forged length prefix must not trigger a huge allocation or a
        // silent accept.
        let tx = sample();
        let mut bytes = tx.unsigned_bytes();
        let memo_len_at = bytes.len() - 5 - 4;
        bytes[memo_len_at..memo_len_at + 4].copy_from_slice(&10_000u32.to_be_bytes());
        let err = Transaction::from_unsigned_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            CodecError::FieldTooLong { field: "base_tx.memo_len", .. }
        ));
    }

    #[test]
    fn conservation_accounting() {
        // Inputs 100, outputs 90 + 9, burn 1.
        let tx = sample();
        assert_eq!(tx.input_total().get(&asset(0xEE)), Some(&100));
        assert_eq!(tx.output_total().get(&asset(0xEE)), Some(&99));
        assert_eq!(tx.burn(&asset(0xEE)), 1);
        // Assets the transaction never touches burn nothing.
        assert_eq!(tx.burn(&asset(0x01)), 0);
    }

    #[test]
    fn burn_saturates_when_outputs_exceed_inputs() {
        // An inflationary envelope is invalid on-chain, but the local
        // accounting must not underflow while reporting it.
        let tx = Transaction::Base(
            BaseTx::new(
                NETWORK_ID_LOCAL,
                BlockchainId::zero(),
                vec![output(500, addr(1))],
                vec![input(100, 0xA1)],
                vec![],
            )
            .unwrap(),
        );
        assert_eq!(tx.burn(&asset(0xEE)), 0);
    }

    #[test]
    fn empty_memo_roundtrip() {
        let tx = Transaction::Base(
            BaseTx::new(
                NETWORK_ID_LOCAL,
                BlockchainId::zero(),
                vec![output(1, addr(1))],
                vec![input(1, 0xA1)],
                vec![],
            )
            .unwrap(),
        );
        let back = Transaction::from_unsigned_bytes(&tx.unsigned_bytes()).unwrap();
        assert!(back.base().memo().is_empty());
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample().unsigned_bytes();
        bytes.push(0xFF);
        assert!(matches!(
            Transaction::from_unsigned_bytes(&bytes),
            Err(CodecError::TrailingBytes { .. })
        ));
    }
}
