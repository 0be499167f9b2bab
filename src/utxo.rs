//! # UTXO
//!
//! A [`Utxo`] is a typed reference to one consumable output produced by a
//! prior transaction: the originating transaction, the output's index,
//! the asset, and the output itself. Pure value object — it is created
//! when the remote ledger accepts a transaction and this library observes
//! the result, and it disappears from a [`UtxoSet`](crate::utxo_set)
//! once spent.
//!
//! The byte round trip is lossless and canonical: encoding what you just
//! decoded reproduces the identical bytes, output type identifier
//! re-embedded at the expected offset included.

use serde::{Deserialize, Serialize};

use crate::codec::{ByteReader, ByteWriter, CodecError};
use crate::constants::{CODEC_VERSION, ID_LENGTH};
use crate::encoding::{decode_checked_raw, encode_checked, EncodingError};
use crate::ids::{AssetId, TxId, UtxoId};
use crate::output::Output;

/// One unspent output, addressable by its [`UtxoId`].
///
/// Wire layout:
/// `codec_version(2) ‖ tx_id(32) ‖ output_index(4) ‖ asset_id(32) ‖ output`.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Utxo {
    /// The codec version the UTXO was serialized under.
    codec_version: u16,
    /// The transaction that produced this output.
    tx_id: TxId,
    /// The output's index within that transaction.
    output_index: u32,
    /// The asset the output is denominated in.
    asset_id: AssetId,
    /// The output itself.
    output: Output,
}

impl Utxo {
    /// Creates a UTXO under the current codec version.
    pub fn new(tx_id: TxId, output_index: u32, asset_id: AssetId, output: Output) -> Self {
        Self {
            codec_version: CODEC_VERSION,
            tx_id,
            output_index,
            asset_id,
            output,
        }
    }

    /// The codec version this UTXO was parsed or built under.
    pub fn codec_version(&self) -> u16 {
        self.codec_version
    }

    /// The originating transaction.
    pub fn tx_id(&self) -> &TxId {
        &self.tx_id
    }

    /// The output's index within the originating transaction.
    pub fn output_index(&self) -> u32 {
        self.output_index
    }

    /// The asset this UTXO holds.
    pub fn asset_id(&self) -> &AssetId {
        &self.asset_id
    }

    /// The wrapped output.
    pub fn output(&self) -> &Output {
        &self.output
    }

    /// The canonical identity: `tx_id ‖ output_index`.
    pub fn utxo_id(&self) -> UtxoId {
        UtxoId::new(self.tx_id, self.output_index)
    }

    /// Serializes to canonical wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_capacity(2 + ID_LENGTH + 4 + ID_LENGTH + 64);
        w.write_u16(self.codec_version);
        w.write_bytes(self.tx_id.as_bytes());
        w.write_u32(self.output_index);
        w.write_bytes(self.asset_id.as_bytes());
        self.output.write(&mut w);
        w.into_bytes()
    }

    /// Parses wire bytes, consuming the whole buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut r = ByteReader::new(bytes);
        let utxo = Self::read(&mut r)?;
        r.finish("utxo")?;
        Ok(utxo)
    }

    /// Reads a UTXO from an open reader.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, CodecError> {
        let codec_version = r.read_u16("utxo.codec_version")?;
        if codec_version != CODEC_VERSION {
            return Err(CodecError::UnsupportedCodecVersion {
                field: "utxo.codec_version",
                version: codec_version,
            });
        }
        let tx_bytes: [u8; ID_LENGTH] = r.read_array("utxo.tx_id")?;
        let output_index = r.read_u32("utxo.output_index")?;
        let asset_bytes: [u8; ID_LENGTH] = r.read_array("utxo.asset_id")?;
        let output = Output::read(r)?;
        Ok(Self {
            codec_version,
            tx_id: TxId::from_bytes(tx_bytes),
            output_index,
            asset_id: AssetId::from_bytes(asset_bytes),
            output,
        })
    }

    /// The checksummed base-58 textual form used at RPC boundaries.
    pub fn to_string_checked(&self) -> String {
        encode_checked(&self.to_bytes())
    }

    /// Parses the checksummed base-58 textual form.
    pub fn from_string_checked(s: &str) -> Result<Self, UtxoParseError> {
        let bytes = decode_checked_raw(s, "utxo")?;
        Ok(Self::from_bytes(&bytes)?)
    }
}

/// Errors from parsing a UTXO's textual form: either the checksummed
/// encoding or the inner wire bytes can object.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UtxoParseError {
    /// The textual envelope failed (base-58 or checksum).
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// The decoded bytes failed the wire codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADDRESS_LENGTH, TRANSFER_OUTPUT_TYPE_ID};
    use crate::ids::Address;
    use crate::output::TransferOutput;
    use crate::ownership::OutputOwners;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; ADDRESS_LENGTH])
    }

    fn sample() -> Utxo {
        Utxo::new(
            TxId::from_bytes([0x11; ID_LENGTH]),
            2,
            AssetId::from_bytes([0x22; ID_LENGTH]),
            Output::Transfer(TransferOutput::new(
                750,
                OutputOwners::new(100, 1, vec![addr(7)]),
            )),
        )
    }

    #[test]
    fn byte_roundtrip_is_lossless_and_canonical() {
        let utxo = sample();
        let bytes = utxo.to_bytes();
        let back = Utxo::from_bytes(&bytes).unwrap();
        assert_eq!(utxo, back);
        assert_eq!(back.to_bytes(), bytes, "re-encoding must be byte-identical");
    }

    #[test]
    fn wire_layout_offsets() {
        let bytes = sample().to_bytes();
        // codec_version(2) ‖ tx_id(32) ‖ output_index(4) ‖ asset_id(32) ‖ type_id(4) ‖ ...
        assert_eq!(&bytes[..2], &CODEC_VERSION.to_be_bytes());
        assert_eq!(&bytes[2..34], &[0x11; 32]);
        assert_eq!(&bytes[34..38], &2u32.to_be_bytes());
        assert_eq!(&bytes[38..70], &[0x22; 32]);
        // The inherited output's type identifier sits right after.
        assert_eq!(&bytes[70..74], &TRANSFER_OUTPUT_TYPE_ID.to_be_bytes());
    }

    #[test]
    fn utxo_id_concatenates_txid_and_index() {
        let utxo = sample();
        let id = utxo.utxo_id();
        assert_eq!(id.tx_id(), utxo.tx_id());
        assert_eq!(id.output_index(), 2);
    }

    #[test]
    fn unsupported_codec_version_rejected() {
        let mut bytes = sample().to_bytes();
        bytes[1] = 0x63; // version 99
        let err = Utxo::from_bytes(&bytes).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnsupportedCodecVersion {
                field: "utxo.codec_version",
                version: 99,
            }
        );
    }

    #[test]
    fn truncated_utxo_is_an_offset_error() {
        let bytes = sample().to_bytes();
        let err = Utxo::from_bytes(&bytes[..40]).unwrap_err();
        assert!(matches!(err, CodecError::Offset { .. }));
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes = sample().to_bytes();
        bytes.push(0);
        let err = Utxo::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::TrailingBytes { field: "utxo", .. }));
    }

    #[test]
    fn checked_string_roundtrip() {
        let utxo = sample();
        let s = utxo.to_string_checked();
        let back = Utxo::from_string_checked(&s).unwrap();
        assert_eq!(utxo, back);
    }

    #[test]
    fn corrupted_string_fails_checksum() {
        let s = sample().to_string_checked();
        let mut chars: Vec<char> = s.chars().collect();
        chars[5] = if chars[5] == '2' { '3' } else { '2' };
        let corrupted: String = chars.into_iter().collect();
        let err = Utxo::from_string_checked(&corrupted).unwrap_err();
        assert!(matches!(
            err,
            UtxoParseError::Encoding(EncodingError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let utxo = sample();
        let json = serde_json::to_string(&utxo).unwrap();
        let back: Utxo = serde_json::from_str(&json).unwrap();
        assert_eq!(utxo, back);
    }
}
