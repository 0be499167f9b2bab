//! Bounds-checked big-endian byte buffers.
//!
//! [`ByteWriter`] is an append-only builder over `Vec<u8>`; [`ByteReader`]
//! is a cursor over a borrowed slice that refuses to read past the end.
//! Together they are the only way bytes enter or leave the codec — no
//! module indexes into raw slices directly, so every out-of-bounds
//! condition funnels into one well-diagnosed [`CodecError::Offset`].

use super::CodecError;

// ---------------------------------------------------------------------------
// ByteWriter
// ---------------------------------------------------------------------------

/// An append-only big-endian byte writer.
///
/// Writing is infallible — the only failure mode of encoding is running
/// out of memory, and if that happens a `Result` won't save you.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a writer with pre-allocated capacity, for callers that
    /// know roughly how large the payload will be.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Appends a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Appends a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends a big-endian `u64`.
    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Appends raw bytes verbatim.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrows the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// A bounds-checked cursor over a borrowed byte slice.
///
/// Every read takes the name of the field being decoded so that a short
/// buffer produces an error a human can act on ("ran out of bytes while
/// reading `owners.addresses`, offset 52, wanted 20, remaining 3") rather
/// than a bare index panic.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader over the whole slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Current byte offset from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Takes `len` raw bytes, or fails with [`CodecError::Offset`].
    pub fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::Offset {
                field,
                offset: self.offset,
                wanted: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Takes exactly `N` bytes as a fixed-size array.
    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CodecError> {
        let slice = self.read_bytes(N, field)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, CodecError> {
        Ok(self.read_bytes(1, field)?[0])
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self, field: &'static str) -> Result<u16, CodecError> {
        Ok(u16::from_be_bytes(self.read_array::<2>(field)?))
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, CodecError> {
        Ok(u32::from_be_bytes(self.read_array::<4>(field)?))
    }

    /// Reads a big-endian `u64`.
    pub fn read_u64(&mut self, field: &'static str) -> Result<u64, CodecError> {
        Ok(u64::from_be_bytes(self.read_array::<8>(field)?))
    }

    /// Asserts the buffer is fully consumed.
    ///
    /// Call this after decoding a payload that owns the whole buffer.
    /// Trailing bytes mean the caller framed the payload wrong.
    pub fn finish(&self, field: &'static str) -> Result<(), CodecError> {
        if self.remaining() != 0 {
            return Err(CodecError::TrailingBytes {
                field,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_reader_roundtrip_integers() {
        let mut w = ByteWriter::new();
        w.write_u8(0xAB);
        w.write_u16(0x0102);
        w.write_u32(0xDEAD_BEEF);
        w.write_u64(0x0011_2233_4455_6677);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 1 + 2 + 4 + 8);

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u8("a").unwrap(), 0xAB);
        assert_eq!(r.read_u16("b").unwrap(), 0x0102);
        assert_eq!(r.read_u32("c").unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.read_u64("d").unwrap(), 0x0011_2233_4455_6677);
        assert!(r.finish("payload").is_ok());
    }

    #[test]
    fn integers_are_big_endian() {
        let mut w = ByteWriter::new();
        w.write_u32(1);
        assert_eq!(w.as_bytes(), &[0, 0, 0, 1]);

        let mut w = ByteWriter::new();
        w.write_u16(0x0A0B);
        assert_eq!(w.as_bytes(), &[0x0A, 0x0B]);
    }

    #[test]
    fn short_read_reports_offset_and_field() {
        let bytes = [1u8, 2, 3];
        let mut r = ByteReader::new(&bytes);
        r.read_u8("first").unwrap();

        let err = r.read_u32("amount").unwrap_err();
        assert_eq!(
            err,
            CodecError::Offset {
                field: "amount",
                offset: 1,
                wanted: 4,
                remaining: 2,
            }
        );
    }

    #[test]
    fn short_read_does_not_consume() {
        // A failed read must not advance the cursor — the error carries the
        // offset of the failure, not some half-consumed position.
        let bytes = [9u8, 8];
        let mut r = ByteReader::new(&bytes);
        assert!(r.read_u64("x").is_err());
        assert_eq!(r.offset(), 0);
        assert_eq!(r.read_u16("y").unwrap(), 0x0908);
    }

    #[test]
    fn read_array_exact() {
        let bytes = [1u8, 2, 3, 4, 5];
        let mut r = ByteReader::new(&bytes);
        let arr: [u8; 4] = r.read_array("head").unwrap();
        assert_eq!(arr, [1, 2, 3, 4]);
        assert_eq!(r.remaining(), 1);
    }

    #[test]
    fn finish_rejects_trailing_bytes() {
        let bytes = [0u8; 6];
        let mut r = ByteReader::new(&bytes);
        r.read_u32("head").unwrap();
        let err = r.finish("payload").unwrap_err();
        assert_eq!(
            err,
            CodecError::TrailingBytes {
                field: "payload",
                remaining: 2,
            }
        );
    }

    #[test]
    fn empty_buffer_reads_fail_cleanly() {
        let mut r = ByteReader::new(&[]);
        assert!(r.read_u8("any").is_err());
        assert!(r.finish("empty").is_ok());
    }
}
