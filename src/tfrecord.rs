//! TFRecord container framing.
//!
//! Each record is framed as a little-endian u64 payload length, the masked
//! CRC-32C of those 8 length bytes, the payload, and the masked CRC-32C of
//! the payload. The mask is the one TensorFlow applies to stored CRCs.

use prost::Message;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const CRC_MASK_DELTA: u32 = 0xa282_ead8;

/// Mask a CRC-32C the way TFRecord stores it
pub fn masked_crc32c(bytes: &[u8]) -> u32 {
    let crc = crc32c::crc32c(bytes);
    ((crc >> 15) | (crc << 17)).wrapping_add(CRC_MASK_DELTA)
}

/// Writer producing a TFRecord file from serialized payloads
pub struct RecordWriter<W: Write> {
    inner: W,
    records_written: u64,
}

impl RecordWriter<BufWriter<File>> {
    /// Create a TFRecord file at the given path, truncating any existing file
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    /// Append one framed record
    pub fn write_record(&mut self, payload: &[u8]) -> io::Result<()> {
        let length = (payload.len() as u64).to_le_bytes();
        self.inner.write_all(&length)?;
        self.inner.write_all(&masked_crc32c(&length).to_le_bytes())?;
        self.inner.write_all(payload)?;
        self.inner
            .write_all(&masked_crc32c(payload).to_le_bytes())?;
        self.records_written += 1;
        Ok(())
    }

    /// Encode a protobuf message and append it as one record
    pub fn write_message(&mut self, message: &impl Message) -> io::Result<()> {
        self.write_record(&message.encode_to_vec())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Read every record payload from a TFRecord file, verifying both checksums
pub fn read_records(path: &Path) -> io::Result<Vec<Vec<u8>>> {
    let bytes = std::fs::read(path)?;
    let mut records = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let header = take(&bytes, &mut offset, 12)?;
        let length = u64::from_le_bytes(header[..8].try_into().unwrap()) as usize;
        let length_crc = u32::from_le_bytes(header[8..12].try_into().unwrap());
        if masked_crc32c(&header[..8]) != length_crc {
            return Err(corrupt(path, "length checksum mismatch"));
        }

        let payload = take(&bytes, &mut offset, length)?;
        let payload_crc =
            u32::from_le_bytes(take(&bytes, &mut offset, 4)?.try_into().unwrap());
        if masked_crc32c(payload) != payload_crc {
            return Err(corrupt(path, "payload checksum mismatch"));
        }
        records.push(payload.to_vec());
    }

    Ok(records)
}

fn take<'a>(bytes: &'a [u8], offset: &mut usize, len: usize) -> io::Result<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "truncated TFRecord file")
        })?;
    let slice = &bytes[*offset..end];
    *offset = end;
    Ok(slice)
}

fn corrupt(path: &Path, what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{} in {}", what, path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_crc_of_empty_input() {
        // crc32c of the empty string is 0, so only the mask delta remains
        assert_eq!(masked_crc32c(b""), CRC_MASK_DELTA);
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("records.tfrecord");

        let mut writer = RecordWriter::create(&path).unwrap();
        writer.write_record(b"first").unwrap();
        writer.write_record(b"").unwrap();
        writer.write_record(b"third record").unwrap();
        assert_eq!(writer.records_written(), 3);
        writer.flush().unwrap();
        drop(writer);

        let records = read_records(&path).unwrap();
        assert_eq!(
            records,
            vec![b"first".to_vec(), Vec::new(), b"third record".to_vec()]
        );
    }

    #[test]
    fn test_read_rejects_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("records.tfrecord");

        let mut writer = RecordWriter::create(&path).unwrap();
        writer.write_record(b"payload under test").unwrap();
        writer.flush().unwrap();
        drop(writer);

        let mut bytes = std::fs::read(&path).unwrap();
        bytes[14] ^= 0xFF; // flip a payload byte
        std::fs::write(&path, &bytes).unwrap();

        let err = read_records(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_rejects_truncation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("records.tfrecord");

        let mut writer = RecordWriter::create(&path).unwrap();
        writer.write_record(b"payload under test").unwrap();
        writer.flush().unwrap();
        drop(writer);

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 6]).unwrap();

        let err = read_records(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
