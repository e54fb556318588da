//! Receipt Reader — sequential receipt decoding over a shared result slot
//!
//! A result slot may carry receipts interleaved with records of other
//! types written by unrelated logic. Those are skipped. Anything that
//! cannot be framed, fails its checksum, or cannot be decoded aborts the
//! whole read: partial receipt lists are never returned.

use settlement::Receipt;
use tracing::{debug, warn};

use crate::record::{read_frame, CodecConfig, CodecError, Record};

/// Receipts recovered from a result slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedReceipts {
    pub receipts: Vec<Receipt>,
    /// Set when at least one well-formed non-receipt record was passed over.
    pub skipped: bool,
}

/// Sequential reader over an in-memory record stream.
pub struct ReceiptReader<'a> {
    data: &'a [u8],
    pos: usize,
    config: CodecConfig,
    skipped: bool,
}

impl<'a> ReceiptReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, CodecConfig::new())
    }

    pub fn with_config(data: &'a [u8], config: CodecConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            skipped: false,
        }
    }

    /// Byte offset of the next unread record.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn skipped(&self) -> bool {
        self.skipped
    }

    /// Read the next receipt, passing over records of other types.
    ///
    /// Returns `None` once the stream is exhausted.
    pub fn next_receipt(&mut self) -> Result<Option<Receipt>, CodecError> {
        while self.pos < self.data.len() {
            let (record, consumed) = read_frame(self.data, self.pos, &self.config)
                .map_err(|e| {
                    warn!(offset = self.pos, error = %e, "Receipt stream corrupt");
                    e
                })?;
            self.pos += consumed;

            if !record.is::<Receipt>() {
                debug!(offset = record.offset, tag = record.tag, "Skipping non-receipt record");
                self.skipped = true;
                continue;
            }

            let receipt = record.decode::<Receipt>().map_err(|e| {
                warn!(offset = record.offset, error = %e, "Receipt payload corrupt");
                e
            })?;
            return Ok(Some(receipt));
        }
        Ok(None)
    }

    /// Drain the stream. Any error discards every receipt read so far.
    pub fn read_all(mut self) -> Result<DecodedReceipts, CodecError> {
        let mut receipts = Vec::new();
        while let Some(receipt) = self.next_receipt()? {
            receipts.push(receipt);
        }
        debug!(count = receipts.len(), skipped = self.skipped, "Decoded receipts");
        Ok(DecodedReceipts {
            receipts,
            skipped: self.skipped,
        })
    }
}

/// Decode every receipt in a result slot.
///
/// `None` is an absent slot and is rejected; an empty slot holds no
/// receipts.
pub fn decode_receipts(data: Option<&[u8]>) -> Result<DecodedReceipts, CodecError> {
    decode_receipts_with_config(data, CodecConfig::new())
}

pub fn decode_receipts_with_config(
    data: Option<&[u8]>,
    config: CodecConfig,
) -> Result<DecodedReceipts, CodecError> {
    let data = data.ok_or(CodecError::NilInput)?;
    ReceiptReader::with_config(data, config).read_all()
}

/// Decode the first record of a stream if it is a `T`.
pub fn peek_record<T: Record>(data: &[u8]) -> Result<Option<T>, CodecError> {
    if data.is_empty() {
        return Ok(None);
    }
    let (record, _) = read_frame(data, 0, &CodecConfig::new())?;
    if record.is::<T>() {
        record.decode().map(Some)
    } else {
        Ok(None)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
