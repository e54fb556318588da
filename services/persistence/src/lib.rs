//! Persistence for the settlement core
//!
//! Encodes receipts and ledger records into self-describing byte streams,
//! recovers receipts from a shared result slot, and lays deposits and
//! orders out over an ordered key-value store.
//!
//! # Modules
//! - `varint`: LEB128 integers used for lengths and tags
//! - `record`: tagged, checksummed record framing
//! - `reader`: receipt stream decoding with skip-or-abort semantics
//! - `store`: keyed deposit and order storage

pub mod varint;
pub mod record;
pub mod reader;
pub mod store;

pub use reader::{decode_receipts, DecodedReceipts, ReceiptReader};
pub use record::{encode_receipts, CodecConfig, CodecError, Record, RecordTag};
pub use store::{KvStore, LedgerStore, MemStore, StoreError};
