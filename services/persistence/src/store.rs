//! Keyed ledger storage
//!
//! `KvStore` is the minimal ordered key-value contract the ledger needs.
//! `LedgerStore` lays deposits and orders out over it:
//!
//! ```text
//! deposit/<cu>/<symbol>/<hash>/<index>  -> DepositItem record
//! order/<id>                            -> Order record
//! ```
//!
//! Segments are escaped (`%` as `%25`, `/` as `%2F`), so an address
//! containing `/` can never fall under another custodian's prefix.
//!
//! Values are framed with the record codec, so a value of the wrong type
//! under a key is a decode error, never silently reinterpreted.

use custody_types::errors::ErrorKind;
use custody_types::ids::CuAddress;
use settlement::errors::{DepositError, OrderError};
use settlement::order::check_order_id;
use settlement::{DepositItem, DepositList, Order};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use crate::record::{decode_exact, encode_to_vec, CodecConfig, CodecError, Record};

const DEPOSIT_PREFIX: &str = "deposit/";
const ORDER_PREFIX: &str = "order/";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Deposit error: {0}")]
    Deposit(#[from] DepositError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Key not found: {key}")]
    NotFound { key: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Codec(e) => e.kind(),
            StoreError::Deposit(e) => e.kind(),
            StoreError::Order(e) => e.kind(),
            StoreError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}

// ── Key-Value Contract ──────────────────────────────────────────────

pub type KvPairs<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// Ordered key-value store. Prefix iteration yields keys in byte order.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&mut self, key: &[u8], value: Vec<u8>);
    fn delete(&mut self, key: &[u8]) -> bool;
    fn prefix_iter(&self, prefix: &[u8]) -> KvPairs<'_>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// In-memory ordered store.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.entries.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) -> bool {
        self.entries.remove(key).is_some()
    }

    fn has(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    fn prefix_iter(&self, prefix: &[u8]) -> KvPairs<'_> {
        let prefix = prefix.to_vec();
        Box::new(
            self.entries
                .range(prefix.clone()..)
                .take_while(move |(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }
}

// ── Ledger Store ────────────────────────────────────────────────────

fn escape_segment(segment: &str) -> String {
    segment.replace('%', "%25").replace('/', "%2F")
}

pub fn deposit_prefix(cu: &CuAddress, symbol: &str) -> String {
    format!(
        "{DEPOSIT_PREFIX}{}/{}/",
        escape_segment(cu.as_str()),
        escape_segment(symbol)
    )
}

pub fn deposit_key(cu: &CuAddress, symbol: &str, hash: &str, index: u64) -> String {
    format!("{}{}/{index}", deposit_prefix(cu, symbol), escape_segment(hash))
}

pub fn order_key(order_id: &str) -> String {
    format!("{ORDER_PREFIX}{}", escape_segment(order_id))
}

/// Typed deposit and order persistence over a `KvStore`.
pub struct LedgerStore<S: KvStore> {
    kv: S,
    config: CodecConfig,
}

impl<S: KvStore> LedgerStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            config: CodecConfig::new(),
        }
    }

    pub fn with_config(kv: S, config: CodecConfig) -> Self {
        Self { kv, config }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    fn load<T: Record>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.kv.get(key.as_bytes()) {
            Some(bytes) => Ok(Some(decode_exact(&bytes, &self.config)?)),
            None => Ok(None),
        }
    }

    fn save<T: Record>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = encode_to_vec(value)?;
        self.kv.set(key.as_bytes(), bytes);
        Ok(())
    }

    // ── Deposits ──

    /// Insert or overwrite the item at its identity key.
    pub fn set_deposit(
        &mut self,
        cu: &CuAddress,
        symbol: &str,
        item: &DepositItem,
    ) -> Result<(), StoreError> {
        if !item.is_valid() {
            return Err(DepositError::EmptyHash { position: 0 }.into());
        }
        let key = deposit_key(cu, symbol, &item.hash, item.index);
        debug!(key = %key, status = %item.status, "Store deposit item");
        self.save(&key, item)
    }

    pub fn get_deposit(
        &self,
        cu: &CuAddress,
        symbol: &str,
        hash: &str,
        index: u64,
    ) -> Result<Option<DepositItem>, StoreError> {
        self.load(&deposit_key(cu, symbol, hash, index))
    }

    pub fn delete_deposit(
        &mut self,
        cu: &CuAddress,
        symbol: &str,
        hash: &str,
        index: u64,
    ) -> Result<(), StoreError> {
        let key = deposit_key(cu, symbol, hash, index);
        if !self.kv.delete(key.as_bytes()) {
            return Err(StoreError::NotFound { key });
        }
        debug!(key = %key, "Delete deposit item");
        Ok(())
    }

    /// Every deposit of one custody unit and symbol, as a checked ledger.
    pub fn deposit_list(&self, cu: &CuAddress, symbol: &str) -> Result<DepositList, StoreError> {
        let prefix = deposit_prefix(cu, symbol);
        let items = self
            .kv
            .prefix_iter(prefix.as_bytes())
            .map(|(_, value)| decode_exact::<DepositItem>(&value, &self.config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DepositList::new(items)?)
    }

    // ── Orders ──

    /// Orders are keyed by id, so only orders with a legal id are stored.
    pub fn set_order(&mut self, order: &Order) -> Result<(), StoreError> {
        check_order_id(order.id())?;
        let key = order_key(order.id());
        debug!(key = %key, status = %order.status(), "Store order");
        self.save(&key, order)
    }

    pub fn get_order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        self.load(&order_key(order_id))
    }

    pub fn has_order(&self, order_id: &str) -> bool {
        self.kv.has(order_key(order_id).as_bytes())
    }

    /// All stored orders in key order.
    pub fn orders(&self) -> Result<Vec<Order>, StoreError> {
        self.kv
            .prefix_iter(ORDER_PREFIX.as_bytes())
            .map(|(_, value)| decode_exact::<Order>(&value, &self.config).map_err(StoreError::from))
            .collect()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use custody_types::numeric::Amount;
    use custody_types::status::DepositItemStatus;

    fn item(hash: &str, index: u64, amount: i64) -> DepositItem {
        DepositItem::new(hash, index, Amount::new(amount), "ext", Vec::new(), DepositItemStatus::UnCollected)
    }

    #[test]
    fn test_mem_store_prefix_iter_is_ordered_and_bounded() {
        let mut kv = MemStore::new();
        kv.set(b"a/2", vec![2]);
        kv.set(b"a/1", vec![1]);
        kv.set(b"b/1", vec![3]);
        kv.set(b"a", vec![0]);

        let keys: Vec<_> = kv.prefix_iter(b"a/").map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"a/1".to_vec(), b"a/2".to_vec()]);
        assert!(kv.has(b"b/1"));
        assert!(kv.delete(b"b/1"));
        assert!(!kv.delete(b"b/1"));
    }

    #[test]
    fn test_deposit_round_trip() {
        let cu = CuAddress::new("cu1");
        let mut store = LedgerStore::new(MemStore::new());
        store.set_deposit(&cu, "btc", &item("h1", 0, 100)).unwrap();

        assert_eq!(store.get_deposit(&cu, "btc", "h1", 0).unwrap(), Some(item("h1", 0, 100)));
        assert_eq!(store.get_deposit(&cu, "eth", "h1", 0).unwrap(), None);
    }

    #[test]
    fn test_deposit_list_scoped_by_symbol() {
        let cu = CuAddress::new("cu1");
        let mut store = LedgerStore::new(MemStore::new());
        store.set_deposit(&cu, "btc", &item("h1", 0, 100)).unwrap();
        store.set_deposit(&cu, "btc", &item("h1", 1, 50)).unwrap();
        store.set_deposit(&cu, "btc2", &item("h9", 0, 7)).unwrap();

        let list = store.deposit_list(&cu, "btc").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.sum().unwrap(), Amount::new(150));
    }

    #[test]
    fn test_delete_missing_deposit() {
        let cu = CuAddress::new("cu1");
        let mut store = LedgerStore::new(MemStore::new());
        let err = store.delete_deposit(&cu, "btc", "h1", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_reject_empty_hash() {
        let cu = CuAddress::new("cu1");
        let mut store = LedgerStore::new(MemStore::new());
        let err = store.set_deposit(&cu, "btc", &item("", 0, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(store.kv().is_empty());
    }

    #[test]
    fn test_wrong_typed_value_is_codec_error() {
        let cu = CuAddress::new("cu1");
        let mut kv = MemStore::new();
        let bytes = encode_to_vec(&"not a deposit".to_string()).unwrap();
        kv.set(deposit_key(&cu, "btc", "h1", 0).as_bytes(), bytes);

        let store = LedgerStore::new(kv);
        let err = store.get_deposit(&cu, "btc", "h1", 0).unwrap_err();
        assert!(matches!(err, StoreError::Codec(CodecError::UnexpectedTag { .. })));
    }

    #[test]
    fn test_slash_in_address_stays_in_its_own_prefix() {
        let mut store = LedgerStore::new(MemStore::new());
        store.set_deposit(&CuAddress::new("a/b"), "c", &item("h1", 0, 100)).unwrap();
        store.set_deposit(&CuAddress::new("a"), "b/c", &item("h2", 0, 5)).unwrap();

        assert!(store.deposit_list(&CuAddress::new("a"), "b").unwrap().is_empty());
        let list = store.deposit_list(&CuAddress::new("a/b"), "c").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].hash, "h1");
        assert_eq!(store.deposit_list(&CuAddress::new("a"), "b/c").unwrap().len(), 1);
    }

    #[test]
    fn test_escape_segment_is_unambiguous() {
        assert_eq!(escape_segment("a/b"), "a%2Fb");
        assert_eq!(escape_segment("a%2Fb"), "a%252Fb");
        assert_ne!(
            deposit_key(&CuAddress::new("a/b"), "c", "h", 0),
            deposit_key(&CuAddress::new("a"), "b/c", "h", 0)
        );
    }
}
