//! Deposit ledger: per-output deposit records keyed by `(hash, index)`
//!
//! A `DepositList` never holds two items with the same identity key. Items
//! are created on first sighting of an external output, advance their
//! status in place, and are removed once collected.

use custody_types::numeric::Amount;
use custody_types::status::DepositItemStatus;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::errors::DepositError;

/// One deposited external-chain output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositItem {
    pub hash: String,
    pub index: u64,
    pub amount: Amount,
    pub ext_address: String,
    pub memo: Vec<u8>,
    pub status: DepositItemStatus,
}

impl DepositItem {
    pub fn new(
        hash: impl Into<String>,
        index: u64,
        amount: Amount,
        ext_address: impl Into<String>,
        memo: Vec<u8>,
        status: DepositItemStatus,
    ) -> Self {
        Self {
            hash: hash.into(),
            index,
            amount,
            ext_address: ext_address.into(),
            memo,
            status,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.hash.is_empty()
    }

    pub fn same_key(&self, hash: &str, index: u64) -> bool {
        self.hash == hash && self.index == index
    }

    /// Legacy ordering key: hash followed by the decimal digits of index.
    ///
    /// Persisted orderings depend on this exact form; ("h1", 11) and
    /// ("h11", 1) share a key.
    pub fn sort_key(&self) -> String {
        format!("{}{}", self.hash, self.index)
    }

    fn cmp_identity(&self, other: &Self) -> Ordering {
        self.hash
            .cmp(&other.hash)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Ordered collection of deposit items with unique `(hash, index)` keys.
///
/// Decoding re-runs `new`, so a stored list with duplicate keys fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DepositItem>", into = "Vec<DepositItem>")]
pub struct DepositList(Vec<DepositItem>);

impl DepositList {
    /// Build a list, rejecting invalid items and duplicate keys.
    ///
    /// Duplicates are found by sorting a copy by `(hash, index)`; the
    /// reported position is in that sorted order, not input order.
    pub fn new(items: Vec<DepositItem>) -> Result<Self, DepositError> {
        if let Some(position) = items.iter().position(|item| !item.is_valid()) {
            return Err(DepositError::EmptyHash { position });
        }

        let mut sorted: Vec<&DepositItem> = items.iter().collect();
        sorted.sort_by(|a, b| a.cmp_identity(b));
        for (position, pair) in sorted.windows(2).enumerate() {
            if pair[0].same_key(&pair[1].hash, pair[1].index) {
                warn!(
                    hash = %pair[1].hash,
                    index = pair[1].index,
                    "Duplicated deposit item in new list"
                );
                return Err(DepositError::Duplicated {
                    hash: pair[1].hash.clone(),
                    index: pair[1].index,
                    position: position + 1,
                });
            }
        }

        Ok(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepositItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[DepositItem] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<DepositItem> {
        self.0
    }

    /// Look up by identity key, returning the position and the item.
    pub fn get_deposit_item(&self, hash: &str, index: u64) -> Option<(usize, &DepositItem)> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, item)| item.same_key(hash, index))
    }

    pub fn add_deposit_item(&mut self, item: DepositItem) -> Result<(), DepositError> {
        if !item.is_valid() {
            return Err(DepositError::EmptyHash {
                position: self.0.len(),
            });
        }
        if self.get_deposit_item(&item.hash, item.index).is_some() {
            warn!(hash = %item.hash, index = item.index, "Deposit item already exists");
            return Err(DepositError::AlreadyExists {
                hash: item.hash,
                index: item.index,
            });
        }

        debug!(hash = %item.hash, index = item.index, amount = %item.amount, "Add deposit item");
        self.0.push(item);
        Ok(())
    }

    /// Remove the item with the given key, returning it.
    pub fn remove_deposit_item(&mut self, hash: &str, index: u64) -> Result<DepositItem, DepositError> {
        let position = self
            .get_deposit_item(hash, index)
            .map(|(position, _)| position)
            .ok_or_else(|| DepositError::NotFound {
                hash: hash.to_string(),
                index,
            })?;

        debug!(hash, index, "Remove deposit item");
        Ok(self.0.remove(position))
    }

    /// Replace the stored item with the same key.
    ///
    /// The amount recorded at first sighting cannot change.
    pub fn update_deposit_item(&mut self, item: DepositItem) -> Result<(), DepositError> {
        let position = self
            .get_deposit_item(&item.hash, item.index)
            .map(|(position, _)| position)
            .ok_or_else(|| DepositError::NotFound {
                hash: item.hash.clone(),
                index: item.index,
            })?;

        if self.0[position].amount != item.amount {
            return Err(DepositError::AmountImmutable {
                hash: item.hash,
                index: item.index,
            });
        }

        debug!(hash = %item.hash, index = item.index, status = %item.status, "Update deposit item");
        self.0[position] = item;
        Ok(())
    }

    /// Items satisfying `predicate`, in their current relative order.
    pub fn filter<F>(&self, predicate: F) -> DepositList
    where
        F: Fn(&DepositItem) -> bool,
    {
        DepositList(self.0.iter().filter(|item| predicate(item)).cloned().collect())
    }

    pub fn filter_by_status(&self, statuses: &[DepositItemStatus]) -> DepositList {
        self.filter(|item| item.status.is_in(statuses))
    }

    pub fn sum(&self) -> Result<Amount, DepositError> {
        Ok(Amount::checked_sum(self.0.iter().map(|item| item.amount))?)
    }

    pub fn sum_by_status(&self, status: DepositItemStatus) -> Result<Amount, DepositError> {
        Ok(Amount::checked_sum(
            self.0
                .iter()
                .filter(|item| item.status == status)
                .map(|item| item.amount),
        )?)
    }

    /// Order by the legacy `hash + index` string key.
    pub fn sort(&mut self) {
        self.0.sort_by_cached_key(DepositItem::sort_key);
    }

    /// Smallest amount first.
    pub fn sort_by_amount(&mut self) {
        self.0.sort_by(|a, b| a.amount.cmp(&b.amount));
    }

    /// Largest amount first.
    pub fn sort_by_amount_desc(&mut self) {
        self.0.sort_by(|a, b| b.amount.cmp(&a.amount));
    }
}

impl TryFrom<Vec<DepositItem>> for DepositList {
    type Error = DepositError;

    fn try_from(items: Vec<DepositItem>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<DepositList> for Vec<DepositItem> {
    fn from(list: DepositList) -> Self {
        list.0
    }
}

impl IntoIterator for DepositList {
    type Item = DepositItem;
    type IntoIter = std::vec::IntoIter<DepositItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_types::errors::ErrorKind;

    fn item(hash: &str, index: u64, amount: i64) -> DepositItem {
        DepositItem::new(
            hash,
            index,
            Amount::new(amount),
            "ext-addr",
            Vec::new(),
            DepositItemStatus::UnCollected,
        )
    }

    #[test]
    fn test_end_to_end_deposit_flow() {
        let mut list = DepositList::new(vec![item("h1", 0, 100), item("h1", 1, 50)]).unwrap();
        assert_eq!(list.sum().unwrap(), Amount::new(150));
        assert_eq!(
            list.sum_by_status(DepositItemStatus::UnCollected).unwrap(),
            Amount::new(150)
        );

        list.remove_deposit_item("h1", 0).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.sum().unwrap(), Amount::new(50));

        let err = list.remove_deposit_item("h1", 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_new_rejects_empty_hash() {
        let result = DepositList::new(vec![item("h1", 0, 1), item("", 0, 1)]);
        assert_eq!(result, Err(DepositError::EmptyHash { position: 1 }));
    }

    #[test]
    fn test_new_reports_sorted_duplicate_position() {
        // Sorted copy: (a,0) (b,1) (b,1) (c,0) -> duplicate at position 2
        let items = vec![item("c", 0, 1), item("b", 1, 1), item("a", 0, 1), item("b", 1, 2)];
        let result = DepositList::new(items);
        assert_eq!(
            result,
            Err(DepositError::Duplicated {
                hash: "b".to_string(),
                index: 1,
                position: 2,
            })
        );
    }

    #[test]
    fn test_new_preserves_input_order() {
        let list = DepositList::new(vec![item("z", 0, 1), item("a", 0, 2)]).unwrap();
        let hashes: Vec<_> = list.iter().map(|i| i.hash.as_str()).collect();
        assert_eq!(hashes, vec!["z", "a"]);
    }

    #[test]
    fn test_add_duplicate_leaves_list_unchanged() {
        let mut list = DepositList::new(vec![item("h1", 0, 100)]).unwrap();
        let result = list.add_deposit_item(item("h1", 0, 999));
        assert!(matches!(result, Err(DepositError::AlreadyExists { .. })));
        assert_eq!(list.len(), 1);
        assert_eq!(list.sum().unwrap(), Amount::new(100));
    }

    #[test]
    fn test_add_rejects_invalid_item() {
        let mut list = DepositList::default();
        let result = list.add_deposit_item(item("", 0, 1));
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
        assert!(list.is_empty());
    }

    #[test]
    fn test_get_deposit_item_miss() {
        let list = DepositList::new(vec![item("h1", 0, 100)]).unwrap();
        assert!(list.get_deposit_item("h1", 1).is_none());
        let (position, found) = list.get_deposit_item("h1", 0).unwrap();
        assert_eq!(position, 0);
        assert_eq!(found.amount, Amount::new(100));
    }

    #[test]
    fn test_update_advances_status() {
        let mut list = DepositList::new(vec![item("h1", 0, 100)]).unwrap();
        let mut updated = item("h1", 0, 100);
        updated.status = DepositItemStatus::WaitCollect;
        list.update_deposit_item(updated).unwrap();

        let (_, found) = list.get_deposit_item("h1", 0).unwrap();
        assert_eq!(found.status, DepositItemStatus::WaitCollect);
    }

    #[test]
    fn test_update_rejects_amount_change_and_missing_key() {
        let mut list = DepositList::new(vec![item("h1", 0, 100)]).unwrap();
        let result = list.update_deposit_item(item("h1", 0, 101));
        assert!(matches!(result, Err(DepositError::AmountImmutable { .. })));

        let result = list.update_deposit_item(item("h2", 0, 100));
        assert!(matches!(result, Err(DepositError::NotFound { .. })));
    }

    #[test]
    fn test_filter_does_not_mutate_receiver() {
        let mut items = vec![item("a", 0, 10), item("b", 0, 20), item("c", 0, 30)];
        items[1].status = DepositItemStatus::Confirmed;
        let list = DepositList::new(items).unwrap();

        let big = list.filter(|i| i.amount > Amount::new(15));
        assert_eq!(big.len(), 2);
        assert_eq!(big.as_slice()[0].hash, "b");
        assert_eq!(list.len(), 3);

        let confirmed = list.filter_by_status(&[DepositItemStatus::Confirmed]);
        assert_eq!(confirmed.len(), 1);
    }

    #[test]
    fn test_sum_by_status_partitions_total() {
        let mut items = vec![item("a", 0, 10), item("b", 0, 20), item("c", 0, 30)];
        items[0].status = DepositItemStatus::InProcess;
        items[2].status = DepositItemStatus::Confirmed;
        let list = DepositList::new(items).unwrap();

        let mut partitioned = Amount::ZERO;
        for status in DepositItemStatus::ALL {
            partitioned = partitioned.checked_add(list.sum_by_status(status).unwrap()).unwrap();
        }
        assert_eq!(partitioned, list.sum().unwrap());
    }

    #[test]
    fn test_sort_uses_decimal_index_key() {
        let mut list =
            DepositList::new(vec![item("h", 2, 1), item("h", 10, 1), item("g", 5, 1)]).unwrap();
        list.sort();
        let keys: Vec<_> = list.iter().map(DepositItem::sort_key).collect();
        // "h10" < "h2": decimal digits compare as text
        assert_eq!(keys, vec!["g5", "h10", "h2"]);
    }

    #[test]
    fn test_sort_by_amount_both_directions() {
        let mut list =
            DepositList::new(vec![item("a", 0, 30), item("b", 0, 10), item("c", 0, 20)]).unwrap();
        list.sort_by_amount();
        let amounts: Vec<_> = list.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![Amount::new(10), Amount::new(20), Amount::new(30)]);

        list.sort_by_amount_desc();
        assert_eq!(list.as_slice()[0].hash, "a");
        assert_eq!(list.as_slice()[2].hash, "b");
    }

    #[test]
    fn test_decode_rejects_duplicate_keys() {
        let items = vec![item("h1", 0, 100), item("h1", 0, 7)];
        let json = serde_json::to_string(&items).unwrap();
        assert!(serde_json::from_str::<DepositList>(&json).is_err());

        let bytes = bincode::serialize(&items).unwrap();
        assert!(bincode::deserialize::<DepositList>(&bytes).is_err());
    }

    #[test]
    fn test_decode_round_trip_keeps_order() {
        let list = DepositList::new(vec![item("h2", 0, 1), item("h1", 3, 2)]).unwrap();
        let json = serde_json::to_string(&list).unwrap();
        let back: DepositList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
