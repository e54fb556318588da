//! UTXO ledger: spendable external outputs for coin selection
//!
//! Set operations compare by membership, not position. Outputs of one
//! transaction share a hash and coexist; only a 4-field match is a
//! duplicate.

use custody_types::numeric::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::UtxoError;

/// One spendable external output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoIn {
    pub hash: String,
    pub index: u64,
    pub amount: Amount,
    pub address: String,
}

impl UtxoIn {
    pub fn new(hash: impl Into<String>, index: u64, amount: Amount, address: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            index,
            amount,
            address: address.into(),
        }
    }
}

/// Destination of a transaction output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtxoOut {
    pub address: String,
    pub amount: Amount,
}

impl UtxoOut {
    pub fn new(address: impl Into<String>, amount: Amount) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtxoIns(Vec<UtxoIn>);

impl UtxoIns {
    pub fn new(items: Vec<UtxoIn>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UtxoIn> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[UtxoIn] {
        &self.0
    }

    pub fn push(&mut self, utxo: UtxoIn) {
        self.0.push(utxo);
    }

    pub fn contains(&self, utxo: &UtxoIn) -> bool {
        self.0.contains(utxo)
    }

    /// Checks every element and then the set as a whole.
    pub fn validate(&self) -> Result<(), UtxoError> {
        for (position, utxo) in self.0.iter().enumerate() {
            if utxo.hash.is_empty() {
                return Err(UtxoError::EmptyHash { position });
            }
            if utxo.address.is_empty() {
                return Err(UtxoError::EmptyAddress { position });
            }
            if !utxo.amount.is_positive() {
                return Err(UtxoError::NonPositiveAmount {
                    amount: utxo.amount.to_string(),
                    position,
                });
            }
        }
        match self.first_duplicate() {
            Some(dup) => Err(UtxoError::Duplicated {
                hash: dup.hash.clone(),
                index: dup.index,
            }),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn has_duplicated_item(&self) -> bool {
        self.first_duplicate().is_some()
    }

    // Grouped by hash; a later element is compared against every earlier
    // element sharing its hash.
    fn first_duplicate(&self) -> Option<&UtxoIn> {
        let mut by_hash: HashMap<&str, Vec<&UtxoIn>> = HashMap::new();
        for utxo in &self.0 {
            let seen = by_hash.entry(utxo.hash.as_str()).or_default();
            if seen
                .iter()
                .any(|s| s.index == utxo.index && s.amount == utxo.amount && s.address == utxo.address)
            {
                return Some(utxo);
            }
            seen.push(utxo);
        }
        None
    }

    /// Every element of `self` is present in `other`.
    pub fn is_subset_of(&self, other: &UtxoIns) -> bool {
        self.0.iter().all(|utxo| other.contains(utxo))
    }

    /// Mutual subset; order is irrelevant.
    pub fn set_equal(&self, other: &UtxoIns) -> bool {
        self.is_subset_of(other) && other.is_subset_of(self)
    }

    /// Removes the first element equal to `utxo`, reporting whether one was found.
    pub fn remove_one_utxo_in(&mut self, utxo: &UtxoIn) -> bool {
        match self.0.iter().position(|u| u == utxo) {
            Some(position) => {
                self.0.remove(position);
                true
            }
            None => false,
        }
    }

    /// Removes each element of `spent` at most once; missing ones are ignored.
    pub fn remove_utxo_ins(&mut self, spent: &UtxoIns) {
        for utxo in &spent.0 {
            self.remove_one_utxo_in(utxo);
        }
    }

    pub fn total_amount(&self) -> Result<Amount, UtxoError> {
        Ok(Amount::checked_sum(self.0.iter().map(|u| u.amount))?)
    }
}

impl From<Vec<UtxoIn>> for UtxoIns {
    fn from(items: Vec<UtxoIn>) -> Self {
        Self(items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtxoOuts(Vec<UtxoOut>);

impl UtxoOuts {
    pub fn new(items: Vec<UtxoOut>) -> Self {
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UtxoOut> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[UtxoOut] {
        &self.0
    }

    /// Canonical order for serialization: by address.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.address.cmp(&b.address));
    }

    pub fn is_valid(&self) -> bool {
        self.0
            .iter()
            .all(|out| !out.address.is_empty() && out.amount.is_positive())
    }

    pub fn total_amount(&self) -> Result<Amount, UtxoError> {
        Ok(Amount::checked_sum(self.0.iter().map(|o| o.amount))?)
    }
}

impl From<Vec<UtxoOut>> for UtxoOuts {
    fn from(items: Vec<UtxoOut>) -> Self {
        Self(items)
    }
}
