//! Identifier types for custody entities
//!
//! Custodian addresses are opaque values supplied by the address provider;
//! order identifiers are UUID strings assigned once per order.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Address of a custodian unit.
///
/// Already validated by the identity provider. This core only compares
/// and orders addresses, it never parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CuAddress(String);

impl CuAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CuAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CuAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CuAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An order id is legal only if it parses as a UUID.
pub fn is_illegal_order_id(order_id: &str) -> bool {
    Uuid::parse_str(order_id).is_err()
}

/// A list is illegal if any id is illegal or any id repeats.
///
/// Stops at the first violation.
pub fn is_illegal_order_id_list<S: AsRef<str>>(order_ids: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(order_ids.len());
    for id in order_ids {
        let id = id.as_ref();
        if is_illegal_order_id(id) || !seen.insert(id) {
            return true;
        }
    }
    false
}
