//! Fields shared by every order kind

use custody_types::ids::CuAddress;
use custody_types::status::{OrderStatus, OrderType};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::OrderError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBase {
    pub cu_address: CuAddress,
    pub id: String,
    pub order_type: OrderType,
    pub symbol: String,
    pub status: OrderStatus,
    pub height: u64,
}

impl OrderBase {
    /// A fresh order in `Begin` with no id assigned.
    pub fn new(cu_address: CuAddress, symbol: impl Into<String>, height: u64) -> Self {
        Self {
            cu_address,
            id: String::new(),
            order_type: OrderType::Unknown,
            symbol: symbol.into(),
            status: OrderStatus::Begin,
            height,
        }
    }

    /// Assigns the id once; a second assignment is refused.
    ///
    /// An empty id is not an assignment and is rejected.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<(), OrderError> {
        if !self.id.is_empty() {
            return Err(OrderError::IdAlreadyExists {
                existing: self.id.clone(),
            });
        }
        let id = id.into();
        if id.is_empty() {
            return Err(OrderError::IllegalId { order_id: id });
        }
        self.id = id;
        Ok(())
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

impl fmt::Display for OrderBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "type={} id={} symbol={} cu={} status={} height={}",
            self.order_type, self.id, self.symbol, self.cu_address, self.status, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_base_starts_in_begin() {
        let base = OrderBase::new(CuAddress::new("cu1"), "btc", 7);
        assert_eq!(base.status, OrderStatus::Begin);
        assert!(!base.has_id());
        assert_eq!(base.height, 7);
    }

    #[test]
    fn test_set_id_is_write_once() {
        let mut base = OrderBase::new(CuAddress::new("cu1"), "btc", 1);
        base.set_id("5f1c8d4e-2b7a-4c3e-9a1d-0e6f7b8c9d01").unwrap();

        let err = base.set_id("0b9e3a52-7c41-4d8f-b6a2-91c3e5f7d802").unwrap_err();
        assert!(matches!(err, OrderError::IdAlreadyExists { .. }));
        assert!(err.to_string().contains("already exists"));
        assert_eq!(base.id, "5f1c8d4e-2b7a-4c3e-9a1d-0e6f7b8c9d01");
    }

    #[test]
    fn test_set_id_rejects_empty() {
        let mut base = OrderBase::new(CuAddress::new("cu1"), "btc", 1);
        let err = base.set_id("").unwrap_err();
        assert!(matches!(err, OrderError::IllegalId { .. }));
        assert!(!base.has_id());

        base.set_id("5f1c8d4e-2b7a-4c3e-9a1d-0e6f7b8c9d01").unwrap();
        assert!(base.set_id("0b9e3a52-7c41-4d8f-b6a2-91c3e5f7d802").is_err());
    }
}
