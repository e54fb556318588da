//! Settlement error types
//!
//! One enum per ledger, each variant carrying the key it refused. `kind()`
//! folds every variant onto the shared `ErrorKind` taxonomy.

use custody_types::errors::{AmountError, ErrorKind};
use thiserror::Error;

/// Deposit ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DepositError {
    #[error("Invalid deposit item at position {position}: empty hash")]
    EmptyHash { position: usize },

    #[error("Duplicated deposit item {hash}:{index} at sorted position {position}")]
    Duplicated {
        hash: String,
        index: u64,
        position: usize,
    },

    #[error("Deposit item {hash}:{index} already exists")]
    AlreadyExists { hash: String, index: u64 },

    #[error("Deposit item {hash}:{index} not found")]
    NotFound { hash: String, index: u64 },

    #[error("Deposit item {hash}:{index} amount cannot change after creation")]
    AmountImmutable { hash: String, index: u64 },

    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
}

impl DepositError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DepositError::EmptyHash { .. } | DepositError::AmountImmutable { .. } => {
                ErrorKind::Validation
            }
            DepositError::Duplicated { .. } | DepositError::AlreadyExists { .. } => {
                ErrorKind::Conflict
            }
            DepositError::NotFound { .. } => ErrorKind::NotFound,
            DepositError::Amount(e) => e.kind(),
        }
    }
}

/// UTXO ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UtxoError {
    #[error("Empty hash in utxo at position {position}")]
    EmptyHash { position: usize },

    #[error("Empty address in utxo at position {position}")]
    EmptyAddress { position: usize },

    #[error("Non-positive amount {amount} in utxo at position {position}")]
    NonPositiveAmount { amount: String, position: usize },

    #[error("Duplicated utxo {hash}:{index}")]
    Duplicated { hash: String, index: u64 },

    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
}

impl UtxoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UtxoError::EmptyHash { .. }
            | UtxoError::EmptyAddress { .. }
            | UtxoError::NonPositiveAmount { .. } => ErrorKind::Validation,
            UtxoError::Duplicated { .. } => ErrorKind::Conflict,
            UtxoError::Amount(e) => e.kind(),
        }
    }
}

/// Order model errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Order id {existing} already exists")]
    IdAlreadyExists { existing: String },

    #[error("Illegal order id: {order_id}")]
    IllegalId { order_id: String },

    #[error("Illegal order id list: {order_ids:?}")]
    IllegalIdList { order_ids: Vec<String> },

    #[error("Order {order_id} is {actual}, expected {expected}")]
    TypeMismatch {
        order_id: String,
        expected: String,
        actual: String,
    },
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::IdAlreadyExists { .. } => ErrorKind::Conflict,
            OrderError::IllegalId { .. }
            | OrderError::IllegalIdList { .. }
            | OrderError::TypeMismatch { .. } => ErrorKind::Validation,
        }
    }
}

/// Top-level settlement error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettlementError {
    #[error("Deposit error: {0}")]
    Deposit(#[from] DepositError),

    #[error("Utxo error: {0}")]
    Utxo(#[from] UtxoError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Amount error: {0}")]
    Amount(#[from] AmountError),
}

impl SettlementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SettlementError::Deposit(e) => e.kind(),
            SettlementError::Utxo(e) => e.kind(),
            SettlementError::Order(e) => e.kind(),
            SettlementError::Amount(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_error_display_includes_key() {
        let err = DepositError::NotFound {
            hash: "h1".to_string(),
            index: 3,
        };
        assert_eq!(err.to_string(), "Deposit item h1:3 not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_conflict_kinds() {
        let dup = DepositError::AlreadyExists {
            hash: "h".into(),
            index: 0,
        };
        assert_eq!(dup.kind(), ErrorKind::Conflict);
        let id = OrderError::IdAlreadyExists {
            existing: "abc".into(),
        };
        assert_eq!(id.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_settlement_error_from_utxo_error() {
        let utxo_err = UtxoError::EmptyAddress { position: 2 };
        let err: SettlementError = utxo_err.into();
        assert!(matches!(err, SettlementError::Utxo(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
