//! Order and deposit status machines
//!
//! Statuses are plain values. Transition policy belongs to the operation
//! handlers; these types only answer ordering and membership questions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of cross-chain operation an order drives.
///
/// Discriminants are persisted and must not be renumbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderType {
    #[default]
    Unknown = 0,
    KeyGen = 1,
    Deposit = 2,
    Withdrawal = 3,
    Collect = 4,
    SysTransfer = 5,
    OpcuAssetTransfer = 6,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderType::Unknown => "unknown",
            OrderType::KeyGen => "keygen",
            OrderType::Deposit => "deposit",
            OrderType::Withdrawal => "withdrawal",
            OrderType::Collect => "collect",
            OrderType::SysTransfer => "sys_transfer",
            OrderType::OpcuAssetTransfer => "opcu_asset_transfer",
        };
        f.write_str(name)
    }
}

/// Order life cycle: `Begin < WaitSign < SignFinish < Finish, Cancel, Failed`.
///
/// `Finish` is the smallest terminal value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrderStatus {
    #[default]
    Begin = 1,
    WaitSign = 2,
    SignFinish = 3,
    Finish = 4,
    Cancel = 5,
    Failed = 6,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Begin,
        OrderStatus::WaitSign,
        OrderStatus::SignFinish,
        OrderStatus::Finish,
        OrderStatus::Cancel,
        OrderStatus::Failed,
    ];

    /// True for `Finish`, `Cancel` and `Failed`.
    pub fn terminated(&self) -> bool {
        *self >= OrderStatus::Finish
    }

    /// Equal statuses match; `SignFinish` also matches any terminal status,
    /// so a waiter can tell an order has left signing whatever the outcome.
    pub fn matches(&self, other: OrderStatus) -> bool {
        *self == other || (*self == OrderStatus::SignFinish && other.terminated())
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Begin => "begin",
            OrderStatus::WaitSign => "wait_sign",
            OrderStatus::SignFinish => "sign_finish",
            OrderStatus::Finish => "finish",
            OrderStatus::Cancel => "cancel",
            OrderStatus::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Deposit pipeline: collection requested, signed, broadcast confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DepositItemStatus {
    #[default]
    UnCollected = 0,
    WaitCollect = 1,
    InProcess = 2,
    Confirmed = 3,
}

impl DepositItemStatus {
    pub const ALL: [DepositItemStatus; 4] = [
        DepositItemStatus::UnCollected,
        DepositItemStatus::WaitCollect,
        DepositItemStatus::InProcess,
        DepositItemStatus::Confirmed,
    ];

    /// Membership test.
    pub fn is_in(&self, statuses: &[DepositItemStatus]) -> bool {
        statuses.contains(self)
    }

    /// Forward-only check for handlers that enforce the pipeline.
    pub fn advances_to(&self, next: DepositItemStatus) -> bool {
        next > *self
    }
}

impl fmt::Display for DepositItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepositItemStatus::UnCollected => "uncollected",
            DepositItemStatus::WaitCollect => "wait_collect",
            DepositItemStatus::InProcess => "in_process",
            DepositItemStatus::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = OrderStatus::ALL.iter().filter(|s| s.terminated()).copied().collect();
        assert_eq!(
            terminal,
            vec![OrderStatus::Finish, OrderStatus::Cancel, OrderStatus::Failed]
        );
    }

    #[test]
    fn test_status_total_order() {
        assert!(OrderStatus::Begin < OrderStatus::WaitSign);
        assert!(OrderStatus::WaitSign < OrderStatus::SignFinish);
        assert!(OrderStatus::SignFinish < OrderStatus::Finish);
        assert!(OrderStatus::Finish < OrderStatus::Cancel);
        assert!(OrderStatus::Cancel < OrderStatus::Failed);
    }

    #[test]
    fn test_sign_finish_matches_every_terminal() {
        assert!(OrderStatus::SignFinish.matches(OrderStatus::SignFinish));
        assert!(OrderStatus::SignFinish.matches(OrderStatus::Finish));
        assert!(OrderStatus::SignFinish.matches(OrderStatus::Cancel));
        assert!(OrderStatus::SignFinish.matches(OrderStatus::Failed));
        assert!(!OrderStatus::SignFinish.matches(OrderStatus::WaitSign));
    }

    #[test]
    fn test_other_statuses_match_only_themselves() {
        assert!(OrderStatus::WaitSign.matches(OrderStatus::WaitSign));
        assert!(!OrderStatus::WaitSign.matches(OrderStatus::Finish));
        assert!(!OrderStatus::Finish.matches(OrderStatus::Failed));
        assert!(!OrderStatus::Begin.matches(OrderStatus::SignFinish));
    }

    #[test]
    fn test_deposit_status_membership() {
        let pending = [DepositItemStatus::WaitCollect, DepositItemStatus::InProcess];
        assert!(DepositItemStatus::InProcess.is_in(&pending));
        assert!(!DepositItemStatus::Confirmed.is_in(&pending));
        assert!(!DepositItemStatus::UnCollected.is_in(&[]));
    }

    #[test]
    fn test_deposit_status_forward_only() {
        assert!(DepositItemStatus::UnCollected.advances_to(DepositItemStatus::WaitCollect));
        assert!(!DepositItemStatus::Confirmed.advances_to(DepositItemStatus::InProcess));
        assert!(!DepositItemStatus::InProcess.advances_to(DepositItemStatus::InProcess));
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(OrderStatus::Begin.as_u8(), 1);
        assert_eq!(OrderStatus::Failed.as_u8(), 6);
        assert_eq!(DepositItemStatus::default(), DepositItemStatus::UnCollected);
    }
}
