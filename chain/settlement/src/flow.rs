//! Flow records: immutable diffs describing one side effect of an operation
//!
//! Flows are appended in the order the mutations happened; consumers index
//! them by position. A balance flow carries the previous values and the
//! deltas, never the resulting state.
//!
//! `FlowKind` values equal the serialized enum index of `Flow` and are
//! frozen: new kinds are appended, existing ones are never reordered.

use custody_types::errors::AmountError;
use custody_types::ids::CuAddress;
use custody_types::numeric::Amount;
use custody_types::status::{DepositItemStatus, OrderStatus, OrderType};
use serde::{Deserialize, Serialize};

use crate::deposit::DepositItem;
use crate::order::{
    Order, OrderKeyGen, OrderOpcuAssetTransfer, OrderSysTransfer, OrderWithdrawal, TransferItem,
};

/// Order status snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFlow {
    pub symbol: String,
    pub cu_address: CuAddress,
    pub order_id: String,
    pub order_type: OrderType,
    pub order_status: OrderStatus,
}

impl OrderFlow {
    pub fn from_order(order: &Order) -> Self {
        Self {
            symbol: order.symbol().to_string(),
            cu_address: order.cu_address().clone(),
            order_id: order.id().to_string(),
            order_type: order.order_type(),
            order_status: order.status(),
        }
    }
}

/// Change to a custodian's available and on-hold balance of one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceFlow {
    pub cu_address: CuAddress,
    pub symbol: String,
    pub previous_balance: Amount,
    pub balance_change: Amount,
    pub previous_balance_on_hold: Amount,
    pub balance_on_hold_change: Amount,
}

impl BalanceFlow {
    pub fn new(
        cu_address: CuAddress,
        symbol: impl Into<String>,
        previous_balance: Amount,
        balance_change: Amount,
        previous_balance_on_hold: Amount,
        balance_on_hold_change: Amount,
    ) -> Self {
        Self {
            cu_address,
            symbol: symbol.into(),
            previous_balance,
            balance_change,
            previous_balance_on_hold,
            balance_on_hold_change,
        }
    }

    pub fn balance_after(&self) -> Result<Amount, AmountError> {
        self.previous_balance.checked_add(self.balance_change)
    }

    pub fn balance_on_hold_after(&self) -> Result<Amount, AmountError> {
        self.previous_balance_on_hold
            .checked_add(self.balance_on_hold_change)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositFlow {
    pub cu_address: CuAddress,
    pub symbol: String,
    pub order_id: String,
    pub hash: String,
    pub index: u64,
    pub amount: Amount,
    pub ext_address: String,
    pub memo: Vec<u8>,
    pub deposit_status: DepositItemStatus,
}

impl DepositFlow {
    pub fn from_item(
        cu_address: CuAddress,
        symbol: impl Into<String>,
        order_id: impl Into<String>,
        item: &DepositItem,
    ) -> Self {
        Self {
            cu_address,
            symbol: symbol.into(),
            order_id: order_id.into(),
            hash: item.hash.clone(),
            index: item.index,
            amount: item.amount,
            ext_address: item.ext_address.clone(),
            memo: item.memo.clone(),
            deposit_status: item.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalFlow {
    pub order_id: String,
    pub from_cu: CuAddress,
    pub to_addr: String,
    pub symbol: String,
    pub amount: Amount,
    pub gas_fee: Amount,
    pub withdraw_status: OrderStatus,
}

impl WithdrawalFlow {
    pub fn from_order(order: &OrderWithdrawal) -> Self {
        Self {
            order_id: order.base.id.clone(),
            from_cu: order.base.cu_address.clone(),
            to_addr: order.withdraw_to_addr.clone(),
            symbol: order.base.symbol.clone(),
            amount: order.amount,
            gas_fee: order.gas_fee,
            withdraw_status: order.base.status,
        }
    }
}

/// Withdrawals batched into one unsigned transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalWaitSignFlow {
    pub order_ids: Vec<String>,
    pub opcu: CuAddress,
    pub from_addr: String,
    pub raw_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalSignFinishFlow {
    pub order_ids: Vec<String>,
    pub signed_tx: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalFinishFlow {
    pub order_ids: Vec<String>,
    pub cost_fee: Amount,
    /// False when the broadcast transaction was rejected on chain.
    pub valid: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectWaitSignFlow {
    pub order_ids: Vec<String>,
    pub raw_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectSignFinishFlow {
    pub order_ids: Vec<String>,
    pub signed_tx: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectFinishFlow {
    pub order_ids: Vec<String>,
    pub cost_fee: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcuAssetTransferFlow {
    pub order_id: String,
    pub opcu: CuAddress,
    pub from_addr: String,
    pub to_addr: String,
    pub symbol: String,
    pub transfer_items: Vec<TransferItem>,
}

impl OpcuAssetTransferFlow {
    pub fn from_order(order: &OrderOpcuAssetTransfer) -> Self {
        Self {
            order_id: order.base.id.clone(),
            opcu: order.base.cu_address.clone(),
            from_addr: order.from_addr.clone(),
            to_addr: order.to_addr.clone(),
            symbol: order.base.symbol.clone(),
            transfer_items: order.transfer_items.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcuAssetTransferWaitSignFlow {
    pub order_id: String,
    pub raw_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcuAssetTransferSignFinishFlow {
    pub order_id: String,
    pub signed_tx: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcuAssetTransferFinishFlow {
    pub order_id: String,
    pub cost_fee: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysTransferFlow {
    pub order_id: String,
    pub from_cu: CuAddress,
    pub to_cu: CuAddress,
    pub from_addr: String,
    pub to_addr: String,
    pub symbol: String,
    pub amount: Amount,
}

impl SysTransferFlow {
    pub fn from_order(order: &OrderSysTransfer) -> Self {
        Self {
            order_id: order.base.id.clone(),
            from_cu: order.base.cu_address.clone(),
            to_cu: order.to_cu.clone(),
            from_addr: order.from_addr.clone(),
            to_addr: order.to_addr.clone(),
            symbol: order.base.symbol.clone(),
            amount: order.amount,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysTransferWaitSignFlow {
    pub order_id: String,
    pub raw_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysTransferSignFinishFlow {
    pub order_id: String,
    pub signed_tx: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysTransferFinishFlow {
    pub order_id: String,
    pub cost_fee: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenFlow {
    pub order_id: String,
    pub symbol: String,
    pub from: CuAddress,
    pub to: CuAddress,
    pub is_pre_keygen: bool,
}

impl KeyGenFlow {
    pub fn from_order(order: &OrderKeyGen) -> Self {
        Self {
            order_id: order.base.id.clone(),
            symbol: order.base.symbol.clone(),
            from: order.base.cu_address.clone(),
            to: order.to.clone(),
            is_pre_keygen: order.is_pre_keygen,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenWaitSignFlow {
    pub order_id: String,
    pub pubkey: Vec<u8>,
    pub raw_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenFinishFlow {
    pub order_id: String,
    pub is_pre_keygen: bool,
    pub to_addr: String,
}

/// Change to the issue pool of a mapped token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingBalanceFlow {
    pub issue_symbol: String,
    pub previous_issue_pool: Amount,
    pub issue_pool_change: Amount,
}

/// Discriminant of a `Flow`, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum FlowKind {
    Order = 0,
    Balance = 1,
    Deposit = 2,
    Withdrawal = 3,
    WithdrawalWaitSign = 4,
    WithdrawalSignFinish = 5,
    WithdrawalFinish = 6,
    CollectWaitSign = 7,
    CollectSignFinish = 8,
    CollectFinish = 9,
    OpcuAssetTransfer = 10,
    OpcuAssetTransferWaitSign = 11,
    OpcuAssetTransferSignFinish = 12,
    OpcuAssetTransferFinish = 13,
    SysTransfer = 14,
    SysTransferWaitSign = 15,
    SysTransferSignFinish = 16,
    SysTransferFinish = 17,
    KeyGen = 18,
    KeyGenWaitSign = 19,
    KeyGenFinish = 20,
    MappingBalance = 21,
}

/// Variant order must match `FlowKind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flow {
    Order(OrderFlow),
    Balance(BalanceFlow),
    Deposit(DepositFlow),
    Withdrawal(WithdrawalFlow),
    WithdrawalWaitSign(WithdrawalWaitSignFlow),
    WithdrawalSignFinish(WithdrawalSignFinishFlow),
    WithdrawalFinish(WithdrawalFinishFlow),
    CollectWaitSign(CollectWaitSignFlow),
    CollectSignFinish(CollectSignFinishFlow),
    CollectFinish(CollectFinishFlow),
    OpcuAssetTransfer(OpcuAssetTransferFlow),
    OpcuAssetTransferWaitSign(OpcuAssetTransferWaitSignFlow),
    OpcuAssetTransferSignFinish(OpcuAssetTransferSignFinishFlow),
    OpcuAssetTransferFinish(OpcuAssetTransferFinishFlow),
    SysTransfer(SysTransferFlow),
    SysTransferWaitSign(SysTransferWaitSignFlow),
    SysTransferSignFinish(SysTransferSignFinishFlow),
    SysTransferFinish(SysTransferFinishFlow),
    KeyGen(KeyGenFlow),
    KeyGenWaitSign(KeyGenWaitSignFlow),
    KeyGenFinish(KeyGenFinishFlow),
    MappingBalance(MappingBalanceFlow),
}

impl Flow {
    pub fn kind(&self) -> FlowKind {
        match self {
            Flow::Order(_) => FlowKind::Order,
            Flow::Balance(_) => FlowKind::Balance,
            Flow::Deposit(_) => FlowKind::Deposit,
            Flow::Withdrawal(_) => FlowKind::Withdrawal,
            Flow::WithdrawalWaitSign(_) => FlowKind::WithdrawalWaitSign,
            Flow::WithdrawalSignFinish(_) => FlowKind::WithdrawalSignFinish,
            Flow::WithdrawalFinish(_) => FlowKind::WithdrawalFinish,
            Flow::CollectWaitSign(_) => FlowKind::CollectWaitSign,
            Flow::CollectSignFinish(_) => FlowKind::CollectSignFinish,
            Flow::CollectFinish(_) => FlowKind::CollectFinish,
            Flow::OpcuAssetTransfer(_) => FlowKind::OpcuAssetTransfer,
            Flow::OpcuAssetTransferWaitSign(_) => FlowKind::OpcuAssetTransferWaitSign,
            Flow::OpcuAssetTransferSignFinish(_) => FlowKind::OpcuAssetTransferSignFinish,
            Flow::OpcuAssetTransferFinish(_) => FlowKind::OpcuAssetTransferFinish,
            Flow::SysTransfer(_) => FlowKind::SysTransfer,
            Flow::SysTransferWaitSign(_) => FlowKind::SysTransferWaitSign,
            Flow::SysTransferSignFinish(_) => FlowKind::SysTransferSignFinish,
            Flow::SysTransferFinish(_) => FlowKind::SysTransferFinish,
            Flow::KeyGen(_) => FlowKind::KeyGen,
            Flow::KeyGenWaitSign(_) => FlowKind::KeyGenWaitSign,
            Flow::KeyGenFinish(_) => FlowKind::KeyGenFinish,
            Flow::MappingBalance(_) => FlowKind::MappingBalance,
        }
    }

    /// Order ids this flow refers to, for routing. Balance and mapping
    /// flows refer to none.
    pub fn order_ids(&self) -> Vec<&str> {
        fn all(ids: &[String]) -> Vec<&str> {
            ids.iter().map(String::as_str).collect()
        }

        match self {
            Flow::Balance(_) | Flow::MappingBalance(_) => Vec::new(),
            Flow::Order(f) => vec![f.order_id.as_str()],
            Flow::Deposit(f) => vec![f.order_id.as_str()],
            Flow::Withdrawal(f) => vec![f.order_id.as_str()],
            Flow::WithdrawalWaitSign(f) => all(&f.order_ids),
            Flow::WithdrawalSignFinish(f) => all(&f.order_ids),
            Flow::WithdrawalFinish(f) => all(&f.order_ids),
            Flow::CollectWaitSign(f) => all(&f.order_ids),
            Flow::CollectSignFinish(f) => all(&f.order_ids),
            Flow::CollectFinish(f) => all(&f.order_ids),
            Flow::OpcuAssetTransfer(f) => vec![f.order_id.as_str()],
            Flow::OpcuAssetTransferWaitSign(f) => vec![f.order_id.as_str()],
            Flow::OpcuAssetTransferSignFinish(f) => vec![f.order_id.as_str()],
            Flow::OpcuAssetTransferFinish(f) => vec![f.order_id.as_str()],
            Flow::SysTransfer(f) => vec![f.order_id.as_str()],
            Flow::SysTransferWaitSign(f) => vec![f.order_id.as_str()],
            Flow::SysTransferSignFinish(f) => vec![f.order_id.as_str()],
            Flow::SysTransferFinish(f) => vec![f.order_id.as_str()],
            Flow::KeyGen(f) => vec![f.order_id.as_str()],
            Flow::KeyGenWaitSign(f) => vec![f.order_id.as_str()],
            Flow::KeyGenFinish(f) => vec![f.order_id.as_str()],
        }
    }
}

#[cfg(test)]
pub(crate) fn one_of_each_kind() -> Vec<Flow> {
    vec![
        Flow::Order(OrderFlow::default()),
        Flow::Balance(BalanceFlow::default()),
        Flow::Deposit(DepositFlow::default()),
        Flow::Withdrawal(WithdrawalFlow::default()),
        Flow::WithdrawalWaitSign(WithdrawalWaitSignFlow::default()),
        Flow::WithdrawalSignFinish(WithdrawalSignFinishFlow::default()),
        Flow::WithdrawalFinish(WithdrawalFinishFlow::default()),
        Flow::CollectWaitSign(CollectWaitSignFlow::default()),
        Flow::CollectSignFinish(CollectSignFinishFlow::default()),
        Flow::CollectFinish(CollectFinishFlow::default()),
        Flow::OpcuAssetTransfer(OpcuAssetTransferFlow::default()),
        Flow::OpcuAssetTransferWaitSign(OpcuAssetTransferWaitSignFlow::default()),
        Flow::OpcuAssetTransferSignFinish(OpcuAssetTransferSignFinishFlow::default()),
        Flow::OpcuAssetTransferFinish(OpcuAssetTransferFinishFlow::default()),
        Flow::SysTransfer(SysTransferFlow::default()),
        Flow::SysTransferWaitSign(SysTransferWaitSignFlow::default()),
        Flow::SysTransferSignFinish(SysTransferSignFinishFlow::default()),
        Flow::SysTransferFinish(SysTransferFinishFlow::default()),
        Flow::KeyGen(KeyGenFlow::default()),
        Flow::KeyGenWaitSign(KeyGenWaitSignFlow::default()),
        Flow::KeyGenFinish(KeyGenFinishFlow::default()),
        Flow::MappingBalance(MappingBalanceFlow::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderBase;

    #[test]
    fn test_flow_kind_matches_serialized_tag() {
        for (position, flow) in one_of_each_kind().iter().enumerate() {
            let bytes = bincode::serialize(flow).unwrap();
            let tag = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            assert_eq!(tag, flow.kind() as u32, "kind mismatch for {:?}", flow);
            assert_eq!(tag as usize, position);
        }
    }

    #[test]
    fn test_balance_flow_is_a_diff() {
        let flow = BalanceFlow::new(
            CuAddress::new("cu1"),
            "eth",
            Amount::new(1000),
            Amount::new(-250),
            Amount::new(0),
            Amount::new(250),
        );
        assert_eq!(flow.balance_after().unwrap(), Amount::new(750));
        assert_eq!(flow.balance_on_hold_after().unwrap(), Amount::new(250));
    }

    #[test]
    fn test_order_flow_snapshot() {
        let mut order: Order = OrderSysTransfer::new(
            OrderBase::new(CuAddress::new("cu1sys"), "eth", 9),
            CuAddress::new("cu1user"),
            "0xsys",
            "0xuser",
            Amount::new(21000),
        )
        .into();
        order.set_id("5f1c8d4e-2b7a-4c3e-9a1d-0e6f7b8c9d01").unwrap();
        order.set_status(OrderStatus::WaitSign);

        let flow = OrderFlow::from_order(&order);
        assert_eq!(flow.order_type, OrderType::SysTransfer);
        assert_eq!(flow.order_status, OrderStatus::WaitSign);
        assert_eq!(flow.cu_address, CuAddress::new("cu1sys"));

        // Later mutation does not reach the snapshot
        order.set_status(OrderStatus::Finish);
        assert_eq!(flow.order_status, OrderStatus::WaitSign);
    }

    #[test]
    fn test_deposit_flow_from_item() {
        let item = DepositItem::new(
            "h1",
            2,
            Amount::new(77),
            "bc1qext",
            b"tag".to_vec(),
            DepositItemStatus::UnCollected,
        );
        let flow = DepositFlow::from_item(CuAddress::new("cu1"), "btc", "oid", &item);
        assert_eq!(flow.hash, "h1");
        assert_eq!(flow.index, 2);
        assert_eq!(flow.amount, Amount::new(77));
        assert_eq!(flow.memo, b"tag".to_vec());
    }

    #[test]
    fn test_order_ids_for_batched_flow() {
        let flow = Flow::CollectFinish(CollectFinishFlow {
            order_ids: vec!["a".into(), "b".into()],
            cost_fee: Amount::new(5),
        });
        assert_eq!(flow.order_ids(), vec!["a", "b"]);
        assert!(Flow::Balance(BalanceFlow::default()).order_ids().is_empty());
    }
}
