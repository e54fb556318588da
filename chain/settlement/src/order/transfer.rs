//! Inter-custodian transfers: system top-ups and OPCU asset migration

use custody_types::errors::AmountError;
use custody_types::ids::CuAddress;
use custody_types::numeric::Amount;
use custody_types::status::OrderType;
use serde::{Deserialize, Serialize};

use super::{OrderBase, OrderVariant};

/// System transfer, e.g. funding gas on a user's deposit address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSysTransfer {
    pub base: OrderBase,
    pub to_cu: CuAddress,
    pub from_addr: String,
    pub to_addr: String,
    pub amount: Amount,
    pub cost_fee: Amount,
    pub raw_data: Vec<u8>,
    pub signed_tx: Vec<u8>,
    pub ext_tx_hash: String,
}

impl OrderSysTransfer {
    pub fn new(
        mut base: OrderBase,
        to_cu: CuAddress,
        from_addr: impl Into<String>,
        to_addr: impl Into<String>,
        amount: Amount,
    ) -> Self {
        base.order_type = Self::ORDER_TYPE;
        Self {
            base,
            to_cu,
            from_addr: from_addr.into(),
            to_addr: to_addr.into(),
            amount,
            cost_fee: Amount::ZERO,
            raw_data: Vec::new(),
            signed_tx: Vec::new(),
            ext_tx_hash: String::new(),
        }
    }
}

impl OrderVariant for OrderSysTransfer {
    const ORDER_TYPE: OrderType = OrderType::SysTransfer;

    fn base(&self) -> &OrderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OrderBase {
        &mut self.base
    }
}

/// One output moved by an OPCU asset transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferItem {
    pub hash: String,
    pub index: u64,
    pub amount: Amount,
}

/// Migration of pooled assets between OPCU multisig addresses, typically
/// after a key rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderOpcuAssetTransfer {
    pub base: OrderBase,
    pub transfer_items: Vec<TransferItem>,
    pub from_addr: String,
    pub to_addr: String,
    pub cost_fee: Amount,
    pub raw_data: Vec<u8>,
    pub signed_tx: Vec<u8>,
    pub ext_tx_hash: String,
}

impl OrderOpcuAssetTransfer {
    pub fn new(
        mut base: OrderBase,
        transfer_items: Vec<TransferItem>,
        from_addr: impl Into<String>,
        to_addr: impl Into<String>,
    ) -> Self {
        base.order_type = Self::ORDER_TYPE;
        Self {
            base,
            transfer_items,
            from_addr: from_addr.into(),
            to_addr: to_addr.into(),
            cost_fee: Amount::ZERO,
            raw_data: Vec::new(),
            signed_tx: Vec::new(),
            ext_tx_hash: String::new(),
        }
    }

    pub fn total_amount(&self) -> Result<Amount, AmountError> {
        Amount::checked_sum(self.transfer_items.iter().map(|item| item.amount))
    }
}

impl OrderVariant for OrderOpcuAssetTransfer {
    const ORDER_TYPE: OrderType = OrderType::OpcuAssetTransfer;

    fn base(&self) -> &OrderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OrderBase {
        &mut self.base
    }
}
