//! Collection of scattered deposit outputs into a custodian's pool address

use custody_types::ids::CuAddress;
use custody_types::numeric::Amount;
use custody_types::status::OrderType;
use serde::{Deserialize, Serialize};

use super::{OrderBase, OrderVariant};
use crate::deposit::DepositList;
use crate::errors::DepositError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCollect {
    pub base: OrderBase,
    pub collect_from_cu: CuAddress,
    pub collect_from_address: String,
    pub collect_to_cu: CuAddress,
    pub amount: Amount,
    pub gas_price: Amount,
    pub gas_limit: Amount,
    pub cost_fee: Amount,
    pub memo: Vec<u8>,
    /// Deposits swept by this collection.
    pub deposit_list: DepositList,
    pub ext_tx_hash: String,
    pub raw_data: Vec<u8>,
    pub signed_tx: Vec<u8>,
}

impl OrderCollect {
    /// The collected amount is the sum of the swept deposits.
    pub fn new(
        mut base: OrderBase,
        collect_from_cu: CuAddress,
        collect_from_address: impl Into<String>,
        collect_to_cu: CuAddress,
        deposit_list: DepositList,
    ) -> Result<Self, DepositError> {
        base.order_type = Self::ORDER_TYPE;
        let amount = deposit_list.sum()?;
        Ok(Self {
            base,
            collect_from_cu,
            collect_from_address: collect_from_address.into(),
            collect_to_cu,
            amount,
            gas_price: Amount::ZERO,
            gas_limit: Amount::ZERO,
            cost_fee: Amount::ZERO,
            memo: Vec::new(),
            deposit_list,
            ext_tx_hash: String::new(),
            raw_data: Vec::new(),
            signed_tx: Vec::new(),
        })
    }
}

impl OrderVariant for OrderCollect {
    const ORDER_TYPE: OrderType = OrderType::Collect;

    fn base(&self) -> &OrderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OrderBase {
        &mut self.base
    }
}
