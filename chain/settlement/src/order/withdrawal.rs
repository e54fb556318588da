//! Withdrawal from a custodian to an external address

use custody_types::ids::CuAddress;
use custody_types::numeric::Amount;
use custody_types::status::OrderType;
use serde::{Deserialize, Serialize};

use super::{OrderBase, OrderVariant};
use crate::errors::UtxoError;
use crate::utxo::{UtxoIns, UtxoOuts};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithdrawal {
    pub base: OrderBase,
    pub amount: Amount,
    /// Fee the user agreed to pay.
    pub gas_fee: Amount,
    /// Fee actually spent on chain, known at finish.
    pub cost_fee: Amount,
    pub withdraw_to_addr: String,
    /// Operational custodian funding the withdrawal.
    pub opcu_address: CuAddress,
    pub from_addr: String,
    /// Inputs selected on UTXO chains; empty on account chains.
    pub utxo_ins: UtxoIns,
    pub utxo_outs: UtxoOuts,
    pub raw_data: Vec<u8>,
    pub signed_tx: Vec<u8>,
    pub ext_tx_hash: String,
}

impl OrderWithdrawal {
    pub fn new(
        mut base: OrderBase,
        amount: Amount,
        gas_fee: Amount,
        withdraw_to_addr: impl Into<String>,
    ) -> Self {
        base.order_type = Self::ORDER_TYPE;
        Self {
            base,
            amount,
            gas_fee,
            cost_fee: Amount::ZERO,
            withdraw_to_addr: withdraw_to_addr.into(),
            opcu_address: CuAddress::default(),
            from_addr: String::new(),
            utxo_ins: UtxoIns::default(),
            utxo_outs: UtxoOuts::default(),
            raw_data: Vec::new(),
            signed_tx: Vec::new(),
            ext_tx_hash: String::new(),
        }
    }

    /// Attach the selected inputs after checking them.
    pub fn set_utxo_ins(&mut self, utxo_ins: UtxoIns) -> Result<(), UtxoError> {
        utxo_ins.validate()?;
        self.utxo_ins = utxo_ins;
        Ok(())
    }

    /// Input total minus output total, the fee paid on a UTXO chain.
    pub fn utxo_fee(&self) -> Result<Amount, UtxoError> {
        let ins = self.utxo_ins.total_amount()?;
        let outs = self.utxo_outs.total_amount()?;
        Ok(ins.checked_sub(outs)?)
    }
}

impl OrderVariant for OrderWithdrawal {
    const ORDER_TYPE: OrderType = OrderType::Withdrawal;

    fn base(&self) -> &OrderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OrderBase {
        &mut self.base
    }
}
