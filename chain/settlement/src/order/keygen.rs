//! Multi-party key generation for a custody address

use custody_types::ids::CuAddress;
use custody_types::numeric::Amount;
use custody_types::status::OrderType;
use serde::{Deserialize, Serialize};

use super::{OrderBase, OrderVariant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderKeyGen {
    pub base: OrderBase,
    /// Validator nodes taking part in the ceremony.
    pub key_nodes: Vec<CuAddress>,
    pub sign_threshold: u64,
    /// Custodian receiving the generated address.
    pub to: CuAddress,
    pub open_fee: Amount,
    pub multi_sign_address: String,
    pub pubkey: Vec<u8>,
    pub epoch: u64,
    /// Generated ahead of an epoch rotation.
    pub is_pre_keygen: bool,
}

impl OrderKeyGen {
    pub fn new(
        mut base: OrderBase,
        key_nodes: Vec<CuAddress>,
        sign_threshold: u64,
        to: CuAddress,
        open_fee: Amount,
        epoch: u64,
    ) -> Self {
        base.order_type = Self::ORDER_TYPE;
        Self {
            base,
            key_nodes,
            sign_threshold,
            to,
            open_fee,
            multi_sign_address: String::new(),
            pubkey: Vec::new(),
            epoch,
            is_pre_keygen: false,
        }
    }

    pub fn is_key_node(&self, node: &CuAddress) -> bool {
        self.key_nodes.contains(node)
    }
}

impl OrderVariant for OrderKeyGen {
    const ORDER_TYPE: OrderType = OrderType::KeyGen;

    fn base(&self) -> &OrderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OrderBase {
        &mut self.base
    }
}
