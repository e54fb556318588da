//! Order model shared by every cross-chain operation
//!
//! `Order` is a closed union over the order kinds. Each kind embeds an
//! `OrderBase` and is reached through the `OrderVariant` trait; dispatch is
//! by tag, so replay and serialization stay explicit.
//!
//! Copies are deep: every byte buffer and list in a copy owns its own
//! allocation, so mutating a copy never shows through to the source.

mod base;
mod collect;
mod keygen;
mod transfer;
mod withdrawal;

pub use base::OrderBase;
pub use collect::OrderCollect;
pub use keygen::OrderKeyGen;
pub use transfer::{OrderOpcuAssetTransfer, OrderSysTransfer, TransferItem};
pub use withdrawal::OrderWithdrawal;

use custody_types::ids::{is_illegal_order_id, is_illegal_order_id_list, CuAddress};
use custody_types::status::{OrderStatus, OrderType};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::OrderError;

/// Implemented by every concrete order kind.
///
/// `Clone` is the deep copy: no kind may share buffers between copies.
pub trait OrderVariant: Clone + Into<Order> + TryFrom<Order, Error = OrderError> {
    const ORDER_TYPE: OrderType;

    fn base(&self) -> &OrderBase;

    fn base_mut(&mut self) -> &mut OrderBase;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    KeyGen(OrderKeyGen),
    Collect(OrderCollect),
    Withdrawal(OrderWithdrawal),
    SysTransfer(OrderSysTransfer),
    OpcuAssetTransfer(OrderOpcuAssetTransfer),
}

impl Order {
    pub fn base(&self) -> &OrderBase {
        match self {
            Order::KeyGen(o) => o.base(),
            Order::Collect(o) => o.base(),
            Order::Withdrawal(o) => o.base(),
            Order::SysTransfer(o) => o.base(),
            Order::OpcuAssetTransfer(o) => o.base(),
        }
    }

    pub fn base_mut(&mut self) -> &mut OrderBase {
        match self {
            Order::KeyGen(o) => o.base_mut(),
            Order::Collect(o) => o.base_mut(),
            Order::Withdrawal(o) => o.base_mut(),
            Order::SysTransfer(o) => o.base_mut(),
            Order::OpcuAssetTransfer(o) => o.base_mut(),
        }
    }

    /// Type tag of the concrete kind, independent of the stored `order_type`.
    pub fn variant_type(&self) -> OrderType {
        match self {
            Order::KeyGen(_) => OrderKeyGen::ORDER_TYPE,
            Order::Collect(_) => OrderCollect::ORDER_TYPE,
            Order::Withdrawal(_) => OrderWithdrawal::ORDER_TYPE,
            Order::SysTransfer(_) => OrderSysTransfer::ORDER_TYPE,
            Order::OpcuAssetTransfer(_) => OrderOpcuAssetTransfer::ORDER_TYPE,
        }
    }

    pub fn order_type(&self) -> OrderType {
        self.base().order_type
    }

    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.base_mut().order_type = order_type;
    }

    pub fn status(&self) -> OrderStatus {
        self.base().status
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.base_mut().status = status;
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    /// Write-once; fails if an id is already assigned.
    pub fn set_id(&mut self, id: impl Into<String>) -> Result<(), OrderError> {
        self.base_mut().set_id(id)
    }

    pub fn symbol(&self) -> &str {
        &self.base().symbol
    }

    pub fn cu_address(&self) -> &CuAddress {
        &self.base().cu_address
    }

    pub fn height(&self) -> u64 {
        self.base().height
    }

    pub fn is_terminated(&self) -> bool {
        self.status().terminated()
    }

    /// Independent copy of this order.
    pub fn deep_copy(&self) -> Order {
        self.clone()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order{{{}", self.base())?;
        match self {
            Order::KeyGen(o) => write!(
                f,
                " to={} threshold={} nodes={} epoch={}",
                o.to,
                o.sign_threshold,
                o.key_nodes.len(),
                o.epoch
            )?,
            Order::Collect(o) => write!(
                f,
                " from={} to={} amount={} deposits={}",
                o.collect_from_cu,
                o.collect_to_cu,
                o.amount,
                o.deposit_list.len()
            )?,
            Order::Withdrawal(o) => write!(
                f,
                " to_addr={} amount={} gas_fee={}",
                o.withdraw_to_addr, o.amount, o.gas_fee
            )?,
            Order::SysTransfer(o) => {
                write!(f, " to_cu={} to_addr={} amount={}", o.to_cu, o.to_addr, o.amount)?
            }
            Order::OpcuAssetTransfer(o) => write!(
                f,
                " from_addr={} to_addr={} items={}",
                o.from_addr,
                o.to_addr,
                o.transfer_items.len()
            )?,
        }
        write!(f, "}}")
    }
}

macro_rules! order_variant_conversions {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Order {
                fn from(order: $ty) -> Self {
                    Order::$variant(order)
                }
            }

            impl TryFrom<Order> for $ty {
                type Error = OrderError;

                fn try_from(order: Order) -> Result<Self, Self::Error> {
                    match order {
                        Order::$variant(o) => Ok(o),
                        other => Err(OrderError::TypeMismatch {
                            order_id: other.id().to_string(),
                            expected: <$ty as OrderVariant>::ORDER_TYPE.to_string(),
                            actual: other.variant_type().to_string(),
                        }),
                    }
                }
            }
        )+
    };
}

order_variant_conversions! {
    KeyGen => OrderKeyGen,
    Collect => OrderCollect,
    Withdrawal => OrderWithdrawal,
    SysTransfer => OrderSysTransfer,
    OpcuAssetTransfer => OrderOpcuAssetTransfer,
}

/// Rejects an id that is not a UUID.
pub fn check_order_id(order_id: &str) -> Result<(), OrderError> {
    if is_illegal_order_id(order_id) {
        return Err(OrderError::IllegalId {
            order_id: order_id.to_string(),
        });
    }
    Ok(())
}

/// Rejects a list with any malformed or repeated id.
pub fn check_order_id_list(order_ids: &[String]) -> Result<(), OrderError> {
    if is_illegal_order_id_list(order_ids) {
        return Err(OrderError::IllegalIdList {
            order_ids: order_ids.to_vec(),
        });
    }
    Ok(())
}
