//! Types library for the custody settlement core
//!
//! Shared value types used by the ledgers, the order model and the receipt
//! codec. Everything here is deterministic: no clocks, no randomness.
//!
//! # Modules
//! - `ids`: custodian addresses and order-id validation
//! - `numeric`: overflow-checked integer `Amount`
//! - `status`: `OrderType`, `OrderStatus`, `DepositItemStatus`
//! - `errors`: `ErrorKind` taxonomy and amount errors

pub mod ids;
pub mod numeric;
pub mod status;
pub mod errors;

pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::status::*;
    pub use crate::errors::*;
}
