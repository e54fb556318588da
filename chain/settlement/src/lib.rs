//! Settlement core for the multi-chain custody bridge
//!
//! Tracks custodial deposits and spendable outputs, models every
//! cross-chain order, and records each side effect of a state transition as
//! a typed flow. All operations are synchronous and deterministic: the same
//! inputs produce byte-identical ledgers and receipts on every validator.
//!
//! # Modules
//! - `errors`: ledger and order error types
//! - `deposit`: deposit ledger keyed by `(hash, index)`
//! - `utxo`: UTXO set operations for coin selection
//! - `order`: order model over all cross-chain operation kinds
//! - `flow`: flow records (diffs of one side effect)
//! - `receipt`: category-tagged bundles of flows

pub mod errors;
pub mod deposit;
pub mod utxo;
pub mod order;
pub mod flow;
pub mod receipt;

pub use deposit::{DepositItem, DepositList};
pub use flow::{Flow, FlowKind};
pub use order::{Order, OrderBase, OrderVariant};
pub use receipt::{CategoryType, Receipt};
pub use utxo::{UtxoIn, UtxoIns, UtxoOut, UtxoOuts};
