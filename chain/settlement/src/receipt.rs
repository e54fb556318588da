//! Receipts: ordered bundles of flows attached to an operation's result

use serde::{Deserialize, Serialize};

use crate::flow::{Flow, FlowKind};

/// Routing tag for a receipt. Does not restrict which flows it carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CategoryType {
    #[default]
    Unknown = 0,
    Transfer = 1,
    Deposit = 2,
    Withdrawal = 3,
    Collect = 4,
    KeyGen = 5,
    SysTransfer = 6,
    OpcuAssetTransfer = 7,
    Mapping = 8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub category: CategoryType,
    pub flows: Vec<Flow>,
}

impl Receipt {
    pub fn new(category: CategoryType, flows: Vec<Flow>) -> Self {
        Self { category, flows }
    }

    /// Appends after every flow already recorded.
    pub fn push(&mut self, flow: Flow) {
        self.flows.push(flow);
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    pub fn flows_of_kind(&self, kind: FlowKind) -> impl Iterator<Item = &Flow> {
        self.flows.iter().filter(move |flow| flow.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{one_of_each_kind, BalanceFlow, OrderFlow};
    use custody_types::ids::CuAddress;
    use custody_types::numeric::Amount;

    #[test]
    fn test_push_preserves_mutation_order() {
        let mut receipt = Receipt::new(CategoryType::Transfer, Vec::new());
        let debit = BalanceFlow {
            cu_address: CuAddress::new("from"),
            balance_change: Amount::new(-10),
            ..Default::default()
        };
        let credit = BalanceFlow {
            cu_address: CuAddress::new("to"),
            balance_change: Amount::new(10),
            ..Default::default()
        };
        receipt.push(Flow::Balance(debit.clone()));
        receipt.push(Flow::Balance(credit.clone()));
        receipt.push(Flow::Order(OrderFlow::default()));

        assert_eq!(receipt.flows[0], Flow::Balance(debit));
        assert_eq!(receipt.flows[1], Flow::Balance(credit));
        assert_eq!(receipt.flows_of_kind(FlowKind::Balance).count(), 2);
    }

    #[test]
    fn test_heterogeneous_flows_keep_identity_through_serde() {
        let receipt = Receipt::new(CategoryType::Withdrawal, one_of_each_kind());
        let bytes = bincode::serialize(&receipt).unwrap();
        let back: Receipt = bincode::deserialize(&bytes).unwrap();
        assert_eq!(receipt, back);
        let kinds: Vec<_> = back.flows.iter().map(Flow::kind).collect();
        assert_eq!(kinds.len(), 22);
        assert_eq!(kinds[21], FlowKind::MappingBalance);
    }
}
