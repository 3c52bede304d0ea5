// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Data-path objects: tagged handles representing a forwarding action.
//! The path layer treats these as values with `set`, `copy_from`, `reset`
//! and `is_valid`; what the actions mean to the packet processor is not
//! this crate's business.

use crate::fib::fibtype::{AdjIndex, NhProto, TableId};
use crate::interfaces::interface::IfIndex;
use std::net::IpAddr;

/// What a lookup DPO keys the second lookup with
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LookupInput {
    DstAddr,
    SrcAddr,
}

/// Where a lookup DPO finds the table to look into
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LookupTable {
    FromConfig,
    FromInputInterface,
}

/// The action a [`Dpo`] stands for
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum DpoKind {
    #[default]
    Invalid,
    /// Drop the packet
    Drop,
    /// Forward through a neighbor adjacency
    Adjacency(AdjIndex),
    /// Punt to neighbor discovery for the connected subnet
    AdjacencyGlean(AdjIndex),
    /// Deaggregate: look the packet up again in another table
    Lookup {
        table_id: TableId,
        input: LookupInput,
        table: LookupTable,
    },
    /// The packet is for-us
    Receive { ifindex: Option<IfIndex>, addr: IpAddr },
}

/// A data-path object: an action tagged with the protocol it forwards
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Dpo {
    proto: NhProto,
    kind: DpoKind,
}

impl Dpo {
    /// The invalid DPO: contributes nothing
    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }

    /// The drop DPO of a protocol
    #[must_use]
    pub fn drop(proto: NhProto) -> Self {
        Self {
            proto,
            kind: DpoKind::Drop,
        }
    }

    #[must_use]
    pub fn new(proto: NhProto, kind: DpoKind) -> Self {
        Self { proto, kind }
    }

    pub fn set(&mut self, proto: NhProto, kind: DpoKind) {
        self.proto = proto;
        self.kind = kind;
    }

    pub fn copy_from(&mut self, other: &Dpo) {
        self.proto = other.proto;
        self.kind = other.kind.clone();
    }

    pub fn reset(&mut self) {
        self.kind = DpoKind::Invalid;
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.kind != DpoKind::Invalid
    }

    #[must_use]
    pub fn is_drop(&self) -> bool {
        self.kind == DpoKind::Drop
    }

    /// Tell if the DPO resolves through an adjacency (neighbor or glean)
    #[must_use]
    pub fn is_adj(&self) -> bool {
        matches!(
            self.kind,
            DpoKind::Adjacency(_) | DpoKind::AdjacencyGlean(_)
        )
    }

    /// The adjacency this DPO forwards through, if it is adjacency-backed
    #[must_use]
    pub fn adj_index(&self) -> Option<AdjIndex> {
        match self.kind {
            DpoKind::Adjacency(index) | DpoKind::AdjacencyGlean(index) => Some(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn proto(&self) -> NhProto {
        self.proto
    }

    #[must_use]
    pub fn kind(&self) -> &DpoKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use generational_arena::Index;

    #[test]
    fn test_dpo_lifecycle() {
        let mut dpo = Dpo::invalid();
        assert!(!dpo.is_valid());

        dpo.set(NhProto::Ipv4, DpoKind::Adjacency(Index::from_raw_parts(1, 0)));
        assert!(dpo.is_valid());
        assert!(dpo.is_adj());
        assert_eq!(dpo.adj_index(), Some(Index::from_raw_parts(1, 0)));

        let mut other = Dpo::invalid();
        other.copy_from(&dpo);
        assert_eq!(other, dpo);

        dpo.reset();
        assert!(!dpo.is_valid());
        assert!(other.is_valid(), "copies are independent");
    }

    #[test]
    fn test_drop_dpo() {
        let dpo = Dpo::drop(NhProto::Ipv6);
        assert!(dpo.is_valid());
        assert!(dpo.is_drop());
        assert!(!dpo.is_adj());
        assert_eq!(dpo.proto(), NhProto::Ipv6);
        assert_eq!(dpo.adj_index(), None);
    }
}
