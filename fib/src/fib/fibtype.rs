// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Shared vocabulary of the FIB: protocols, link and chain types, sources,
//! prefixes and index aliases.

use crate::interfaces::interface::IfIndex;
use crate::prefix::{MplsLabel, Prefix, zero_addr_v4, zero_addr_v6};
use generational_arena::Index;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Every FIB table is univocally identified with a numerical table id
pub type TableId = u32;

/// The table MPLS deaggregation falls back to for non-EOS lookups
pub const MPLS_DEFAULT_TABLE_ID: TableId = 0;

/// Paths are addressed by a stable index into a pool; the index is the
/// path's identity to the outside world.
pub type PathIndex = Index;
pub type PathListIndex = Index;
pub type EntryIndex = Index;
pub type AdjIndex = Index;

/// The address family of a next-hop. Kept explicitly because a zero
/// address is not self-describing.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum NhProto {
    #[default]
    Ipv4,
    Ipv6,
    Mpls,
}

impl NhProto {
    /// The link type adjacencies are keyed with for this protocol
    #[must_use]
    pub fn link_type(self) -> LinkType {
        match self {
            NhProto::Ipv4 => LinkType::Ipv4,
            NhProto::Ipv6 => LinkType::Ipv6,
            NhProto::Mpls => LinkType::Mpls,
        }
    }
    /// The native forwarding chain of this protocol
    #[must_use]
    pub fn chain_type(self) -> ChainType {
        match self {
            NhProto::Ipv4 => ChainType::UnicastIpv4,
            NhProto::Ipv6 => ChainType::UnicastIpv6,
            NhProto::Mpls => ChainType::MplsNonEos,
        }
    }
    /// The all-zeros address of the family. MPLS next-hops are IP addresses,
    /// so the v4 zero stands in for them.
    #[must_use]
    pub fn zero_addr(self) -> IpAddr {
        match self {
            NhProto::Ipv4 | NhProto::Mpls => zero_addr_v4(),
            NhProto::Ipv6 => zero_addr_v6(),
        }
    }
}

/// The link type of an adjacency
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LinkType {
    Ipv4,
    Ipv6,
    Mpls,
    Ethernet,
}

/// The protocol profile for which a forwarding contribution is requested
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ChainType {
    UnicastIpv4,
    UnicastIpv6,
    MplsEos,
    MplsNonEos,
    Ethernet,
}

impl ChainType {
    #[must_use]
    pub fn link_type(self) -> LinkType {
        match self {
            ChainType::UnicastIpv4 => LinkType::Ipv4,
            ChainType::UnicastIpv6 => LinkType::Ipv6,
            ChainType::MplsEos | ChainType::MplsNonEos => LinkType::Mpls,
            ChainType::Ethernet => LinkType::Ethernet,
        }
    }
    /// The protocol tag DPOs built for this chain carry
    #[must_use]
    pub fn dpo_proto(self) -> NhProto {
        match self {
            ChainType::UnicastIpv4 | ChainType::Ethernet => NhProto::Ipv4,
            ChainType::UnicastIpv6 => NhProto::Ipv6,
            ChainType::MplsEos | ChainType::MplsNonEos => NhProto::Mpls,
        }
    }
}

/// The sources that may contribute an entry, in priority order: earlier
/// variants win. `Rr` is the lowest-priority source, used as a placeholder
/// to pin forwarding dependencies without contributing anything of its own
/// when another source is present.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FibSource {
    Special,
    Connected,
    Static,
    Bgp,
    Rr,
}

/// A prefix in one of the spaces a FIB table covers: IP or MPLS label
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FibPrefix {
    Ip(Prefix),
    Mpls(MplsLabel),
}

impl FibPrefix {
    /// Host prefixes cover exactly one destination. Labels always do.
    #[must_use]
    pub fn is_host(&self) -> bool {
        match self {
            FibPrefix::Ip(p) => p.is_host(),
            FibPrefix::Mpls(_) => true,
        }
    }
}

/// The set of admissible ingress interfaces for a prefix (uRPF)
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct UrpfList {
    itfs: Vec<IfIndex>,
}

impl UrpfList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    pub fn append(&mut self, ifindex: IfIndex) {
        self.itfs.push(ifindex);
    }
    #[must_use]
    pub fn contains(&self, ifindex: IfIndex) -> bool {
        self.itfs.contains(&ifindex)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.itfs.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.itfs.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &IfIndex> {
        self.itfs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The recursion constraints compare against `Rr` with `>=`; that only
    /// pins "no other source" while `Rr` stays the greatest variant.
    #[test]
    fn test_rr_is_lowest_priority() {
        let all = [
            FibSource::Special,
            FibSource::Connected,
            FibSource::Static,
            FibSource::Bgp,
            FibSource::Rr,
        ];
        assert_eq!(all.iter().max(), Some(&FibSource::Rr));
        for source in &all {
            assert!(*source <= FibSource::Rr);
        }
    }

    #[test]
    fn test_chain_per_proto() {
        assert_eq!(NhProto::Ipv4.chain_type(), ChainType::UnicastIpv4);
        assert_eq!(NhProto::Ipv6.chain_type(), ChainType::UnicastIpv6);
        assert_eq!(NhProto::Mpls.chain_type(), ChainType::MplsNonEos);
        assert_eq!(ChainType::MplsEos.link_type(), LinkType::Mpls);
        assert_eq!(ChainType::Ethernet.dpo_proto(), NhProto::Ipv4);
    }
}
