// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The route-path descriptor: the API-facing description of one way to
//! reach a destination, as received from and encoded back to RPC clients.

use crate::fib::dpo::Dpo;
use crate::fib::fibtype::{NhProto, TableId};
use crate::interfaces::interface::IfIndex;
use crate::prefix::MplsLabel;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

bitflags! {
    /// Flags a client may set on a route-path
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct RoutePathFlags: u8 {
        /// Recursion may only resolve through a host prefix
        const RESOLVE_VIA_HOST = 0x01;
        /// Recursion may only resolve through an attached prefix
        const RESOLVE_VIA_ATTACHED = 0x02;
    }
}

impl Serialize for RoutePathFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for RoutePathFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        u8::deserialize(deserializer).map(RoutePathFlags::from_bits_truncate)
    }
}

/// A description of one way to reach a destination. The path layer derives
/// the path kind from which of these fields are populated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub proto: NhProto,
    pub addr: Option<IpAddr>,
    pub ifindex: Option<IfIndex>,
    pub table_id: Option<TableId>,
    pub label: Option<MplsLabel>,
    pub weight: u32,
    pub flags: RoutePathFlags,
}

impl RoutePath {
    /// A next-hop over a known interface
    #[must_use]
    pub fn via_nexthop_iface(proto: NhProto, addr: IpAddr, ifindex: IfIndex) -> Self {
        Self {
            proto,
            addr: Some(addr),
            ifindex: Some(ifindex),
            weight: 1,
            ..Default::default()
        }
    }
    /// An interface only; the destination is directly attached
    #[must_use]
    pub fn via_iface(proto: NhProto, ifindex: IfIndex) -> Self {
        Self {
            proto,
            ifindex: Some(ifindex),
            weight: 1,
            ..Default::default()
        }
    }
    /// A next-hop with no interface; resolution recurses through a table
    #[must_use]
    pub fn via_nexthop(proto: NhProto, addr: IpAddr, table_id: TableId) -> Self {
        Self {
            proto,
            addr: Some(addr),
            table_id: Some(table_id),
            weight: 1,
            ..Default::default()
        }
    }
    /// An MPLS local label; resolution recurses through the label space
    #[must_use]
    pub fn via_label(label: MplsLabel, table_id: TableId) -> Self {
        Self {
            proto: NhProto::Mpls,
            label: Some(label),
            table_id: Some(table_id),
            weight: 1,
            ..Default::default()
        }
    }
    /// Deaggregate: forward by looking up again in another table
    #[must_use]
    pub fn deag(proto: NhProto, table_id: TableId) -> Self {
        Self {
            proto,
            table_id: Some(table_id),
            weight: 1,
            ..Default::default()
        }
    }
    /// Nothing is known
    #[must_use]
    pub fn special(proto: NhProto) -> Self {
        Self {
            proto,
            weight: 1,
            ..Default::default()
        }
    }
    /// The destination is a local address on an interface
    #[must_use]
    pub fn receive(proto: NhProto, ifindex: IfIndex, addr: IpAddr) -> Self {
        Self {
            proto,
            addr: Some(addr),
            ifindex: Some(ifindex),
            weight: 1,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
    #[must_use]
    pub fn with_flags(mut self, flags: RoutePathFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A route-path encoded back for a client, together with the user DPO when
/// the path is exclusive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutePathEncode {
    pub rpath: RoutePath,
    pub dpo: Option<Dpo>,
}
