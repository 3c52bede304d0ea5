// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Module that implements Display for FIB objects

use crate::fib::dpo::{Dpo, DpoKind};
use crate::fib::fibtype::{FibPrefix, FibSource, NhProto};
use crate::fib::path::{FibPath, PathKind, RecursiveNh};
use crate::fib::route_path::RoutePath;
use crate::pretty_utils::{Heading, line};
use generational_arena::Index;
use std::fmt::Display;

/// Compact rendering of an arena index as slot.generation
pub(crate) struct IndexDisp(pub Index);
impl Display for IndexDisp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "{slot}.{generation}")
    }
}

impl Display for NhProto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NhProto::Ipv4 => write!(f, "ipv4"),
            NhProto::Ipv6 => write!(f, "ipv6"),
            NhProto::Mpls => write!(f, "mpls"),
        }
    }
}

impl Display for FibSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FibSource::Special => write!(f, "special"),
            FibSource::Connected => write!(f, "connected"),
            FibSource::Static => write!(f, "static"),
            FibSource::Bgp => write!(f, "bgp"),
            FibSource::Rr => write!(f, "rr"),
        }
    }
}

impl Display for FibPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FibPrefix::Ip(p) => write!(f, "{p}"),
            FibPrefix::Mpls(label) => write!(f, "mpls:{label}"),
        }
    }
}

impl Display for Dpo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            DpoKind::Invalid => write!(f, "invalid"),
            DpoKind::Drop => write!(f, "[@{}]: dpo-drop", self.proto()),
            DpoKind::Adjacency(index) => {
                write!(f, "[@{}]: dpo-adjacency:{}", self.proto(), IndexDisp(*index))
            }
            DpoKind::AdjacencyGlean(index) => {
                write!(f, "[@{}]: dpo-glean:{}", self.proto(), IndexDisp(*index))
            }
            DpoKind::Lookup { table_id, .. } => {
                write!(f, "[@{}]: dpo-lookup in table {table_id}", self.proto())
            }
            DpoKind::Receive { ifindex, addr } => {
                write!(f, "[@{}]: dpo-receive {addr}", self.proto())?;
                if let Some(ifindex) = ifindex {
                    write!(f, " on interface:{ifindex}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.proto)?;
        if let Some(addr) = self.addr {
            write!(f, " via {addr}")?;
        }
        if let Some(label) = self.label {
            write!(f, " via label {label}")?;
        }
        if let Some(ifindex) = self.ifindex {
            write!(f, " interface:{ifindex}")?;
        }
        if let Some(table_id) = self.table_id {
            write!(f, " table:{table_id}")?;
        }
        write!(f, " weight={}", self.weight)
    }
}

fn fmt_flag_names<F>(f: &mut std::fmt::Formatter<'_>, names: F) -> std::fmt::Result
where
    F: Iterator<Item = &'static str>,
{
    for name in names {
        write!(f, "{},", name.to_lowercase().replace('_', "-"))?;
    }
    Ok(())
}

impl Display for FibPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pl-index:{} {} weight={} {}:",
            IndexDisp(self.pl_index()),
            self.proto(),
            self.weight(),
            self.kind().name()
        )?;
        if !self.oper_flags().is_empty() {
            write!(f, " oper-flags:")?;
            fmt_flag_names(f, self.oper_flags().iter_names().map(|(name, _)| name))?;
        }
        if !self.cfg_flags().is_empty() {
            write!(f, " cfg-flags:")?;
            fmt_flag_names(f, self.cfg_flags().iter_names().map(|(name, _)| name))?;
        }
        writeln!(f)?;
        match self.kind() {
            PathKind::AttachedNextHop { nh, ifindex } => {
                write!(f, "       {nh} if_index:{ifindex}")?;
                if !self.dpo().is_valid() {
                    write!(f, "\n          unresolved")?;
                } else {
                    write!(f, "\n          {}", self.dpo())?;
                }
            }
            PathKind::Attached { ifindex } => {
                write!(f, "       if_index:{ifindex}")?;
            }
            PathKind::Recursive { nh, table_id } => {
                match nh {
                    RecursiveNh::Ip(addr) => write!(f, "       via {addr}")?,
                    RecursiveNh::Label(label) => write!(f, "       via label {label}")?,
                }
                write!(f, " in fib:{table_id}")?;
                if let Some(via_fib) = self.via_fib() {
                    write!(f, " via-fib:{}", IndexDisp(via_fib))?;
                }
                write!(f, " via-dpo:{}", self.dpo())?;
            }
            PathKind::Receive { .. }
            | PathKind::Special
            | PathKind::Deag { .. }
            | PathKind::Exclusive { .. } => {
                if self.dpo().is_valid() {
                    write!(f, "       {}", self.dpo())?;
                }
            }
        }
        Ok(())
    }
}

/// One path rendered with its pool index, the way the show output lists them
pub struct FibPathView<'a> {
    pub index: Index,
    pub path: &'a FibPath,
}

impl Display for FibPathView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  index:{} {}", IndexDisp(self.index), self.path)
    }
}

/// The one-line forwarding rendering of a path
pub struct PathForwardingView<'a> {
    pub path: &'a FibPath,
}

impl Display for PathForwardingView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.dpo().is_valid() {
            write!(f, "{}", self.path.dpo())
        } else {
            write!(f, "unresolved")
        }
    }
}

/// All paths in a store, framed for the CLI
pub struct PathStoreView<'a> {
    pub store: &'a crate::fib::path::PathStore,
}

impl Display for PathStoreView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Heading(format!("FIB paths ({})", self.store.len())).fmt(f)?;
        for (index, path) in self.store.iter() {
            FibPathView { index, path }.fmt(f)?;
        }
        line(f)
    }
}
