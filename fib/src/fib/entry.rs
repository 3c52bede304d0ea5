// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! FIB entries: a prefix with one or more sources contributing forwarding.
//! Entries are the via-targets of recursive paths; paths subscribe to them
//! as children to learn when the entry's forwarding changes.

use crate::fib::dpo::Dpo;
use crate::fib::fibtype::{ChainType, EntryIndex, FibPrefix, FibSource, PathListIndex, TableId, UrpfList};
use crate::fibdb::FibDb;
use crate::graph::{ChildList, ChildNode, SiblingToken};
use crate::interfaces::interface::IfIndex;
use bitflags::bitflags;
use std::collections::BTreeMap;

bitflags! {
    /// Attributes an entry's source may carry
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct EntryFlags: u8 {
        /// The prefix is directly attached to an interface
        const ATTACHED = 0x01;
        /// The prefix is a connected subnet
        const CONNECTED = 0x02;
        /// The prefix is a local address
        const LOCAL = 0x04;
    }
}

/// What one source contributes to an entry: flags, and either an explicit
/// forwarding DPO or a backing path-list.
#[derive(Clone, Debug, Default)]
pub struct EntrySource {
    pub flags: EntryFlags,
    pub dpo: Dpo,
    pub path_list: Option<PathListIndex>,
}

impl EntrySource {
    #[must_use]
    pub fn with_flags(flags: EntryFlags) -> Self {
        Self {
            flags,
            ..Default::default()
        }
    }
}

/// A FIB entry. The source map is ordered by priority: the first source is
/// the best one, and it alone contributes forwarding.
#[derive(Debug)]
pub struct FibEntry {
    prefix: FibPrefix,
    table_id: TableId,
    sources: BTreeMap<FibSource, EntrySource>,
    pub(crate) children: ChildList,
}

impl FibEntry {
    #[must_use]
    pub fn new(table_id: TableId, prefix: FibPrefix) -> Self {
        Self {
            prefix,
            table_id,
            sources: BTreeMap::new(),
            children: ChildList::new(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> FibPrefix {
        self.prefix
    }
    #[must_use]
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn add_source(&mut self, source: FibSource, data: EntrySource) {
        self.sources.insert(source, data);
    }
    /// Remove a source. Returns true when no source is left.
    pub fn remove_source(&mut self, source: FibSource) -> bool {
        self.sources.remove(&source);
        self.sources.is_empty()
    }
    #[must_use]
    pub fn has_source(&self, source: FibSource) -> bool {
        self.sources.contains_key(&source)
    }

    /// The highest-priority source present on the entry
    #[must_use]
    pub fn best_source(&self) -> Option<FibSource> {
        self.sources.keys().next().copied()
    }
    #[must_use]
    pub fn best(&self) -> Option<(FibSource, &EntrySource)> {
        self.sources.iter().next().map(|(s, d)| (*s, d))
    }
    pub fn source_mut(&mut self, source: FibSource) -> Option<&mut EntrySource> {
        self.sources.get_mut(&source)
    }

    /// The flags of the best source. RR pins inherit the flags of their
    /// cover, which is resolved at the store level.
    #[must_use]
    pub fn flags(&self) -> EntryFlags {
        self.best().map(|(_, data)| data.flags).unwrap_or_default()
    }
}

impl FibDb {
    /// The forwarding DPO an entry contributes in a chain. An entry whose
    /// best source is the RR pin contributes nothing of its own: it inherits
    /// the forwarding of its longest-prefix cover.
    #[must_use]
    pub fn entry_contribute_forwarding(&self, entry_index: EntryIndex, fct: ChainType) -> Dpo {
        let Some(entry) = self.tables.entry(entry_index) else {
            return Dpo::drop(fct.dpo_proto());
        };
        let Some((source, data)) = entry.best() else {
            return Dpo::drop(fct.dpo_proto());
        };
        if source >= FibSource::Rr {
            return match self.tables.cover_of(entry_index) {
                Some(cover) => self.entry_contribute_forwarding(cover, fct),
                None => Dpo::drop(fct.dpo_proto()),
            };
        }
        if data.dpo.is_valid() {
            return data.dpo.clone();
        }
        if let Some(pl_index) = data.path_list {
            for path_index in self.pathlists.paths(pl_index) {
                if self.path_is_resolved(path_index) {
                    if let Some(path) = self.paths.get(path_index) {
                        return path.dpo().clone();
                    }
                }
            }
        }
        Dpo::drop(fct.dpo_proto())
    }

    /// The flags of the entry's best real source; RR pins inherit their
    /// cover's flags.
    #[must_use]
    pub fn entry_get_flags(&self, entry_index: EntryIndex) -> EntryFlags {
        let Some(entry) = self.tables.entry(entry_index) else {
            return EntryFlags::empty();
        };
        match entry.best() {
            Some((source, _)) if source >= FibSource::Rr => self
                .tables
                .cover_of(entry_index)
                .map(|cover| self.entry_get_flags(cover))
                .unwrap_or_default(),
            Some((_, data)) => data.flags,
            None => EntryFlags::empty(),
        }
    }

    /// The interface the entry's forwarding resolves through, if any
    #[must_use]
    pub fn entry_get_resolving_interface(&self, entry_index: EntryIndex) -> Option<IfIndex> {
        let entry = self.tables.entry(entry_index)?;
        let (source, data) = entry.best()?;
        if source >= FibSource::Rr {
            let cover = self.tables.cover_of(entry_index)?;
            return self.entry_get_resolving_interface(cover);
        }
        if let Some(adj) = data.dpo.adj_index() {
            return self.atable.get(adj).map(|adj| adj.ifindex());
        }
        if let Some(pl_index) = data.path_list {
            for path_index in self.pathlists.paths(pl_index) {
                if self.path_is_resolved(path_index) {
                    return self.path_get_resolving_interface(path_index);
                }
            }
        }
        None
    }

    /// Contribute the entry's admissible ingress interfaces
    pub fn entry_contribute_urpf(&self, entry_index: EntryIndex, urpf: &mut UrpfList) {
        let Some(entry) = self.tables.entry(entry_index) else {
            return;
        };
        let Some((source, data)) = entry.best() else {
            return;
        };
        if source >= FibSource::Rr {
            if let Some(cover) = self.tables.cover_of(entry_index) {
                self.entry_contribute_urpf(cover, urpf);
            }
            return;
        }
        if let Some(adj) = data.dpo.adj_index() {
            if let Some(adj) = self.atable.get(adj) {
                urpf.append(adj.ifindex());
            }
            return;
        }
        if let Some(pl_index) = data.path_list {
            for path_index in self.pathlists.paths(pl_index) {
                self.path_contribute_urpf(path_index, urpf);
            }
        }
    }

    /// Forward walk of the entry for loop detection. The entry adds itself
    /// to the visited set and walks the paths backing its best source.
    pub fn entry_recursive_loop_detect(
        &mut self,
        entry_index: EntryIndex,
        visited: &mut Vec<EntryIndex>,
    ) -> bool {
        visited.push(entry_index);
        let path_indices: Vec<_> = self
            .tables
            .entry(entry_index)
            .and_then(|entry| entry.best())
            .and_then(|(_, data)| data.path_list)
            .map(|pl_index| self.pathlists.paths(pl_index))
            .unwrap_or_default();
        let mut looped = false;
        for path_index in path_indices {
            looped |= self.path_recursive_loop_detect(path_index, visited);
        }
        looped
    }

    /// Register a path as a dependent child of an entry
    pub fn entry_child_add(
        &mut self,
        entry_index: EntryIndex,
        child: ChildNode,
    ) -> Option<SiblingToken> {
        self.tables
            .entry_mut(entry_index)
            .map(|entry| entry.children.add(child))
    }

    pub fn entry_child_remove(&mut self, entry_index: EntryIndex, token: SiblingToken) {
        if let Some(entry) = self.tables.entry_mut(entry_index) {
            entry.children.remove(token);
        }
    }
}
