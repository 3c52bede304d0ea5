// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! FIB tables and the entry store. Tables map IP prefixes (tries) and MPLS
//! labels to entries; entries are pooled in an arena and addressed by index.

use crate::errors::FibError;
use crate::fib::entry::{EntryFlags, EntrySource, FibEntry};
use crate::fib::fibtype::{EntryIndex, FibPrefix, FibSource, TableId};
use crate::graph::ChildNode;
use crate::prefix::{MplsLabel, Prefix};
use ahash::RandomState;
use generational_arena::Arena;
use iptrie::map::RTrieMap;
use iptrie::{IpPrefix, Ipv4Prefix, Ipv6Prefix};
use std::collections::HashMap;
use tracing::{debug, error};

/// One FIB table: the prefix-to-entry maps for a routing instance
pub struct FibTable {
    id: TableId,
    routesv4: RTrieMap<Ipv4Prefix, Option<EntryIndex>>,
    routesv6: RTrieMap<Ipv6Prefix, Option<EntryIndex>>,
    labels: HashMap<MplsLabel, EntryIndex, RandomState>,
}

impl FibTable {
    #[must_use]
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            routesv4: RTrieMap::new(),
            routesv6: RTrieMap::new(),
            labels: HashMap::with_hasher(RandomState::with_seed(0)),
        }
    }

    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Number of entries in the table. The trie roots do not count.
    #[must_use]
    pub fn len(&self) -> usize {
        let v4 = self.routesv4.iter().filter(|(_, e)| e.is_some()).count();
        let v6 = self.routesv6.iter().filter(|(_, e)| e.is_some()).count();
        v4 + v6 + self.labels.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, prefix: FibPrefix, entry_index: EntryIndex) {
        match prefix {
            FibPrefix::Ip(Prefix::IPV4(p)) => {
                self.routesv4.insert(p, Some(entry_index));
            }
            FibPrefix::Ip(Prefix::IPV6(p)) => {
                self.routesv6.insert(p, Some(entry_index));
            }
            FibPrefix::Mpls(label) => {
                self.labels.insert(label, entry_index);
            }
        }
    }

    pub(crate) fn remove(&mut self, prefix: FibPrefix) {
        match prefix {
            FibPrefix::Ip(Prefix::IPV4(p)) => {
                /* the trie forbids removing its root; blank it instead */
                if p.len() == 0 {
                    self.routesv4.insert(p, None);
                } else {
                    self.routesv4.remove(&p);
                }
            }
            FibPrefix::Ip(Prefix::IPV6(p)) => {
                if p.len() == 0 {
                    self.routesv6.insert(p, None);
                } else {
                    self.routesv6.remove(&p);
                }
            }
            FibPrefix::Mpls(label) => {
                self.labels.remove(&label);
            }
        }
    }

    /// Exact-match lookup
    #[must_use]
    pub fn get(&self, prefix: FibPrefix) -> Option<EntryIndex> {
        match prefix {
            FibPrefix::Ip(Prefix::IPV4(p)) => self.routesv4.get(&p).copied().flatten(),
            FibPrefix::Ip(Prefix::IPV6(p)) => self.routesv6.get(&p).copied().flatten(),
            FibPrefix::Mpls(label) => self.labels.get(&label).copied(),
        }
    }

    /// The longest prefix covering `prefix`, excluding `prefix` itself.
    /// Labels have no cover.
    #[must_use]
    pub fn cover_lookup(&self, prefix: FibPrefix) -> Option<EntryIndex> {
        let FibPrefix::Ip(p) = prefix else {
            return None;
        };
        if p.length() == 0 {
            return None;
        }
        let Ok(shorter) = p.truncate(p.length() - 1) else {
            return None;
        };
        match shorter {
            Prefix::IPV4(c) => {
                let (_, entry) = self.routesv4.lookup(&c);
                *entry
            }
            Prefix::IPV6(c) => {
                let (_, entry) = self.routesv6.lookup(&c);
                *entry
            }
        }
    }
}

/// The store of all FIB tables and entries
pub struct FibTableStore {
    tables: HashMap<TableId, FibTable, RandomState>,
    entries: Arena<FibEntry>,
}

impl Default for FibTableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FibTableStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: HashMap::with_hasher(RandomState::with_seed(0)),
            entries: Arena::new(),
        }
    }

    /// Create a table.
    ///
    /// # Errors
    /// Fails if a table with the same id exists.
    pub fn add_table(&mut self, id: TableId) -> Result<(), FibError> {
        if self.tables.contains_key(&id) {
            return Err(FibError::TableExists(id));
        }
        debug!("Created FIB table {id}");
        self.tables.insert(id, FibTable::new(id));
        Ok(())
    }

    /// Get a table.
    ///
    /// # Errors
    /// Fails if no table has the given id.
    pub fn get_table(&self, id: TableId) -> Result<&FibTable, FibError> {
        self.tables.get(&id).ok_or(FibError::NoSuchTable(id))
    }

    fn get_or_create_table(&mut self, id: TableId) -> &mut FibTable {
        self.tables.entry(id).or_insert_with(|| {
            debug!("Created FIB table {id}");
            FibTable::new(id)
        })
    }

    #[must_use]
    pub fn entry(&self, index: EntryIndex) -> Option<&FibEntry> {
        self.entries.get(index)
    }
    pub fn entry_mut(&mut self, index: EntryIndex) -> Option<&mut FibEntry> {
        self.entries.get_mut(index)
    }
    #[must_use]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Exact lookup of an entry in a table
    #[must_use]
    pub fn entry_lookup(&self, table_id: TableId, prefix: FibPrefix) -> Option<EntryIndex> {
        self.tables.get(&table_id).and_then(|t| t.get(prefix))
    }

    /// Add a source to the entry for a prefix, creating the entry (and
    /// table) if needed. Returns the entry's index.
    pub fn entry_special_add(
        &mut self,
        table_id: TableId,
        prefix: FibPrefix,
        source: FibSource,
        flags: EntryFlags,
    ) -> EntryIndex {
        let existing = self.get_or_create_table(table_id).get(prefix);
        let index = match existing {
            Some(index) => index,
            None => {
                let index = self.entries.insert(FibEntry::new(table_id, prefix));
                self.get_or_create_table(table_id).insert(prefix, index);
                debug!("Created entry for {prefix:?} in table {table_id}");
                index
            }
        };
        if let Some(entry) = self.entries.get_mut(index) {
            if !entry.has_source(source) {
                entry.add_source(source, EntrySource::with_flags(flags));
            }
        }
        index
    }

    /// Remove a source from the entry for a prefix. The entry is reclaimed
    /// when its last source goes.
    pub fn entry_special_remove(&mut self, table_id: TableId, prefix: FibPrefix, source: FibSource) {
        let Some(index) = self.entry_lookup(table_id, prefix) else {
            error!("special-remove: no entry for {prefix:?} in table {table_id}");
            return;
        };
        let Some(entry) = self.entries.get_mut(index) else {
            return;
        };
        if entry.remove_source(source) {
            debug_assert!(
                entry.children.is_empty(),
                "reclaiming entry with children"
            );
            if let Some(table) = self.tables.get_mut(&table_id) {
                table.remove(prefix);
            }
            self.entries.remove(index);
            debug!("Removed entry for {prefix:?} from table {table_id}");
        }
    }

    #[must_use]
    pub fn get_best_source(&self, index: EntryIndex) -> Option<FibSource> {
        self.entries.get(index).and_then(FibEntry::best_source)
    }

    #[must_use]
    pub fn get_prefix(&self, index: EntryIndex) -> Option<FibPrefix> {
        self.entries.get(index).map(FibEntry::prefix)
    }

    /// The longest-prefix cover of an entry within its own table
    #[must_use]
    pub fn cover_of(&self, index: EntryIndex) -> Option<EntryIndex> {
        let entry = self.entries.get(index)?;
        self.tables
            .get(&entry.table_id())
            .and_then(|table| table.cover_lookup(entry.prefix()))
    }

    /// Snapshot of the children of an entry
    #[must_use]
    pub fn children_of(&self, index: EntryIndex) -> Vec<ChildNode> {
        self.entries
            .get(index)
            .map_or_else(Vec::new, |entry| entry.children.collect())
    }

    #[must_use]
    pub fn child_count(&self, index: EntryIndex) -> usize {
        self.entries.get(index).map_or(0, |e| e.children.len())
    }

    pub fn table_ids(&self) -> impl Iterator<Item = TableId> + '_ {
        self.tables.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefix::Prefix;

    fn ip(prefix: &str) -> FibPrefix {
        FibPrefix::Ip(Prefix::from(prefix))
    }

    #[test]
    fn test_entry_source_lifecycle() {
        let mut store = FibTableStore::new();
        let pfx = ip("10.1.1.1/32");

        let e1 = store.entry_special_add(0, pfx, FibSource::Rr, EntryFlags::empty());
        assert_eq!(store.entry_lookup(0, pfx), Some(e1));
        assert_eq!(store.get_best_source(e1), Some(FibSource::Rr));

        /* a better source on the same prefix reuses the entry */
        let e2 = store.entry_special_add(0, pfx, FibSource::Static, EntryFlags::empty());
        assert_eq!(e1, e2);
        assert_eq!(store.get_best_source(e1), Some(FibSource::Static));

        store.entry_special_remove(0, pfx, FibSource::Static);
        assert_eq!(store.get_best_source(e1), Some(FibSource::Rr));

        store.entry_special_remove(0, pfx, FibSource::Rr);
        assert_eq!(store.entry_lookup(0, pfx), None);
        assert!(store.entry(e1).is_none(), "Entry slot reclaimed");
    }

    #[test]
    fn test_cover_lookup() {
        let mut store = FibTableStore::new();
        let cover = store.entry_special_add(0, ip("10.0.0.0/8"), FibSource::Static, EntryFlags::empty());
        let host = store.entry_special_add(0, ip("10.1.1.1/32"), FibSource::Rr, EntryFlags::empty());

        assert_eq!(store.cover_of(host), Some(cover));
        assert_eq!(store.cover_of(cover), None, "No cover registered above /8");

        /* a more specific cover wins */
        let closer =
            store.entry_special_add(0, ip("10.1.0.0/16"), FibSource::Bgp, EntryFlags::empty());
        assert_eq!(store.cover_of(host), Some(closer));
    }

    #[test]
    fn test_mpls_label_space() {
        let mut store = FibTableStore::new();
        let label = FibPrefix::Mpls(MplsLabel(100));
        let e = store.entry_special_add(0, label, FibSource::Rr, EntryFlags::empty());
        assert_eq!(store.entry_lookup(0, label), Some(e));
        assert_eq!(store.cover_of(e), None, "Labels have no cover");
        store.entry_special_remove(0, label, FibSource::Rr);
        assert_eq!(store.entry_lookup(0, label), None);
    }
}
