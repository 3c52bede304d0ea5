// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! State objects to keep adjacency information. Adjacencies are explicitly
//! locked and unlocked; a lock count of zero reclaims the object. Paths
//! subscribe to adjacencies as children to learn of rewrite changes.

use crate::fib::fibtype::{AdjIndex, LinkType, NhProto};
use crate::graph::{ChildList, ChildNode, SiblingToken};
use crate::interfaces::interface::IfIndex;
use ahash::RandomState;
use generational_arena::Arena;
use std::collections::HashMap;
use std::net::IpAddr;
use tracing::{debug, error};

/// The key univocally identifying an adjacency.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AdjKey {
    /// A neighbor adjacency: a rewrite towards a neighbor over an interface
    Nbr {
        proto: NhProto,
        link: LinkType,
        addr: IpAddr,
        ifindex: IfIndex,
    },
    /// A glean adjacency: punt to neighbor discovery for the connected subnet
    Glean { proto: NhProto, ifindex: IfIndex },
}

impl AdjKey {
    #[must_use]
    pub fn ifindex(&self) -> IfIndex {
        match self {
            AdjKey::Nbr { ifindex, .. } | AdjKey::Glean { ifindex, .. } => *ifindex,
        }
    }
}

/// Object that represents an adjacency
#[derive(Debug)]
pub struct Adjacency {
    key: AdjKey,
    locks: u32,
    children: ChildList,
}

impl Adjacency {
    fn new(key: AdjKey) -> Self {
        Self {
            key,
            locks: 0,
            children: ChildList::new(),
        }
    }
    #[must_use]
    pub fn key(&self) -> &AdjKey {
        &self.key
    }
    #[must_use]
    pub fn ifindex(&self) -> IfIndex {
        self.key.ifindex()
    }
    #[must_use]
    pub fn is_glean(&self) -> bool {
        matches!(self.key, AdjKey::Glean { .. })
    }
    #[must_use]
    pub fn locks(&self) -> u32 {
        self.locks
    }
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// A table of [`Adjacency`]ies
pub struct AdjacencyTable {
    arena: Arena<Adjacency>,
    by_key: HashMap<AdjKey, AdjIndex, RandomState>,
}

impl Default for AdjacencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::len_without_is_empty)]
impl AdjacencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_key: HashMap::with_hasher(RandomState::with_seed(0)),
        }
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }
    pub fn iter(&self) -> impl Iterator<Item = (AdjIndex, &Adjacency)> {
        self.arena.iter()
    }
    #[must_use]
    pub fn get(&self, index: AdjIndex) -> Option<&Adjacency> {
        self.arena.get(index)
    }
    #[must_use]
    pub fn get_index(&self, key: &AdjKey) -> Option<AdjIndex> {
        self.by_key.get(key).copied()
    }
    /// Lock count of an adjacency; 0 if it does not exist.
    #[must_use]
    pub fn lock_count(&self, index: AdjIndex) -> u32 {
        self.arena.get(index).map_or(0, Adjacency::locks)
    }

    fn add_or_lock(&mut self, key: AdjKey) -> AdjIndex {
        let index = if let Some(index) = self.by_key.get(&key) {
            *index
        } else {
            let index = self.arena.insert(Adjacency::new(key.clone()));
            debug!("Created adjacency {key:?}");
            self.by_key.insert(key, index);
            index
        };
        if let Some(adj) = self.arena.get_mut(index) {
            adj.locks += 1;
        }
        index
    }

    /// Get or create the neighbor adjacency for (proto, link, addr, interface),
    /// taking a lock on it.
    pub fn nbr_add_or_lock(
        &mut self,
        proto: NhProto,
        link: LinkType,
        addr: IpAddr,
        ifindex: IfIndex,
    ) -> AdjIndex {
        self.add_or_lock(AdjKey::Nbr {
            proto,
            link,
            addr,
            ifindex,
        })
    }

    /// Get or create the glean adjacency for (proto, interface), taking a
    /// lock on it.
    pub fn glean_add_or_lock(&mut self, proto: NhProto, ifindex: IfIndex) -> AdjIndex {
        self.add_or_lock(AdjKey::Glean { proto, ifindex })
    }

    /// Release one lock. The adjacency is reclaimed when the last lock goes.
    pub fn unlock(&mut self, index: AdjIndex) {
        let Some(adj) = self.arena.get_mut(index) else {
            error!("unlock of unknown adjacency {index:?}");
            return;
        };
        debug_assert!(adj.locks > 0, "unlock without a lock");
        adj.locks = adj.locks.saturating_sub(1);
        if adj.locks == 0 {
            debug_assert!(adj.children.is_empty(), "reclaiming adjacency with children");
            let key = adj.key.clone();
            self.by_key.remove(&key);
            self.arena.remove(index);
            debug!("Reclaimed adjacency {key:?}");
        }
    }

    /// Register a child to be notified when the adjacency changes.
    pub fn child_add(&mut self, index: AdjIndex, child: ChildNode) -> Option<SiblingToken> {
        self.arena
            .get_mut(index)
            .map(|adj| adj.children.add(child))
    }

    pub fn child_remove(&mut self, index: AdjIndex, token: SiblingToken) {
        if let Some(adj) = self.arena.get_mut(index) {
            adj.children.remove(token);
        }
    }

    /// Snapshot of the children of an adjacency
    #[must_use]
    pub fn children_of(&self, index: AdjIndex) -> Vec<ChildNode> {
        self.arena
            .get(index)
            .map_or_else(Vec::new, |adj| adj.children.collect())
    }

    /// All adjacencies over a given interface
    #[must_use]
    pub fn adjacencies_on(&self, ifindex: IfIndex) -> Vec<AdjIndex> {
        self.arena
            .iter()
            .filter(|(_, adj)| adj.ifindex() == ifindex)
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fib::fibtype::{LinkType, NhProto};
    use generational_arena::Index;

    fn mk_addr(a: &str) -> IpAddr {
        a.parse().expect("Bad address")
    }

    #[test]
    fn test_adj_lock_discipline() {
        let mut atable = AdjacencyTable::new();
        let ifindex = IfIndex::new(2);

        let a1 = atable.nbr_add_or_lock(NhProto::Ipv4, LinkType::Ipv4, mk_addr("10.0.0.1"), ifindex);
        assert_eq!(atable.lock_count(a1), 1);

        /* same key locks the same adjacency */
        let a2 = atable.nbr_add_or_lock(NhProto::Ipv4, LinkType::Ipv4, mk_addr("10.0.0.1"), ifindex);
        assert_eq!(a1, a2);
        assert_eq!(atable.lock_count(a1), 2);
        assert_eq!(atable.len(), 1);

        /* a different link type is a different adjacency */
        let a3 = atable.nbr_add_or_lock(NhProto::Ipv4, LinkType::Mpls, mk_addr("10.0.0.1"), ifindex);
        assert_ne!(a1, a3);
        assert_eq!(atable.len(), 2);

        atable.unlock(a3);
        assert_eq!(atable.len(), 1, "Last unlock reclaims");
        assert!(atable.get(a3).is_none());

        atable.unlock(a1);
        atable.unlock(a1);
        assert_eq!(atable.len(), 0);
    }

    #[test]
    fn test_adj_glean_and_children() {
        let mut atable = AdjacencyTable::new();
        let ifindex = IfIndex::new(3);
        let ai = atable.glean_add_or_lock(NhProto::Ipv4, ifindex);
        assert!(atable.get(ai).expect("Should exist").is_glean());

        let child = ChildNode::Path(Index::from_raw_parts(0, 0));
        let token = atable.child_add(ai, child).expect("Adjacency exists");
        assert_eq!(atable.children_of(ai), vec![child]);

        atable.child_remove(ai, token);
        assert!(atable.children_of(ai).is_empty());
        atable.unlock(ai);
        assert_eq!(atable.len(), 0);
    }

    #[test]
    fn test_adjacencies_on_interface() {
        let mut atable = AdjacencyTable::new();
        let i2 = IfIndex::new(2);
        let i3 = IfIndex::new(3);
        let _ = atable.nbr_add_or_lock(NhProto::Ipv4, LinkType::Ipv4, mk_addr("10.0.0.1"), i2);
        let _ = atable.nbr_add_or_lock(NhProto::Ipv4, LinkType::Ipv4, mk_addr("10.0.0.5"), i3);
        let _ = atable.glean_add_or_lock(NhProto::Ipv4, i2);
        assert_eq!(atable.adjacencies_on(i2).len(), 2);
        assert_eq!(atable.adjacencies_on(i3).len(), 1);
    }
}
