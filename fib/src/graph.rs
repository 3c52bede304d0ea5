// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Dependency-graph plumbing shared by the objects of the FIB: child
//! registries with sibling tokens and the back-walk vocabulary.
//!
//! Edges in the FIB graph are subscriptions, not ownership. A child
//! registers with its parent and gets back a token; the holder of the token
//! is responsible for the symmetric release. A cycle in the graph is just
//! two subscriptions pointing at each other, so there is nothing to leak.

use bitflags::bitflags;
use generational_arena::{Arena, Index};

/// Token returned when registering a child with a parent. Needed to
/// deregister symmetrically.
pub type SiblingToken = Index;

/// A node that can subscribe to a parent in the FIB graph.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChildNode {
    Path(crate::fib::fibtype::PathIndex),
}

/// The children registered on a parent object (adjacency or FIB entry).
#[derive(Debug)]
pub struct ChildList {
    children: Arena<ChildNode>,
}

impl Default for ChildList {
    fn default() -> Self {
        Self::new()
    }
}

impl ChildList {
    #[must_use]
    pub fn new() -> Self {
        Self {
            children: Arena::new(),
        }
    }
    pub fn add(&mut self, child: ChildNode) -> SiblingToken {
        self.children.insert(child)
    }
    pub fn remove(&mut self, token: SiblingToken) -> Option<ChildNode> {
        self.children.remove(token)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.len() == 0
    }
    pub fn iter(&self) -> impl Iterator<Item = ChildNode> + '_ {
        self.children.iter().map(|(_, child)| *child)
    }
    /// Snapshot of the children. Back-walk dispatch mutates the registries,
    /// so walkers iterate over a copy.
    #[must_use]
    pub fn collect(&self) -> Vec<ChildNode> {
        self.iter().collect()
    }
}

bitflags! {
    /// The reasons a back-walk is initiated.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct BackWalkReason: u32 {
        /// Re-evaluate the node against its parent's current forwarding
        const EVALUATE = 0x01;
        /// An adjacency changed sub-type (complete <-> incomplete)
        const ADJ_UPDATE = 0x02;
        /// An adjacency went down
        const ADJ_DOWN = 0x04;
        /// An interface came admin-up
        const INTERFACE_UP = 0x08;
        /// An interface went admin-down
        const INTERFACE_DOWN = 0x10;
        /// An interface was deleted
        const INTERFACE_DELETE = 0x20;
    }
}

/// The context of a back-walk, delivered to each node the walk reaches.
#[derive(Clone, Debug, Default)]
pub struct BackWalkCtx {
    pub reason: BackWalkReason,
}

impl BackWalkCtx {
    #[must_use]
    pub fn with_reason(reason: BackWalkReason) -> Self {
        Self { reason }
    }
}

/// What a node did with a back-walk. `Continue` means the walk was
/// propagated to the node's owner; `Stop` means it was quashed at this node.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BackWalkOutcome {
    Continue,
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;
    use generational_arena::Index;

    #[test]
    fn test_child_list_tokens() {
        let mut list = ChildList::new();
        let pi = Index::from_raw_parts(7, 0);
        let t1 = list.add(ChildNode::Path(pi));
        let t2 = list.add(ChildNode::Path(pi));
        assert_eq!(list.len(), 2);

        assert_eq!(list.remove(t1), Some(ChildNode::Path(pi)));
        assert_eq!(list.remove(t1), None, "Tokens release exactly once");
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove(t2), Some(ChildNode::Path(pi)));
        assert!(list.is_empty());
    }
}
