// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Interface table: the oracle the path layer consults for admin state,
//! the point-to-point predicate and interface ordering.

use crate::errors::FibError;
use crate::interfaces::interface::{IfIndex, IfState, Interface};
use ahash::RandomState;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

pub struct IfTable(HashMap<IfIndex, Interface, RandomState>);

impl Default for IfTable {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::len_without_is_empty)]
impl IfTable {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::with_hasher(RandomState::with_seed(0)))
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Register an [`Interface`].
    ///
    /// # Errors
    /// Fails if an interface with the same ifindex exists.
    pub fn add_interface(&mut self, iface: Interface) -> Result<(), FibError> {
        if self.0.contains_key(&iface.ifindex) {
            return Err(FibError::InterfaceExists(iface.ifindex));
        }
        debug!("Registered interface {} ({})", iface.name, iface.ifindex);
        self.0.insert(iface.ifindex, iface);
        Ok(())
    }

    pub fn del_interface(&mut self, ifindex: IfIndex) -> Option<Interface> {
        self.0.remove(&ifindex)
    }

    #[must_use]
    pub fn get_interface(&self, ifindex: IfIndex) -> Option<&Interface> {
        self.0.get(&ifindex)
    }

    pub fn get_interface_mut(&mut self, ifindex: IfIndex) -> Option<&mut Interface> {
        self.0.get_mut(&ifindex)
    }

    pub fn values(&self) -> impl Iterator<Item = &Interface> {
        self.0.values()
    }

    /// Tell if the interface is administratively up. Unknown interfaces
    /// report down.
    #[must_use]
    pub fn is_admin_up(&self, ifindex: IfIndex) -> bool {
        self.0.get(&ifindex).is_some_and(Interface::is_admin_up)
    }

    /// Tell if the interface is a point-to-point link
    #[must_use]
    pub fn is_p2p(&self, ifindex: IfIndex) -> bool {
        self.0.get(&ifindex).is_some_and(Interface::is_p2p)
    }

    /// Total order over interfaces, used when sorting paths
    #[must_use]
    pub fn compare(&self, a: IfIndex, b: IfIndex) -> Ordering {
        a.cmp(&b)
    }

    /// Set the admin state of an interface.
    ///
    /// # Errors
    /// Fails if no interface has the given ifindex.
    pub fn set_admin_state(&mut self, ifindex: IfIndex, state: IfState) -> Result<(), FibError> {
        let iface = self
            .0
            .get_mut(&ifindex)
            .ok_or(FibError::NoSuchInterface(ifindex))?;
        iface.set_admin_state(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::interface::IfType;

    #[test]
    fn test_iftable_basic() {
        let mut iftable = IfTable::new();
        let ifindex = IfIndex::new(2);
        iftable
            .add_interface(Interface::new("eth0", ifindex, IfType::Ethernet))
            .expect("Should be added");
        assert_eq!(
            iftable.add_interface(Interface::new("dup", ifindex, IfType::Ethernet)),
            Err(FibError::InterfaceExists(ifindex))
        );
        assert!(iftable.is_admin_up(ifindex));
        assert!(!iftable.is_p2p(ifindex));

        iftable
            .set_admin_state(ifindex, IfState::Down)
            .expect("Interface exists");
        assert!(!iftable.is_admin_up(ifindex));

        iftable.del_interface(ifindex);
        assert!(!iftable.is_admin_up(ifindex), "Unknown reports down");
    }

    #[test]
    fn test_iftable_compare() {
        let iftable = IfTable::new();
        assert_eq!(
            iftable.compare(IfIndex::new(1), IfIndex::new(2)),
            Ordering::Less
        );
        assert_eq!(
            iftable.compare(IfIndex::new(9), IfIndex::new(9)),
            Ordering::Equal
        );
    }
}
