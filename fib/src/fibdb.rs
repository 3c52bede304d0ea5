// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The FIB database: the single owner of the path pool and of the stores
//! paths depend on. One control thread owns a [`FibDb`] and mutates it; no
//! operation suspends or yields, and back-walks run synchronously to
//! completion on the calling thread.

use derive_builder::Builder;
use std::fmt::Display;
use tracing::{debug, error};

use crate::atable::adjacency::AdjacencyTable;
use crate::errors::FibError;
use crate::fib::fibtype::{EntryIndex, PathIndex};
use crate::fib::path::PathStore;
use crate::fib::pathlist::PathListStore;
use crate::fib::table::FibTableStore;
use crate::graph::{BackWalkCtx, BackWalkReason, ChildNode};
use crate::interfaces::iftable::IfTable;
use crate::interfaces::interface::{IfIndex, IfState};

/// Struct to configure a FIB database. N.B. we derive a builder type
/// `FibDbParamsBuilder` and provide defaults for each field.
#[derive(Builder, Debug)]
pub struct FibDbParams {
    #[builder(setter(into), default = "fib".to_string())]
    name: String,

    /// Create the default table at startup so recursions through table 0
    /// never have to materialize it lazily
    #[builder(default = true)]
    create_default_table: bool,
}

impl Display for FibDbParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        writeln!(f, "Fib config")?;
        writeln!(f, "  name          : {}", self.name)?;
        writeln!(f, "  default table : {}", self.create_default_table)
    }
}

/// Registry of the load-balance map notifications the path layer emits
/// when a recursion constraint flips a path's resolution state. The maps
/// themselves live above this crate; owners drain the changes.
#[derive(Debug, Default)]
pub struct LoadBalanceMaps {
    changes: Vec<PathIndex>,
}

impl LoadBalanceMaps {
    pub fn path_state_change(&mut self, path_index: PathIndex) {
        debug!("lb-maps: path {path_index:?} changed resolution state");
        self.changes.push(path_index);
    }
    #[must_use]
    pub fn has_change_for(&self, path_index: PathIndex) -> bool {
        self.changes.contains(&path_index)
    }
    pub fn take_changes(&mut self) -> Vec<PathIndex> {
        std::mem::take(&mut self.changes)
    }
}

/// Top-most object owning the FIB path subsystem state
pub struct FibDb {
    name: String,
    pub(crate) paths: PathStore,
    pub(crate) pathlists: PathListStore,
    pub(crate) tables: FibTableStore,
    pub(crate) atable: AdjacencyTable,
    pub(crate) iftable: IfTable,
    pub(crate) lbmaps: LoadBalanceMaps,
}

impl FibDb {
    /// Create a FIB database
    #[must_use]
    pub fn new(params: FibDbParams) -> Self {
        debug!("{}: Initializing...", params.name);
        let mut tables = FibTableStore::new();
        if params.create_default_table {
            /* cannot fail on an empty store */
            let _ = tables.add_table(0);
        }
        Self {
            name: params.name,
            paths: PathStore::new(),
            pathlists: PathListStore::new(),
            tables,
            atable: AdjacencyTable::new(),
            iftable: IfTable::new(),
            lbmaps: LoadBalanceMaps::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn paths(&self) -> &PathStore {
        &self.paths
    }
    #[must_use]
    pub fn pathlists(&self) -> &PathListStore {
        &self.pathlists
    }
    pub fn pathlists_mut(&mut self) -> &mut PathListStore {
        &mut self.pathlists
    }
    #[must_use]
    pub fn tables(&self) -> &FibTableStore {
        &self.tables
    }
    pub fn tables_mut(&mut self) -> &mut FibTableStore {
        &mut self.tables
    }
    #[must_use]
    pub fn atable(&self) -> &AdjacencyTable {
        &self.atable
    }
    #[must_use]
    pub fn iftable(&self) -> &IfTable {
        &self.iftable
    }
    pub fn iftable_mut(&mut self) -> &mut IfTable {
        &mut self.iftable
    }
    #[must_use]
    pub fn lbmaps(&self) -> &LoadBalanceMaps {
        &self.lbmaps
    }
    pub fn lbmaps_mut(&mut self) -> &mut LoadBalanceMaps {
        &mut self.lbmaps
    }

    /// Dispatch a back-walk to a graph node
    pub fn back_walk_node(&mut self, node: ChildNode, ctx: &BackWalkCtx) {
        match node {
            ChildNode::Path(path_index) => {
                self.path_back_walk(path_index, ctx);
            }
        }
    }

    /// Walk the children of an entry, bottom up
    pub fn entry_back_walk(&mut self, entry_index: EntryIndex, ctx: &BackWalkCtx) {
        for child in self.tables.children_of(entry_index) {
            self.back_walk_node(child, ctx);
        }
    }

    /// Change the admin state of an interface and back-walk the paths
    /// subscribed to its adjacencies.
    ///
    /// # Errors
    /// Fails if no interface has the given ifindex.
    pub fn interface_set_admin_state(
        &mut self,
        ifindex: IfIndex,
        state: IfState,
    ) -> Result<(), FibError> {
        self.iftable.set_admin_state(ifindex, state)?;
        let reason = match state {
            IfState::Up => BackWalkReason::INTERFACE_UP,
            IfState::Down => BackWalkReason::INTERFACE_DOWN,
            IfState::Unknown => return Ok(()),
        };
        let ctx = BackWalkCtx::with_reason(reason);
        for adj in self.atable.adjacencies_on(ifindex) {
            for child in self.atable.children_of(adj) {
                self.back_walk_node(child, &ctx);
            }
        }
        Ok(())
    }

    /// Delete an interface. Paths resolving through it become permanent
    /// drops; recovery requires their owners to rebuild.
    ///
    /// # Errors
    /// Fails if no interface has the given ifindex.
    pub fn interface_delete(&mut self, ifindex: IfIndex) -> Result<(), FibError> {
        if self.iftable.get_interface(ifindex).is_none() {
            return Err(FibError::NoSuchInterface(ifindex));
        }
        let ctx = BackWalkCtx::with_reason(BackWalkReason::INTERFACE_DELETE);
        for adj in self.atable.adjacencies_on(ifindex) {
            for child in self.atable.children_of(adj) {
                self.back_walk_node(child, &ctx);
            }
        }
        if self.iftable.del_interface(ifindex).is_none() {
            error!("interface {ifindex} vanished during delete walk");
        }
        Ok(())
    }
}
