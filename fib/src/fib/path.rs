// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! FIB paths: one way to reach a destination. Paths are the leaves of the
//! FIB dependency graph. A path has a configuration half, which is hashed
//! and compared so the layer above can deduplicate lists, and a derived
//! half, which resolution recomputes and back-walks keep current.
//!
//! Resolution may materialize sibling FIB state: resolving a recursive
//! path inserts an RR-sourced host route in the via table and subscribes
//! the path as its child. Because of that re-entrancy the pool may grow
//! under any call that creates entries or paths, so functions here work
//! with indices and re-fetch after such calls instead of holding borrows.

use crate::fib::dpo::{Dpo, DpoKind, LookupInput, LookupTable};
use crate::fib::entry::EntryFlags;
use crate::fib::fibtype::{
    AdjIndex, ChainType, EntryIndex, FibPrefix, FibSource, LinkType, MPLS_DEFAULT_TABLE_ID,
    NhProto, PathIndex, PathListIndex, TableId, UrpfList,
};
use crate::fib::route_path::{RoutePath, RoutePathEncode, RoutePathFlags};
use crate::fibdb::FibDb;
use crate::graph::{BackWalkCtx, BackWalkOutcome, BackWalkReason, ChildList, ChildNode, SiblingToken};
use crate::interfaces::interface::IfIndex;
use crate::prefix::{MplsLabel, Prefix};
use bitflags::bitflags;
use generational_arena::Arena;
use std::cmp::Ordering;
use std::net::IpAddr;
use tracing::{debug, error};

bitflags! {
    /// Configuration attributes of a path, fixed at creation
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct PathCfgFlags: u8 {
        /// The path drops all traffic, permanently
        const DROP = 0x01;
        /// The destination is for-us
        const LOCAL = 0x02;
        /// Recursion may only resolve through a host prefix
        const RESOLVE_HOST = 0x04;
        /// Recursion may only resolve through an attached prefix
        const RESOLVE_ATTACHED = 0x08;
    }
}

bitflags! {
    /// Operational (derived) attributes of a path
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct PathOperFlags: u8 {
        /// The path forms part of a recursive loop
        const RECURSIVE_LOOP = 0x01;
        /// The path is resolved
        const RESOLVED = 0x02;
        /// The path has become a permanent drop
        const DROP = 0x04;
    }
}

/// The next-hop of a recursive path: an address or a local label,
/// selected by the path's protocol
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RecursiveNh {
    Ip(IpAddr),
    Label(MplsLabel),
}

/// The kind of a path and the per-kind data needed to resolve it
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PathKind {
    /// An interface and a next-hop are known
    AttachedNextHop { nh: IpAddr, ifindex: IfIndex },
    /// Only the interface is known
    Attached { ifindex: IfIndex },
    /// Only the next-hop is known; resolve it through a table
    Recursive { nh: RecursiveNh, table_id: TableId },
    /// Nothing is known. so we drop.
    Special,
    /// A user-provided forwarding object
    Exclusive { dpo: Dpo },
    /// Forward by looking up again in another table
    Deag { table_id: TableId },
    /// The destination is for-us
    Receive {
        ifindex: Option<IfIndex>,
        addr: IpAddr,
    },
}

impl PathKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PathKind::AttachedNextHop { .. } => "attached-nexthop",
            PathKind::Attached { .. } => "attached",
            PathKind::Recursive { .. } => "recursive",
            PathKind::Special => "special",
            PathKind::Exclusive { .. } => "exclusive",
            PathKind::Deag { .. } => "deag",
            PathKind::Receive { .. } => "receive",
        }
    }
    fn rank(&self) -> u8 {
        match self {
            PathKind::AttachedNextHop { .. } => 0,
            PathKind::Attached { .. } => 1,
            PathKind::Recursive { .. } => 2,
            PathKind::Special => 3,
            PathKind::Exclusive { .. } => 4,
            PathKind::Deag { .. } => 5,
            PathKind::Receive { .. } => 6,
        }
    }
}

/// A FIB path
#[derive(Debug)]
pub struct FibPath {
    /* configuration half: hashed and compared */
    pub(crate) pl_index: PathListIndex,
    pub(crate) cfg_flags: PathCfgFlags,
    pub(crate) nh_proto: NhProto,
    pub(crate) weight: u32,
    pub(crate) kind: PathKind,

    /* derived half: recomputed by resolution, never copied nor compared */
    pub(crate) oper_flags: PathOperFlags,
    pub(crate) via_fib: Option<EntryIndex>,
    pub(crate) dpo: Dpo,
    pub(crate) sibling: Option<SiblingToken>,
    pub(crate) children: ChildList,
}

impl FibPath {
    fn new(pl_index: PathListIndex, nh_proto: NhProto, cfg_flags: PathCfgFlags, weight: u32, kind: PathKind) -> Self {
        Self {
            pl_index,
            cfg_flags,
            nh_proto,
            /* a weight of 0 is a meaningless value; accept it and fix up */
            weight: if weight == 0 { 1 } else { weight },
            kind,
            oper_flags: PathOperFlags::empty(),
            via_fib: None,
            dpo: Dpo::invalid(),
            sibling: None,
            children: ChildList::new(),
        }
    }

    /// Tell if the path is configured to permanently drop, despite other
    /// attributes
    #[must_use]
    pub fn is_permanent_drop(&self) -> bool {
        self.cfg_flags.contains(PathCfgFlags::DROP)
            || self.oper_flags.contains(PathOperFlags::DROP)
    }

    #[must_use]
    pub fn kind(&self) -> &PathKind {
        &self.kind
    }
    #[must_use]
    pub fn proto(&self) -> NhProto {
        self.nh_proto
    }
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }
    #[must_use]
    pub fn cfg_flags(&self) -> PathCfgFlags {
        self.cfg_flags
    }
    #[must_use]
    pub fn oper_flags(&self) -> PathOperFlags {
        self.oper_flags
    }
    #[must_use]
    pub fn dpo(&self) -> &Dpo {
        &self.dpo
    }
    #[must_use]
    pub fn via_fib(&self) -> Option<EntryIndex> {
        self.via_fib
    }
    #[must_use]
    pub fn pl_index(&self) -> PathListIndex {
        self.pl_index
    }
}

/// The pool all paths are allocated from
#[derive(Debug)]
pub struct PathStore {
    arena: Arena<FibPath>,
}

impl Default for PathStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PathStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }
    pub(crate) fn insert(&mut self, path: FibPath) -> PathIndex {
        self.arena.insert(path)
    }
    pub(crate) fn remove(&mut self, index: PathIndex) -> Option<FibPath> {
        self.arena.remove(index)
    }
    #[must_use]
    pub fn get(&self, index: PathIndex) -> Option<&FibPath> {
        self.arena.get(index)
    }
    pub(crate) fn get_mut(&mut self, index: PathIndex) -> Option<&mut FibPath> {
        self.arena.get_mut(index)
    }
    #[must_use]
    pub fn contains(&self, index: PathIndex) -> bool {
        self.arena.contains(index)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
    pub fn iter(&self) -> impl Iterator<Item = (PathIndex, &FibPath)> {
        self.arena.iter()
    }
}

/// One member of the key a load-balance hashes multipath traffic with
#[derive(Clone, Debug, PartialEq)]
pub struct LoadBalancePath {
    pub weight: u32,
    pub path_index: PathIndex,
    pub dpo: Dpo,
}

fn route_flags_to_cfg_flags(rpath: &RoutePath) -> PathCfgFlags {
    let mut cfg_flags = PathCfgFlags::empty();
    if rpath.flags.contains(RoutePathFlags::RESOLVE_VIA_HOST) {
        cfg_flags |= PathCfgFlags::RESOLVE_HOST;
    }
    if rpath.flags.contains(RoutePathFlags::RESOLVE_VIA_ATTACHED) {
        cfg_flags |= PathCfgFlags::RESOLVE_ATTACHED;
    }
    cfg_flags
}

impl FibDb {
    /// Create and initialise a new path object, deducing its kind from the
    /// route-path descriptor. Returns the index of the path.
    pub fn path_create(
        &mut self,
        pl_index: PathListIndex,
        nh_proto: NhProto,
        flags: PathCfgFlags,
        rpath: &RoutePath,
    ) -> PathIndex {
        let cfg_flags = flags | route_flags_to_cfg_flags(rpath);

        let kind = if let Some(ifindex) = rpath.ifindex {
            if cfg_flags.contains(PathCfgFlags::LOCAL) {
                PathKind::Receive {
                    ifindex: Some(ifindex),
                    addr: rpath.addr.unwrap_or_else(|| nh_proto.zero_addr()),
                }
            } else if let Some(nh) = rpath.addr {
                PathKind::AttachedNextHop { nh, ifindex }
            } else {
                PathKind::Attached { ifindex }
            }
        } else {
            match (rpath.addr, rpath.label) {
                (None, None) => match rpath.table_id {
                    Some(table_id) => PathKind::Deag { table_id },
                    None => PathKind::Special,
                },
                (addr, label) => {
                    let nh = if nh_proto == NhProto::Mpls {
                        RecursiveNh::Label(label.unwrap_or_default())
                    } else {
                        RecursiveNh::Ip(addr.unwrap_or_else(|| nh_proto.zero_addr()))
                    };
                    PathKind::Recursive {
                        nh,
                        table_id: rpath.table_id.unwrap_or_default(),
                    }
                }
            }
        };

        let path = FibPath::new(pl_index, nh_proto, cfg_flags, rpath.weight, kind);
        let index = self.paths.insert(path);
        debug!("path {index:?}: create");
        index
    }

    /// Create a path that needs no route-path: a drop, a receive with no
    /// interface, or an exclusive path wrapping a user DPO.
    pub fn path_create_special(
        &mut self,
        pl_index: PathListIndex,
        nh_proto: NhProto,
        flags: PathCfgFlags,
        dpo: Option<&Dpo>,
    ) -> PathIndex {
        let kind = if flags.contains(PathCfgFlags::DROP) {
            PathKind::Special
        } else if flags.contains(PathCfgFlags::LOCAL) {
            PathKind::Receive {
                ifindex: None,
                addr: nh_proto.zero_addr(),
            }
        } else {
            debug_assert!(dpo.is_some(), "an exclusive path needs a DPO");
            PathKind::Exclusive {
                dpo: dpo.cloned().unwrap_or_else(Dpo::invalid),
            }
        };
        let path = FibPath::new(pl_index, nh_proto, flags, 1, kind);
        let index = self.paths.insert(path);
        debug!("path {index:?}: create-special");
        index
    }

    /// Copy a path: clone the configuration half, reset the derived half.
    /// Returns the index of the new path, which is initially unresolved.
    pub fn path_copy(&mut self, path_index: PathIndex, pl_index: PathListIndex) -> PathIndex {
        let Some(orig) = self.paths.get(path_index) else {
            error!("copy of unknown path {path_index:?}");
            return path_index;
        };
        let path = FibPath::new(
            pl_index,
            orig.nh_proto,
            orig.cfg_flags,
            orig.weight,
            orig.kind.clone(),
        );
        let index = self.paths.insert(path);
        debug!("path {index:?}: create-copy of {path_index:?}");
        index
    }

    /// Destroy a path that is no longer required, releasing every
    /// subscription and reference resolution acquired.
    pub fn path_destroy(&mut self, path_index: PathIndex) {
        debug!("path {path_index:?}: destroy");
        self.path_unresolve(path_index);
        if self.paths.remove(path_index).is_none() {
            error!("destroy of unknown path {path_index:?}");
        }
    }

    /// A stable content hash over the configuration half of the path.
    /// Weight is not part of a path's identity.
    #[must_use]
    pub fn path_hash(&self, path_index: PathIndex) -> u64 {
        let Some(path) = self.paths.get(path_index) else {
            return 0;
        };
        let hasher = ahash::RandomState::with_seed(0);
        std::hash::BuildHasher::hash_one(&hasher, (path.cfg_flags.bits(), path.nh_proto, &path.kind))
    }

    /// Compare two paths for equivalence; a total order usable for sorting.
    /// Weight is excluded, like in the hash.
    #[must_use]
    pub fn path_cmp(&self, a: PathIndex, b: PathIndex) -> Ordering {
        let (Some(p1), Some(p2)) = (self.paths.get(a), self.paths.get(b)) else {
            return Ordering::Equal;
        };
        p1.kind
            .rank()
            .cmp(&p2.kind.rank())
            .then(p1.nh_proto.cmp(&p2.nh_proto))
            .then_with(|| match (&p1.kind, &p2.kind) {
                (
                    PathKind::AttachedNextHop { nh: nh1, ifindex: if1 },
                    PathKind::AttachedNextHop { nh: nh2, ifindex: if2 },
                ) => nh1.cmp(nh2).then(self.iftable.compare(*if1, *if2)),
                (PathKind::Attached { ifindex: if1 }, PathKind::Attached { ifindex: if2 }) => {
                    self.iftable.compare(*if1, *if2)
                }
                (
                    PathKind::Recursive { nh: nh1, table_id: t1 },
                    PathKind::Recursive { nh: nh2, table_id: t2 },
                ) => nh1.cmp(nh2).then(t1.cmp(t2)),
                (PathKind::Deag { table_id: t1 }, PathKind::Deag { table_id: t2 }) => t1.cmp(t2),
                /* special, receive and exclusive have no distinguishing config */
                _ => Ordering::Equal,
            })
    }

    /// Same total order as [`FibDb::path_cmp`]; paths sort by it.
    #[must_use]
    pub fn path_cmp_for_sort(&self, a: PathIndex, b: PathIndex) -> Ordering {
        self.path_cmp(a, b)
    }

    /// Match a path against a live route-path descriptor. Unlike path
    /// identity this folds the weight in, since an update must address one
    /// specific (path, weight) of a multipath route.
    #[must_use]
    pub fn path_cmp_with_route_path(&self, path_index: PathIndex, rpath: &RoutePath) -> Ordering {
        let Some(path) = self.paths.get(path_index) else {
            return Ordering::Less;
        };
        path.weight
            .cmp(&rpath.weight)
            .then_with(|| match &path.kind {
                PathKind::AttachedNextHop { nh, ifindex } => rpath
                    .addr
                    .map_or(Ordering::Greater, |a| nh.cmp(&a))
                    .then_with(|| {
                        rpath
                            .ifindex
                            .map_or(Ordering::Greater, |i| self.iftable.compare(*ifindex, i))
                    }),
                PathKind::Attached { ifindex } => rpath
                    .ifindex
                    .map_or(Ordering::Greater, |i| self.iftable.compare(*ifindex, i)),
                PathKind::Recursive { nh, table_id } => match nh {
                    RecursiveNh::Label(label) => rpath
                        .label
                        .map_or(Ordering::Greater, |l| label.cmp(&l)),
                    RecursiveNh::Ip(addr) => {
                        rpath.addr.map_or(Ordering::Greater, |a| addr.cmp(&a))
                    }
                }
                .then_with(|| {
                    rpath
                        .table_id
                        .map_or(Ordering::Greater, |t| table_id.cmp(&t))
                }),
                PathKind::Deag { table_id } => rpath
                    .table_id
                    .map_or(Ordering::Greater, |t| table_id.cmp(&t)),
                PathKind::Special | PathKind::Receive { .. } | PathKind::Exclusive { .. } => {
                    Ordering::Equal
                }
            })
    }

    fn path_oper_set(&mut self, path_index: PathIndex, flags: PathOperFlags) {
        if let Some(path) = self.paths.get_mut(path_index) {
            path.oper_flags.insert(flags);
        }
    }
    fn path_oper_clear(&mut self, path_index: PathIndex, flags: PathOperFlags) {
        if let Some(path) = self.paths.get_mut(path_index) {
            path.oper_flags.remove(flags);
        }
    }
    fn path_oper_contains(&self, path_index: PathIndex, flags: PathOperFlags) -> bool {
        self.paths
            .get(path_index)
            .is_some_and(|path| path.oper_flags.contains(flags))
    }

    /// The adjacency an attached-nexthop path resolves through at a given
    /// link type. On point-to-point links the adjacency for a specific
    /// neighbour never exists; the zero address links to the auto-adjacency
    /// the subnet route installs, and that is the one wanted here too.
    fn path_attached_next_hop_get_adj(
        &mut self,
        path_index: PathIndex,
        link: LinkType,
    ) -> Option<AdjIndex> {
        let Some(path) = self.paths.get(path_index) else {
            return None;
        };
        let PathKind::AttachedNextHop { nh, ifindex } = path.kind else {
            return None;
        };
        let proto = path.nh_proto;
        let addr = if self.iftable.is_p2p(ifindex) {
            proto.zero_addr()
        } else {
            nh
        };
        Some(self.atable.nbr_add_or_lock(proto, link, addr, ifindex))
    }

    /// Resolve directly via the adjacency described by the interface and
    /// next-hop, and subscribe to it for rewrite updates.
    fn path_attached_next_hop_set(&mut self, path_index: PathIndex) {
        let Some(path) = self.paths.get(path_index) else {
            return;
        };
        let PathKind::AttachedNextHop { ifindex, .. } = path.kind else {
            return;
        };
        let proto = path.nh_proto;
        if !self.iftable.is_admin_up(ifindex) {
            self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
        }
        let Some(adj) = self.path_attached_next_hop_get_adj(path_index, proto.link_type()) else {
            return;
        };
        let sibling = self.atable.child_add(adj, ChildNode::Path(path_index));
        if let Some(path) = self.paths.get_mut(path_index) {
            path.dpo.set(proto, DpoKind::Adjacency(adj));
            path.sibling = sibling;
        }
    }

    /// Create or update the path's recursive forwarding: fetch the
    /// via-entry's contribution for the chain and apply the recursion
    /// constraints, neutralizing the contribution where they fail.
    fn path_recursive_adj_update(&mut self, path_index: PathIndex, fct: ChainType) -> Dpo {
        let Some(path) = self.paths.get(path_index) else {
            return Dpo::invalid();
        };
        let proto = path.nh_proto;
        let cfg_flags = path.cfg_flags;
        let looped = path.oper_flags.contains(PathOperFlags::RECURSIVE_LOOP);
        let Some(via_fib) = path.via_fib else {
            return Dpo::drop(proto);
        };

        let mut via_dpo = self.entry_contribute_forwarding(via_fib, fct);

        /* hope for the best - clear if restrictions apply */
        self.path_oper_set(path_index, PathOperFlags::RESOLVED);

        if looped {
            via_dpo = Dpo::drop(proto);
            self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
        } else if cfg_flags.contains(PathCfgFlags::RESOLVE_HOST) {
            /*
             * The via entry just added is always a host route, since it is an
             * RR-sourced pin. What matters is whether the route has other
             * sources: RR is the lowest-priority source, so if it is the best
             * one there are none, and the entry only inherits forwarding from
             * a cover that is not a host route.
             */
            let best = self.tables.get_best_source(via_fib);
            if best.is_none_or(|source| source >= FibSource::Rr) {
                via_dpo = Dpo::drop(proto);
                self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                /* PIC edge trigger. let the load-balance maps know */
                self.lbmaps.path_state_change(path_index);
            }
        } else if cfg_flags.contains(PathCfgFlags::RESOLVE_ATTACHED) {
            /* RR source entries inherit the flags from the cover, so the via
             * can be checked directly */
            if !self.entry_get_flags(via_fib).contains(EntryFlags::ATTACHED) {
                via_dpo = Dpo::drop(proto);
                self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                self.lbmaps.path_state_change(path_index);
            }
        }

        debug!("path {path_index:?}: recursive update -> {via_dpo:?}");
        via_dpo
    }

    /// Resolve a path: derive its forwarding contribution and take the
    /// subscriptions its kind requires. Returns whether it resolved.
    pub fn path_resolve(&mut self, path_index: PathIndex) -> bool {
        let Some(path) = self.paths.get_mut(path_index) else {
            error!("resolve of unknown path {path_index:?}");
            return false;
        };
        /* hope for the best */
        path.oper_flags.insert(PathOperFlags::RESOLVED);

        /* the forced drop path resolves via the drop */
        if path.is_permanent_drop() {
            let proto = path.nh_proto;
            path.dpo = Dpo::drop(proto);
            path.oper_flags.remove(PathOperFlags::RESOLVED);
            return self.path_is_resolved(path_index);
        }

        let kind = path.kind.clone();
        let proto = path.nh_proto;

        match kind {
            PathKind::AttachedNextHop { .. } => {
                self.path_attached_next_hop_set(path_index);
            }
            PathKind::Attached { ifindex } => {
                if !self.iftable.is_admin_up(ifindex) {
                    self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                }
                /*
                 * point-2-point interfaces do not require a glean, since
                 * there is nothing to ARP. Take a neighbour adjacency on the
                 * zero address instead.
                 */
                let (adj, dpo_kind) = if self.iftable.is_p2p(ifindex) {
                    let adj = self.atable.nbr_add_or_lock(
                        proto,
                        proto.link_type(),
                        proto.zero_addr(),
                        ifindex,
                    );
                    (adj, DpoKind::Adjacency(adj))
                } else {
                    let adj = self.atable.glean_add_or_lock(proto, ifindex);
                    (adj, DpoKind::AdjacencyGlean(adj))
                };
                let sibling = self.atable.child_add(adj, ChildNode::Path(path_index));
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.dpo.set(proto, dpo_kind);
                    path.sibling = sibling;
                }
            }
            PathKind::Recursive { nh, table_id } => {
                /*
                 * Create an RR source entry in the table for the address this
                 * path recurses through. This resolve action is recursive and
                 * may allocate entries and paths, so the path is re-fetched
                 * after each call below.
                 */
                debug_assert!(
                    self.paths
                        .get(path_index)
                        .is_none_or(|p| p.via_fib.is_none()),
                    "re-resolving a resolved recursive path"
                );
                let prefix = match nh {
                    RecursiveNh::Ip(addr) => FibPrefix::Ip(Prefix::host_from_addr(&addr)),
                    RecursiveNh::Label(label) => FibPrefix::Mpls(label),
                };
                let via_fib = self.tables.entry_special_add(
                    table_id,
                    prefix,
                    FibSource::Rr,
                    EntryFlags::empty(),
                );
                /* become a dependent child of the entry so the path is
                 * informed when the forwarding for the entry changes */
                let sibling = self.entry_child_add(via_fib, ChildNode::Path(path_index));
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.via_fib = Some(via_fib);
                    path.sibling = sibling;
                }
                let dpo = self.path_recursive_adj_update(path_index, proto.chain_type());
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.dpo = dpo;
                }
            }
            PathKind::Special => {
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.dpo = Dpo::drop(proto);
                }
            }
            PathKind::Deag { table_id } => {
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.dpo.set(
                        proto,
                        DpoKind::Lookup {
                            table_id,
                            input: LookupInput::DstAddr,
                            table: LookupTable::FromConfig,
                        },
                    );
                }
            }
            PathKind::Receive { ifindex, addr } => {
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.dpo.set(proto, DpoKind::Receive { ifindex, addr });
                }
            }
            PathKind::Exclusive { dpo } => {
                if let Some(path) = self.paths.get_mut(path_index) {
                    path.dpo = dpo;
                }
            }
        }

        self.path_is_resolved(path_index)
    }

    /// Remove the path's dependency on its resolution target without
    /// destroying the path: drop subscriptions, undo the RR pin, release
    /// the adjacency, reset the contribution.
    pub(crate) fn path_unresolve(&mut self, path_index: PathIndex) {
        let Some(path) = self.paths.get(path_index) else {
            return;
        };
        /* the forced drop path owns no external relation */
        if path.is_permanent_drop() {
            return;
        }
        let kind = path.kind.clone();

        match kind {
            PathKind::Recursive { table_id, .. } => {
                let (via_fib, sibling) = {
                    let Some(path) = self.paths.get_mut(path_index) else {
                        return;
                    };
                    (path.via_fib.take(), path.sibling.take())
                };
                if let Some(via_fib) = via_fib {
                    let prefix = self.tables.get_prefix(via_fib);
                    if let Some(token) = sibling {
                        self.entry_child_remove(via_fib, token);
                    }
                    if let Some(prefix) = prefix {
                        self.tables
                            .entry_special_remove(table_id, prefix, FibSource::Rr);
                    }
                }
            }
            PathKind::AttachedNextHop { .. } | PathKind::Attached { .. } => {
                let (adj, sibling) = {
                    let Some(path) = self.paths.get_mut(path_index) else {
                        return;
                    };
                    (path.dpo.adj_index(), path.sibling.take())
                };
                if let Some(adj) = adj {
                    if let Some(token) = sibling {
                        self.atable.child_remove(adj, token);
                    }
                    self.atable.unlock(adj);
                }
            }
            PathKind::Exclusive { .. } => {
                /* release the user DPO */
                if let Some(path) = self.paths.get_mut(path_index) {
                    if let PathKind::Exclusive { dpo } = &mut path.kind {
                        dpo.reset();
                    }
                }
            }
            PathKind::Special | PathKind::Receive { .. } | PathKind::Deag { .. } => {
                /* these hold only the path's DPO, reset below */
            }
        }

        if let Some(path) = self.paths.get_mut(path_index) {
            path.dpo.reset();
            path.oper_flags.remove(PathOperFlags::RESOLVED);
        }
    }

    /// A forward walk of the FIB graph to detect a cycle. `visited` holds
    /// every entry encountered on the walk so far; if it contains the entry
    /// this path resolves through, a loop is about to form. The loop must
    /// be allowed to form, since the dependencies must stay in place to
    /// learn when it breaks. Only the contribution is neutralized: the path
    /// is marked looped and stacks a drop, and the edges stay.
    pub fn path_recursive_loop_detect(
        &mut self,
        path_index: PathIndex,
        visited: &mut Vec<EntryIndex>,
    ) -> bool {
        let Some(path) = self.paths.get(path_index) else {
            return false;
        };
        /* the forced drop path is never looped, cos it is never resolved */
        if path.is_permanent_drop() {
            return false;
        }
        if let PathKind::Recursive { .. } = path.kind {
            let proto = path.nh_proto;
            if let Some(via_fib) = path.via_fib {
                if visited.contains(&via_fib) {
                    debug!("path {path_index:?}: recursive loop formed");
                    if let Some(path) = self.paths.get_mut(path_index) {
                        path.oper_flags.insert(PathOperFlags::RECURSIVE_LOOP);
                        path.dpo = Dpo::drop(proto);
                    }
                } else if self.entry_recursive_loop_detect(via_fib, visited) {
                    debug!("path {path_index:?}: recursive loop formed");
                    self.path_oper_set(path_index, PathOperFlags::RECURSIVE_LOOP);
                } else {
                    debug!("path {path_index:?}: recursive loop cleared");
                    self.path_oper_clear(path_index, PathOperFlags::RECURSIVE_LOOP);
                }
            }
        }
        /* all other kinds are leaves of the graph and cannot loop */
        self.path_is_looped(path_index)
    }

    /// A back-walk has reached this path. Update the derived state, restack
    /// the contribution, then propagate to the owning path-list - in that
    /// order, so children observe the new DPO when they next query.
    pub fn path_back_walk(&mut self, path_index: PathIndex, ctx: &BackWalkCtx) -> BackWalkOutcome {
        let Some(path) = self.paths.get(path_index) else {
            error!("back-walk at unknown path {path_index:?}");
            return BackWalkOutcome::Stop;
        };
        let kind = path.kind.clone();
        let proto = path.nh_proto;
        let pl_index = path.pl_index;

        match kind {
            PathKind::Recursive { .. } => {
                if ctx.reason.contains(BackWalkReason::EVALUATE) {
                    /* restack against the via-fib's current forwarding. this
                     * update is visible to packets in flight in the DP. */
                    let dpo = self.path_recursive_adj_update(path_index, proto.chain_type());
                    if let Some(path) = self.paths.get_mut(path_index) {
                        path.dpo = dpo;
                    }
                }
                if ctx
                    .reason
                    .intersects(BackWalkReason::ADJ_UPDATE | BackWalkReason::ADJ_DOWN)
                {
                    /* adjacency sub-type changes do not need to propagate
                     * above a recursion: the recursion isolates them */
                    return BackWalkOutcome::Stop;
                }
            }
            PathKind::AttachedNextHop { ifindex, .. } => {
                if ctx.reason.contains(BackWalkReason::INTERFACE_UP) {
                    if self.path_oper_contains(path_index, PathOperFlags::RESOLVED) {
                        /* already resolved. no need to walk back again */
                        return BackWalkOutcome::Stop;
                    }
                    self.path_oper_set(path_index, PathOperFlags::RESOLVED);
                }
                if ctx.reason.contains(BackWalkReason::INTERFACE_DOWN) {
                    if !self.path_oper_contains(path_index, PathOperFlags::RESOLVED) {
                        /* already unresolved. no need to walk back again */
                        return BackWalkOutcome::Stop;
                    }
                    self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                }
                if ctx.reason.contains(BackWalkReason::INTERFACE_DELETE) {
                    /*
                     * The interface this path resolves through has been
                     * deleted. The path is left permanently dropped; the
                     * route needs to be removed and re-added before it can
                     * forward again.
                     */
                    self.path_unresolve(path_index);
                    if let Some(path) = self.paths.get_mut(path_index) {
                        path.oper_flags.insert(PathOperFlags::DROP);
                        path.dpo = Dpo::drop(proto);
                    }
                }
                if ctx.reason.contains(BackWalkReason::ADJ_UPDATE) {
                    /* restack the DPO to pick up the correct adjacency
                     * sub-type */
                    let if_is_up = self.iftable.is_admin_up(ifindex);
                    if if_is_up {
                        self.path_oper_set(path_index, PathOperFlags::RESOLVED);
                    } else {
                        self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                    }
                    if let Some(adj) =
                        self.path_attached_next_hop_get_adj(path_index, proto.link_type())
                    {
                        if let Some(path) = self.paths.get_mut(path_index) {
                            path.dpo.set(proto, DpoKind::Adjacency(adj));
                        }
                        self.atable.unlock(adj);
                    }
                    if !if_is_up {
                        /*
                         * with the interface down the children would only
                         * learn that this path is unresolved; walking them
                         * is wasted work.
                         */
                        return BackWalkOutcome::Stop;
                    }
                }
                if ctx.reason.contains(BackWalkReason::ADJ_DOWN) {
                    if !self.path_oper_contains(path_index, PathOperFlags::RESOLVED) {
                        return BackWalkOutcome::Stop;
                    }
                    /* the adj has gone down. the path is no longer resolved */
                    self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                }
            }
            PathKind::Attached { .. } => {
                if ctx.reason.contains(BackWalkReason::INTERFACE_UP) {
                    self.path_oper_set(path_index, PathOperFlags::RESOLVED);
                }
                if ctx.reason.contains(BackWalkReason::INTERFACE_DOWN) {
                    self.path_oper_clear(path_index, PathOperFlags::RESOLVED);
                }
                if ctx.reason.contains(BackWalkReason::INTERFACE_DELETE) {
                    self.path_unresolve(path_index);
                    if let Some(path) = self.paths.get_mut(path_index) {
                        path.oper_flags.insert(PathOperFlags::DROP);
                        path.dpo = Dpo::drop(proto);
                    }
                }
            }
            PathKind::Deag { .. }
            | PathKind::Special
            | PathKind::Receive { .. }
            | PathKind::Exclusive { .. } => {
                /* these path kinds have no parents. to be walked from one is
                 * unexpected */
                debug_assert!(false, "back-walk reached a parentless path");
            }
        }

        /* propagate the back-walk further, to the path-list */
        self.pathlists.back_walk(pl_index, ctx);
        BackWalkOutcome::Continue
    }

    /// The DPO the path contributes in a chain. The cached DPO was built
    /// when the path resolved and represents its native chain; other chains
    /// are synthesized on demand.
    pub fn path_contribute_forwarding(&mut self, path_index: PathIndex, fct: ChainType) -> Dpo {
        let Some(path) = self.paths.get(path_index) else {
            return Dpo::invalid();
        };
        if path.nh_proto.chain_type() == fct {
            return path.dpo.clone();
        }
        let kind = path.kind.clone();

        match kind {
            PathKind::AttachedNextHop { .. } => {
                /* get an appropriate link type adj */
                let Some(adj) = self.path_attached_next_hop_get_adj(path_index, fct.link_type())
                else {
                    return Dpo::invalid();
                };
                let dpo = Dpo::new(fct.dpo_proto(), DpoKind::Adjacency(adj));
                self.atable.unlock(adj);
                dpo
            }
            PathKind::Recursive { .. } => {
                if fct == ChainType::Ethernet {
                    debug_assert!(false, "no ethernet chain through a recursion");
                    return Dpo::invalid();
                }
                self.path_recursive_adj_update(path_index, fct)
            }
            PathKind::Deag { .. } => match fct {
                ChainType::MplsNonEos => Dpo::new(
                    NhProto::Mpls,
                    DpoKind::Lookup {
                        table_id: MPLS_DEFAULT_TABLE_ID,
                        input: LookupInput::DstAddr,
                        table: LookupTable::FromConfig,
                    },
                ),
                ChainType::Ethernet => {
                    debug_assert!(false, "no ethernet chain through a deag");
                    Dpo::invalid()
                }
                _ => self
                    .paths
                    .get(path_index)
                    .map_or_else(Dpo::invalid, |path| path.dpo.clone()),
            },
            PathKind::Exclusive { dpo } => dpo,
            _kind @ (PathKind::Attached { .. } | PathKind::Receive { .. } | PathKind::Special) => {
                debug_assert!(false, "unsupported chain {fct:?} for a {} path", _kind.name());
                Dpo::invalid()
            }
        }
    }

    /// Contribute the path's interfaces to a uRPF list. By calling this
    /// over all paths, recursively, a child constructs the full set of
    /// admissible ingress interfaces of its prefix.
    pub fn path_contribute_urpf(&self, path_index: PathIndex, urpf: &mut UrpfList) {
        if !self.path_is_resolved(path_index) {
            return;
        }
        let Some(path) = self.paths.get(path_index) else {
            return;
        };
        match &path.kind {
            PathKind::AttachedNextHop { ifindex, .. } | PathKind::Attached { ifindex } => {
                urpf.append(*ifindex);
            }
            PathKind::Recursive { .. } => {
                if let Some(via_fib) = path.via_fib {
                    self.entry_contribute_urpf(via_fib, urpf);
                }
            }
            PathKind::Exclusive { .. } | PathKind::Special => {
                /* these may link to an adj, if that's what the client gave */
                if let Some(adj) = path.dpo.adj_index() {
                    if let Some(adj) = self.atable.get(adj) {
                        urpf.append(adj.ifindex());
                    }
                }
            }
            PathKind::Deag { .. } | PathKind::Receive { .. } => {
                /* these path kinds don't link to an interface */
            }
        }
    }

    /// If resolved, append an entry for this path to a multipath hash key
    pub fn path_append_nh_for_multipath_hash(
        &mut self,
        path_index: PathIndex,
        fct: ChainType,
        hash_key: &mut Vec<LoadBalancePath>,
    ) {
        if !self.path_is_resolved(path_index) {
            return;
        }
        let weight = self.path_get_weight(path_index);
        let dpo = self.path_contribute_forwarding(path_index, fct);
        hash_key.push(LoadBalancePath {
            weight,
            path_index,
            dpo,
        });
    }

    /// The interface the path resolves through, if any
    #[must_use]
    pub fn path_get_resolving_interface(&self, path_index: PathIndex) -> Option<IfIndex> {
        let path = self.paths.get(path_index)?;
        match &path.kind {
            PathKind::AttachedNextHop { ifindex, .. } | PathKind::Attached { ifindex } => {
                Some(*ifindex)
            }
            PathKind::Receive { ifindex, .. } => *ifindex,
            PathKind::Recursive { .. } => path
                .via_fib
                .and_then(|via_fib| self.entry_get_resolving_interface(via_fib)),
            PathKind::Special | PathKind::Deag { .. } | PathKind::Exclusive { .. } => None,
        }
    }

    /// The adjacency of the path's contributed DPO. Valid only when the
    /// contribution is adjacency-backed.
    #[must_use]
    pub fn path_get_adj(&self, path_index: PathIndex) -> Option<AdjIndex> {
        let Some(path) = self.paths.get(path_index) else {
            return None;
        };
        debug_assert!(path.dpo.is_adj(), "get-adj on a non-adjacency DPO");
        path.dpo.adj_index()
    }

    #[must_use]
    pub fn path_get_weight(&self, path_index: PathIndex) -> u32 {
        self.paths.get(path_index).map_or(0, FibPath::weight)
    }

    #[must_use]
    pub fn path_get_proto(&self, path_index: PathIndex) -> NhProto {
        self.paths
            .get(path_index)
            .map_or_else(NhProto::default, FibPath::proto)
    }

    #[must_use]
    pub fn path_is_recursive(&self, path_index: PathIndex) -> bool {
        self.paths
            .get(path_index)
            .is_some_and(|path| matches!(path.kind, PathKind::Recursive { .. }))
    }

    #[must_use]
    pub fn path_is_exclusive(&self, path_index: PathIndex) -> bool {
        self.paths
            .get(path_index)
            .is_some_and(|path| matches!(path.kind, PathKind::Exclusive { .. }))
    }

    #[must_use]
    pub fn path_is_deag(&self, path_index: PathIndex) -> bool {
        self.paths
            .get(path_index)
            .is_some_and(|path| matches!(path.kind, PathKind::Deag { .. }))
    }

    #[must_use]
    pub fn path_is_looped(&self, path_index: PathIndex) -> bool {
        self.path_oper_contains(path_index, PathOperFlags::RECURSIVE_LOOP)
    }

    /// A path is resolved iff it has a valid contribution, the RESOLVED
    /// flag, no loop and no permanent drop
    #[must_use]
    pub fn path_is_resolved(&self, path_index: PathIndex) -> bool {
        self.paths.get(path_index).is_some_and(|path| {
            path.dpo.is_valid()
                && path.oper_flags.contains(PathOperFlags::RESOLVED)
                && !path.oper_flags.contains(PathOperFlags::RECURSIVE_LOOP)
                && !path.is_permanent_drop()
        })
    }

    /// Encode the path back into a route-path descriptor for RPC clients
    #[must_use]
    pub fn path_encode(&self, path_index: PathIndex) -> Option<RoutePathEncode> {
        let path = self.paths.get(path_index)?;
        let mut out = RoutePathEncode::default();
        out.rpath.weight = path.weight;
        out.rpath.proto = path.nh_proto;
        match &path.kind {
            PathKind::Receive { ifindex, addr } => {
                out.rpath.addr = Some(*addr);
                out.rpath.ifindex = *ifindex;
            }
            PathKind::Attached { ifindex } => {
                out.rpath.ifindex = Some(*ifindex);
            }
            PathKind::AttachedNextHop { nh, ifindex } => {
                out.rpath.addr = Some(*nh);
                out.rpath.ifindex = Some(*ifindex);
            }
            PathKind::Special => {}
            PathKind::Deag { table_id } => {
                out.rpath.table_id = Some(*table_id);
            }
            PathKind::Recursive { nh, table_id } => {
                match nh {
                    RecursiveNh::Ip(addr) => out.rpath.addr = Some(*addr),
                    RecursiveNh::Label(label) => out.rpath.label = Some(*label),
                }
                out.rpath.table_id = Some(*table_id);
            }
            PathKind::Exclusive { dpo } => {
                out.dpo = Some(dpo.clone());
            }
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fibdb::{FibDb, FibDbParamsBuilder};
    use crate::interfaces::interface::{IfType, Interface};

    fn mk_db() -> FibDb {
        let params = FibDbParamsBuilder::default()
            .build()
            .expect("Default params");
        FibDb::new(params)
    }

    fn mk_addr(a: &str) -> IpAddr {
        a.parse().expect("Bad address")
    }

    #[test]
    fn test_create_derives_kind() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let i2 = IfIndex::new(2);

        let anh = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop_iface(NhProto::Ipv4, mk_addr("10.0.0.2"), i2),
        );
        assert!(matches!(
            db.paths.get(anh).unwrap().kind(),
            PathKind::AttachedNextHop { .. }
        ));

        let att = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_iface(NhProto::Ipv4, i2),
        );
        assert!(matches!(
            db.paths.get(att).unwrap().kind(),
            PathKind::Attached { .. }
        ));

        let rec = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop(NhProto::Ipv4, mk_addr("1.1.1.1"), 0),
        );
        assert!(db.path_is_recursive(rec));

        let deag = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::deag(NhProto::Ipv4, 7),
        );
        assert!(db.path_is_deag(deag));

        let special = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::special(NhProto::Ipv4),
        );
        assert!(matches!(
            db.paths.get(special).unwrap().kind(),
            PathKind::Special
        ));

        let recv = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::LOCAL,
            &RoutePath::receive(NhProto::Ipv4, i2, mk_addr("10.0.0.1")),
        );
        assert!(matches!(
            db.paths.get(recv).unwrap().kind(),
            PathKind::Receive {
                ifindex: Some(_),
                ..
            }
        ));

        let label = db.path_create(
            pl,
            NhProto::Mpls,
            PathCfgFlags::empty(),
            &RoutePath::via_label(MplsLabel(100), 0),
        );
        assert!(matches!(
            db.paths.get(label).unwrap().kind(),
            PathKind::Recursive {
                nh: RecursiveNh::Label(MplsLabel(100)),
                ..
            }
        ));
    }

    #[test]
    fn test_weight_zero_normalized() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let rpath =
            RoutePath::via_nexthop(NhProto::Ipv4, mk_addr("1.1.1.1"), 0).with_weight(0);
        let pi = db.path_create(pl, NhProto::Ipv4, PathCfgFlags::empty(), &rpath);
        assert_eq!(db.path_get_weight(pi), 1);
    }

    #[test]
    fn test_hash_and_cmp_exclude_weight() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let base = RoutePath::via_nexthop(NhProto::Ipv4, mk_addr("1.1.1.1"), 0);
        let p1 = db.path_create(pl, NhProto::Ipv4, PathCfgFlags::empty(), &base);
        let p2 = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &base.clone().with_weight(5),
        );
        assert_eq!(db.path_hash(p1), db.path_hash(p2));
        assert_eq!(db.path_cmp(p1, p2), Ordering::Equal);

        /* the route-path correlation does include weight */
        assert_eq!(
            db.path_cmp_with_route_path(p1, &base),
            Ordering::Equal
        );
        assert_ne!(
            db.path_cmp_with_route_path(p1, &base.clone().with_weight(5)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_cmp_orders_by_kind_then_payload() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let i2 = IfIndex::new(2);
        let i3 = IfIndex::new(3);
        let anh2 = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop_iface(NhProto::Ipv4, mk_addr("10.0.0.2"), i2),
        );
        let anh3 = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop_iface(NhProto::Ipv4, mk_addr("10.0.0.2"), i3),
        );
        let rec = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop(NhProto::Ipv4, mk_addr("10.0.0.2"), 0),
        );
        assert_eq!(db.path_cmp(anh2, anh3), Ordering::Less, "By interface");
        assert_eq!(db.path_cmp(anh3, anh2), Ordering::Greater);
        assert_eq!(
            db.path_cmp(anh2, rec),
            Ordering::Less,
            "Attached-nexthop sorts before recursive"
        );
        assert_ne!(db.path_hash(anh2), db.path_hash(rec));
    }

    #[test]
    fn test_copy_resets_derived_half() {
        let mut db = mk_db();
        db.iftable
            .add_interface(Interface::new("eth2", IfIndex::new(2), IfType::Ethernet))
            .expect("Should add");
        let pl = db.pathlists.create(vec![]);
        let pi = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop_iface(NhProto::Ipv4, mk_addr("10.0.0.2"), IfIndex::new(2)),
        );
        assert!(db.path_resolve(pi));

        let pl2 = db.pathlists.create(vec![]);
        let copy = db.path_copy(pi, pl2);
        assert_eq!(db.path_hash(pi), db.path_hash(copy));
        assert_eq!(db.path_cmp(pi, copy), Ordering::Equal);
        assert!(!db.path_is_resolved(copy), "Copies start unresolved");
        assert!(db.paths.get(copy).unwrap().via_fib().is_none());
        assert!(!db.paths.get(copy).unwrap().dpo().is_valid());
        assert_eq!(db.paths.get(copy).unwrap().pl_index(), pl2);
    }

    #[test]
    fn test_permanent_drop_contributes_drop() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let pi = db.path_create_special(pl, NhProto::Ipv6, PathCfgFlags::DROP, None);
        assert!(!db.path_resolve(pi));
        let path = db.paths.get(pi).unwrap();
        assert!(path.dpo().is_drop());
        assert_eq!(path.dpo().proto(), NhProto::Ipv6);
        assert!(!path.oper_flags().contains(PathOperFlags::RESOLVED));
    }

    #[test]
    fn test_create_special_local_has_no_interface() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let pi = db.path_create_special(pl, NhProto::Ipv4, PathCfgFlags::LOCAL, None);
        assert!(matches!(
            db.paths.get(pi).unwrap().kind(),
            PathKind::Receive { ifindex: None, .. }
        ));
        assert!(db.path_resolve(pi));
        assert_eq!(db.path_get_resolving_interface(pi), None);
    }

    #[test]
    fn test_encode_round_trip() {
        let mut db = mk_db();
        let pl = db.pathlists.create(vec![]);
        let cases = vec![
            RoutePath::via_nexthop_iface(NhProto::Ipv4, mk_addr("10.0.0.2"), IfIndex::new(2))
                .with_weight(3),
            RoutePath::via_iface(NhProto::Ipv6, IfIndex::new(4)),
            RoutePath::via_nexthop(NhProto::Ipv4, mk_addr("1.1.1.1"), 9),
            RoutePath::via_label(MplsLabel(42), 0),
            RoutePath::deag(NhProto::Ipv4, 5),
        ];
        for rpath in cases {
            let pi = db.path_create(pl, rpath.proto, PathCfgFlags::empty(), &rpath);
            let encoded = db.path_encode(pi).expect("Path exists").rpath;
            assert_eq!(encoded.proto, rpath.proto);
            assert_eq!(encoded.weight, rpath.weight);
            assert_eq!(encoded.addr, rpath.addr);
            assert_eq!(encoded.ifindex, rpath.ifindex);
            assert_eq!(encoded.label, rpath.label);
        }
    }

    #[test]
    fn test_bolero_hash_cmp_consistency() {
        bolero::check!()
            .with_generator(bolero::generator::produce::<([u8; 4], [u8; 4], u8, u8)>())
            .for_each(|(a1, a2, w1, w2)| {
                let mut db = mk_db();
                let pl = db.pathlists.create(vec![]);
                let r1 = RoutePath::via_nexthop(
                    NhProto::Ipv4,
                    IpAddr::from(*a1),
                    0,
                )
                .with_weight(u32::from(*w1));
                let r2 = RoutePath::via_nexthop(
                    NhProto::Ipv4,
                    IpAddr::from(*a2),
                    0,
                )
                .with_weight(u32::from(*w2));
                let p1 = db.path_create(pl, NhProto::Ipv4, PathCfgFlags::empty(), &r1);
                let p2 = db.path_create(pl, NhProto::Ipv4, PathCfgFlags::empty(), &r2);

                /* equal configuration halves hash equal; cmp agrees */
                if db.path_cmp(p1, p2) == Ordering::Equal {
                    assert_eq!(db.path_hash(p1), db.path_hash(p2));
                }
                /* cmp is antisymmetric */
                assert_eq!(db.path_cmp(p1, p2), db.path_cmp(p2, p1).reverse());
            });
    }
}
