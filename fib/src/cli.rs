// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Cli handling submodule: renders show output for the FIB path layer

use crate::display::{FibPathView, IndexDisp, PathForwardingView, PathStoreView};
use crate::fib::fibtype::PathIndex;
use crate::fibdb::FibDb;

/// Render the memory usage of the path pool
#[must_use]
pub fn show_fib_path_memory(db: &FibDb) -> String {
    format!(
        "Path: elements {} capacity {} element-size {}B\n",
        db.paths().len(),
        db.paths().capacity(),
        std::mem::size_of::<crate::fib::path::FibPath>()
    )
}

/// Render "show fib paths [index]". With an index, one path is shown in
/// detail: its state, its forwarding and its registered children.
#[must_use]
pub fn show_fib_paths(db: &FibDb, index: Option<PathIndex>) -> String {
    match index {
        None => format!("{}", PathStoreView { store: db.paths() }),
        Some(index) => match db.paths().get(index) {
            None => format!("path {} invalid\n", IndexDisp(index)),
            Some(path) => {
                let mut out = String::new();
                out += &format!("{}", FibPathView { index, path });
                out += &format!("   forwarding: {}\n", PathForwardingView { path });
                out += &format!("   children: {}\n", path.children.len());
                out
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fib::fibtype::NhProto;
    use crate::fib::path::PathCfgFlags;
    use crate::fib::route_path::RoutePath;
    use crate::fibdb::FibDbParamsBuilder;
    use generational_arena::Index;

    #[test]
    fn test_show_fib_paths() {
        let mut db = FibDb::new(FibDbParamsBuilder::default().build().expect("params"));
        let pl = db.pathlists_mut().create(vec![]);
        let pi = db.path_create(
            pl,
            NhProto::Ipv4,
            PathCfgFlags::empty(),
            &RoutePath::via_nexthop(NhProto::Ipv4, "1.1.1.1".parse().expect("addr"), 0),
        );
        let all = show_fib_paths(&db, None);
        assert!(all.contains("FIB paths (1)"));
        assert!(all.contains("recursive"));

        let one = show_fib_paths(&db, Some(pi));
        assert!(one.contains("via 1.1.1.1"));
        assert!(one.contains("children: 0"));
        assert!(one.contains("forwarding: unresolved"));

        let bogus = show_fib_paths(&db, Some(Index::from_raw_parts(99, 0)));
        assert!(bogus.contains("invalid"));

        let memory = show_fib_path_memory(&db);
        assert!(memory.contains("Path: elements 1"));
    }
}
