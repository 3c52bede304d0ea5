// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The owner surface of paths. A path-list aggregates the paths backing an
//! entry and receives the back-walks its paths propagate upward. The
//! aggregation itself (load-balancing, normalization) happens above this
//! crate; here the list records what reached it so owners can react.

use crate::fib::fibtype::{PathIndex, PathListIndex};
use crate::graph::{BackWalkCtx, BackWalkReason};
use generational_arena::Arena;
use tracing::debug;

#[derive(Debug, Default)]
pub struct PathList {
    paths: Vec<PathIndex>,
    walks: Vec<BackWalkReason>,
}

#[derive(Debug)]
pub struct PathListStore {
    arena: Arena<PathList>,
}

impl Default for PathListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PathListStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn create(&mut self, paths: Vec<PathIndex>) -> PathListIndex {
        self.arena.insert(PathList {
            paths,
            walks: Vec::new(),
        })
    }

    pub fn destroy(&mut self, index: PathListIndex) {
        self.arena.remove(index);
    }

    /// Snapshot of the member paths of a list
    #[must_use]
    pub fn paths(&self, index: PathListIndex) -> Vec<PathIndex> {
        self.arena
            .get(index)
            .map_or_else(Vec::new, |pl| pl.paths.clone())
    }

    pub fn add_path(&mut self, index: PathListIndex, path: PathIndex) {
        if let Some(pl) = self.arena.get_mut(index) {
            pl.paths.push(path);
        }
    }

    pub fn remove_path(&mut self, index: PathListIndex, path: PathIndex) {
        if let Some(pl) = self.arena.get_mut(index) {
            pl.paths.retain(|p| *p != path);
        }
    }

    /// A back-walk propagated by a member path reaches its list here
    pub fn back_walk(&mut self, index: PathListIndex, ctx: &BackWalkCtx) {
        debug!("path-list {index:?}: back-walk {:?}", ctx.reason);
        if let Some(pl) = self.arena.get_mut(index) {
            pl.walks.push(ctx.reason);
        }
    }

    /// The back-walk reasons this list has received, oldest first
    #[must_use]
    pub fn walks(&self, index: PathListIndex) -> Vec<BackWalkReason> {
        self.arena
            .get(index)
            .map_or_else(Vec::new, |pl| pl.walks.clone())
    }

    #[must_use]
    pub fn walk_count(&self, index: PathListIndex) -> usize {
        self.arena.get(index).map_or(0, |pl| pl.walks.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}
