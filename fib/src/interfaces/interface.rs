// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network interface model

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::info;

/// The index univocally identifying an interface
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct IfIndex(u32);

impl IfIndex {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Display for IfIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum IfState {
    #[default]
    Unknown = 0,
    Down = 1,
    Up = 2,
}

impl Display for IfState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IfState::Unknown => write!(f, "unknown"),
            IfState::Down => write!(f, "down"),
            IfState::Up => write!(f, "up"),
        }
    }
}

/// Type that distinguishes the kinds of interface the FIB cares about.
/// Point-to-point links have no neighbor discovery; resolution substitutes
/// the zero address for them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum IfType {
    #[default]
    Unknown,
    Ethernet,
    PointToPoint,
    Loopback,
}

#[derive(Clone, Debug)]
/// An object representing a network interface and its state
pub struct Interface {
    pub name: String,
    pub ifindex: IfIndex,
    pub iftype: IfType,
    pub admin_state: IfState,
}

impl Interface {
    #[must_use]
    pub fn new(name: &str, ifindex: IfIndex, iftype: IfType) -> Self {
        Self {
            name: name.to_owned(),
            ifindex,
            iftype,
            admin_state: IfState::Up,
        }
    }

    /// Set the administrative state of an [`Interface`]
    pub fn set_admin_state(&mut self, state: IfState) {
        if self.admin_state != state {
            info!(
                "Admin state of interface {} changed: {} -> {}",
                self.name, self.admin_state, state
            );
            self.admin_state = state;
        }
    }

    /// Tell if an [`Interface`] is administratively up
    #[must_use]
    pub fn is_admin_up(&self) -> bool {
        self.admin_state == IfState::Up
    }

    /// Tell if an [`Interface`] is a point-to-point link
    #[must_use]
    pub fn is_p2p(&self) -> bool {
        self.iftype == IfType::PointToPoint
    }
}
