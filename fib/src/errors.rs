// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The error results used by this library.

use crate::fib::fibtype::TableId;
use crate::interfaces::interface::IfIndex;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FibError {
    #[error("No interface with ifindex {0}")]
    NoSuchInterface(IfIndex),

    #[error("An interface with ifindex {0} already exists")]
    InterfaceExists(IfIndex),

    #[error("No FIB table with id {0}")]
    NoSuchTable(TableId),

    #[error("A FIB table with id {0} already exists")]
    TableExists(TableId),
}
