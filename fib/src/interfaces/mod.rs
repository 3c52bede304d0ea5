// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network interface model and table

pub mod iftable;
pub mod interface;
