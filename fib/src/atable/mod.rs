// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The adjacency layer: rewrite objects per (interface, next-hop, link-type)

pub mod adjacency;
