// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The Fib module: paths, the entries and tables they resolve through,
//! and the data-path objects they contribute.

pub mod dpo;
pub mod entry;
pub mod fibtype;
pub mod path;
pub mod pathlist;
pub mod route_path;
pub mod table;
