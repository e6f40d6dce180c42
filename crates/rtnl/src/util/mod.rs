//! Shared utilities for rtnl.

pub mod ifname;

pub use ifname::{NameResolver, SysfsResolver, index_to_name};
