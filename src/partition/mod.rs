//! Partition workers.
//!
//! Each partition is owned by exactly one tokio task. Every read and write of
//! that partition's records is funnelled through its task queue, so record
//! state is only ever touched by a single writer.
mod partition_service;
mod router;

#[cfg(test)]
mod router_test;

pub use partition_service::*;
pub use router::*;
