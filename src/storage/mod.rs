//! Per-partition record storage
//!
//! A [`RecordStore`] holds every record of every map for one partition. It is
//! owned by that partition's worker (see [`crate::PartitionService`]) and is
//! never shared, which is what makes the records' single-writer rule hold.
mod eviction;
mod record_store;

#[cfg(test)]
mod eviction_test;

pub use eviction::*;
pub use record_store::*;
