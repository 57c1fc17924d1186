//! Record
//!
//! The per-key mutable storage cell backing every stored key-value pair:
//! - Versioning and replay sequence for conflict detection and recovery
//! - Creation, access and update timestamps with TTL expiration
//! - Eviction criteria score written and read by the evictor
//! - A lazily computed cached value guarded by compare-and-swap
//!
//! # Single writer
//!
//! Every mutating method takes `&mut self`. Records are owned by a
//! partition's [`RecordStore`](crate::RecordStore) which is only reachable
//! from that partition's worker, so a second concurrent writer cannot be
//! expressed. The cached-value slot is the one exception: it is shared as an
//! `Arc<CachedValueSlot>` and only mutated through CAS.

mod cached_value;
mod record;
mod statistics;
mod value;


pub use cached_value::*;
pub use record::*;
pub use statistics::*;
pub use value::*;
