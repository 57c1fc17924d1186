//! Distributed lists and sets.
//!
//! A collection lives entirely in the partition that owns its name. Adds and
//! removes publish [`DataAwareItemEvent`](crate::DataAwareItemEvent)s from
//! inside the partition worker, so listeners see them in mutation order.
mod collection_service;
mod container;


pub use collection_service::*;
pub use container::*;
