//! Entry storage and listener core of a partitioned in-memory data grid.
//!
//! - [`Record`]: versioned per-key cell with TTL, eviction score and a
//!   CAS-guarded cached value
//! - [`MapGetEntryViewRequest`]: permission-checked, retryable snapshot read
//!   routed to the owning partition
//! - [`EventService`] and [`CollectionAddListenerRequest`]: listener
//!   registration with best-effort push delivery and teardown on disconnect
//!
//! ```ignore
//! let node = GridNodeBuilder::new(GridConfig::new()?.validate()?).build()?;
//! node.maps().put("orders", key, value, None).await?;
//! let view = MapGetEntryViewRequest::new("orders", key, thread_id)
//!     .process(node.engine())
//!     .await?;
//! ```
mod client;
mod collection;
mod config;
pub mod constants;
mod errors;
mod event;
mod map;
pub mod metrics;
mod node;
mod partition;
mod record;
mod security;
mod serialization;
mod storage;
pub mod utils;
mod view;

pub use client::*;
pub use collection::*;
pub use config::*;
pub use errors::*;
pub use event::*;
pub use map::*;
pub use node::*;
pub use partition::*;
pub use record::*;
pub use security::*;
pub use serialization::*;
pub use storage::*;
pub use view::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
