//! Client-facing request handling.
//!
//! - [`ClientEngine`] checks permissions and routes key-based requests to the
//!   owning partition, retrying when ownership moves
//! - [`ClientEndpoint`] is the server-side handle of one connection
//! - [`ClientEndpointManager`] destroys a client's listeners when it leaves
mod add_listener_request;
mod client_engine;
mod endpoint;
mod endpoint_manager;
mod entry_view_request;
mod remove_listener_request;
mod request;

#[cfg(test)]
mod client_engine_test;
#[cfg(test)]
mod remove_listener_request_test;

pub use add_listener_request::*;
pub use client_engine::*;
pub use endpoint::*;
pub use endpoint_manager::*;
pub use entry_view_request::*;
pub use remove_listener_request::*;
pub use request::*;
