//! Listener registry and event fan-out.
//!
//! ```text
//! mutation (partition worker)
//!   └─> EventService::publish() -> try_send(event queue)   [never blocks]
//!                                       ↓
//! dispatcher task
//!   event queue.recv() -> lookup topic in DashMap -> filter -> EventListener::on_event()
//! ```
//!
//! A single dispatcher drains the queue, so one listener observes events in
//! the order its source partition produced them.
mod event_service;
mod item_event;
mod listener;


pub use event_service::*;
pub use item_event::*;
pub use listener::*;
