//! Map mutation and read path over the partition workers.
mod map_service;


pub use map_service::*;
