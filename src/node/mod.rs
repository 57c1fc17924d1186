mod builder;
mod grid_node;


pub use builder::*;
pub use grid_node::*;
