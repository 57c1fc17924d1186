mod entry_view;


pub use entry_view::*;
