//! Named-field codec used at the request boundary.
//!
//! A [`Portable`] writes its named fields first and may then append raw,
//! un-named segments (an encoded key, for example). Raw segments are read
//! back strictly in the order they were written.
mod portable;
mod record;

#[cfg(test)]
mod portable_test;

pub use portable::*;
pub use record::*;
