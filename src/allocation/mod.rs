//! Loss-free division of integer amounts.

pub mod allocator;

pub use allocator::{allocate, split};
