pub mod apply;
pub mod core;

pub use apply::*;
pub use core::*;
