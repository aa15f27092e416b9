pub mod blessing;

pub use blessing::*;
