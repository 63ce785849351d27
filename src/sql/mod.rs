//! Safe SQL builder: identifiers are compile-time constants, values are parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
