//! Statement builders: SQL text from fixed column lists, every value as a positional parameter.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
