mod filter;
mod iterator;
mod spec;

pub use filter::*;
pub use iterator::*;
pub use spec::*;
