mod coord;
mod range;

pub use coord::*;
pub use range::*;
