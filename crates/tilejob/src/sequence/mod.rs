//! Pull-driven tile index streams.
//!
//! Every sequence in this module is a [`Stream`]: a single consumer pulls one
//! element at a time through `poll_next`, and polling through `Pin<&mut Self>`
//! rules out two outstanding pulls on the same instance. Composing iterators
//! hold at most one look-ahead slot per source, so memory use never depends on
//! the size of the ranges involved.
//!
//! [`Stream`]: futures::Stream

mod compact;
mod complement;
mod descend;
mod ext;
mod intersect;
mod range;
#[cfg(test)]
mod tests;

pub use compact::*;
pub use complement::*;
pub use descend::*;
pub use ext::*;
pub use intersect::*;
pub use range::*;

use crate::{Result, TileIndex};

/// A boxed, fallible stream of tile indices borrowed for `'a`.
///
/// This is the uniform shape exchanged with collaborators and between the
/// stages of a job.
pub type IndexStream<'a> = futures::stream::BoxStream<'a, Result<TileIndex>>;
