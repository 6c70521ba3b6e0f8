#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod index;
mod job;
mod sequence;
mod source;

pub use crate::error::*;
pub use crate::index::*;
pub use crate::job::*;
pub use crate::sequence::*;
pub use crate::source::*;
