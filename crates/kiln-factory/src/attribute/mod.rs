//! Attribute sources and ordered attribute sets.

pub mod set;
pub mod source;

pub use set::AttributeSet;
pub use source::{AttributeSource, LazyFn, Sequence, SequenceFn};
