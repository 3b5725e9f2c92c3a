//! Core types: comparators, slots, patterns, sequences and corpora.

pub mod comparator;
pub mod slot;
pub mod pattern;
pub mod sequence;
pub mod corpus;

pub use comparator::{
    Comparator, SharedComparator, FnComparator, Negate, And,
    from_fn, shared, shared_fn, equality, by_key,
};
pub use slot::Slot;
pub use pattern::{Pattern, PatternRecord, GAP_KEY};
pub use sequence::{Sequence, Arrange};
pub use corpus::Corpus;
