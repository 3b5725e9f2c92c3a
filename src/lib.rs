//! # prnet
//!
//! Discovery, matching and rewriting of gapped order-preserving patterns.
//!
//! A pattern is an ordered list of slots. Each slot is either a concrete
//! element or a gap that absorbs zero or more consecutive target elements.
//! Elements are compared through a pluggable [`Comparator`] rather than
//! their own equality, so the same data can be viewed under several
//! aspects.
//!
//! ## Core Contract
//!
//! 1. Given a set of sequences, find the patterns shared between them and
//!    count how many anchor sequences produced each one
//! 2. Given a pattern and a target, decide whether the target matches
//! 3. Given a pattern, a match clause and a transition, rewrite the target
//!    elements a successful match paired with concrete slots
//!
//! ## Architecture
//!
//! ```text
//! Structure → Arrange → Sequence ─┬→ discovery → Corpus<Pattern>
//!                                 ├→ matcher   → bool
//!                                 └→ manipulate → Transition(target, part)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same sequences + same comparator + same policy → identical corpus order
//! - Corpus order is first-insertion order
//! - Corpus fingerprints depend only on slots and counts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod aspect;
pub mod canonical;
pub mod discovery;
pub mod manipulate;
pub mod matcher;
pub mod policy;
pub mod types;

// Re-exports
pub use types::{
    by_key, equality, from_fn, shared, shared_fn, And, Arrange, Comparator, Corpus, FnComparator,
    Negate, Pattern, PatternRecord, Sequence, SharedComparator, Slot, GAP_KEY,
};
pub use policy::{
    DiscoveryPolicy, ManipulationPolicy, MatchPolicy, PairingMode, TrailingGap,
};
pub use discovery::{find_patterns, find_patterns_in, find_patterns_with, greedy_alignment, PatternSearch};
pub use matcher::{matches, matches_pattern, matches_slots_using, matches_using, matches_with, MatchError};
pub use manipulate::{manipulate, manipulate_with, ManipulablePattern, Transition};
pub use aspect::{Aspect, AspectError, AspectRegistry, KeyFunction};
pub use adapters::{Cell, Grid};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
