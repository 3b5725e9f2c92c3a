//! Engine configuration.

pub mod v1;

pub use v1::{DiscoveryPolicy, MatchPolicy, ManipulationPolicy, TrailingGap, PairingMode};
