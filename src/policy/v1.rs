//! Policy v1: knobs for discovery, matching and manipulation.
//!
//! Every policy is a plain serde struct with a version tag and a
//! deterministic `params_hash`, so a stored corpus can record exactly which
//! settings produced it. Defaults keep the historical behaviour except
//! where a documented correction applies.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;

/// Version tag of [`DiscoveryPolicy`].
pub const DISCOVERY_POLICY_VERSION: &str = "discovery_policy_v1";
/// Version tag of [`MatchPolicy`].
pub const MATCH_POLICY_VERSION: &str = "match_policy_v1";
/// Version tag of [`ManipulationPolicy`].
pub const MANIPULATION_POLICY_VERSION: &str = "manipulation_policy_v1";

/// How a pattern whose last slot is a gap is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingGap {
    /// The trailing gap absorbs whatever is left of the target, including nothing.
    #[default]
    MatchRest,
    /// A pattern ending in a gap never matches.
    Fail,
}

/// How aligned (target, pattern) pairs are recorded during manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingMode {
    /// One pair per aligned target position.
    #[default]
    PerPosition,
    /// Pairs are keyed by target element: target positions that compare
    /// equal under the manipulation clause share one entry, held by the
    /// first such position, and the latest pattern element wins.
    CoalesceEqualTargets,
}

/// Discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Keep alignments that contain no element at all.
    pub keep_empty: bool,
    /// Drop the trailing gap of every alignment before it is pooled.
    pub trim_trailing_gap: bool,
}

impl DiscoveryPolicy {
    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            version: DISCOVERY_POLICY_VERSION.to_string(),
            keep_empty: true,
            trim_trailing_gap: false,
        }
    }
}

/// Matching settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Trailing gap semantics.
    pub trailing_gap: TrailingGap,
}

impl MatchPolicy {
    /// Create a policy with the given trailing gap semantics.
    pub fn new(trailing_gap: TrailingGap) -> Self {
        Self {
            trailing_gap,
            ..Self::default()
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            version: MATCH_POLICY_VERSION.to_string(),
            trailing_gap: TrailingGap::default(),
        }
    }
}

/// Manipulation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Trailing gap semantics, shared with matching.
    pub trailing_gap: TrailingGap,
    /// Pair recording mode.
    pub pairing: PairingMode,
}

impl ManipulationPolicy {
    /// Create a policy with the given pairing mode.
    pub fn new(pairing: PairingMode) -> Self {
        Self {
            pairing,
            ..Self::default()
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }

    /// The matching half of this policy.
    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy::new(self.trailing_gap)
    }
}

impl Default for ManipulationPolicy {
    fn default() -> Self {
        Self {
            version: MANIPULATION_POLICY_VERSION.to_string(),
            trailing_gap: TrailingGap::default(),
            pairing: PairingMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_hash_determinism() {
        assert_eq!(
            DiscoveryPolicy::default().params_hash(),
            DiscoveryPolicy::default().params_hash()
        );
        assert_eq!(
            ManipulationPolicy::default().params_hash(),
            ManipulationPolicy::default().params_hash()
        );
    }

    #[test]
    fn test_params_hash_changes() {
        let policy1 = MatchPolicy::default();
        let policy2 = MatchPolicy::new(TrailingGap::Fail);
        assert_ne!(policy1.params_hash(), policy2.params_hash());

        let mut discovery = DiscoveryPolicy::default();
        let before = discovery.params_hash();
        discovery.keep_empty = false;
        assert_ne!(before, discovery.params_hash());
    }

    #[test]
    fn test_policy_json_shape() {
        let json = serde_json::to_value(ManipulationPolicy::new(PairingMode::CoalesceEqualTargets)).unwrap();
        assert_eq!(json["pairing"], "coalesce_equal_targets");
        assert_eq!(json["trailing_gap"], "match_rest");
        assert_eq!(json["version"], MANIPULATION_POLICY_VERSION);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let discovery: DiscoveryPolicy = serde_json::from_str(r#"{"keep_empty": false}"#).unwrap();
        assert_eq!(discovery.version, DISCOVERY_POLICY_VERSION);
        assert!(!discovery.keep_empty);
        assert!(!discovery.trim_trailing_gap);

        let matching: MatchPolicy = serde_json::from_str(r#"{"trailing_gap": "fail"}"#).unwrap();
        assert_eq!(matching, MatchPolicy::new(TrailingGap::Fail));

        let manipulation: ManipulationPolicy = serde_json::from_str("{}").unwrap();
        assert_eq!(manipulation, ManipulationPolicy::default());
    }
}
