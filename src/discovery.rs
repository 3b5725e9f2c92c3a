//! Cross-sequence pattern discovery.
//!
//! Every input sequence is taken in turn as the anchor and aligned against
//! every other sequence (its partners). For each suffix of a partner the
//! engine walks the suffix left to right, matching each element against the
//! leftmost remaining anchor element it compares equal to. Matched anchor
//! elements become concrete slots; misses become a single compressed gap.
//!
//! ## Algorithm
//!
//! 1. For each anchor, for each partner, for each partner suffix:
//!    - reset the anchor cursor to its start and clear the buffer
//!    - for each suffix element, find the leftmost cursor match
//!    - on a hit, push the anchor element and consume the cursor through it
//!    - on a miss, push a gap if the buffer is non-empty and not already
//!      ending in one
//! 2. Deduplicate alignments per anchor/partner pair, then per anchor
//! 3. Fold all per-anchor alignments into a fresh [`Corpus`]
//!
//! The alignment is greedy: ascending-index tie-breaks, irrevocable cursor
//! consumption and no lookahead. It finds one alignment per suffix start,
//! not the longest common subsequence, and that choice is part of the
//! observable output.

use std::collections::VecDeque;

use tracing::{debug, debug_span, trace};

use crate::policy::DiscoveryPolicy;
use crate::types::pattern::slots_eq;
use crate::types::{Arrange, Comparator, Corpus, Pattern, SharedComparator, Slot};

/// Find the patterns shared across `sequences` with default settings.
///
/// ```
/// use prnet::{find_patterns, equality};
///
/// let corpus = find_patterns(equality(), &[vec![1, 2, 3, 4], vec![1, 2, 3, 4]]);
/// let full = corpus.iter().find(|p| p.to_string() == "{1, 2, 3, 4}").unwrap();
/// assert_eq!(full.count(), 1);
/// ```
pub fn find_patterns<T, S>(comparator: SharedComparator<T>, sequences: &[S]) -> Corpus<T>
where
    T: Clone,
    S: AsRef<[T]>,
{
    find_patterns_with(&DiscoveryPolicy::default(), comparator, sequences)
}

/// Find the patterns shared across the flattened snapshots of `structures`.
pub fn find_patterns_in<A>(comparator: SharedComparator<A::Element>, structures: &[A]) -> Corpus<A::Element>
where
    A: Arrange,
    A::Element: Clone,
{
    let sequences: Vec<_> = structures.iter().map(Arrange::arrange).collect();
    find_patterns(comparator, &sequences)
}

/// Find the patterns shared across `sequences` under `policy`.
pub fn find_patterns_with<T, S>(
    policy: &DiscoveryPolicy,
    comparator: SharedComparator<T>,
    sequences: &[S],
) -> Corpus<T>
where
    T: Clone,
    S: AsRef<[T]>,
{
    let span = debug_span!(
        "find_patterns",
        sequences = sequences.len(),
        policy = policy.policy_id(),
    );
    let _entered = span.enter();

    let mut corpus = Corpus::new(comparator.clone());

    for (anchor_index, anchor) in sequences.iter().enumerate() {
        let mut pooled: Vec<Vec<Slot<T>>> = Vec::new();

        for (partner_index, partner) in sequences.iter().enumerate() {
            if partner_index == anchor_index {
                continue;
            }

            let alignments = align_pair(policy, &comparator, anchor.as_ref(), partner.as_ref());
            trace!(
                anchor = anchor_index,
                partner = partner_index,
                alignments = alignments.len(),
                "pair aligned"
            );

            for alignment in alignments {
                if !pooled.iter().any(|seen| slots_eq(&comparator, seen, &alignment)) {
                    pooled.push(alignment);
                }
            }
        }

        debug!(anchor = anchor_index, alignments = pooled.len(), "anchor processed");

        for slots in pooled {
            corpus.fold(Pattern::from_slots(slots, comparator.clone()));
        }
    }

    debug!(
        patterns = corpus.len(),
        total_count = corpus.total_count(),
        "discovery complete"
    );

    corpus
}

/// Greedy order-preserving alignment of one partner suffix against `anchor`.
///
/// The result holds anchor elements, never partner elements. A gap is only
/// emitted after at least one element was matched, so alignments never
/// start with a gap; they may end with one.
pub fn greedy_alignment<T, C>(comparator: &C, anchor: &[T], partner: &[T]) -> Vec<Slot<T>>
where
    T: Clone,
    C: Comparator<T> + ?Sized,
{
    let mut buffer: Vec<Slot<T>> = Vec::new();
    let mut cursor = 0;

    for element in partner {
        let hit = anchor[cursor..]
            .iter()
            .position(|candidate| comparator.compare(candidate, element))
            .map(|offset| cursor + offset);

        match hit {
            Some(position) => {
                buffer.push(Slot::Concrete(anchor[position].clone()));
                cursor = position + 1;
            }
            None => {
                if buffer.last().is_some_and(|last| !last.is_gap()) {
                    buffer.push(Slot::Gap);
                }
            }
        }
    }

    buffer
}

/// All distinct alignments of `anchor` against the suffixes of `partner`.
fn align_pair<T, C>(policy: &DiscoveryPolicy, comparator: &C, anchor: &[T], partner: &[T]) -> Vec<Vec<Slot<T>>>
where
    T: Clone,
    C: Comparator<T> + ?Sized,
{
    let mut alignments: Vec<Vec<Slot<T>>> = Vec::new();

    for start in 0..partner.len() {
        let mut alignment = greedy_alignment(comparator, anchor, &partner[start..]);

        if policy.trim_trailing_gap && alignment.last().is_some_and(Slot::is_gap) {
            alignment.pop();
        }
        if alignment.is_empty() && !policy.keep_empty {
            continue;
        }
        if !alignments.iter().any(|seen| slots_eq(comparator, seen, &alignment)) {
            alignments.push(alignment);
        }
    }

    alignments
}

/// Stateful discovery front end.
///
/// Binds one comparator and policy, runs discovery for each declared batch of
/// inputs, and queues the resulting corpora in declaration order.
pub struct PatternSearch<T> {
    comparator: SharedComparator<T>,
    policy: DiscoveryPolicy,
    runs: VecDeque<Corpus<T>>,
}

impl<T: Clone> PatternSearch<T> {
    /// Create a search bound to `comparator` with the default policy.
    pub fn new(comparator: SharedComparator<T>) -> Self {
        Self::with_policy(comparator, DiscoveryPolicy::default())
    }

    /// Create a search with an explicit policy.
    pub fn with_policy(comparator: SharedComparator<T>, policy: DiscoveryPolicy) -> Self {
        Self {
            comparator,
            policy,
            runs: VecDeque::new(),
        }
    }

    /// Run discovery over `sequences` and queue the result.
    pub fn declare<S: AsRef<[T]>>(&mut self, sequences: &[S]) {
        let corpus = find_patterns_with(&self.policy, self.comparator.clone(), sequences);
        self.runs.push_back(corpus);
    }

    /// Run discovery over the snapshots of `structures` and queue the result.
    pub fn declare_arranged<A>(&mut self, structures: &[A])
    where
        A: Arrange<Element = T>,
    {
        let sequences: Vec<_> = structures.iter().map(Arrange::arrange).collect();
        self.declare(&sequences);
    }

    /// The oldest queued corpus.
    pub fn peek(&self) -> Option<&Corpus<T>> {
        self.runs.front()
    }

    /// Remove and return the oldest queued corpus.
    pub fn poll(&mut self) -> Option<Corpus<T>> {
        self.runs.pop_front()
    }

    /// Number of queued corpora.
    pub fn count_operations(&self) -> usize {
        self.runs.len()
    }

    /// The bound comparator.
    pub fn comparator(&self) -> &SharedComparator<T> {
        &self.comparator
    }

    /// The discovery policy.
    pub fn policy(&self) -> &DiscoveryPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{equality, shared_fn};

    fn keys(corpus: &Corpus<char>) -> Vec<(String, u64)> {
        corpus.iter().map(|p| (p.to_string(), p.count())).collect()
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_greedy_alignment_leftmost_and_gap() {
        let eq = equality::<char>();
        let anchor = chars("abcd");

        assert_eq!(
            greedy_alignment(&eq, &anchor, &chars("axd")),
            vec![Slot::Concrete('a'), Slot::Gap, Slot::Concrete('d')]
        );
        // Misses before the first hit produce no leading gap.
        assert_eq!(
            greedy_alignment(&eq, &anchor, &chars("xxb")),
            vec![Slot::Concrete('b')]
        );
        // Gap runs collapse; trailing misses leave a trailing gap.
        assert_eq!(
            greedy_alignment(&eq, &anchor, &chars("axxx")),
            vec![Slot::Concrete('a'), Slot::Gap]
        );
    }

    #[test]
    fn test_greedy_alignment_consumption_is_irrevocable() {
        let eq = equality::<char>();
        // 'c' consumes the cursor past 'a' and 'b', so the later 'a' misses.
        assert_eq!(
            greedy_alignment(&eq, &chars("abc"), &chars("ca")),
            vec![Slot::Concrete('c'), Slot::Gap]
        );
    }

    #[test]
    fn test_alignment_holds_anchor_elements() {
        let ci = shared_fn(|a: &char, b: &char| a.eq_ignore_ascii_case(b));
        assert_eq!(greedy_alignment(&ci, &chars("AB"), &chars("ab")), vec![Slot::Concrete('A'), Slot::Concrete('B')]);
    }

    #[test]
    fn test_identical_pair() {
        let corpus = find_patterns(equality(), &[vec![1, 2, 3, 4], vec![1, 2, 3, 4]]);
        let summary: Vec<(String, u64)> = corpus.iter().map(|p| (p.to_string(), p.count())).collect();

        assert_eq!(
            summary,
            vec![
                ("{1, 2, 3, 4}".to_string(), 1),
                ("{2, 3, 4}".to_string(), 1),
                ("{3, 4}".to_string(), 1),
                ("{4}".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_suffix_rounds() {
        let corpus = find_patterns(equality(), &[chars("abc"), chars("xbc")]);
        // anchor "abc" vs "xbc": {b, c} twice (deduped), {c}
        // anchor "xbc" vs "abc": {b, c} for suffix "abc" and "bc", {c}
        assert_eq!(
            keys(&corpus),
            vec![("{b, c}".to_string(), 1), ("{c}".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_alignment_policy() {
        let sequences = [chars("ab"), chars("xy")];

        let kept = find_patterns(equality(), &sequences);
        assert_eq!(keys(&kept), vec![("{}".to_string(), 1)]);

        let policy = DiscoveryPolicy {
            keep_empty: false,
            ..DiscoveryPolicy::default()
        };
        let dropped = find_patterns_with(&policy, equality(), &sequences);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_trim_trailing_gap_policy() {
        let sequences = [chars("ab"), chars("ax")];
        let default = find_patterns(equality(), &sequences);
        assert!(default.iter().any(|p| p.ends_with_gap()));

        let policy = DiscoveryPolicy {
            trim_trailing_gap: true,
            ..DiscoveryPolicy::default()
        };
        let trimmed = find_patterns_with(&policy, equality(), &sequences);
        assert!(trimmed.iter().all(|p| !p.ends_with_gap()));
    }

    #[test]
    fn test_degenerate_inputs() {
        let none: [Vec<u8>; 0] = [];
        assert!(find_patterns(equality(), &none).is_empty());
        assert!(find_patterns(equality(), &[vec![1u8, 2]]).is_empty());
        // An empty partner has no suffixes.
        assert!(find_patterns_with(
            &DiscoveryPolicy { keep_empty: false, ..DiscoveryPolicy::default() },
            equality(),
            &[vec![1u8], vec![]],
        )
        .is_empty());
    }

    #[test]
    fn test_pattern_search_queue() {
        let mut search = PatternSearch::new(equality::<char>());
        assert!(search.peek().is_none());

        search.declare(&[chars("ab"), chars("ab")]);
        search.declare_arranged(&[chars("xyz"), chars("xz")]);
        assert_eq!(search.count_operations(), 2);

        let first = search.poll().unwrap();
        assert!(first.iter().any(|p| p.to_string() == "{a, b}"));

        assert!(search.peek().unwrap().iter().any(|p| p.to_string() == "{x, z}"));
        assert_eq!(search.count_operations(), 1);
    }
}
