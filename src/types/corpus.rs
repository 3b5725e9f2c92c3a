//! Deduplicated pattern collections.

use serde::Serialize;

use crate::canonical::canonical_hash_hex;
use super::comparator::SharedComparator;
use super::pattern::{Pattern, PatternRecord};

/// Insertion-ordered collection of structurally distinct patterns.
///
/// All patterns in a corpus share one comparator. Folding a pattern that is
/// structurally equal to an existing entry increments that entry's counter
/// instead of adding a duplicate.
#[derive(Clone)]
pub struct Corpus<T> {
    comparator: SharedComparator<T>,
    patterns: Vec<Pattern<T>>,
}

impl<T> Corpus<T> {
    /// Create an empty corpus for `comparator`.
    pub fn new(comparator: SharedComparator<T>) -> Self {
        Self {
            comparator,
            patterns: Vec::new(),
        }
    }

    /// The shared comparator.
    pub fn comparator(&self) -> &SharedComparator<T> {
        &self.comparator
    }

    /// Fold a pattern into the corpus.
    ///
    /// Returns `true` if the pattern was new and appended, `false` if an
    /// existing entry's counter was incremented.
    pub fn fold(&mut self, pattern: Pattern<T>) -> bool {
        match self.patterns.iter_mut().find(|p| p.structurally_eq(&pattern)) {
            Some(existing) => {
                existing.increment();
                false
            }
            None => {
                self.patterns.push(pattern);
                true
            }
        }
    }

    /// Find the entry structurally equal to `pattern`.
    pub fn find(&self, pattern: &Pattern<T>) -> Option<&Pattern<T>> {
        self.patterns.iter().find(|p| p.structurally_eq(pattern))
    }

    /// Check if a structurally equal entry exists.
    pub fn contains(&self, pattern: &Pattern<T>) -> bool {
        self.find(pattern).is_some()
    }

    /// Entries in first-seen order.
    pub fn patterns(&self) -> &[Pattern<T>] {
        &self.patterns
    }

    /// Iterate over entries in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pattern<T>> {
        self.patterns.iter()
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Sum of all occurrence counters.
    pub fn total_count(&self) -> u64 {
        self.patterns.iter().map(Pattern::count).sum()
    }

    /// Take the patterns out of the corpus.
    pub fn into_patterns(self) -> Vec<Pattern<T>> {
        self.patterns
    }
}

impl<T: Clone + Serialize> Corpus<T> {
    /// Export every entry for a persistence collaborator.
    pub fn records(&self) -> Vec<PatternRecord<T>> {
        self.patterns.iter().map(Pattern::to_record).collect()
    }

    /// Fingerprint of the whole corpus: entry order, slots and counts.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.records())
    }
}

impl<'a, T> IntoIterator for &'a Corpus<T> {
    type Item = &'a Pattern<T>;
    type IntoIter = std::slice::Iter<'a, Pattern<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

impl<T> IntoIterator for Corpus<T> {
    type Item = Pattern<T>;
    type IntoIter = std::vec::IntoIter<Pattern<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.into_iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Corpus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corpus")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}
