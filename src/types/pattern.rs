//! Gapped, ordered patterns.
//!
//! A [`Pattern`] is an ordered list of [`Slot`]s bound to one comparator.
//! Every constructor and mutator keeps gap runs compressed to a single
//! marker, so two adjacent `Gap` slots can never be observed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use super::comparator::{Comparator, SharedComparator};
use super::slot::Slot;

/// Text used for a gap when rendering pattern keys.
pub const GAP_KEY: &str = "*";

/// Ordered sequence of concrete/gap slots with an occurrence counter.
#[derive(Clone)]
pub struct Pattern<T> {
    slots: Vec<Slot<T>>,
    comparator: SharedComparator<T>,
    count: u64,
}

impl<T> Pattern<T> {
    /// Create an empty pattern bound to `comparator`.
    pub fn new(comparator: SharedComparator<T>) -> Self {
        Self {
            slots: Vec::new(),
            comparator,
            count: 0,
        }
    }

    /// Create a pattern from slots, compressing gap runs.
    pub fn from_slots<I>(slots: I, comparator: SharedComparator<T>) -> Self
    where
        I: IntoIterator<Item = Slot<T>>,
    {
        let mut pattern = Self::new(comparator);
        pattern.extend(slots);
        pattern
    }

    /// Create a gap-free pattern from concrete elements.
    pub fn from_elements<I>(elements: I, comparator: SharedComparator<T>) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_slots(elements.into_iter().map(Slot::Concrete), comparator)
    }

    /// Append a concrete element.
    pub fn push(&mut self, element: T) {
        self.slots.push(Slot::Concrete(element));
    }

    /// Append a gap unless the pattern already ends with one.
    pub fn push_gap(&mut self) {
        if !self.ends_with_gap() {
            self.slots.push(Slot::Gap);
        }
    }

    /// Prepend a gap unless the pattern already starts with one.
    pub fn push_front_gap(&mut self) {
        if !self.starts_with_gap() {
            self.slots.insert(0, Slot::Gap);
        }
    }

    /// Append a slot, compressing gap runs.
    pub fn push_slot(&mut self, slot: Slot<T>) {
        match slot {
            Slot::Concrete(element) => self.push(element),
            Slot::Gap => self.push_gap(),
        }
    }

    /// All slots in order.
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    /// Number of slots, gaps included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the pattern has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The comparator this pattern is bound to.
    pub fn comparator(&self) -> &SharedComparator<T> {
        &self.comparator
    }

    /// How many additional equivalent discoveries were folded into this pattern.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Increase the occurrence counter by one.
    pub fn increment(&mut self) {
        self.count += 1;
    }

    /// Replace the occurrence counter.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    /// Concrete elements in order, gaps skipped.
    pub fn concrete_elements(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Slot::as_concrete)
    }

    /// Number of gap slots.
    pub fn gap_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_gap()).count()
    }

    /// Check if the first slot is a gap.
    pub fn starts_with_gap(&self) -> bool {
        self.slots.first().is_some_and(Slot::is_gap)
    }

    /// Check if the last slot is a gap.
    pub fn ends_with_gap(&self) -> bool {
        self.slots.last().is_some_and(Slot::is_gap)
    }

    /// Drop a trailing gap, if present.
    pub fn trim_trailing_gap(&mut self) {
        if self.ends_with_gap() {
            self.slots.pop();
        }
    }

    /// Structural equality under this pattern's comparator.
    ///
    /// Patterns are equal when they have the same length and every slot
    /// pair is either two gaps or two concrete elements the comparator
    /// accepts. Comparator identity and occurrence counts are not compared.
    pub fn structurally_eq(&self, other: &Pattern<T>) -> bool {
        slots_eq(&self.comparator, &self.slots, &other.slots)
    }

    /// Render the pattern as a storage key such as `{a, *, d}`.
    pub fn key_with<F>(&self, key: F) -> String
    where
        F: Fn(&T) -> String,
    {
        let parts: Vec<String> = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Concrete(element) => key(element),
                Slot::Gap => GAP_KEY.to_string(),
            })
            .collect();
        format!("{{{}}}", parts.join(", "))
    }

    /// Split into slots and count, releasing the comparator.
    pub fn into_parts(self) -> (Vec<Slot<T>>, u64) {
        (self.slots, self.count)
    }
}

impl<T: Serialize> Pattern<T> {
    /// Content fingerprint of the slots (xxh64 over canonical JSON).
    ///
    /// The count is excluded, so a pattern keeps its fingerprint as it is
    /// rediscovered.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(&self.slots)
    }
}

impl<T: Clone + Serialize> Pattern<T> {
    /// Export for a persistence collaborator.
    pub fn to_record(&self) -> PatternRecord<T> {
        PatternRecord {
            fingerprint: self.fingerprint(),
            slots: self.slots.clone(),
            count: self.count,
        }
    }
}

impl<T> Extend<Slot<T>> for Pattern<T> {
    fn extend<I: IntoIterator<Item = Slot<T>>>(&mut self, iter: I) {
        for slot in iter {
            self.push_slot(slot);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("slots", &self.slots)
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl<T: fmt::Display> fmt::Display for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_with(|e| e.to_string()))
    }
}

/// Slot-by-slot equality: gap only matches gap.
///
/// Concrete pairs are compared as `compare(b, a)`: the other side first,
/// the receiver second.
pub(crate) fn slots_eq<T, C>(comparator: &C, a: &[Slot<T>], b: &[Slot<T>]) -> bool
where
    C: Comparator<T> + ?Sized,
{
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (Slot::Gap, Slot::Gap) => true,
            (Slot::Concrete(x), Slot::Concrete(y)) => comparator.compare(y, x),
            _ => false,
        })
}

/// Serializable form of a pattern handed to persistence collaborators.
///
/// The comparator is not part of the record; it is supplied again when the
/// record is turned back into a [`Pattern`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecord<T> {
    /// Content fingerprint of `slots`.
    pub fingerprint: String,
    /// Ordered slots.
    pub slots: Vec<Slot<T>>,
    /// Occurrence count.
    pub count: u64,
}

impl<T> PatternRecord<T> {
    /// Rebuild a pattern, compressing any gap runs in the stored slots.
    pub fn into_pattern(self, comparator: SharedComparator<T>) -> Pattern<T> {
        Pattern::from_slots(self.slots, comparator).with_count(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::comparator::{equality, shared_fn};

    fn gap() -> Slot<char> {
        Slot::Gap
    }

    fn c(x: char) -> Slot<char> {
        Slot::Concrete(x)
    }

    #[test]
    fn test_gap_runs_are_compressed() {
        let pattern = Pattern::from_slots(
            vec![c('a'), gap(), gap(), gap(), c('b'), gap(), gap()],
            equality(),
        );
        assert_eq!(pattern.slots(), &[c('a'), gap(), c('b'), gap()]);

        let mut pattern = Pattern::<char>::new(equality());
        pattern.push_gap();
        pattern.push_gap();
        assert_eq!(pattern.len(), 1);
    }

    #[test]
    fn test_push_front_gap_is_compressed() {
        let mut pattern = Pattern::from_elements("ab".chars(), equality());
        pattern.push_front_gap();
        pattern.push_front_gap();
        assert_eq!(pattern.slots(), &[gap(), c('a'), c('b')]);
        assert_eq!(pattern.gap_count(), 1);

        let mut empty = Pattern::<char>::new(equality());
        empty.push_front_gap();
        empty.push_gap();
        assert_eq!(empty.slots(), &[gap()]);
    }

    #[test]
    fn test_gap_count_and_into_parts() {
        let pattern = Pattern::from_slots(vec![c('a'), gap(), c('b'), gap()], equality())
            .with_count(3);
        assert_eq!(pattern.gap_count(), 2);

        let (slots, count) = pattern.into_parts();
        assert_eq!(slots, vec![c('a'), gap(), c('b'), gap()]);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_structural_eq_passes_other_element_first() {
        // Accepts (x, y) only when x <= y.
        let at_most = shared_fn(|a: &u8, b: &u8| a <= b);
        let low = Pattern::from_elements([1u8], at_most.clone());
        let high = Pattern::from_elements([5u8], at_most);

        assert!(!low.structurally_eq(&high));
        assert!(high.structurally_eq(&low));
    }

    #[test]
    fn test_structural_eq_uses_comparator() {
        let ci = shared_fn(|a: &char, b: &char| a.eq_ignore_ascii_case(b));
        let upper = Pattern::from_slots(vec![c('A'), gap(), c('B')], ci.clone());
        let lower = Pattern::from_slots(vec![c('a'), gap(), c('b')], ci);

        assert!(upper.structurally_eq(&lower));
        assert!(lower.structurally_eq(&upper));
    }

    #[test]
    fn test_structural_eq_gap_only_matches_gap() {
        let always = shared_fn(|_: &char, _: &char| true);
        let a = Pattern::from_slots(vec![c('a'), gap()], always.clone());
        let b = Pattern::from_slots(vec![c('a'), c('b')], always);
        assert!(!a.structurally_eq(&b));
    }

    #[test]
    fn test_structural_eq_ignores_count() {
        let a = Pattern::from_elements("ab".chars(), equality());
        let mut b = a.clone();
        b.increment();
        assert!(a.structurally_eq(&b));
        assert_eq!(b.count(), 1);
    }

    #[test]
    fn test_key_rendering() {
        let pattern = Pattern::from_slots(vec![c('a'), gap(), c('d')], equality());
        assert_eq!(pattern.key_with(|e| e.to_string()), "{a, *, d}");
        assert_eq!(pattern.to_string(), "{a, *, d}");

        let empty: Pattern<char> = Pattern::new(equality());
        assert_eq!(empty.to_string(), "{}");
    }

    #[test]
    fn test_trim_trailing_gap() {
        let mut pattern = Pattern::from_slots(vec![c('a'), gap()], equality());
        assert!(pattern.ends_with_gap());
        pattern.trim_trailing_gap();
        assert_eq!(pattern.slots(), &[c('a')]);
        pattern.trim_trailing_gap();
        assert_eq!(pattern.slots(), &[c('a')]);
    }

    #[test]
    fn test_record_round_trip_keeps_count_and_fingerprint() {
        let mut pattern = Pattern::from_slots(vec![c('x'), gap(), c('y')], equality());
        pattern.increment();
        pattern.increment();

        let record = pattern.to_record();
        assert_eq!(record.count, 2);
        assert_eq!(record.fingerprint, pattern.fingerprint());

        let json = serde_json::to_string(&record).unwrap();
        let parsed: PatternRecord<char> = serde_json::from_str(&json).unwrap();
        let restored = parsed.into_pattern(equality());

        assert!(restored.structurally_eq(&pattern));
        assert_eq!(restored.count(), 2);
    }

    #[test]
    fn test_fingerprint_excludes_count() {
        let a = Pattern::from_elements([1, 2, 3], equality());
        let b = a.clone().with_count(9);
        assert_eq!(a.fingerprint(), b.fingerprint());

        let c = Pattern::from_elements([1, 2, 4], equality());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
