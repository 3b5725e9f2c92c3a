//! Gap-aware backtracking matcher.
//!
//! A target matches a pattern when the whole target can be consumed slot by
//! slot: a concrete slot consumes exactly one element its comparator accepts,
//! a gap consumes zero or more elements. Gap extents are chosen by
//! backtracking over the positions where the slot after the gap could land,
//! in ascending order; the first continuation that succeeds wins.
//!
//! The same search drives [`crate::manipulate`], which additionally records
//! which target position was aligned with which concrete slot.

use std::borrow::Borrow;

use tracing::trace;

use crate::policy::{MatchPolicy, TrailingGap};
use crate::types::{Comparator, Pattern, Slot};

/// Error type for matching against untyped environments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The target contains a gap; gaps are only meaningful in patterns.
    #[error("Target contains a gap at index {index}")]
    GapInTarget {
        /// Position of the first gap.
        index: usize,
    },
}

/// Records (target index, slot index) alignments along the current search path.
pub(crate) trait Trail {
    /// Current length, used to rewind after a failed branch.
    fn mark(&self) -> usize;
    /// Record one concrete alignment.
    fn record(&mut self, target: usize, slot: usize);
    /// Forget everything recorded after `mark`.
    fn rewind(&mut self, mark: usize);
}

impl Trail for () {
    fn mark(&self) -> usize {
        0
    }

    fn record(&mut self, _target: usize, _slot: usize) {}

    fn rewind(&mut self, _mark: usize) {}
}

impl Trail for Vec<(usize, usize)> {
    fn mark(&self) -> usize {
        self.len()
    }

    fn record(&mut self, target: usize, slot: usize) {
        self.push((target, slot));
    }

    fn rewind(&mut self, mark: usize) {
        self.truncate(mark);
    }
}

/// Inputs of one search, shared by every recursion level.
///
/// Target elements are anything that borrows as the pattern's element type,
/// so owned and borrowed targets share one implementation.
pub(crate) struct Search<'a, E, T, C: ?Sized> {
    pub target: &'a [E],
    pub slots: &'a [Slot<T>],
    pub comparator: &'a C,
    pub trailing_gap: TrailingGap,
}

impl<E, T, C> Search<'_, E, T, C>
where
    E: Borrow<T>,
    C: Comparator<T> + ?Sized,
{
    /// Run the search from the start of both sequences.
    ///
    /// On success `trail` holds exactly the alignments of the winning path.
    pub fn run<R: Trail>(&self, trail: &mut R) -> bool {
        self.step(0, 0, trail)
    }

    fn element(&self, index: usize) -> &T {
        Borrow::<T>::borrow(&self.target[index])
    }

    fn step<R: Trail>(&self, mut t: usize, mut p: usize, trail: &mut R) -> bool {
        let mark = trail.mark();

        while t < self.target.len() && p < self.slots.len() {
            match &self.slots[p] {
                Slot::Concrete(expected) => {
                    if !self.comparator.compare(self.element(t), expected) {
                        trail.rewind(mark);
                        return false;
                    }
                    trail.record(t, p);
                    t += 1;
                    p += 1;
                }
                Slot::Gap => {
                    let Some(next) = self.slots.get(p + 1) else {
                        if self.trailing_gap == TrailingGap::MatchRest {
                            return true;
                        }
                        trail.rewind(mark);
                        return false;
                    };
                    let Slot::Concrete(next) = next else {
                        // Uncompressed gap run; treat as one gap.
                        p += 1;
                        continue;
                    };

                    for candidate in t..self.target.len() {
                        if self.comparator.compare(self.element(candidate), next)
                            && self.step(candidate, p + 1, trail)
                        {
                            return true;
                        }
                    }
                    trail.rewind(mark);
                    return false;
                }
            }
        }

        let rest = &self.slots[p..];
        let pattern_done = match rest {
            [] => true,
            [Slot::Gap] => self.trailing_gap == TrailingGap::MatchRest,
            _ => false,
        };

        if t == self.target.len() && pattern_done {
            true
        } else {
            trail.rewind(mark);
            false
        }
    }
}

/// Check if `target` matches `pattern` under the pattern's comparator.
///
/// ```
/// use prnet::{equality, matches, Pattern, Slot};
///
/// let pattern = Pattern::from_slots(
///     vec![Slot::Concrete('a'), Slot::Gap, Slot::Concrete('d')],
///     equality(),
/// );
/// assert!(matches(&['a', 'b', 'c', 'd'], &pattern));
/// assert!(!matches(&['a', 'c'], &pattern));
/// ```
pub fn matches<T>(target: &[T], pattern: &Pattern<T>) -> bool {
    matches_with(&MatchPolicy::default(), target, pattern)
}

/// [`matches`] under an explicit policy.
pub fn matches_with<T>(policy: &MatchPolicy, target: &[T], pattern: &Pattern<T>) -> bool {
    matches_using(policy, target, pattern, pattern.comparator())
}

/// Match with a caller-chosen comparator instead of the pattern's own.
///
/// Use this when the target structure supplies its own comparator: pass
/// `pattern.comparator().and(target_comparator)`.
pub fn matches_using<T, C>(policy: &MatchPolicy, target: &[T], pattern: &Pattern<T>, comparator: &C) -> bool
where
    C: Comparator<T> + ?Sized,
{
    evaluate(policy, target, pattern, comparator)
}

fn evaluate<E, T, C>(policy: &MatchPolicy, target: &[E], pattern: &Pattern<T>, comparator: &C) -> bool
where
    E: Borrow<T>,
    C: Comparator<T> + ?Sized,
{
    let search = Search {
        target,
        slots: pattern.slots(),
        comparator,
        trailing_gap: policy.trailing_gap,
    };
    let matched = search.run(&mut ());

    trace!(
        target_len = target.len(),
        pattern_len = pattern.len(),
        matched,
        "pattern match evaluated"
    );

    matched
}

/// Match a slot sequence that must not contain gaps.
pub fn matches_slots_using<T, C>(
    policy: &MatchPolicy,
    target: &[Slot<T>],
    pattern: &Pattern<T>,
    comparator: &C,
) -> Result<bool, MatchError>
where
    C: Comparator<T> + ?Sized,
{
    let elements = concrete_target(target)?;
    Ok(evaluate(policy, &elements, pattern, comparator))
}

/// Match one pattern against another pattern used as the environment.
///
/// The comparison is the conjunction of both patterns' comparators. The
/// environment must be gap-free.
pub fn matches_pattern<T>(environment: &Pattern<T>, pattern: &Pattern<T>) -> Result<bool, MatchError> {
    let combined = pattern.comparator().and(environment.comparator());
    let elements = concrete_target(environment.slots())?;
    Ok(evaluate(&MatchPolicy::default(), &elements, pattern, &combined))
}

/// Borrow the concrete elements of `slots`, rejecting any gap.
fn concrete_target<T>(slots: &[Slot<T>]) -> Result<Vec<&T>, MatchError> {
    slots
        .iter()
        .enumerate()
        .map(|(index, slot)| slot.as_concrete().ok_or(MatchError::GapInTarget { index }))
        .collect()
}

impl<T> Pattern<T> {
    /// Check if `target` matches this pattern. See [`matches`].
    pub fn matches(&self, target: &[T]) -> bool {
        matches(target, self)
    }
}
