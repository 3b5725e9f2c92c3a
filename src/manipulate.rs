//! Matching plus in-place rewriting of matched elements.
//!
//! Manipulation runs the matcher's backtracking search with a dedicated
//! comparator (the manipulation clause) while recording which target
//! position was aligned with which concrete pattern slot. Only once the
//! whole target has matched is the caller's [`Transition`] invoked, once per
//! recorded pair, in ascending target order. Failed branches and failed
//! matches never reach the transition.

use std::fmt;

use tracing::trace;

use crate::matcher::Search;
use crate::policy::{ManipulationPolicy, PairingMode};
use crate::types::{Comparator, Pattern, SharedComparator, Slot};

/// Side-effecting rewrite of one matched target element.
///
/// `target` is the element to change; `pattern_part` is the concrete pattern
/// element it was aligned with. Any `FnMut(&mut T, &T)` is a transition.
pub trait Transition<T> {
    /// Rewrite `target` given its aligned `pattern_part`.
    fn apply(&mut self, target: &mut T, pattern_part: &T);
}

impl<T, F> Transition<T> for F
where
    F: FnMut(&mut T, &T),
{
    fn apply(&mut self, target: &mut T, pattern_part: &T) {
        self(target, pattern_part)
    }
}

/// Match `target` against `pattern` under `clause` and, on success, rewrite
/// every aligned element through `transition`.
///
/// `clause` is used alone; the pattern's own comparator is not consulted.
///
/// ```
/// use prnet::{equality, manipulate, Pattern};
///
/// let pattern = Pattern::from_elements([1, 5, 1], equality());
/// let mut target = vec![1, 5, 1];
/// let five_to_nine = |t: &mut i32, p: &i32| if *p == 5 { *t = 9 };
///
/// assert!(manipulate(&mut target, &pattern, pattern.comparator(), &mut { five_to_nine }));
/// assert_eq!(target, vec![1, 9, 1]);
/// ```
pub fn manipulate<T, C, R>(target: &mut [T], pattern: &Pattern<T>, clause: &C, transition: &mut R) -> bool
where
    C: Comparator<T> + ?Sized,
    R: Transition<T> + ?Sized,
{
    manipulate_with(&ManipulationPolicy::default(), target, pattern, clause, transition)
}

/// [`manipulate`] under an explicit policy.
pub fn manipulate_with<T, C, R>(
    policy: &ManipulationPolicy,
    target: &mut [T],
    pattern: &Pattern<T>,
    clause: &C,
    transition: &mut R,
) -> bool
where
    C: Comparator<T> + ?Sized,
    R: Transition<T> + ?Sized,
{
    let mut trail: Vec<(usize, usize)> = Vec::new();
    let search = Search {
        target: &*target,
        slots: pattern.slots(),
        comparator: clause,
        trailing_gap: policy.trailing_gap,
    };

    if !search.run(&mut trail) {
        trace!(target_len = target.len(), pattern_len = pattern.len(), "manipulation did not match");
        return false;
    }

    let pairs = match policy.pairing {
        PairingMode::PerPosition => trail,
        PairingMode::CoalesceEqualTargets => coalesce(&trail, target, clause),
    };

    for &(position, slot) in &pairs {
        if let Slot::Concrete(part) = &pattern.slots()[slot] {
            transition.apply(&mut target[position], part);
        }
    }

    trace!(
        target_len = target.len(),
        pattern_len = pattern.len(),
        applied = pairs.len(),
        "manipulation applied"
    );

    true
}

/// Key recorded pairs by target element.
///
/// The first position of each group of equal targets keeps the entry; later
/// equal targets overwrite its slot.
fn coalesce<T, C>(trail: &[(usize, usize)], target: &[T], clause: &C) -> Vec<(usize, usize)>
where
    C: Comparator<T> + ?Sized,
{
    let mut entries: Vec<(usize, usize)> = Vec::with_capacity(trail.len());

    for &(position, slot) in trail {
        match entries
            .iter_mut()
            .find(|(key, _)| clause.compare(&target[*key], &target[position]))
        {
            Some(entry) => entry.1 = slot,
            None => entries.push((position, slot)),
        }
    }

    entries
}

/// A pattern bundled with its manipulation clause and transition.
///
/// The pattern is bound to the clause, so plain matching through
/// [`ManipulablePattern::matches`] uses the same comparator as manipulation.
pub struct ManipulablePattern<T> {
    pattern: Pattern<T>,
    transition: Box<dyn Transition<T> + Send>,
    policy: ManipulationPolicy,
}

impl<T> ManipulablePattern<T> {
    /// Create a manipulable pattern from slots.
    pub fn new<I, R>(slots: I, clause: SharedComparator<T>, transition: R) -> Self
    where
        I: IntoIterator<Item = Slot<T>>,
        R: Transition<T> + Send + 'static,
    {
        Self {
            pattern: Pattern::from_slots(slots, clause),
            transition: Box::new(transition),
            policy: ManipulationPolicy::default(),
        }
    }

    /// Replace the manipulation policy.
    pub fn with_policy(mut self, policy: ManipulationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The underlying pattern.
    pub fn pattern(&self) -> &Pattern<T> {
        &self.pattern
    }

    /// The manipulation clause.
    pub fn manipulation_clause(&self) -> &SharedComparator<T> {
        self.pattern.comparator()
    }

    /// The manipulation policy.
    pub fn policy(&self) -> &ManipulationPolicy {
        &self.policy
    }

    /// Check if `target` matches without rewriting anything.
    pub fn matches(&self, target: &[T]) -> bool {
        crate::matcher::matches_with(&self.policy.match_policy(), target, &self.pattern)
    }

    /// Match and rewrite `target` with the bundled clause and transition.
    pub fn manipulate(&mut self, target: &mut [T]) -> bool {
        manipulate_with(
            &self.policy,
            target,
            &self.pattern,
            self.pattern.comparator(),
            &mut *self.transition,
        )
    }
}

impl<T: fmt::Debug> fmt::Debug for ManipulablePattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManipulablePattern")
            .field("pattern", &self.pattern)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
