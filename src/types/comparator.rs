//! Element comparators.
//!
//! A comparator is the only notion of equality the engine knows about. It is
//! injected by the caller, must be pure, and is never invoked with a gap:
//! absence is handled entirely by the search code.

use std::fmt;
use std::sync::Arc;

/// Pure equality predicate over two elements.
///
/// Implementations must be referentially transparent: the same pair of
/// arguments always yields the same answer, regardless of call order. Gap
/// compression and corpus deduplication rely on this.
///
/// Closures become comparators through [`from_fn`].
pub trait Comparator<T: ?Sized> {
    /// Returns `true` if the two elements are considered equal.
    fn compare(&self, a: &T, b: &T) -> bool;

    /// A comparator returning the opposite result.
    fn negate(self) -> Negate<Self>
    where
        Self: Sized,
    {
        Negate(self)
    }

    /// Logical conjunction of this comparator and `other`.
    ///
    /// `other` is only consulted when `self` already returned `true`.
    fn and<O>(self, other: O) -> And<Self, O>
    where
        Self: Sized,
        O: Comparator<T>,
    {
        And(self, other)
    }
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    fn compare(&self, a: &T, b: &T) -> bool {
        (**self).compare(a, b)
    }
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for Box<C> {
    fn compare(&self, a: &T, b: &T) -> bool {
        (**self).compare(a, b)
    }
}

impl<T: ?Sized, C: Comparator<T> + ?Sized> Comparator<T> for Arc<C> {
    fn compare(&self, a: &T, b: &T) -> bool {
        (**self).compare(a, b)
    }
}

/// Shared, thread-safe handle to a comparator.
///
/// Patterns hold one of these for their whole lifetime; a discovery run hands
/// the same handle to every pattern it creates.
pub type SharedComparator<T> = Arc<dyn Comparator<T> + Send + Sync>;

/// Comparator backed by a closure. Built with [`from_fn`].
#[derive(Clone, Copy)]
pub struct FnComparator<F>(F);

impl<T: ?Sized, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn compare(&self, a: &T, b: &T) -> bool {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator(..)")
    }
}

/// Turn a closure into a comparator.
///
/// ```
/// use prnet::types::comparator::{from_fn, Comparator};
///
/// let same_parity = from_fn(|a: &i32, b: &i32| a % 2 == b % 2);
/// assert!(same_parity.compare(&2, &8));
/// assert!(same_parity.negate().compare(&2, &7));
/// ```
pub fn from_fn<T: ?Sized, F>(f: F) -> FnComparator<F>
where
    F: Fn(&T, &T) -> bool,
{
    FnComparator(f)
}

/// Wrap a comparator into a [`SharedComparator`].
pub fn shared<T, C>(comparator: C) -> SharedComparator<T>
where
    C: Comparator<T> + Send + Sync + 'static,
{
    Arc::new(comparator)
}

/// Shared comparator built from a closure.
pub fn shared_fn<T, F>(f: F) -> SharedComparator<T>
where
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    Arc::new(FnComparator(f))
}

/// Comparator built from `PartialEq`.
pub fn equality<T: PartialEq + 'static>() -> SharedComparator<T> {
    shared_fn(|a: &T, b: &T| a == b)
}

/// Comparator that projects both sides through `key` and compares the keys.
///
/// ```
/// use prnet::types::comparator::{by_key, Comparator};
///
/// let same_len = by_key(|s: &String| s.len());
/// assert!(same_len.compare(&"ab".to_string(), &"xy".to_string()));
/// ```
pub fn by_key<T, K, F>(key: F) -> SharedComparator<T>
where
    T: 'static,
    K: PartialEq + 'static,
    F: Fn(&T) -> K + Send + Sync + 'static,
{
    shared_fn(move |a: &T, b: &T| key(a) == key(b))
}

/// See [`Comparator::negate`].
#[derive(Clone, Copy)]
pub struct Negate<C>(C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Negate<C> {
    fn compare(&self, a: &T, b: &T) -> bool {
        !self.0.compare(a, b)
    }
}

impl<C> fmt::Debug for Negate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Negate(..)")
    }
}

/// See [`Comparator::and`].
#[derive(Clone, Copy)]
pub struct And<A, B>(A, B);

impl<T: ?Sized, A: Comparator<T>, B: Comparator<T>> Comparator<T> for And<A, B> {
    fn compare(&self, a: &T, b: &T) -> bool {
        self.0.compare(a, b) && self.1.compare(a, b)
    }
}

impl<A, B> fmt::Debug for And<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("And(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_from_fn() {
        let cmp = from_fn(|a: &i32, b: &i32| a == b);
        assert!(cmp.compare(&1, &1));
        assert!(!cmp.compare(&1, &2));
    }

    #[test]
    fn test_negate() {
        let cmp = from_fn(|a: &i32, b: &i32| a == b).negate();
        assert!(!cmp.compare(&3, &3));
        assert!(cmp.compare(&3, &4));
    }

    #[test]
    fn test_and_short_circuits() {
        let calls = Cell::new(0);
        let never = from_fn(|_: &i32, _: &i32| false);
        let counting = from_fn(|_: &i32, _: &i32| {
            calls.set(calls.get() + 1);
            true
        });

        let cmp = never.and(&counting);
        assert!(!cmp.compare(&1, &1));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_and_of_shared_comparators() {
        let parity = shared_fn(|a: &i32, b: &i32| a % 2 == b % 2);
        let sign = shared_fn(|a: &i32, b: &i32| a.signum() == b.signum());

        let both = (&parity).and(&sign);
        assert!(both.compare(&2, &4));
        assert!(!both.compare(&2, &-4));
        assert!(!both.compare(&2, &3));
    }

    #[test]
    fn test_double_negation() {
        let eq = equality::<u8>();
        let back = (&eq).negate().negate();
        assert!(back.compare(&7, &7));
        assert!(!back.compare(&7, &8));
    }

    #[test]
    fn test_equality_and_by_key() {
        let eq = equality::<char>();
        assert!(eq.compare(&'a', &'a'));
        assert!(!eq.compare(&'a', &'b'));

        let ci = by_key(|c: &char| c.to_ascii_lowercase());
        assert!(ci.compare(&'A', &'a'));
    }
}
