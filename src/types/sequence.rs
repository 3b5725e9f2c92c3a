//! Flattened element sequences and the adapter contract.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Ordered, finite, gap-free snapshot of a structure's elements.
///
/// A sequence is immutable once produced; later changes to the structure
/// it came from are not visible through it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence<T> {
    elements: Vec<T>,
}

impl<T> Sequence<T> {
    /// Create a sequence from owned elements.
    pub fn new(elements: Vec<T>) -> Self {
        Self { elements }
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Copy the elements into a fresh, independent vector.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.elements.clone()
    }

    /// Take the elements out of the snapshot.
    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T> Deref for Sequence<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.elements
    }
}

impl<T> AsRef<[T]> for Sequence<T> {
    fn as_ref(&self) -> &[T] {
        &self.elements
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::new(elements)
    }
}

impl<T: Clone> From<&[T]> for Sequence<T> {
    fn from(elements: &[T]) -> Self {
        Self::new(elements.to_vec())
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A structure that can be flattened into an order-deterministic sequence.
///
/// Each call to [`arrange`](Arrange::arrange) returns a fresh snapshot. The
/// engine only reads through this interface; it never mutates the structure.
pub trait Arrange {
    /// Element type of the flattened sequence.
    type Element;

    /// Flatten the structure's current state.
    fn arrange(&self) -> Sequence<Self::Element>;
}

impl<T: Clone> Arrange for Vec<T> {
    type Element = T;

    fn arrange(&self) -> Sequence<T> {
        Sequence::from(self.as_slice())
    }
}

impl<T: Clone> Arrange for [T] {
    type Element = T;

    fn arrange(&self) -> Sequence<T> {
        Sequence::from(self)
    }
}

impl<T: Clone> Arrange for Sequence<T> {
    type Element = T;

    fn arrange(&self) -> Sequence<T> {
        self.clone()
    }
}

impl<A: Arrange + ?Sized> Arrange for &A {
    type Element = A::Element;

    fn arrange(&self) -> Sequence<Self::Element> {
        (**self).arrange()
    }
}
