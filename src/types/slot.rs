//! Pattern slots.

use serde::{Deserialize, Serialize};

/// One position of a pattern: a concrete element or a compressed wildcard.
///
/// A `Gap` stands for "zero or more skipped elements". Patterns never hold
/// two adjacent gaps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot<T> {
    /// A concrete element compared with the pattern's comparator.
    Concrete(T),
    /// A wildcard run.
    Gap,
}

impl<T> Slot<T> {
    /// Check if this slot is a gap.
    pub fn is_gap(&self) -> bool {
        matches!(self, Self::Gap)
    }

    /// Get the concrete element, if any.
    pub fn as_concrete(&self) -> Option<&T> {
        match self {
            Self::Concrete(value) => Some(value),
            Self::Gap => None,
        }
    }

    /// Apply `f` to the concrete element, keeping gaps as they are.
    pub fn map<U, F: FnOnce(&T) -> U>(&self, f: F) -> Slot<U> {
        match self {
            Self::Concrete(value) => Slot::Concrete(f(value)),
            Self::Gap => Slot::Gap,
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Gap, Self::Concrete)
    }
}
