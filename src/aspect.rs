//! Named analysis aspects.
//!
//! An aspect names one way of looking at elements: the comparator used to
//! find and match patterns, and the key function used to render patterns as
//! storage keys. Persistence collaborators group stored patterns by aspect.

use std::fmt;
use std::sync::Arc;

use crate::canonical::canonical_hash_hex;
use crate::discovery::find_patterns;
use crate::types::{Corpus, Pattern, SharedComparator};

/// Error type for aspect registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AspectError {
    /// An aspect with this name is already registered.
    #[error("Aspect already defined: {0}")]
    AlreadyDefined(String),
    /// No aspect with this name is registered.
    #[error("Aspect not found: {0}")]
    NotFound(String),
    /// Position is past the end of the registry.
    #[error("No aspect at position {0}")]
    IndexOutOfRange(usize),
}

/// Renders one element as part of a pattern key.
pub type KeyFunction<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// A named comparator and key function.
#[derive(Clone)]
pub struct Aspect<T> {
    name: String,
    comparator: SharedComparator<T>,
    key: KeyFunction<T>,
}

impl<T> Aspect<T> {
    /// Create an aspect.
    pub fn new<F>(name: impl Into<String>, comparator: SharedComparator<T>, key: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            comparator,
            key: Arc::new(key),
        }
    }

    /// The aspect name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The aspect comparator.
    pub fn comparator(&self) -> &SharedComparator<T> {
        &self.comparator
    }

    /// Render `pattern` as a storage key, e.g. `{a, *, d}`.
    pub fn pattern_key(&self, pattern: &Pattern<T>) -> String {
        pattern.key_with(|element| (self.key)(element))
    }

    /// Run discovery under this aspect's comparator.
    pub fn find_patterns<S: AsRef<[T]>>(&self, sequences: &[S]) -> Corpus<T>
    where
        T: Clone,
    {
        find_patterns(self.comparator.clone(), sequences)
    }
}

impl<T> fmt::Debug for Aspect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aspect")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of aspects with unique names in definition order.
///
/// The registry fingerprint changes whenever an aspect is added.
#[derive(Debug, Clone)]
pub struct AspectRegistry<T> {
    aspects: Vec<Aspect<T>>,
    registry_fingerprint: String,
}

impl<T> AspectRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        let mut registry = Self {
            aspects: Vec::new(),
            registry_fingerprint: String::new(),
        };
        registry.update_fingerprint();
        registry
    }

    /// Define a new aspect.
    ///
    /// Names are unique; redefining an existing name is an error.
    pub fn define<F>(
        &mut self,
        name: impl Into<String>,
        comparator: SharedComparator<T>,
        key: F,
    ) -> Result<&Aspect<T>, AspectError>
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.register(Aspect::new(name, comparator, key))
    }

    /// Register a prebuilt aspect.
    pub fn register(&mut self, aspect: Aspect<T>) -> Result<&Aspect<T>, AspectError> {
        if self.aspects.iter().any(|a| a.name == aspect.name) {
            return Err(AspectError::AlreadyDefined(aspect.name));
        }

        self.aspects.push(aspect);
        self.update_fingerprint();

        let index = self.aspects.len() - 1;
        Ok(&self.aspects[index])
    }

    /// Look up an aspect by name.
    pub fn get(&self, name: &str) -> Result<&Aspect<T>, AspectError> {
        self.aspects
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| AspectError::NotFound(name.to_string()))
    }

    /// Look up an aspect by definition position.
    pub fn at(&self, position: usize) -> Result<&Aspect<T>, AspectError> {
        self.aspects
            .get(position)
            .ok_or(AspectError::IndexOutOfRange(position))
    }

    /// All aspects in definition order.
    pub fn aspects(&self) -> &[Aspect<T>] {
        &self.aspects
    }

    /// Get the registry fingerprint.
    pub fn fingerprint(&self) -> &str {
        &self.registry_fingerprint
    }

    /// Get the number of registered aspects.
    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    fn update_fingerprint(&mut self) {
        let names: Vec<&str> = self.aspects.iter().map(|a| a.name.as_str()).collect();
        self.registry_fingerprint = canonical_hash_hex(&names);
    }
}

impl<T> Default for AspectRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{by_key, equality, Slot};

    #[test]
    fn test_define_and_resolve() {
        let mut registry = AspectRegistry::new();
        registry.define("exact", equality::<String>(), |s| s.clone()).unwrap();
        registry.define("length", by_key(|s: &String| s.len()), |s| s.len().to_string()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("length").unwrap().name(), "length");
        assert_eq!(registry.at(0).unwrap().name(), "exact");
        assert_eq!(registry.at(2).unwrap_err(), AspectError::IndexOutOfRange(2));
        assert_eq!(
            registry.get("missing").unwrap_err(),
            AspectError::NotFound("missing".to_string())
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = AspectRegistry::new();
        registry.define("exact", equality::<u8>(), |b| b.to_string()).unwrap();
        let before = registry.fingerprint().to_string();

        let err = registry.define("exact", equality::<u8>(), |b| b.to_string()).unwrap_err();
        assert_eq!(err, AspectError::AlreadyDefined("exact".to_string()));
        assert_eq!(registry.fingerprint(), before);
    }

    #[test]
    fn test_fingerprint_changes_on_define() {
        let mut registry: AspectRegistry<u8> = AspectRegistry::new();
        let empty = registry.fingerprint().to_string();
        registry.define("a", equality(), |b| b.to_string()).unwrap();
        assert_ne!(registry.fingerprint(), empty);
    }

    #[test]
    fn test_pattern_key_uses_key_function() {
        let aspect = Aspect::new("hex", equality::<u8>(), |b| format!("{:02x}", b));
        let pattern = Pattern::from_slots(vec![Slot::Concrete(255), Slot::Gap, Slot::Concrete(1)], equality());
        assert_eq!(aspect.pattern_key(&pattern), "{ff, *, 01}");
    }

    #[test]
    fn test_aspect_discovery_uses_its_comparator() {
        let aspect = Aspect::new("parity", by_key(|n: &i32| n % 2), |n| (n % 2).to_string());
        let corpus = aspect.find_patterns(&[vec![1, 2], vec![3, 4]]);

        let keys: Vec<String> = corpus.iter().map(|p| aspect.pattern_key(p)).collect();
        assert_eq!(keys, vec!["{1, 0}", "{0}"]);
    }
}
