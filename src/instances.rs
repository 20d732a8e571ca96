//! Container-keyed component registry
//!
//! Components are owned by the embedding application, not stored on page
//! elements. An `Instances` map gives hosts the usual pattern: one component
//! per container element, looked up by `ElementId` when events arrive.

use crate::page::ElementId;
use crate::prelude::HashMap;

/// Owns one component per container element.
pub struct Instances<T> {
    inner: HashMap<ElementId, T>,
}

impl<T> Instances<T> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::default(),
        }
    }

    /// Registers a component for a container, returning the previous
    /// occupant if the container was already claimed.
    pub fn insert(&mut self, container: ElementId, component: T) -> Option<T> {
        self.inner.insert(container, component)
    }

    pub fn get(&self, container: ElementId) -> Option<&T> {
        self.inner.get(&container)
    }

    pub fn get_mut(&mut self, container: ElementId) -> Option<&mut T> {
        self.inner.get_mut(&container)
    }

    /// Releases a container's component to the caller, who decides whether
    /// to destroy it.
    pub fn remove(&mut self, container: ElementId) -> Option<T> {
        self.inner.remove(&container)
    }

    pub fn contains(&self, container: ElementId) -> bool {
        self.inner.contains_key(&container)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over registered (container, component) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &T)> {
        self.inner.iter().map(|(id, component)| (*id, component))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ElementId, &mut T)> {
        self.inner.iter_mut().map(|(id, component)| (*id, component))
    }
}

impl<T> Default for Instances<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_component_per_container() {
        let mut instances = Instances::new();
        let container = ElementId(7);

        assert!(instances.insert(container, "first").is_none());
        assert!(instances.contains(container));
        assert_eq!(instances.get(container), Some(&"first"));

        // Claiming an occupied container hands the old component back
        assert_eq!(instances.insert(container, "second"), Some("first"));
        assert_eq!(instances.len(), 1);
    }

    #[test]
    fn test_remove_releases_ownership() {
        let mut instances = Instances::new();
        let container = ElementId(3);
        instances.insert(container, 42);

        assert_eq!(instances.remove(container), Some(42));
        assert_eq!(instances.remove(container), None);
        assert!(instances.is_empty());
    }
}
